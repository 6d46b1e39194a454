use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;

/// Runtime settings, read once at startup from
/// `<config dir>/remind-tui/config.toml`. `GEMINI_API_KEY` in the
/// environment overrides the file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub check_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let mut config = config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|content| Self::from_toml(&content))
            .unwrap_or_default();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        config
    }

    fn from_toml(content: &str) -> Self {
        let file: ConfigFile = toml::from_str(content).unwrap_or_default();
        let defaults = Self::default();
        Self {
            api_key: file.api_key.filter(|k| !k.is_empty()),
            model: file.model.unwrap_or(defaults.model),
            check_interval_secs: file
                .check_interval_secs
                .unwrap_or(defaults.check_interval_secs)
                .max(1),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("remind-tui").join("config.toml"))
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api_key: Option<String>,
    model: Option<String>,
    check_interval_secs: Option<u64>,
}
