use std::cell::RefCell;
use std::path::PathBuf;

use log::{debug, warn};

use super::reminder::Reminder;

/// Pluggable storage for the reminder collection. The store writes the full
/// collection through after every mutation; reads happen once at startup.
pub trait ReminderRepository {
    /// Load the saved collection. Missing or unreadable data yields an empty
    /// collection, never an error.
    fn load(&self) -> Vec<Reminder>;

    /// Persist the full collection. Failures are logged and swallowed so the
    /// in-memory state is never lost to a storage hiccup.
    fn save(&self, reminders: &[Reminder]);
}

/// JSON file under the platform data directory.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<data dir>/remind-tui/reminders.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("remind-tui").join("reminders.json"))
    }
}

impl ReminderRepository for JsonFileRepository {
    fn load(&self) -> Vec<Reminder> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => {
                debug!("no saved reminders at {}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!(
                    "ignoring corrupt reminder data at {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, reminders: &[Reminder]) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("could not create {}: {}", parent.display(), e);
                return;
            }
        }
        let json = match serde_json::to_string_pretty(reminders) {
            Ok(j) => j,
            Err(e) => {
                warn!("could not serialize reminders: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("could not save reminders to {}: {}", self.path.display(), e);
        }
    }
}

/// Keeps the collection for the session only. Used when no data directory is
/// available, and by tests.
#[derive(Default)]
pub struct MemoryRepository {
    saved: RefCell<Vec<Reminder>>,
}

impl ReminderRepository for MemoryRepository {
    fn load(&self) -> Vec<Reminder> {
        self.saved.borrow().clone()
    }

    fn save(&self, reminders: &[Reminder]) {
        *self.saved.borrow_mut() = reminders.to_vec();
    }
}
