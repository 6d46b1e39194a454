use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use color_eyre::eyre::{eyre, Result};
use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::reminders::Priority;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Structured fields extracted from free text. `title` is always present;
/// a missing `due_date` is defaulted by the caller, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReminder {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Local>>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReminder {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
}

/// Boundary to the Gemini API: free text in, structured reminder fields or a
/// single failure out. No retries; a failed attempt is terminal for that
/// submission.
#[derive(Clone)]
pub struct GeminiParser {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiParser {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    pub async fn parse(&self, input: &str, now: DateTime<Local>) -> Result<ParsedReminder> {
        let input = input.trim();
        if input.is_empty() {
            return Err(eyre!("nothing to parse"));
        }

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(input, now))
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini request failed: {}", e);
                eyre!("could not reach the Gemini API")
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Gemini returned HTTP {}", status);
            return Err(eyre!("Gemini API error ({})", status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| eyre!("unreadable Gemini response: {}", e))?;
        let text = response_text(&body).ok_or_else(|| eyre!("empty model response"))?;
        decode_reminder(&text)
    }
}

fn request_body(input: &str, now: DateTime<Local>) -> Value {
    let context = format!(
        "Current Date and Time: {} (Locale: {}). Use this to calculate \
         relative dates like 'tomorrow' or 'next tuesday'.",
        now.to_rfc3339(),
        now.format("%A, %B %-d, %Y %H:%M")
    );
    let prompt = format!(
        "Context: {}\n\nTask: Extract the reminder details from this user \
         input: \"{}\". Return a JSON object. If no time is specified, \
         default to 9:00 AM of the target date. If no date is specified, \
         default to today if time is in future, or tomorrow.",
        context, input
    );

    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "title": {
                        "type": "STRING",
                        "description": "The main action or title of the reminder"
                    },
                    "description": {
                        "type": "STRING",
                        "description": "Any additional details mentioned"
                    },
                    "dueDate": {
                        "type": "STRING",
                        "description": "ISO 8601 formatted date string"
                    },
                    "priority": {
                        "type": "STRING",
                        "enum": ["low", "medium", "high"],
                        "description": "Infer priority based on urgency words"
                    }
                },
                "required": ["title", "dueDate"]
            }
        }
    })
}

/// Pull the generated text out of `candidates[0].content.parts[0].text`.
fn response_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

fn decode_reminder(text: &str) -> Result<ParsedReminder> {
    let wire: WireReminder =
        serde_json::from_str(text).map_err(|e| eyre!("malformed model output: {}", e))?;
    let title = wire.title.trim().to_string();
    if title.is_empty() {
        return Err(eyre!("model output has no title"));
    }

    let due_date = wire.due_date.as_deref().and_then(|raw| {
        let parsed = parse_due_date(raw);
        if parsed.is_none() {
            warn!("ignoring unparseable due date {:?}", raw);
        }
        parsed
    });

    Ok(ParsedReminder {
        title,
        description: wire.description.filter(|d| !d.trim().is_empty()),
        due_date,
        priority: wire.priority,
    })
}

/// Lenient ISO 8601 parsing: full RFC 3339 first, then offset-less local
/// date-times, which the model emits when the prompt context is local time.
fn parse_due_date(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local.from_local_datetime(&naive).single();
        }
    }
    None
}
