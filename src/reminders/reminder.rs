use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A titled task bound to a due instant, with a completion flag.
///
/// Serialized with camelCase keys so saved collections stay compatible with
/// the web app's stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: DateTime<Local>,
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

impl Reminder {
    pub fn new(title: String, description: Option<String>, due_date: DateTime<Local>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description: description.filter(|d| !d.is_empty()),
            due_date,
            completed: false,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_reminder_defaults() {
        let due = Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let r = Reminder::new("Pay rent".to_string(), None, due);

        assert!(!r.completed);
        assert!(!r.id.is_empty());
        assert_eq!(r.due_date, due);
        assert_eq!(r.description, None);
    }

    #[test]
    fn test_new_reminders_get_unique_ids() {
        let due = Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let a = Reminder::new("a".to_string(), None, due);
        let b = Reminder::new("b".to_string(), None, due);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let due = Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let r = Reminder::new("x".to_string(), Some(String::new()), due);
        assert_eq!(r.description, None);
    }

    #[test]
    fn test_serde_round_trip_is_lossless() {
        let due = Local.with_ymd_and_hms(2026, 5, 12, 14, 30, 0).unwrap();
        let r = Reminder::new(
            "Call the dentist".to_string(),
            Some("ask about invoice".to_string()),
            due,
        );

        let json = serde_json::to_string(&r).unwrap();
        let back: Reminder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let due = Local.with_ymd_and_hms(2026, 5, 12, 14, 30, 0).unwrap();
        let r = Reminder::new("x".to_string(), None, due);

        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"dueDate\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"due_date\""));
    }

    #[test]
    fn test_reads_web_app_blob() {
        let json = r#"{
            "id": "b1946ac9-2d4e-4f8b-9c2a-111111111111",
            "title": "Water plants",
            "dueDate": "2026-04-02T09:00:00+02:00",
            "completed": true,
            "createdAt": "2026-04-01T20:15:00+02:00"
        }"#;
        let r: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.title, "Water plants");
        assert!(r.completed);
        assert_eq!(r.description, None);
    }
}
