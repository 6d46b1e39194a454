use chrono::Local;
use log::{debug, info};

use crate::components::{ReminderFormState, SmartInputState};
use crate::parser::ParsedReminder;
use crate::reminders::{default_due_date, in_due_window, Filter, Reminder, ReminderStore, Stats};

/// Messages delivered to the event loop from background tasks. The loop is
/// the only writer of the store, so everything funnels through here.
#[derive(Debug)]
pub enum AppEvent {
    DueTick,
    ParseDone(Result<ParsedReminder, String>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    Smart,
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub filter: Filter,
    pub selected_index: usize,
    pub form_state: Option<ReminderFormState>,
    pub smart_input: SmartInputState,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub parser_available: bool,
    store: ReminderStore,
}

impl App {
    pub fn new(store: ReminderStore, parser_available: bool) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            filter: Filter::default(),
            selected_index: 0,
            form_state: None,
            smart_input: SmartInputState::default(),
            status_message: None,
            show_help: false,
            parser_available,
            store,
        }
    }

    /// The sorted, filtered view the list renders from.
    pub fn visible(&self) -> Vec<&Reminder> {
        self.store.list_filtered(self.filter, Local::now())
    }

    pub fn stats(&self) -> Stats {
        self.store.stats(Local::now())
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        let tabs = Filter::ALL;
        let pos = tabs.iter().position(|f| *f == self.filter).unwrap_or(0);
        self.set_filter(tabs[(pos + 1) % tabs.len()]);
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    fn selected_id(&self) -> Option<String> {
        self.visible()
            .get(self.selected_index)
            .map(|r| r.id.clone())
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_completed(&id);
            self.clamp_selection();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.delete(&id);
            self.clamp_selection();
            self.status_message = Some("Reminder deleted".to_string());
        }
    }

    // ── Manual form ──

    pub fn open_form(&mut self) {
        self.form_state = Some(ReminderFormState::new(Local::now().date_naive()));
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form_state.as_ref() else {
            return;
        };
        if !form.is_valid() {
            self.status_message = Some("Title and a valid date/time are required".to_string());
            return;
        }
        let due = form.due_date().expect("validated above");
        let description = Some(form.description.trim().to_string()).filter(|d| !d.is_empty());
        self.store.add(form.title.trim().to_string(), description, due);
        self.status_message = Some("Reminder added".to_string());
        self.close_form();
        self.clamp_selection();
    }

    // ── Smart input ──

    pub fn open_smart_input(&mut self) {
        if !self.parser_available {
            self.status_message =
                Some("Set GEMINI_API_KEY (or config.toml) to use smart add".to_string());
            return;
        }
        self.input_mode = InputMode::Smart;
    }

    pub fn close_smart_input(&mut self) {
        // An in-flight parse keeps running; its result is applied when the
        // event arrives.
        self.input_mode = InputMode::Normal;
    }

    /// Outcome of an in-flight parse. On success the reminder is created,
    /// defaulting a missing due date to the next 9:00 AM local; on failure
    /// the store is untouched and the message is surfaced.
    pub fn on_parse_result(&mut self, result: Result<ParsedReminder, String>) {
        match result {
            Ok(parsed) => {
                let due = parsed
                    .due_date
                    .unwrap_or_else(|| default_due_date(Local::now()));
                let priority_note = parsed
                    .priority
                    .map(|p| format!(" ({} priority)", p.label()))
                    .unwrap_or_default();
                info!("smart add: '{}' due {}", parsed.title, due.to_rfc3339());
                self.store.add(parsed.title.clone(), parsed.description, due);
                self.status_message = Some(format!("Added \"{}\"{}", parsed.title, priority_note));
                self.smart_input.finish(true);
                if self.input_mode == InputMode::Smart {
                    self.input_mode = InputMode::Normal;
                }
                self.clamp_selection();
            }
            Err(message) => {
                self.status_message = Some(format!("Smart add failed: {}", message));
                self.smart_input.finish(false);
            }
        }
    }

    /// Periodic re-evaluation of the due window. Hook point for a one-shot
    /// "just became due" notification; deduplication would need a notified
    /// flag per reminder, so for now it only logs.
    pub fn on_due_tick(&mut self) {
        let now = Local::now();
        for reminder in self.store.incomplete() {
            if in_due_window(reminder, now) {
                debug!("reminder '{}' just became due", reminder.title);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::MemoryRepository;
    use chrono::{Duration, NaiveTime};

    fn app() -> App {
        App::new(
            ReminderStore::load(Box::new(MemoryRepository::default())),
            true,
        )
    }

    fn parsed(title: &str) -> ParsedReminder {
        ParsedReminder {
            title: title.to_string(),
            description: None,
            due_date: None,
            priority: None,
        }
    }

    #[test]
    fn test_parse_failure_leaves_store_unchanged() {
        let mut app = app();
        app.smart_input.input = "asdf123".to_string();
        app.smart_input.submit().unwrap();

        app.on_parse_result(Err("could not reach the Gemini API".to_string()));

        assert!(app.visible().is_empty());
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .contains("Smart add failed"));
        assert!(!app.smart_input.pending);
    }

    #[test]
    fn test_parse_success_adds_with_parsed_due_date() {
        let mut app = app();
        let due = Local::now() + Duration::days(2);
        let mut p = parsed("Call mom");
        p.due_date = Some(due);

        app.on_parse_result(Ok(p));

        let visible = app.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Call mom");
        assert_eq!(visible[0].due_date, due);
    }

    #[test]
    fn test_missing_due_date_defaults_to_next_nine_am() {
        let mut app = app();
        app.on_parse_result(Ok(parsed("Stretch")));

        let visible = app.visible();
        let due = visible[0].due_date;
        assert_eq!(due.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());

        let today = Local::now().date_naive();
        let days_ahead = (due.date_naive() - today).num_days();
        assert!(days_ahead == 0 || days_ahead == 1);
    }

    #[test]
    fn test_toggle_and_delete_follow_selection() {
        let mut app = app();
        app.on_parse_result(Ok(parsed("a")));
        app.on_parse_result(Ok(parsed("b")));
        assert_eq!(app.visible().len(), 2);

        app.selected_index = 0;
        app.toggle_selected();
        assert_eq!(app.stats().completed, 1);

        app.delete_selected();
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_cycle_filter_wraps_through_all_tabs() {
        let mut app = app();
        let start = app.filter;
        for _ in 0..Filter::ALL.len() {
            app.cycle_filter();
        }
        assert_eq!(app.filter, start);
    }

    #[test]
    fn test_smart_input_unavailable_without_key() {
        let mut app = App::new(
            ReminderStore::load(Box::new(MemoryRepository::default())),
            false,
        );
        app.open_smart_input();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.status_message.is_some());
    }
}
