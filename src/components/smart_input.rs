use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme;

/// Free-text entry parsed by the language model. While a parse is in flight
/// the field is locked so the same input can't be submitted twice.
#[derive(Debug, Clone, Default)]
pub struct SmartInputState {
    pub input: String,
    pub pending: bool,
}

impl SmartInputState {
    pub fn input_char(&mut self, c: char) {
        if !self.pending {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.pending {
            self.input.pop();
        }
    }

    /// Take the text for submission and lock the field. Returns `None` when
    /// there is nothing to submit or a parse is already running.
    pub fn submit(&mut self) -> Option<String> {
        if self.pending || self.input.trim().is_empty() {
            return None;
        }
        self.pending = true;
        Some(self.input.trim().to_string())
    }

    /// Unlock after the in-flight parse resolved; clear on success.
    pub fn finish(&mut self, accepted: bool) {
        self.pending = false;
        if accepted {
            self.input.clear();
        }
    }
}

pub struct SmartInput;

impl SmartInput {
    pub fn render(frame: &mut Frame, area: Rect, state: &SmartInputState) {
        let popup_w = area.width.min(64).max(30);
        let popup_h = 6;
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h.min(area.height));

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Smart Add ")
            .title_style(theme::current().accent.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(theme::current().accent);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // input
            Constraint::Length(1), // spacer / spinner
            Constraint::Length(1), // hint
            Constraint::Min(0),
        ])
        .split(inner);

        let (value, style) = if state.input.is_empty() {
            (
                "e.g. \"Remind me to call mom tomorrow at noon\"".to_string(),
                theme::current().dim,
            )
        } else {
            let cursor = if state.pending { "" } else { "_" };
            (format!("{}{}", state.input, cursor), Style::default())
        };
        frame.render_widget(Paragraph::new(Line::from(Span::styled(value, style))), rows[0]);

        if state.pending {
            frame.render_widget(
                Paragraph::new(Span::styled("Parsing...", theme::current().accent)),
                rows[1],
            );
        }

        let hint = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Parse ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Close", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(hint), rows[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims_and_locks() {
        let mut state = SmartInputState::default();
        state.input = "  pay rent friday  ".to_string();

        assert_eq!(state.submit().as_deref(), Some("pay rent friday"));
        assert!(state.pending);
        // Locked: no double submission, no edits
        assert_eq!(state.submit(), None);
        state.input_char('x');
        assert_eq!(state.input, "  pay rent friday  ");
    }

    #[test]
    fn test_blank_input_does_not_submit() {
        let mut state = SmartInputState::default();
        state.input = "   ".to_string();
        assert_eq!(state.submit(), None);
        assert!(!state.pending);
    }

    #[test]
    fn test_finish_clears_only_on_success() {
        let mut state = SmartInputState::default();
        state.input = "water plants".to_string();
        state.submit().unwrap();

        state.finish(false);
        assert!(!state.pending);
        assert_eq!(state.input, "water plants"); // kept for manual retry

        state.submit().unwrap();
        state.finish(true);
        assert!(state.input.is_empty());
    }
}
