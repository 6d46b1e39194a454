use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::reminders::{is_overdue, Filter, Reminder};
use crate::theme;

pub struct ReminderList;

impl ReminderList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        reminders: &[&Reminder],
        selected_index: usize,
        filter: Filter,
        now: DateTime<Local>,
    ) {
        let title = format!(" Reminders ({}) ", reminders.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = match filter {
                Filter::All => "You're all caught up! Press 's' or 'n' to add a reminder.",
                Filter::Active => "No active reminders.",
                Filter::Completed => "No completed reminders.",
                Filter::Overdue => "Nothing overdue. Nice.",
            };
            frame.render_widget(Paragraph::new(msg).style(theme::current().dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                render_row(reminder, i == selected_index, inner_w, now)
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

fn render_row(reminder: &Reminder, selected: bool, width: usize, now: DateTime<Local>) -> ListItem<'static> {
    let checkbox = if reminder.completed { "[x]" } else { "[ ]" };
    let overdue = is_overdue(reminder, now);

    let title_style = if selected {
        theme::current().selected
    } else if reminder.completed {
        theme::current().done
    } else if overdue {
        theme::current().overdue
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", checkbox),
            if selected { theme::current().selected } else { Style::default() },
        ),
        Span::styled(truncate(&reminder.title, width.saturating_sub(22)), title_style),
    ];

    let due_str = format!("  {}", reminder.due_date.format("%b %-d %H:%M"));
    if spans.iter().map(|s| s.width()).sum::<usize>() + due_str.len() < width {
        let due_style = if overdue && !selected {
            theme::current().overdue
        } else {
            theme::current().dim
        };
        spans.push(Span::styled(due_str, due_style));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(ref desc) = reminder.description {
        if !selected {
            lines.push(Line::from(Span::styled(
                format!("     {}", truncate(desc, width.saturating_sub(5))),
                theme::current().dim,
            )));
        }
    }

    ListItem::new(lines)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        s.chars().take(max).collect()
    }
}
