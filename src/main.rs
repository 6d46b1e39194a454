mod app;
mod components;
mod config;
mod event;
mod parser;
mod reminders;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, AppEvent, InputMode};
use chrono::Local;
use color_eyre::Result;
use config::AppConfig;
use crossterm::event::{KeyCode, KeyModifiers};
use log::info;
use parser::GeminiParser;
use ratatui::layout::{Constraint, Layout, Rect};
use reminders::{DueChecker, Filter, JsonFileRepository, MemoryRepository, ReminderRepository, ReminderStore};
use tokio::sync::mpsc::{self, UnboundedSender};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let config = AppConfig::load();
    let parser = config
        .api_key
        .clone()
        .map(|key| GeminiParser::new(key, config.model.clone()));

    let repository: Box<dyn ReminderRepository> = match JsonFileRepository::default_path() {
        Some(path) => Box::new(JsonFileRepository::new(path)),
        None => Box::new(MemoryRepository::default()),
    };
    let store = ReminderStore::load(repository);
    info!("starting with {} reminders", store.len());
    let mut app = App::new(store, parser.is_some());

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut checker = DueChecker::start(tx.clone(), Duration::from_secs(config.check_interval_secs));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &parser, &tx, &mut rx);
    checker.stop();
    tui::restore()?;
    result
}

fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    parser: &Option<GeminiParser>,
    tx: &UnboundedSender<AppEvent>,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    while app.running {
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::DueTick => app.on_due_tick(),
                AppEvent::ParseDone(result) => app.on_parse_result(result),
            }
        }

        terminal.draw(|frame| {
            let area = frame.area();

            let layout = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

            render_tabs(frame, layout[0], app);

            let visible = app.visible();
            components::ReminderList::render(
                frame,
                layout[1],
                &visible,
                app.selected_index,
                app.filter,
                Local::now(),
            );

            if let Some(ref form) = app.form_state {
                components::ReminderForm::render(frame, area, form);
            }
            if app.input_mode == InputMode::Smart {
                components::SmartInput::render(frame, area, &app.smart_input);
            }
            if app.show_help {
                render_help(frame, area);
            }

            render_status_bar(frame, layout[2], app);
        })?;

        if let Some(key) = event::next_key_event(Duration::from_millis(100))? {
            // Clear transient status on any key
            app.status_message = None;

            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::Smart => handle_smart_input(app, key.code, parser, tx),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_filter(Filter::All),
        (KeyCode::Char('2'), _) => app.set_filter(Filter::Active),
        (KeyCode::Char('3'), _) => app.set_filter(Filter::Overdue),
        (KeyCode::Char('4'), _) => app.set_filter(Filter::Completed),
        (KeyCode::Tab, _) | (KeyCode::Char('f'), _) => app.cycle_filter(),
        (KeyCode::Char('n'), _) | (KeyCode::Char('a'), _) => app.open_form(),
        (KeyCode::Char('s'), _) | (KeyCode::Char('i'), _) => app.open_smart_input(),
        (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => app.toggle_selected(),
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => app.delete_selected(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab => {
            if let Some(ref mut form) = app.form_state {
                form.active_field = form.active_field.next();
            }
        }
        KeyCode::BackTab => {
            if let Some(ref mut form) = app.form_state {
                form.active_field = form.active_field.prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.form_state {
                form.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(ref mut form) = app.form_state {
                form.input_char(c);
            }
        }
        _ => {}
    }
}

fn handle_smart_input(
    app: &mut App,
    code: KeyCode,
    parser: &Option<GeminiParser>,
    tx: &UnboundedSender<AppEvent>,
) {
    match code {
        KeyCode::Esc => app.close_smart_input(),
        KeyCode::Enter => {
            let Some(text) = app.smart_input.submit() else {
                return;
            };
            let Some(parser) = parser.clone() else {
                return;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = parser
                    .parse(&text, Local::now())
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(AppEvent::ParseDone(result));
            });
        }
        KeyCode::Backspace => app.smart_input.backspace(),
        KeyCode::Char(c) => app.smart_input.input_char(c),
        _ => {}
    }
}

fn render_tabs(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let stats = app.stats();
    let mut spans = vec![Span::styled(" RemindAI ", theme::current().header)];
    for filter in Filter::ALL {
        let style = if filter == app.filter {
            theme::current().tab_active
        } else {
            theme::current().dim
        };
        spans.push(Span::styled(format!(" {} ", filter.label()), style));
    }

    let right = format!("{} active, {} overdue ", stats.active, stats.overdue);
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let padding = " ".repeat((area.width as usize).saturating_sub(used + right.len()));
    spans.push(Span::raw(padding));
    spans.push(Span::styled(right, theme::current().dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let w = area.width as usize;

    let mode_str = match app.input_mode {
        InputMode::Normal => "[Normal]",
        InputMode::Form => "[New Reminder]",
        InputMode::Smart => "[Smart Add]",
    };
    let pending = if app.smart_input.pending { " parsing…" } else { "" };

    let right_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if w >= 80 {
        " jk:Nav Sp:Toggle d:Del n:New s:Smart Tab:Filter ?:Help q:Quit".to_string()
    } else if w >= 50 {
        " jk:Nav Sp:Toggle n:New s:Smart q:Quit".to_string()
    } else {
        " ?:Help q:Quit".to_string()
    };

    let left = format!(" {}{} ", mode_str, pending);
    let padding = " ".repeat(w.saturating_sub(left.len() + right_text.len()));

    let line = Line::from(vec![
        Span::styled(left, theme::current().status),
        Span::styled(padding, theme::current().status),
        Span::styled(right_text, theme::current().status),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme::current().status), area);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.min(50).max(30);
    let popup_h = area.height.min(18).max(10);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let lines = vec![
        Line::from(Span::styled("Reminders", section_style)),
        Line::from(vec![
            Span::styled("  s/i     ", key_style),
            Span::raw("Smart add (natural language)"),
        ]),
        Line::from(vec![
            Span::styled("  n/a     ", key_style),
            Span::raw("New reminder (manual form)"),
        ]),
        Line::from(vec![
            Span::styled("  Space   ", key_style),
            Span::raw("Toggle completion"),
        ]),
        Line::from(vec![
            Span::styled("  d       ", key_style),
            Span::raw("Delete reminder"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        Line::from(vec![
            Span::styled("  1/2/3/4 ", key_style),
            Span::raw("All / Active / Overdue / Done"),
        ]),
        Line::from(vec![
            Span::styled("  Tab     ", key_style),
            Span::raw("Cycle filter"),
        ]),
        Line::from(vec![
            Span::styled("  j/k     ", key_style),
            Span::raw("Move selection"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::raw(" / "),
            Span::styled("Esc     ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
