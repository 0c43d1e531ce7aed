//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Screen};
use super::compose;
use super::debug_log;
use super::key_prompt;
use super::messages;
use super::roster;
use super::welcome;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    let main_area = if app.debug_log.visible {
        let [content, log] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(debug_log::DEBUG_LOG_HEIGHT),
        ])
        .areas(main_area);
        debug_log::render(log, frame.buffer_mut(), &app.debug_log);
        content
    } else {
        main_area
    };

    match &app.screen {
        Screen::Welcome(form) => welcome::render(main_area, frame, form),
        Screen::Chat(view) => {
            // Roster on the left, conversation on the right.
            let [roster_area, content_area] = Layout::horizontal([
                Constraint::Length(roster::ROSTER_WIDTH),
                Constraint::Fill(1),
            ])
            .areas(main_area);
            roster::render(roster_area, frame.buffer_mut(), &view.room);

            let [messages_area, compose_area] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(compose::COMPOSE_HEIGHT),
            ])
            .areas(content_area);
            messages::render(
                messages_area,
                frame.buffer_mut(),
                &view.room,
                &view.messages,
                app.tick,
            );
            compose::render(
                compose_area,
                frame,
                &view.compose,
                view.room.room_code(),
                app.key_prompt.is_none(),
            );
        }
    }

    render_status(status_area, frame.buffer_mut(), app);

    // Key popup on top of everything else.
    if let Some(ref prompt) = app.key_prompt {
        key_prompt::render(frame, area, prompt);
    }
}

/// Header: title on the left, room and user on the right.
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = " Ephemeral Chat";
    let right = match app.session() {
        Some(s) => format!("#{}  {} ", s.room_code, s.username),
        None => "not in a room ".to_string(),
    };
    let padding = (area.width as usize).saturating_sub(title.len() + right.chars().count());

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(Color::Cyan)),
    ]);
    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Status bar: transient message, or key status and hints.
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    if let Some((ref msg, is_error)) = app.status {
        let color = if is_error { Color::Red } else { Color::Green };
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", msg),
            Style::default().fg(color),
        )))
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
        return;
    }

    let key = match app.key_source {
        Some(source) => Span::styled(
            format!(" * key: {} ", source),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled(" o no API key ", Style::default().fg(Color::Red)),
    };
    let sep = Span::styled(" | ", Style::default().fg(Color::Gray));
    let hints = match app.screen {
        Screen::Welcome(_) => "Enter: join | Ctrl+G: new room",
        Screen::Chat(_) => "Enter: send | Esc: leave | PgUp/PgDn: scroll",
    };

    Paragraph::new(Line::from(vec![
        key,
        sep.clone(),
        Span::styled(hints, Style::default().fg(Color::Gray)),
        sep,
        Span::styled("F12: log | C-c: quit", Style::default().fg(Color::Gray)),
    ]))
    .style(Style::default().bg(Color::DarkGray))
    .render(area, buf);
}
