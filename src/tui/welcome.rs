//! Welcome screen: username and room code entry.

use anyhow::{anyhow, Result};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::input::TextInput;
use crate::models::Session;

/// Length of generated room codes.
const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 16;

/// Generate a random room code of `[0-9A-Z]`.
pub fn generate_room_code() -> Result<String> {
    let mut code = String::with_capacity(ROOM_CODE_LEN);
    let mut buf = [0u8; 16];
    while code.len() < ROOM_CODE_LEN {
        getrandom::getrandom(&mut buf)
            .map_err(|e| anyhow!("OS random source failed: {}", e))?;
        // Reject the top 4 byte values so every symbol is equally likely.
        for b in buf.iter().filter(|&&b| b < 252) {
            if code.len() == ROOM_CODE_LEN {
                break;
            }
            code.push(ROOM_CODE_ALPHABET[(*b % 36) as usize] as char);
        }
    }
    Ok(code)
}

/// Which field has focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    #[default]
    Username,
    RoomCode,
}

/// Welcome form state.
#[derive(Debug, Default)]
pub struct WelcomeForm {
    pub username: TextInput,
    pub room_code: TextInput,
    pub focus: Field,
    /// Inline validation error.
    pub error: Option<String>,
}

impl WelcomeForm {
    /// Form pre-filled from command-line options.
    pub fn prefilled(username: Option<&str>, room_code: Option<&str>) -> Self {
        let username = TextInput::with_value(username.unwrap_or_default());
        let focus = if username.is_blank() {
            Field::Username
        } else {
            Field::RoomCode
        };
        Self {
            username,
            room_code: TextInput::with_value(room_code.unwrap_or_default()),
            focus,
            error: None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::RoomCode,
            Field::RoomCode => Field::Username,
        };
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Username => &mut self.username,
            Field::RoomCode => &mut self.room_code,
        }
    }

    /// "Create Room": fill in a fresh random room code.
    pub fn create_room(&mut self) {
        match generate_room_code() {
            Ok(code) => {
                tracing::debug!("generated room code {}", code);
                self.room_code.set(code);
                self.error = None;
            }
            Err(e) => {
                tracing::error!("room code generation failed: {:#}", e);
                self.error = Some("Could not generate a room code.".to_string());
            }
        }
    }

    /// "Join Room": validate the fields. On failure the error is shown inline.
    pub fn submit(&mut self) -> Option<Session> {
        match Session::new(self.username.value(), self.room_code.value()) {
            Ok(session) => {
                self.error = None;
                Some(session)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the welcome form centred in `area`.
pub fn render(area: Rect, frame: &mut Frame, form: &WelcomeForm) {
    let x = area.x + area.width.saturating_sub(FORM_WIDTH) / 2;
    let y = area.y + area.height.saturating_sub(FORM_HEIGHT) / 2;
    let form_area = Rect::new(x, y, FORM_WIDTH.min(area.width), FORM_HEIGHT.min(area.height));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let [title_area, subtitle_area, _, user_area, room_area, error_area, _, hint_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Ephemeral Chat",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .centered(),
        title_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Join a room or create a new one.",
            Style::default().fg(Color::Gray),
        )))
        .centered(),
        subtitle_area,
    );

    render_field(
        user_area,
        frame,
        "Username",
        &form.username,
        "Enter your username",
        form.focus == Field::Username,
    );
    render_field(
        room_area,
        frame,
        "Room code",
        &form.room_code,
        "Enter room code",
        form.focus == Field::RoomCode,
    );

    if let Some(ref err) = form.error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red),
            )))
            .centered(),
            error_area,
        );
    }

    let key_style = Style::default().fg(Color::Yellow);
    let desc_style = Style::default().fg(Color::Gray);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Enter", key_style),
                Span::styled(" Join Room   ", desc_style),
                Span::styled("Ctrl+G", key_style),
                Span::styled(" Create Room", desc_style),
            ]),
            Line::from(vec![
                Span::styled("Tab", key_style),
                Span::styled(" switch field   ", desc_style),
                Span::styled("Ctrl+C", key_style),
                Span::styled(" quit", desc_style),
            ]),
        ])
        .centered(),
        hint_area,
    );
}

fn render_field(
    area: Rect,
    frame: &mut Frame,
    label: &str,
    input: &TextInput,
    placeholder: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", label), border_style));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if input.value().is_empty() {
        Line::from(Span::styled(
            format!(" {}", placeholder),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {}", input.value()),
            Style::default().fg(Color::White),
        ))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused && inner.width > 0 {
        let col = unicode_width::UnicodeWidthStr::width(
            input
                .value()
                .chars()
                .take(input.cursor())
                .collect::<String>()
                .as_str(),
        ) as u16;
        let cx = (inner.x + 1 + col).min(inner.x + inner.width.saturating_sub(1));
        frame.set_cursor_position((cx, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_shape() {
        for _ in 0..50 {
            let code = generate_room_code().unwrap();
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_create_room_fills_code() {
        let mut form = WelcomeForm::default();
        form.error = Some("old".into());
        form.create_room();
        assert_eq!(form.room_code.value().len(), ROOM_CODE_LEN);
        assert!(form.error.is_none());
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut form = WelcomeForm::prefilled(Some("alice"), None);
        assert_eq!(form.focus, Field::RoomCode);
        assert!(form.submit().is_none());
        assert_eq!(
            form.error.as_deref(),
            Some("Please enter a username and a room code.")
        );

        form.room_code.set("abc");
        let session = form.submit().unwrap();
        assert_eq!(session.room_code, "ABC");
        assert!(form.error.is_none());
    }

    #[test]
    fn test_toggle_focus() {
        let mut form = WelcomeForm::default();
        form.focused_input().insert_char('a');
        form.toggle_focus();
        form.focused_input().insert_char('b');
        assert_eq!(form.username.value(), "a");
        assert_eq!(form.room_code.value(), "b");
    }
}
