//! API key popup, opened when the assistant reports a missing or rejected key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::input::TextInput;

const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 9;

/// What the user decided in the popup.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyPromptAction {
    /// Keep editing.
    Pending,
    Cancel,
    Apply { key: String, save: bool },
}

pub struct KeyPromptState {
    pub input: TextInput,
    /// Why the popup was opened.
    pub reason: String,
}

impl KeyPromptState {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            input: TextInput::default(),
            reason: reason.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyPromptAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => KeyPromptAction::Cancel,
            KeyCode::Enter if !self.input.is_blank() => KeyPromptAction::Apply {
                key: self.input.value().trim().to_string(),
                save: false,
            },
            KeyCode::Char('s') if ctrl && !self.input.is_blank() => KeyPromptAction::Apply {
                key: self.input.value().trim().to_string(),
                save: true,
            },
            _ => {
                self.input.handle_key(key);
                KeyPromptAction::Pending
            }
        }
    }
}

/// Render the popup centred over `area`. The key is masked.
pub fn render(frame: &mut Frame, area: Rect, state: &KeyPromptState) {
    let width = POPUP_WIDTH.min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Select API key ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let masked = "*".repeat(state.input.value().chars().count());
    let field = if masked.is_empty() {
        Span::styled("paste key here", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(masked, Style::default().fg(Color::White))
    };

    let key_style = Style::default().fg(Color::Yellow);
    let desc_style = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(Span::styled(state.reason.clone(), desc_style)),
        Line::from(""),
        Line::from(vec![Span::styled("Key: ", key_style), field]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", key_style),
            Span::styled(" use for this session   ", desc_style),
            Span::styled("Ctrl+S", key_style),
            Span::styled(" use and save   ", desc_style),
            Span::styled("Esc", key_style),
            Span::styled(" cancel", desc_style),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut KeyPromptState, code: KeyCode, modifiers: KeyModifiers) -> KeyPromptAction {
        state.handle_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_enter_requires_key() {
        let mut state = KeyPromptState::new("missing");
        assert_eq!(press(&mut state, KeyCode::Enter, KeyModifiers::NONE), KeyPromptAction::Pending);
        for c in " abc ".chars() {
            press(&mut state, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(
            press(&mut state, KeyCode::Enter, KeyModifiers::NONE),
            KeyPromptAction::Apply {
                key: "abc".into(),
                save: false
            }
        );
    }

    #[test]
    fn test_ctrl_s_saves() {
        let mut state = KeyPromptState::new("rejected");
        state.input.set("k1");
        assert_eq!(
            press(&mut state, KeyCode::Char('s'), KeyModifiers::CONTROL),
            KeyPromptAction::Apply {
                key: "k1".into(),
                save: true
            }
        );
        assert_eq!(press(&mut state, KeyCode::Esc, KeyModifiers::NONE), KeyPromptAction::Cancel);
    }
}
