//! Compose box: message input at the bottom of the chat view.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::input::TextInput;

/// Height of the compose box: border + input line + border.
pub const COMPOSE_HEIGHT: u16 = 3;

/// Shown in place of a newline on the single input line.
const NEWLINE_GLYPH: &str = " \u{21B5} ";

/// State for the compose box.
#[derive(Default)]
pub struct ComposeState {
    pub input: TextInput,
}

impl ComposeState {
    pub fn insert_newline(&mut self) {
        self.input.insert_char('\n');
    }

    /// Return the trimmed text and clear the box.
    /// Returns None (and keeps the text) if it is blank.
    pub fn send(&mut self) -> Option<String> {
        if self.input.is_blank() {
            return None;
        }
        Some(self.input.take().trim().to_string())
    }
}

/// Render the compose box. Sets the terminal cursor when focused.
pub fn render(area: Rect, frame: &mut Frame, state: &ComposeState, room_code: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width < 2 {
        return;
    }
    let line_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let avail = inner.width.saturating_sub(1) as usize;

    if state.input.value().is_empty() {
        let placeholder = format!(
            " Message #{}... (@ai to ask the assistant, Alt+Enter for new line)",
            room_code
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            ))),
            line_area,
        );
        if focused {
            frame.set_cursor_position((line_area.x + 1, line_area.y));
        }
        return;
    }

    let view = visible_window(state.input.value(), state.input.cursor(), avail);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(view.text, Style::default().fg(Color::White)),
        ])),
        line_area,
    );
    if focused {
        frame.set_cursor_position((line_area.x + 1 + view.cursor_col as u16, line_area.y));
    }
}

/// Slice of the flattened input that fits on screen.
#[derive(Debug, PartialEq, Eq)]
struct Window {
    text: String,
    /// Cursor column within `text`.
    cursor_col: usize,
}

/// Flatten newlines and scroll horizontally so the cursor stays in view.
fn visible_window(input: &str, cursor: usize, width: usize) -> Window {
    if width == 0 {
        return Window {
            text: String::new(),
            cursor_col: 0,
        };
    }

    // (glyph, display width) cells; the cursor is tracked in columns.
    let mut cells: Vec<(String, usize)> = Vec::new();
    let mut cursor_col = 0;
    for (i, c) in input.chars().enumerate() {
        let cell = if c == '\n' {
            (NEWLINE_GLYPH.to_string(), 3)
        } else {
            (c.to_string(), c.width().unwrap_or(0))
        };
        if i < cursor {
            cursor_col += cell.1;
        }
        cells.push(cell);
    }

    let total: usize = cells.iter().map(|c| c.1).sum();
    let scroll = if total < width || cursor_col < width {
        0
    } else {
        cursor_col + 1 - width
    };

    // A wide glyph straddling the left edge is skipped, so the window starts
    // at the first glyph actually drawn.
    let mut text = String::new();
    let mut start = None;
    let mut col = 0;
    for (glyph, w) in cells {
        if col >= scroll && col + w <= scroll + width {
            start.get_or_insert(col);
            text.push_str(&glyph);
        }
        col += w;
    }

    Window {
        text,
        cursor_col: cursor_col.saturating_sub(start.unwrap_or(scroll)),
    }
}
