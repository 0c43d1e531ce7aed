//! Messages pane: room notices, chat bubbles and the typing indicator.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::Message;
use crate::room::ChatRoom;

/// Widest a bubble may get, as a share of the pane (percent).
const BUBBLE_MAX_PERCENT: usize = 75;

/// Scroll state for the messages pane.
#[derive(Debug, Default)]
pub struct MessagesState {
    /// Lines scrolled up from the newest message (0 = follow the bottom).
    pub scroll_from_bottom: usize,
}

impl MessagesState {
    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(n);
    }

    pub fn follow_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }
}

/// Render the messages pane.
pub fn render(area: Rect, buf: &mut Buffer, room: &ChatRoom, state: &MessagesState, tick: u64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" #{} ", room.room_code()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let lines = build_lines(room, inner.width as usize, tick);
    let visible = inner.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    let from_bottom = state.scroll_from_bottom.min(max_scroll);
    let first = max_scroll - from_bottom;

    for (row, line) in lines.iter().skip(first).take(visible).enumerate() {
        let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        Paragraph::new(line.clone()).render(line_area, buf);
    }

    let indicator_x = inner.x + inner.width.saturating_sub(1);
    let dim = Style::default().fg(Color::DarkGray);
    if first > 0 {
        buf[(indicator_x, inner.y)].set_char('^').set_style(dim);
    }
    if from_bottom > 0 {
        let bottom = inner.y + inner.height - 1;
        buf[(indicator_x, bottom)].set_char('v').set_style(dim);
    }
}

/// Lay out every message for a pane `width` columns wide.
fn build_lines(room: &ChatRoom, width: usize, tick: u64) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let bubble_width = (width * BUBBLE_MAX_PERCENT / 100).max(10).min(width);

    for msg in room.messages() {
        if msg.is_system() {
            push_notice(&mut lines, msg, width);
        } else if msg.user == room.username() {
            push_own(&mut lines, msg, width, bubble_width);
        } else {
            push_other(&mut lines, msg, bubble_width);
        }
        lines.push(Line::from(""));
    }

    if room.is_ai_typing() {
        let dots = ".".repeat((tick as usize / 10) % 3 + 1);
        lines.push(Line::from(vec![
            Span::styled(" [bot] ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("AI Assistant is typing{}", dots),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines
}

/// Room notice, centred and dimmed.
fn push_notice(lines: &mut Vec<Line<'static>>, msg: &Message, width: usize) {
    let style = Style::default().fg(Color::DarkGray);
    for row in wrap_text(&msg.text, width.saturating_sub(4)) {
        let pad = width.saturating_sub(row.width()) / 2;
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(row, style),
        ]));
    }
}

/// Own message: right-aligned, timestamp only.
fn push_own(lines: &mut Vec<Line<'static>>, msg: &Message, width: usize, bubble_width: usize) {
    let header = format!("{} ", msg.timestamp);
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(width.saturating_sub(header.width()))),
        Span::styled(header, Style::default().fg(Color::DarkGray)),
    ]));

    let text_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    for row in wrap_text(&msg.text, bubble_width.saturating_sub(3)) {
        let cell = format!(" {} ", row);
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(width.saturating_sub(cell.width() + 1))),
            Span::styled(cell, text_style),
        ]));
    }
}

/// Someone else's message: left-aligned with author and timestamp.
fn push_other(lines: &mut Vec<Line<'static>>, msg: &Message, bubble_width: usize) {
    let (icon, name_color) = if msg.is_assistant() {
        ("[bot]", Color::Green)
    } else {
        ("[usr]", Color::Gray)
    };
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", icon), Style::default().fg(name_color)),
        Span::styled(
            msg.user.clone(),
            Style::default()
                .fg(name_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", msg.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    let text_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    for row in wrap_text(&msg.text, bubble_width.saturating_sub(3)) {
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(format!(" {} ", row), text_style),
        ]));
    }
}

/// Word-wrap by display width, keeping explicit newlines and breaking words
/// that are wider than a whole row.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0;

        for word in paragraph.split_whitespace() {
            let word_w = word.width();
            let sep = usize::from(!current.is_empty());

            if current_w + sep + word_w <= max_width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_w += sep + word_w;
                continue;
            }

            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_w = 0;
            }

            if word_w <= max_width {
                current.push_str(word);
                current_w = word_w;
                continue;
            }

            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if current_w + w > max_width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_w = 0;
                }
                current.push(c);
                current_w += w;
            }
        }

        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
        assert_eq!(wrap_text("hello world", 7), vec!["hello", "world"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert!(wrap_text("x", 0).is_empty());
    }

    #[test]
    fn test_layout_alignment() {
        let mut room = ChatRoom::open(Session::new("me", "r1").unwrap());
        room.send("@ai ping");
        room.receive_ai_reply("pong");

        let lines = build_lines(&room, 60, 0);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        let own = texts.iter().find(|t| t.contains("@ai ping")).unwrap();
        assert_eq!(own.len(), 59);
        assert!(own.ends_with(" @ai ping "));

        let header = texts.iter().find(|t| t.contains("AI Assistant  ")).unwrap();
        assert!(header.starts_with(" [bot] "));
        assert!(texts.iter().any(|t| t == "  pong "));

        let notice = &texts[0];
        assert!(notice.starts_with(' '));
        assert!(notice.contains("Welcome me!"));
    }

    #[test]
    fn test_typing_indicator() {
        let mut room = ChatRoom::open(Session::new("me", "r1").unwrap());
        let idle = build_lines(&room, 40, 0);
        assert!(!idle.iter().any(|l| line_text(l).contains("typing")));

        room.send("@ai hi");
        let busy = build_lines(&room, 40, 25);
        let last = line_text(busy.last().unwrap());
        assert_eq!(last, " [bot] AI Assistant is typing...");
    }

    #[test]
    fn test_render_follows_bottom() {
        let mut room = ChatRoom::open(Session::new("me", "r1").unwrap());
        for i in 0..30 {
            room.send(&format!("msg {}", i));
        }
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &room, &MessagesState::default(), 0);

        let screen: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("msg 29"));
        assert!(!screen.contains("msg 0 "));
    }
}
