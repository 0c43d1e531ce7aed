//! Roster pane: room code, participants and the leave action.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::ASSISTANT_NAME;
use crate::room::ChatRoom;

/// Width of the roster pane in columns.
pub const ROSTER_WIDTH: u16 = 26;

/// Build the roster lines (everything above the leave hint).
fn roster_lines(room: &ChatRoom) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            " Ephemeral Chat",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" # {}", room.room_code()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" USERS ({})", room.users().len()),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    for user in room.users() {
        let (icon, color) = if user == ASSISTANT_NAME {
            ("[bot]", Color::Green)
        } else {
            ("[usr]", Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color)),
            Span::styled(user.clone(), Style::default().fg(Color::White)),
        ];
        if user == room.username() {
            spans.push(Span::styled(" (you)", Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Render the roster pane.
pub fn render(area: Rect, buf: &mut Buffer, room: &ChatRoom) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let list_height = inner.height.saturating_sub(1);
    Paragraph::new(roster_lines(room))
        .render(Rect::new(inner.x, inner.y, inner.width, list_height), buf);

    if inner.height >= 2 {
        let leave_area = Rect::new(inner.x, inner.y + list_height, inner.width, 1);
        Paragraph::new(Line::from(Span::styled(
            " Esc: Leave Room",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )))
        .render(leave_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    #[test]
    fn test_roster_lists_both_users() {
        let room = ChatRoom::open(Session::new("dana", "xyz").unwrap());
        let text: Vec<String> = roster_lines(&room)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.contains(&" # XYZ".to_string()));
        assert!(text.contains(&" USERS (2)".to_string()));
        assert!(text.contains(&" [usr] dana (you)".to_string()));
        assert!(text.contains(&" [bot] AI Assistant".to_string()));
    }
}
