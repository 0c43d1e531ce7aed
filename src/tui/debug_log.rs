//! Debug log pane (F12): shows captured tracing output.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::log_capture::LogBuffer;

/// History kept for scrolling, independent of the capture buffer size.
const HISTORY: usize = 1000;

/// Height of the pane when visible.
pub const DEBUG_LOG_HEIGHT: u16 = 10;

pub struct DebugLogState {
    source: LogBuffer,
    lines: Vec<String>,
    pub visible: bool,
    /// Lines scrolled back from the newest entry.
    scroll_back: usize,
}

impl DebugLogState {
    pub fn new(source: LogBuffer) -> Self {
        Self {
            source,
            lines: Vec::new(),
            visible: false,
            scroll_back: 0,
        }
    }

    /// Pull newly captured lines. Called once per frame.
    pub fn refresh(&mut self) {
        self.lines.extend(self.source.drain());
        if self.lines.len() > HISTORY {
            let excess = self.lines.len() - HISTORY;
            self.lines.drain(..excess);
        }
        self.scroll_back = self.scroll_back.min(self.lines.len().saturating_sub(1));
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.scroll_back = 0;
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_back = (self.scroll_back + n).min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(n);
    }
}

fn level_color(line: &str) -> Color {
    if line.contains("ERROR") {
        Color::Red
    } else if line.contains(" WARN") {
        Color::Yellow
    } else if line.contains(" INFO") {
        Color::Green
    } else {
        Color::DarkGray
    }
}

pub fn render(area: Rect, buf: &mut Buffer, state: &DebugLogState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Debug Log (F12) ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    let end = state.lines.len() - state.scroll_back.min(state.lines.len());
    let start = end.saturating_sub(inner.height as usize);
    let lines: Vec<Line> = state.lines[start..end]
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(level_color(l)))))
        .collect();
    Paragraph::new(lines).render(inner, buf);
}
