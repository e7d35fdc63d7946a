//! Message history display component

use chrono::DateTime;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::types::{Conversation, Message, Sender};

/// Renders the message history of the current conversation
pub struct HistoryView<'a> {
    conversation: Option<&'a Conversation>,
}

impl<'a> HistoryView<'a> {
    pub fn new(conversation: Option<&'a Conversation>) -> Self {
        Self { conversation }
    }

    /// Render a single message into lines
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let role_icon = match message.sender {
            Sender::User => "👤",
            Sender::Assistant => "🤖",
        };

        let time = DateTime::parse_from_rfc3339(&message.timestamp)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| message.timestamp.clone());

        let header = format!("{} {} {} {}", role_icon, message.sender.display_name(), time, "─".repeat(20));
        lines.push(Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )]));

        let content_style = match message.sender {
            Sender::User => Style::default().fg(Color::Blue),
            Sender::Assistant => Style::default().fg(Color::Green),
        };

        for content_line in wrap_text(&message.content, width.saturating_sub(2) as usize) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(content_line, content_style),
            ]));
        }

        lines
    }
}

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let Some(conversation) = self.conversation else {
            let hint_lines = vec![
                Line::from(vec![Span::styled(
                    "No conversation selected",
                    Style::default().fg(Color::Gray),
                )]),
                Line::from(vec![Span::raw("")]),
                Line::from(vec![Span::styled(
                    "Pick one in the sidebar or press Ctrl+N to start a new one.",
                    Style::default().fg(Color::DarkGray),
                )]),
            ];
            for (i, line) in hint_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        };

        if conversation.messages.is_empty() {
            let line = Line::from(vec![Span::styled(
                "No messages yet. Say hello!",
                Style::default().fg(Color::Gray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        let mut all_lines: Vec<Line> = Vec::new();
        for message in &conversation.messages {
            let mut lines = self.render_message(message, inner_area.width);
            all_lines.append(&mut lines);
            // spacing between messages
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        // Show the tail of the history, pinned to the bottom
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_handles_empty_input() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
