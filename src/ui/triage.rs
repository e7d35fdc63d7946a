//! Triage record overlay

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};
use serde_json::Value;

use crate::types::Conversation;

/// Centered overlay showing the triage record of a conversation
pub struct TriageOverlay<'a> {
    conversation: &'a Conversation,
}

impl<'a> TriageOverlay<'a> {
    pub fn new(conversation: &'a Conversation) -> Self {
        Self { conversation }
    }

    fn entry_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if !self.conversation.is_triage_complete() {
            lines.push(Line::from(vec![Span::styled(
                "⚠ Triage incomplete",
                Style::default().fg(Color::Gray),
            )]));
            return lines;
        }

        if self.conversation.is_emergency() {
            lines.push(Line::from(vec![Span::styled(
                "⚠ EMERGENCY",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )]));
            lines.push(Line::from(vec![Span::raw("")]));
        }

        for (key, value) in &self.conversation.triage {
            let label = key.replace('_', " ").to_uppercase();
            lines.push(Line::from(vec![Span::styled(
                label,
                Style::default().fg(Color::DarkGray),
            )]));

            let rendered = match value {
                Value::String(s) => s.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
            };
            for text_line in rendered.lines() {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(text_line.to_string(), Style::default().fg(Color::White)),
                ]));
            }
            lines.push(Line::from(vec![Span::raw("")]));
        }

        lines
    }
}

impl Widget for TriageOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay = centered_rect(area, 60, 70);

        Clear.render(overlay, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("🩺 Conversation Triage")
            .style(Style::default().fg(Color::White));

        let inner = block.inner(overlay);
        block.render(overlay, buf);

        for (i, line) in self.entry_lines().iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

/// A rect centered in `area`, sized as a percentage of it
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
