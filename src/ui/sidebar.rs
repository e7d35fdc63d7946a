//! Conversation list component

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::types::Conversation;

/// Renders the list of conversations with selection highlight
pub struct Sidebar<'a> {
    conversations: &'a [Conversation],
    selected_id: Option<&'a str>,
    has_focus: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(
        conversations: &'a [Conversation],
        selected_id: Option<&'a str>,
        has_focus: bool,
    ) -> Self {
        Self {
            conversations,
            selected_id,
            has_focus,
        }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.has_focus {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title("🗂 Conversations")
            .style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.conversations.is_empty() {
            let lines = [
                Line::from(vec![Span::styled(
                    "No conversations yet",
                    Style::default().fg(Color::Gray),
                )]),
                Line::from(vec![Span::styled(
                    "Press Ctrl+N to start one",
                    Style::default().fg(Color::DarkGray),
                )]),
            ];
            for (i, line) in lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        }

        let mut row = 0u16;
        for conv in self.conversations {
            if row + 1 >= inner_area.height {
                break;
            }

            let is_selected = self.selected_id == Some(conv.id.as_str());
            let title_style = if is_selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let marker = if is_selected { "▸ " } else { "  " };
            let emergency = if conv.is_emergency() { " ⚠" } else { "" };

            let title_line = Line::from(vec![
                Span::raw(marker),
                Span::styled(conv.display_title(), title_style),
                Span::styled(emergency, Style::default().fg(Color::Red)),
            ]);
            buf.set_line(inner_area.x, inner_area.y + row, &title_line, inner_area.width);
            row += 1;

            let count = conv.messages.len();
            let plural = if count == 1 { "message" } else { "messages" };
            let detail_line = Line::from(vec![Span::styled(
                format!("    {} {}", count, plural),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y + row, &detail_line, inner_area.width);
            row += 1;
        }
    }
}
