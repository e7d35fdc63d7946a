//! Message input component

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    None,
}

/// Single-line message input with cursor handling
#[derive(Clone)]
pub struct Composer {
    content: String,
    cursor_position: usize,
    placeholder: String,
    has_focus: bool,
    enabled: bool,
}

impl Composer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor_position: 0,
            placeholder: placeholder.into(),
            has_focus: false,
            enabled: true,
        }
    }

    /// Handle key input. Returns the submitted text on Enter.
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press || !self.enabled {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if !self.content.trim().is_empty() {
                    let content = std::mem::take(&mut self.content);
                    self.cursor_position = 0;
                    return ComposerResult::Submitted(content);
                }
            }
            KeyCode::Char(c) => {
                self.content.insert(self.byte_cursor(), c);
                self.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let at = self.byte_cursor();
                    self.content.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.content.chars().count() {
                    let at = self.byte_cursor();
                    self.content.remove(at);
                }
            }
            KeyCode::Left => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if self.cursor_position < self.content.chars().count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.content.chars().count(),
            _ => {}
        }

        ComposerResult::None
    }

    /// Byte offset of the cursor, which indexes characters.
    fn byte_cursor(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Disable input while an operation is in flight.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }
}

impl Widget for Composer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, border_style) = if !self.enabled {
            ("✉ Message (waiting for reply...)", Style::default().fg(Color::DarkGray))
        } else if self.has_focus {
            ("✉ Message", Style::default().fg(Color::Green))
        } else {
            ("✉ Message", Style::default().fg(Color::Gray))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            let mut content = self.content.clone();
            if self.has_focus && self.enabled {
                let at = content
                    .char_indices()
                    .nth(self.cursor_position)
                    .map(|(i, _)| i)
                    .unwrap_or(content.len());
                content.insert(at, '▌');
            }

            let line = Line::from(vec![Span::raw(content)]);
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_submitting() {
        let mut composer = Composer::new("Type here");
        for c in "hello".chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(
            composer.handle_key(press(KeyCode::Enter)),
            ComposerResult::Submitted("hello".to_string())
        );
        assert_eq!(composer.content, "");
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut composer = Composer::new("Type here");
        composer.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(composer.handle_key(press(KeyCode::Enter)), ComposerResult::None);
    }

    #[test]
    fn disabled_composer_drops_input() {
        let mut composer = Composer::new("Type here");
        composer.set_enabled(false);
        composer.handle_key(press(KeyCode::Char('x')));
        assert_eq!(composer.content, "");
    }

    #[test]
    fn cursor_edits_are_character_based() {
        let mut composer = Composer::new("Type here");
        for c in "áé".chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.content, "á");
    }
}
