use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Single-line text input with a character-indexed cursor.
#[derive(Debug, Default)]
pub struct InputBar {
    value: String,
    cursor_position: usize,
    is_focused: bool,
}

impl InputBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the contents and park the cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor_position += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let index = self.byte_index();
            self.value.remove(index);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let index = self.byte_index();
            self.value.remove(index);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.is_focused {
            "New task (Enter to add, Esc to leave)"
        } else {
            "New task (press a to add)"
        };

        let border_style = if self.is_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let (text, text_style) = if self.value.is_empty() {
            ("What needs to be done?", Style::default().fg(Color::DarkGray))
        } else {
            (self.value.as_str(), Style::default())
        };

        let paragraph = Paragraph::new(text).block(block).style(text_style);
        frame.render_widget(paragraph, area);

        if self.is_focused {
            let prefix: String = self.value.chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + Span::raw(prefix).width() as u16;
            let cursor_y = area.y + 1;

            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position(ratatui::layout::Position { x: cursor_x, y: cursor_y });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_with_multibyte_characters() {
        let mut input = InputBar::new();
        for c in "café".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.insert_char('!');
        assert_eq!(input.value(), "caf!é");

        input.move_end();
        input.delete_char();
        assert_eq!(input.value(), "caf!");

        input.move_home();
        input.delete_forward();
        assert_eq!(input.value(), "af!");
    }

    #[test]
    fn test_set_value_and_clear() {
        let mut input = InputBar::new();
        input.set_value("walk dog");
        input.insert_char('s');
        assert_eq!(input.value(), "walk dogs");

        input.clear();
        assert_eq!(input.value(), "");

        input.delete_char();
        input.move_right();
        assert_eq!(input.value(), "");
    }
}
