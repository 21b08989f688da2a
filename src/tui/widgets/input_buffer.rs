//! Shared text input buffer with cursor management.
//!
//! Used for the idea textarea and the per-question answer fields.
//! Supports embedded newlines for multi-line entry.

/// A simple text input buffer with cursor positioning.
#[derive(Debug, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    /// (line, column) of the cursor in character terms, for rendering.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let line = before.matches('\n').count();
        let col = before
            .rsplit_once('\n')
            .map(|(_, tail)| tail.chars().count())
            .unwrap_or_else(|| before.chars().count());
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_char('h');
        buf.insert_char('i');
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor_line_col(), (0, 2));
    }

    #[test]
    fn test_backspace() {
        let mut buf = InputBuffer::new();
        buf.insert_char('a');
        buf.insert_char('b');
        buf.backspace();
        assert_eq!(buf.text(), "a");
        assert_eq!(buf.cursor_line_col(), (0, 1));
    }

    #[test]
    fn test_movement() {
        let mut buf = InputBuffer::new();
        buf.insert_char('a');
        buf.insert_char('b');
        buf.insert_char('c');
        buf.move_home();
        assert_eq!(buf.cursor_line_col(), (0, 0));
        buf.move_end();
        assert_eq!(buf.cursor_line_col(), (0, 3));
        buf.move_left();
        assert_eq!(buf.cursor_line_col(), (0, 2));
        buf.move_right();
        assert_eq!(buf.cursor_line_col(), (0, 3));
    }

    #[test]
    fn test_clear_resets() {
        let mut buf = InputBuffer::new();
        buf.insert_char('x');
        buf.clear();
        assert!(buf.text().is_empty());
        assert_eq!(buf.cursor_line_col(), (0, 0));
    }

    #[test]
    fn test_is_empty_trims() {
        let mut buf = InputBuffer::new();
        assert!(buf.is_empty());
        buf.insert_char(' ');
        assert!(buf.is_empty()); // whitespace-only is "empty"
        buf.insert_char('a');
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_multiline_cursor_line_col() {
        let mut buf = InputBuffer::new();
        for c in "ab".chars() {
            buf.insert_char(c);
        }
        buf.insert_newline();
        buf.insert_char('c');
        assert_eq!(buf.text(), "ab\nc");
        assert_eq!(buf.cursor_line_col(), (1, 1));
        buf.move_home();
        assert_eq!(buf.cursor_line_col(), (0, 0));
    }
}
