//! Input field handling for the terminal user interface.

/// A text input field with cursor position management.
///
/// The cursor is a character index, so editing stays safe for non-ASCII
/// text.
#[derive(Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
        }
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Byte offset of the cursor within the value.
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let i = self.byte_index();
        self.value.insert(i, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let i = self.byte_index();
            self.value.remove(i);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let i = self.byte_index();
            self.value.remove(i);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    /// Reset to an empty value.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_at_cursor() {
        let mut field = InputField::new();
        field.handle_char('a');
        field.handle_char('b');
        field.move_cursor_left();
        field.handle_char('x');
        assert_eq!(field.value, "axb");
        field.handle_backspace();
        assert_eq!(field.value, "ab");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut field = InputField::with_value("úkol");
        assert_eq!(field.cursor, 4);
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.handle_delete();
        assert_eq!(field.value, "kol");
        field.handle_char('ú');
        assert_eq!(field.value, "úkol");
    }
}
