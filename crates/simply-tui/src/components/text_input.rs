//! Append-only text field shared by the chat input and the domain field,
//! plus the line wrapping used to size and draw them.

/// Height units per terminal row, for the auto-grow cap.
pub const ROW_UNITS: u16 = 20;

/// The input never grows past this many height units.
pub const MAX_INPUT_UNITS: u16 = 120;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn insert_str(&mut self, s: &str) {
        self.value.push_str(s);
    }

    /// Delete the last character.
    pub fn delete_char(&mut self) {
        self.value.pop();
    }

    /// Delete the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        while self.value.ends_with(' ') {
            self.value.pop();
        }
        while let Some(c) = self.value.chars().next_back() {
            if c == ' ' || c == '\n' {
                break;
            }
            self.value.pop();
        }
    }

    /// Rows the content occupies at `width` columns, including the cursor.
    pub fn content_rows(&self, width: u16) -> u16 {
        let rows = wrap_chars(&self.with_cursor(), width as usize).len();
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    /// Rows to allocate for the field: tracks content, capped at
    /// [`MAX_INPUT_UNITS`], never below one row.
    pub fn visible_rows(&self, width: u16) -> u16 {
        self.content_rows(width)
            .min(MAX_INPUT_UNITS / ROW_UNITS)
            .max(1)
    }

    /// The value with a cursor glyph appended, ready for wrapping.
    pub fn with_cursor(&self) -> String {
        format!("{}\u{2588}", self.value)
    }
}

/// Hard-wrap at `width` characters, keeping leading whitespace. Used for
/// code and for the input field.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

/// Greedy word wrap at `width` characters. Words longer than a line are
/// split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let mut current = String::new();
        let mut len = 0usize;
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            if len > 0 && len + 1 + word_len > width {
                out.push(std::mem::take(&mut current));
                len = 0;
            }
            if len > 0 {
                current.push(' ');
                len += 1;
            }
            for c in word.chars() {
                if len == width {
                    out.push(std::mem::take(&mut current));
                    len = 0;
                }
                current.push(c);
                len += 1;
            }
        }
        out.push(current);
    }
    out
}
