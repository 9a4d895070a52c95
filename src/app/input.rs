use unicode_width::UnicodeWidthStr;

/// Single-line text field with a byte cursor that always sits on a char
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = prev_char_boundary(&self.text, self.cursor);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let end = next_char_boundary(&self.text, self.cursor);
        self.text.drain(self.cursor..end);
    }

    pub fn left(&mut self) {
        self.cursor = prev_char_boundary(&self.text, self.cursor);
    }

    pub fn right(&mut self) {
        self.cursor = next_char_boundary(&self.text, self.cursor);
    }

    pub fn word_left(&mut self) {
        self.cursor = prev_word_boundary(&self.text, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = next_word_boundary(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Terminal columns between the start of the text and the cursor.
    pub fn cursor_column(&self) -> u16 {
        self.text[..self.cursor].width() as u16
    }
}

fn prev_char_boundary(s: &str, byte_index: usize) -> usize {
    s[..byte_index]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(s: &str, byte_index: usize) -> usize {
    s[byte_index..]
        .chars()
        .next()
        .map(|c| byte_index + c.len_utf8())
        .unwrap_or(s.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn prev_word_boundary(s: &str, byte_index: usize) -> usize {
    let before: Vec<(usize, char)> = s[..byte_index].char_indices().collect();
    let mut pos = before.len();
    while pos > 0 && !is_word_char(before[pos - 1].1) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(before[pos - 1].1) {
        pos -= 1;
    }
    before.get(pos).map(|(i, _)| *i).unwrap_or(0)
}

fn next_word_boundary(s: &str, byte_index: usize) -> usize {
    let mut chars = s[byte_index..].char_indices().peekable();
    while chars.next_if(|(_, c)| is_word_char(*c)).is_some() {}
    while chars.next_if(|(_, c)| !is_word_char(*c)).is_some() {}
    chars.peek().map(|(i, _)| byte_index + i).unwrap_or(s.len())
}
