//! Line representation and text operations

/// A single line of text in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line from a string
    ///
    /// Any `\r` left over from CRLF splitting is dropped.
    pub fn from_string(mut s: String) -> Self {
        if s.ends_with('\r') {
            s.pop();
        }
        Self { text: s }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        let pos = self.floor_char_boundary(byte_pos);
        self.text.insert(pos, ch);
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        let pos = self.floor_char_boundary(byte_pos);
        self.text.insert_str(pos, s);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let start = self.floor_char_boundary(start);
        let end = self.floor_char_boundary(end).max(start);
        self.text.drain(start..end).collect()
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        let pos = self.floor_char_boundary(byte_pos);
        Line {
            text: self.text.split_off(pos),
        }
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(other.text());
    }

    /// Find the nearest valid UTF-8 char boundary at or before `pos`
    pub fn floor_char_boundary(&self, pos: usize) -> usize {
        if pos >= self.text.len() {
            return self.text.len();
        }
        // Walk backwards to find valid UTF-8 start byte
        let mut p = pos;
        while p > 0 && !self.text.is_char_boundary(p) {
            p -= 1;
        }
        p
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_string(s.to_string())
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}
