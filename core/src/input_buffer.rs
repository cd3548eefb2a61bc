//! Text accumulated by the keyboard before it reaches the host field.
//!
//! The router keeps one of these for the composing word and one each for the
//! GIF search query and the translation text. Input is only ever appended or
//! removed from the end, so the cursor is always at the end of the buffer.

/// Append-only text buffer with char-wise backspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the buffered text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Append text at the end.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Delete the last character (backspace).
    /// Returns true if a character was deleted.
    pub fn delete_before(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Take the buffered text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
