//! Composing session state.
//!
//! `ComposingState` holds everything the router tracks between key events:
//! the active mode, the buffers each mode owns, and the shift flags. The
//! router owns the transitions; this type only keeps the pieces together and
//! makes the single-mode rule structural.

use crate::input_buffer::InputBuffer;

/// Keyboard input mode.
///
/// Only one mode is active at a time. `PasswordField` is never stored: it is
/// reported whenever the stored mode is `Normal` and the focused field asks
/// for a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plain typing with composing and suggestions
    #[default]
    Normal,
    /// Emoji panel; keys commit directly
    Emoji,
    /// GIF search; keys edit the search query
    GifSearch,
    /// Translation panel; keys edit the source text
    Translation,
    /// Focused field is a password field
    PasswordField,
    /// Clipboard history panel
    Clipboard,
}

impl Mode {
    /// Short lower-case name, used by the CLI and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Emoji => "emoji",
            Mode::GifSearch => "gif",
            Mode::Translation => "translate",
            Mode::PasswordField => "password",
            Mode::Clipboard => "clipboard",
        }
    }

    /// Parse a name produced by `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Mode::Normal),
            "emoji" => Some(Mode::Emoji),
            "gif" => Some(Mode::GifSearch),
            "translate" => Some(Mode::Translation),
            "password" => Some(Mode::PasswordField),
            "clipboard" => Some(Mode::Clipboard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-session state shared by all router operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposingState {
    /// Stored mode (never `PasswordField`)
    pub mode: Mode,

    /// Word being composed in Normal mode
    pub composing: InputBuffer,

    /// GIF search query
    pub gif_query: InputBuffer,

    /// Translation source text
    pub translation_text: InputBuffer,

    /// One-shot shift
    pub shifted: bool,

    pub caps_locked: bool,

    /// Language code for case folding and accent lookup
    pub language: String,
}

impl ComposingState {
    pub fn new(language: &str) -> Self {
        Self {
            mode: Mode::Normal,
            composing: InputBuffer::new(),
            gif_query: InputBuffer::new(),
            translation_text: InputBuffer::new(),
            shifted: false,
            caps_locked: false,
            language: language.to_string(),
        }
    }

    /// Clear buffers and shift state, back to Normal.
    pub fn clear(&mut self) {
        self.mode = Mode::Normal;
        self.composing.clear();
        self.gif_query.clear();
        self.translation_text.clear();
        self.shifted = false;
        self.caps_locked = false;
    }
}

impl Default for ComposingState {
    fn default() -> Self {
        Self::new("tr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_roundtrip() {
        for mode in [
            Mode::Normal,
            Mode::Emoji,
            Mode::GifSearch,
            Mode::Translation,
            Mode::PasswordField,
            Mode::Clipboard,
        ] {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("bogus"), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = ComposingState::new("tr");
        state.mode = Mode::Translation;
        state.translation_text.push_str("merhaba");
        state.caps_locked = true;
        state.clear();
        assert_eq!(state, ComposingState::new("tr"));
    }
}
