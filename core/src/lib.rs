//! softkey-core
//!
//! Text-input core of a soft keyboard: predictive text, shortcut expansion,
//! accent popups and the mode-aware routing of key events between them.
//!
//! The crate owns no widgets and performs no network I/O. The hosting shell
//! feeds it key and touch events and supplies the collaborators it talks to
//! (host text field, dictionary files, a key/value store for settings).
//!
//! Public API:
//! - `PredictionEngine` - Trie-backed word completion with online learning
//! - `ShortcutTable` - Persisted trigger -> expansion map
//! - `accents` - Locale-aware accent variant lookup
//! - `PopupSession` / `LongPressTracker` - Long-press accent picker
//! - `InputRouter` - Composing state machine tying everything together
//! - `KeyboardConfig` - Configuration and feature flags
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ConfigError, DictionaryError, StoreError};

pub mod trie;
pub use trie::TrieNode;

pub mod prediction;
pub use prediction::{DictionarySource, DirectorySource, LoadOutcome, PredictionEngine, StaticSource};

pub mod store;
pub use store::{FileStore, KeyValueStore, MemoryStore};

pub mod shortcuts;
pub use shortcuts::{Shortcut, ShortcutTable};

pub mod clipboard;
pub use clipboard::ClipboardHistory;

pub mod accents;

pub mod popup;
pub use popup::{CandidateLayout, LongPressTracker, PopupSession};

pub mod host;
pub use host::{HostField, InputPurpose, KeyCode, TextBuffer};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::{ComposingState, Mode};

pub mod router;
pub use router::{InputRouter, KeyEvent, RouterEvent, ShortcutFired};

/// Keyboard-wide configuration.
///
/// Every field has a default matching the stock keyboard, so a TOML file only
/// needs to list the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Language code used for accent tables and the initial dictionary
    pub language: String,

    /// Maximum number of words inserted by a dictionary load
    pub max_dictionary_words: usize,

    /// Number of ranked predictions shown in the suggestion strip
    pub max_suggestions: usize,

    /// Delay between touch-down and the accent popup opening
    pub long_press_ms: u64,

    /// A popup candidate is selectable only while the pointer is closer to its
    /// center than `popup_hit_factor * candidate width`
    pub popup_hit_factor: f32,

    /// Width of one popup candidate in host pixels
    pub popup_candidate_width: f32,

    /// Whether Enter expands shortcuts the same way Space does
    pub enter_expands_shortcuts: bool,

    /// Engage one-shot shift at the start of a sentence
    pub auto_shift: bool,

    /// Number of entries kept in the clipboard history
    pub clipboard_history_limit: usize,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            language: "tr".to_string(),
            max_dictionary_words: 50_000,
            max_suggestions: 3,
            long_press_ms: 250,
            popup_hit_factor: 1.5,
            popup_candidate_width: 64.0,
            enter_expands_shortcuts: false,
            auto_shift: false,
            clipboard_history_limit: 20,
        }
    }
}

impl KeyboardConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Long-press delay as a `Duration`.
    pub fn long_press_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.long_press_ms)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }

    /// Normalize a dictionary or learned word: NFC, trimmed, then lower-cased
    /// with the casing rules of `language`.
    pub fn normalize_word(s: &str, language: &str) -> String {
        crate::accents::to_lower(&normalize(s), language)
    }
}
