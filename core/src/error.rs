//! Error types shared across the crate.
//!
//! None of these escape the keyboard-facing operations: the prediction engine
//! reports load failures as a `Result` after keeping its previous dictionary,
//! and the shortcut/clipboard tables turn store errors into `false`.

use std::path::PathBuf;

/// Failure to read a word-frequency list.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("no dictionary for language '{language}' at {path}")]
    NotFound { language: String, path: PathBuf },

    #[error("failed to read dictionary for '{language}': {source}")]
    Io {
        language: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a persistent key/value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Failure to load or save a `KeyboardConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
