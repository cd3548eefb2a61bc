//! Word prediction over a frequency-ranked dictionary trie.
//!
//! The engine owns one published trie behind a lock. A dictionary load builds
//! a complete replacement trie without touching the published one and then
//! swaps it in under a single write lock, so a concurrent `predict` observes
//! either the whole old dictionary or the whole new one.
//!
//! Dictionaries are line-oriented word-frequency lists:
//!
//! ```text
//! the 50
//! test 10
//! tea
//! ```
//!
//! The frequency column is optional and defaults to 1.

use crate::error::DictionaryError;
use crate::trie::TrieNode;
use crate::utils::normalize_word;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Default cap on the number of words a single load inserts.
pub const DEFAULT_MAX_WORDS: usize = 50_000;

/// Where word-frequency lists come from.
///
/// Implementations resolve a language code to a readable line stream.
pub trait DictionarySource: Send + Sync {
    fn open(&self, language: &str) -> Result<Box<dyn BufRead + Send>, DictionaryError>;
}

/// Reads `<dir>/<lang>_full.txt` files.
///
/// Only Turkish has its own list; every other language falls back to the
/// English one.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File name of the word list for a language.
    pub fn file_name(language: &str) -> &'static str {
        if language == "tr" {
            "tr_full.txt"
        } else {
            "en_full.txt"
        }
    }

    /// Full path of the word list for a language.
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.dir.join(Self::file_name(language))
    }
}

impl DictionarySource for DirectorySource {
    fn open(&self, language: &str) -> Result<Box<dyn BufRead + Send>, DictionaryError> {
        let path = self.path_for(language);
        match std::fs::File::open(&path) {
            Ok(f) => Ok(Box::new(BufReader::new(f))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DictionaryError::NotFound {
                language: language.to_string(),
                path,
            }),
            Err(source) => Err(DictionaryError::Io {
                language: language.to_string(),
                source,
            }),
        }
    }
}

/// In-memory word lists keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    lists: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the word list text for a language.
    pub fn with_list<L: Into<String>, T: Into<String>>(mut self, language: L, text: T) -> Self {
        self.lists.insert(language.into(), text.into());
        self
    }
}

impl DictionarySource for StaticSource {
    fn open(&self, language: &str) -> Result<Box<dyn BufRead + Send>, DictionaryError> {
        match self.lists.get(language) {
            Some(text) => Ok(Box::new(Cursor::new(text.clone().into_bytes()))),
            None => Err(DictionaryError::NotFound {
                language: language.to_string(),
                path: PathBuf::from(format!("<static:{}>", language)),
            }),
        }
    }
}

/// Result of a successful `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new dictionary was published.
    Loaded { language: String, words: usize },
    /// The requested language was already the current one; nothing changed.
    AlreadyLoaded,
}

#[derive(Debug, Default)]
struct Published {
    language: Option<String>,
    trie: TrieNode,
}

impl Published {
    // Words are keyed lower-case under the casing rules of the loaded language
    fn fold(&self, word: &str) -> String {
        normalize_word(word, self.language.as_deref().unwrap_or_default())
    }
}

/// Trie-backed prediction service.
///
/// Shared between the UI thread (which predicts and learns) and a loader
/// thread, typically through an `Arc<PredictionEngine>`.
#[derive(Debug)]
pub struct PredictionEngine {
    current: RwLock<Published>,
    max_words: usize,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionEngine {
    /// Create an engine with an empty dictionary and the default word cap.
    pub fn new() -> Self {
        Self::with_max_words(DEFAULT_MAX_WORDS)
    }

    /// Create an engine that inserts at most `max_words` words per load.
    pub fn with_max_words(max_words: usize) -> Self {
        Self {
            current: RwLock::new(Published::default()),
            max_words,
        }
    }

    /// Language of the currently published dictionary, if any.
    pub fn loaded_language(&self) -> Option<String> {
        self.current.read().ok().and_then(|p| p.language.clone())
    }

    /// Number of words in the published dictionary.
    pub fn word_count(&self) -> usize {
        self.current.read().map(|p| p.trie.word_count()).unwrap_or(0)
    }

    /// Load the word list for `language` from `source`.
    ///
    /// The new trie is built off to the side and published with one swap.
    /// Asking for the language that is already loaded does nothing. On
    /// failure the previous dictionary stays in place and the error is
    /// logged and returned.
    pub fn load(
        &self,
        language: &str,
        source: &dyn DictionarySource,
    ) -> Result<LoadOutcome, DictionaryError> {
        if self.loaded_language().as_deref() == Some(language) {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        debug!(language, "loading dictionary");
        let trie = match source
            .open(language)
            .and_then(|reader| self.build_trie(language, reader))
        {
            Ok(trie) => trie,
            Err(e) => {
                warn!(language, error = %e, "dictionary load failed, keeping previous dictionary");
                return Err(e);
            }
        };

        let words = trie.word_count();
        match self.current.write() {
            Ok(mut published) => {
                *published = Published {
                    language: Some(language.to_string()),
                    trie,
                };
            }
            Err(poisoned) => {
                *poisoned.into_inner() = Published {
                    language: Some(language.to_string()),
                    trie,
                };
            }
        }
        debug!(language, words, "dictionary published");

        Ok(LoadOutcome::Loaded {
            language: language.to_string(),
            words,
        })
    }

    /// Run `load` on a background thread.
    pub fn spawn_load(
        self: &Arc<Self>,
        language: String,
        source: Arc<dyn DictionarySource>,
    ) -> JoinHandle<Result<LoadOutcome, DictionaryError>> {
        let engine = Arc::clone(self);
        std::thread::spawn(move || engine.load(&language, &*source))
    }

    fn build_trie(
        &self,
        language: &str,
        reader: Box<dyn BufRead + Send>,
    ) -> Result<TrieNode, DictionaryError> {
        let mut trie = TrieNode::new();
        let mut count = 0;

        for line in reader.lines() {
            if count >= self.max_words {
                break;
            }
            let line = line.map_err(|source| DictionaryError::Io {
                language: language.to_string(),
                source,
            })?;
            if let Some((word, frequency)) = parse_line(&line, language) {
                trie.insert(&word, frequency);
                count += 1;
            }
        }

        Ok(trie)
    }

    /// Up to `max_results` completions of `prefix`, most frequent first.
    ///
    /// The prefix is lower-cased with the casing rules of the loaded language
    /// before lookup. An empty prefix or one with no path in the trie yields no
    /// results.
    pub fn predict(&self, prefix: &str, max_results: usize) -> Vec<String> {
        if max_results == 0 {
            return Vec::new();
        }
        let Ok(published) = self.current.read() else {
            return Vec::new();
        };
        let prefix = published.fold(prefix);
        if prefix.is_empty() {
            return Vec::new();
        }
        published.trie.completions(&prefix, max_results)
    }

    /// Teach the engine a word: insert it with frequency 1 or bump its count.
    ///
    /// Blank input is ignored.
    pub fn learn(&self, word: &str) {
        if let Ok(mut published) = self.current.write() {
            let word = published.fold(word);
            if word.is_empty() {
                return;
            }
            let frequency = published.trie.learn(&word);
            debug!(word = %word, frequency, "learned word");
        }
    }

    /// Frequency of `word` in the published dictionary.
    pub fn frequency(&self, word: &str) -> Option<u32> {
        let published = self.current.read().ok()?;
        published.trie.frequency(&published.fold(word))
    }
}

/// Parse one `word [frequency]` line.
///
/// Returns `None` for lines without a word. A missing or non-numeric
/// frequency counts as 1.
fn parse_line(line: &str, language: &str) -> Option<(String, u32)> {
    let mut parts = line.split_whitespace();
    let word = normalize_word(parts.next()?, language);
    if word.is_empty() {
        return None;
    }
    let frequency = parts
        .next()
        .and_then(|f| f.parse::<u32>().ok())
        .unwrap_or(1);
    Some((word, frequency))
}
