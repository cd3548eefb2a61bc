//! Clipboard history shown in the keyboard's clipboard panel.
use crate::store::KeyValueStore;
use std::sync::Arc;
use tracing::warn;

/// Store key holding the serialized history.
pub const CLIPBOARD_KEY: &str = "clipboard_history";

/// Most-recent-first list of copied texts, de-duplicated and capped.
#[derive(Clone)]
pub struct ClipboardHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl std::fmt::Debug for ClipboardHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardHistory")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl ClipboardHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    /// Current history, newest first. A corrupt blob reads as empty.
    pub fn history(&self) -> Vec<String> {
        let Some(json) = self.store.get(CLIPBOARD_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(error = %e, "clipboard history corrupt, treating as empty");
            Vec::new()
        })
    }

    /// Record a copied text, moving it to the front if already present.
    pub fn add_clip(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut history = self.history();
        history.retain(|t| t != text);
        history.insert(0, text.to_string());
        history.truncate(self.limit);
        self.save(&history);
    }

    /// Text at `index` in the history.
    pub fn get(&self, index: usize) -> Option<String> {
        self.history().into_iter().nth(index)
    }

    pub fn clear(&self) {
        self.save(&[]);
    }

    fn save(&self, history: &[String]) {
        let result = serde_json::to_string(history)
            .map_err(crate::error::StoreError::from)
            .and_then(|json| self.store.set(CLIPBOARD_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist clipboard history");
        }
    }
}
