//! Text-expansion shortcuts ("omw" -> "on my way").
//!
//! The whole table is serialized as one JSON object under a single store key
//! and rewritten wholesale on each mutation. Triggers are stored normalized:
//! trimmed, lower-cased, NFC, and never containing whitespace.
use crate::store::KeyValueStore;
use crate::utils::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Store key holding the serialized table.
pub const SHORTCUTS_KEY: &str = "shortcuts_map";

/// A single trigger/expansion pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub trigger: String,
    pub expansion: String,
}

/// Persisted trigger -> expansion table.
#[derive(Clone)]
pub struct ShortcutTable {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ShortcutTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutTable").finish_non_exhaustive()
    }
}

/// Normalize a trigger for storage and lookup.
pub fn normalize_trigger(trigger: &str) -> String {
    normalize(trigger).to_lowercase()
}

fn is_valid_trigger(normalized: &str) -> bool {
    !normalized.is_empty() && !normalized.chars().any(char::is_whitespace)
}

impl ShortcutTable {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the table. A missing blob is an empty table; a corrupt blob is
    /// logged and also treated as empty.
    fn load(&self) -> HashMap<String, String> {
        let Some(json) = self.store.get(SHORTCUTS_KEY) else {
            return HashMap::new();
        };
        match serde_json::from_str(&json) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "shortcut table corrupt, treating as empty");
                HashMap::new()
            }
        }
    }

    fn save(&self, map: &HashMap<String, String>) -> bool {
        let json = match serde_json::to_string(map) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "failed to serialize shortcut table");
                return false;
            }
        };
        match self.store.set(SHORTCUTS_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to persist shortcut table");
                false
            }
        }
    }

    /// Add a shortcut, overwriting any existing entry for the same trigger.
    ///
    /// Returns `false` without changing anything if either side is blank or
    /// the trimmed trigger contains whitespace.
    pub fn add(&self, trigger: &str, expansion: &str) -> bool {
        if trigger.trim().is_empty() || expansion.trim().is_empty() {
            return false;
        }
        let trigger = normalize_trigger(trigger);
        if !is_valid_trigger(&trigger) {
            return false;
        }

        let mut map = self.load();
        map.insert(trigger.clone(), expansion.trim().to_string());
        let saved = self.save(&map);
        if saved {
            debug!(trigger = %trigger, "shortcut added");
        }
        saved
    }

    /// Replace the shortcut stored under `old_trigger`.
    ///
    /// If the normalized new trigger differs from the old one the old entry
    /// is removed first, so renaming onto an existing trigger overwrites it.
    pub fn update(&self, old_trigger: &str, new_trigger: &str, expansion: &str) -> bool {
        if new_trigger.trim().is_empty() || expansion.trim().is_empty() {
            return false;
        }
        let old_trigger = normalize_trigger(old_trigger);
        let new_trigger = normalize_trigger(new_trigger);
        if !is_valid_trigger(&new_trigger) {
            return false;
        }

        let mut map = self.load();
        if old_trigger != new_trigger {
            map.remove(&old_trigger);
        }
        map.insert(new_trigger, expansion.trim().to_string());
        self.save(&map)
    }

    /// Remove a shortcut. Returns `true` only if an entry existed and the
    /// table was saved without it.
    pub fn remove(&self, trigger: &str) -> bool {
        let trigger = normalize_trigger(trigger);
        let mut map = self.load();
        if map.remove(&trigger).is_none() {
            return false;
        }
        self.save(&map)
    }

    /// Expansion for `trigger`, matched case-insensitively.
    pub fn get_expansion(&self, trigger: &str) -> Option<String> {
        let trigger = normalize_trigger(trigger);
        if trigger.is_empty() {
            return None;
        }
        self.load().remove(&trigger)
    }

    /// Whether a shortcut exists for `trigger`.
    pub fn has(&self, trigger: &str) -> bool {
        self.get_expansion(trigger).is_some()
    }

    /// All shortcuts sorted case-insensitively by trigger.
    pub fn list(&self) -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = self
            .load()
            .into_iter()
            .map(|(trigger, expansion)| Shortcut { trigger, expansion })
            .collect();
        shortcuts.sort_by(|a, b| {
            a.trigger
                .to_lowercase()
                .cmp(&b.trigger.to_lowercase())
                .then_with(|| a.trigger.cmp(&b.trigger))
        });
        shortcuts
    }

    /// Number of stored shortcuts.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export the table as a pretty-printed JSON array of shortcuts.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.list())
    }

    /// Import shortcuts from a JSON array produced by `export_json`.
    ///
    /// Entries are validated like `add`; invalid ones are skipped. Returns
    /// the number of entries written.
    pub fn import_json(&self, json: &str) -> Result<usize, serde_json::Error> {
        let incoming: Vec<Shortcut> = serde_json::from_str(json)?;
        let mut map = self.load();
        let mut added = 0;
        for s in incoming {
            let trigger = normalize_trigger(&s.trigger);
            if !is_valid_trigger(&trigger) || s.expansion.trim().is_empty() {
                continue;
            }
            map.insert(trigger, s.expansion.trim().to_string());
            added += 1;
        }
        if added > 0 && !self.save(&map) {
            return Ok(0);
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn table() -> ShortcutTable {
        ShortcutTable::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn add_and_lookup_case_insensitive() {
        let t = table();
        assert!(t.add("omw", "on my way"));
        assert_eq!(t.get_expansion("OMW").as_deref(), Some("on my way"));
        assert_eq!(t.get_expansion("  omw ").as_deref(), Some("on my way"));
        assert!(t.has("Omw"));
    }

    #[test]
    fn add_rejects_invalid_input() {
        let t = table();
        assert!(!t.add("", "x"));
        assert!(!t.add("   ", "x"));
        assert!(!t.add("ok", "  "));
        assert!(!t.add("two words", "x"));
        assert!(!t.add("tab\tbed", "x"));
        assert!(t.is_empty());
    }

    #[test]
    fn add_normalizes_and_overwrites() {
        let t = table();
        assert!(t.add("  BRB ", "  be right back  "));
        assert!(t.add("brb", "bathroom break"));
        assert_eq!(
            t.list(),
            vec![Shortcut {
                trigger: "brb".to_string(),
                expansion: "bathroom break".to_string()
            }]
        );
    }

    #[test]
    fn update_renames_and_overwrites_target() {
        let t = table();
        t.add("ty", "thank you");
        t.add("tyvm", "thank you very much");

        assert!(t.update("ty", "TYVM", "thanks a lot"));
        assert_eq!(t.get_expansion("ty"), None);
        assert_eq!(t.get_expansion("tyvm").as_deref(), Some("thanks a lot"));
        assert_eq!(t.len(), 1);

        assert!(!t.update("tyvm", "bad trigger", "x"));
        assert_eq!(t.get_expansion("tyvm").as_deref(), Some("thanks a lot"));
    }

    #[test]
    fn remove_reports_presence() {
        let t = table();
        t.add("idk", "I don't know");
        assert!(t.remove("IDK"));
        assert!(!t.remove("idk"));
    }

    #[test]
    fn list_is_sorted() {
        let t = table();
        t.add("zz", "sleep");
        t.add("afaik", "as far as I know");
        t.add("Mfw", "my face when");
        let triggers: Vec<String> = t.list().into_iter().map(|s| s.trigger).collect();
        assert_eq!(triggers, vec!["afaik", "mfw", "zz"]);
    }

    #[test]
    fn corrupt_blob_reads_as_empty_and_heals() {
        let store = Arc::new(MemoryStore::new());
        store.set(SHORTCUTS_KEY, "{broken").unwrap();
        let t = ShortcutTable::new(store);
        assert_eq!(t.get_expansion("x"), None);
        assert!(t.list().is_empty());

        assert!(t.add("x", "fixed"));
        assert_eq!(t.get_expansion("x").as_deref(), Some("fixed"));
    }

    #[test]
    fn export_import_skips_invalid_entries() {
        let source = table();
        source.add("gm", "good morning");
        source.add("gn", "good night");
        let json = source.export_json().unwrap();

        let target = table();
        assert_eq!(target.import_json(&json).unwrap(), 2);
        assert_eq!(target.get_expansion("gn").as_deref(), Some("good night"));

        let bad = r#"[{"trigger":"a b","expansion":"x"},{"trigger":"ok","expansion":"fine"}]"#;
        assert_eq!(target.import_json(bad).unwrap(), 1);
        assert_eq!(target.len(), 3);
    }
}
