//! Prefix trie holding dictionary words and their frequency counters.
use ahash::AHashMap;

/// A Trie (prefix tree) node.
///
/// The root is a sentinel with an empty path. End-of-word nodes carry the
/// word's frequency and a cached copy of the full path so completions can be
/// collected without rebuilding strings.
///
/// # Example
/// ```
/// use softkey_core::trie::TrieNode;
///
/// let mut trie = TrieNode::new();
/// trie.insert("the", 50);
/// trie.insert("test", 10);
/// trie.insert("tea", 5);
///
/// assert_eq!(trie.completions("te", 3), vec!["test", "tea"]);
/// assert_eq!(trie.completions("t", 3), vec!["the", "test", "tea"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TrieNode {
    children: AHashMap<char, Box<TrieNode>>,
    is_end: bool,
    frequency: u32,
    /// When `is_end` is true, `word` contains the path from the root.
    word: Option<String>,
}

impl TrieNode {
    /// Create a new empty trie root.
    pub fn new() -> Self {
        Self {
            children: AHashMap::new(),
            is_end: false,
            frequency: 0,
            word: None,
        }
    }

    /// Insert a word with the given frequency.
    ///
    /// Inserting an existing word overwrites its frequency. Empty words are
    /// ignored so the root never becomes an end-of-word node.
    pub fn insert(&mut self, word: &str, frequency: u32) {
        if word.is_empty() {
            return;
        }
        let node = self.path_mut(word);
        node.is_end = true;
        node.frequency = frequency;
        node.word = Some(word.to_string());
    }

    /// Record one more use of `word`, returning its new frequency.
    ///
    /// A word seen for the first time starts at frequency 1.
    pub fn learn(&mut self, word: &str) -> u32 {
        if word.is_empty() {
            return 0;
        }
        let node = self.path_mut(word);
        if node.is_end {
            node.frequency = node.frequency.saturating_add(1);
        } else {
            node.is_end = true;
            node.frequency = 1;
            node.word = Some(word.to_string());
        }
        node.frequency
    }

    fn path_mut(&mut self, word: &str) -> &mut TrieNode {
        let mut node = self;
        for ch in word.chars() {
            node = node
                .children
                .entry(ch)
                .or_insert_with(|| Box::new(TrieNode::new()));
        }
        node
    }

    /// Walk the trie along `prefix`, returning the node it ends at.
    pub fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = self;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// Check whether the trie contains exactly the given word.
    ///
    /// Returns `true` only if `word` was inserted as a complete word,
    /// not just as a prefix of one.
    pub fn contains_word(&self, word: &str) -> bool {
        self.find(word).is_some_and(|n| n.is_end)
    }

    /// Frequency of a complete word, if present.
    pub fn frequency(&self, word: &str) -> Option<u32> {
        self.find(word).filter(|n| n.is_end).map(|n| n.frequency)
    }

    /// Number of complete words stored below (and including) this node.
    pub fn word_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_end {
                count += 1;
            }
            stack.extend(node.children.values().map(|c| c.as_ref()));
        }
        count
    }

    /// Collect every end-of-word node under this node as `(word, frequency)`.
    pub fn collect_words<'a>(&'a self, out: &mut Vec<(&'a str, u32)>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_end {
                if let Some(w) = &node.word {
                    out.push((w.as_str(), node.frequency));
                }
            }
            stack.extend(node.children.values().map(|c| c.as_ref()));
        }
    }

    /// Completions of `prefix` ranked by frequency, highest first.
    ///
    /// Equal frequencies are ordered lexicographically by word so results do
    /// not depend on hash-map iteration order. The prefix itself is included
    /// when it is a complete word. An unknown prefix yields nothing.
    pub fn completions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        start.collect_words(&mut found);
        found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        found
            .into_iter()
            .take(limit)
            .map(|(w, _)| w.to_string())
            .collect()
    }
}
