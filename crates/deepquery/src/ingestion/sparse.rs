//! Term-frequency sparse vectors for hybrid retrieval
//!
//! The term table hands out monotonically increasing ids in first-come
//! order. It is explicit, injected state created at service start and shared
//! by the store and query paths, so ids agree for the lifetime of the
//! process. Ids are not stable across restarts; the vector store keeps its
//! own sparse postings, so only within-process agreement matters.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Index/value pairs, sorted ascending by index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<u32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
    ]
    .into_iter()
    .collect()
});

const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')'];

#[derive(Default)]
struct TermTable {
    ids: HashMap<String, u32>,
    next_id: u32,
}

/// Thread-safe term -> id mapping with atomic first-come assignment
#[derive(Default)]
pub struct TermIndex {
    table: Mutex<TermTable>,
}

impl TermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the id for a term, assigning the next free id on first sight
    pub fn get_or_assign(&self, term: &str) -> u32 {
        let mut table = self.table.lock();
        if let Some(&id) = table.ids.get(term) {
            return id;
        }
        let id = table.next_id;
        table.next_id += 1;
        table.ids.insert(term.to_string(), id);
        id
    }

    /// Number of distinct terms seen so far
    pub fn len(&self) -> usize {
        self.table.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a term-frequency sparse vector for one text.
    ///
    /// Lowercases, splits on whitespace, strips `.,!?;:()`, drops empty
    /// tokens and stop words, then counts per-id frequencies.
    pub fn build(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();

        for raw in text.to_lowercase().split_whitespace() {
            let token: String = raw.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
            if token.is_empty() || STOP_WORDS.contains(token.as_str()) {
                continue;
            }
            let id = self.get_or_assign(&token);
            *counts.entry(id).or_insert(0) += 1;
        }

        let mut indices = Vec::with_capacity(counts.len());
        let mut values = Vec::with_capacity(counts.len());
        for (index, count) in counts {
            indices.push(index);
            values.push(count);
        }

        SparseVector { indices, values }
    }
}
