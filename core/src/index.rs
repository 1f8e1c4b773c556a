//! Word index built from a stream of dictionary entries.
//!
//! Every entry is filed under its traditional form and, if different, under
//! its simplified form, both in NFC. Per-key lists keep the order entries
//! were first seen in the source; nothing is merged or dropped here,
//! deduplication happens at lookup time.
use ahash::AHashMap;

use crate::Entry;

/// In-memory mapping from word key to the entries containing that form.
#[derive(Debug, Clone, Default)]
pub struct Index {
    words: AHashMap<String, Vec<Entry>>,
    entry_count: usize,
}

impl Index {
    /// Number of distinct word keys.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of source records that went into this index.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn get(&self, key: &str) -> Option<&[Entry]> {
        self.words.get(key).map(Vec::as_slice)
    }

    /// Iterate keys in ascending byte order together with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        let mut words: Vec<(&str, &[Entry])> = self
            .words
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        words.sort_unstable_by_key(|(k, _)| *k);
        words.into_iter()
    }
}

/// Single-pass index builder.
#[derive(Debug, Default)]
pub struct Indexer {
    index: Index,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `entry` under each of its (NFC) word keys.
    pub fn push(&mut self, entry: Entry) {
        for key in entry.keys() {
            self.index.words.entry(key).or_default().push(entry.clone());
        }
        self.index.entry_count += 1;
    }

    pub fn finish(self) -> Index {
        self.index
    }
}

/// Build an index from any entry source in one forward pass.
pub fn index<I>(entries: I) -> Index
where
    I: IntoIterator<Item = Entry>,
{
    let mut indexer = Indexer::new();
    for entry in entries {
        indexer.push(entry);
    }
    indexer.finish()
}

/// Like [`index`], for sources that can fail part-way. Stops at the first
/// error.
pub fn try_index<I, E>(entries: I) -> Result<Index, E>
where
    I: IntoIterator<Item = Result<Entry, E>>,
{
    let mut indexer = Indexer::new();
    for entry in entries {
        indexer.push(entry?);
    }
    Ok(indexer.finish())
}
