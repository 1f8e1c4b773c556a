//! Dictionary records.
use serde::{Deserialize, Serialize};

use crate::utils;

/// A single dictionary record as it appears in a CC-CEDICT dump.
///
/// Entries are produced by a parser, handed to the [`Indexer`](crate::Indexer)
/// and never mutated afterwards. They are stored as bincode payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub traditional: String,
    pub simplified: String,
    /// Numbered pinyin as written in the dump, e.g. `ni3 hao3`.
    pub pronunciation: String,
    pub glosses: Vec<String>,
}

impl Entry {
    pub fn new<T, S, P, G>(traditional: T, simplified: S, pronunciation: P, glosses: G) -> Self
    where
        T: Into<String>,
        S: Into<String>,
        P: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            traditional: traditional.into(),
            simplified: simplified.into(),
            pronunciation: pronunciation.into(),
            glosses: glosses.into_iter().map(Into::into).collect(),
        }
    }

    /// The (traditional, simplified) pair used to deduplicate lookup results.
    pub fn word_pair(&self) -> (&str, &str) {
        (&self.traditional, &self.simplified)
    }

    /// Word keys this entry is indexed under: the NFC traditional form, then
    /// the NFC simplified form when it differs.
    pub fn keys(&self) -> Vec<String> {
        let traditional = utils::nfc(&self.traditional);
        let simplified = utils::nfc(&self.simplified);
        if simplified == traditional {
            vec![traditional]
        } else {
            vec![traditional, simplified]
        }
    }
}
