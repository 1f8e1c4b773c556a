//! cedict-core
//!
//! Longest-match dictionary lookup for CJK text over a persisted, sorted word
//! index built from a CC-CEDICT style dump.
//!
//! Pipeline: entries → [`Indexer`] → [`SortedStore`] (written once per load)
//! ⇒ [`segment`] (successor queries per query offset) → [`merge`] →
//! [`Definition`]s.
//!
//! Public API:
//! - `Entry` - One dictionary record
//! - `Index` / `Indexer` - Word key → entries mapping built in one pass
//! - `SortedStore` - Successor-query store, with `RedbStore` and `FstStore` backends
//! - `Dictionary` - Owned store handle exposing `load` and `lookup`
//! - `Config` - TOML configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod entry;
pub use entry::Entry;

pub mod error;
pub use error::{Error, Result};

pub mod index;
pub use index::{index, try_index, Index, Indexer};

pub mod store;
pub use store::{Snapshot, SortedStore};

pub mod redb_store;
pub use redb_store::RedbStore;

pub mod fst_store;
pub use fst_store::FstStore;

pub mod segment;
pub use segment::{all_chains, match_chain, Chains, Match, MatchChain};

pub mod merge;
pub use merge::{build_definitions, Definition};

pub mod dictionary;
pub use dictionary::{Dictionary, LoadStats};

/// Runtime configuration.
///
/// Deserialized from TOML; missing fields fall back to [`Config::default`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Location of the redb word store.
    pub database_path: PathBuf,

    /// Maximum number of cached query results. 0 disables the cache.
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_cache_size: 1000,
        }
    }
}

/// `$HOME/.cedict/cedict.redb`, or `./cedict.redb` when no home is set.
pub fn default_database_path() -> PathBuf {
    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => PathBuf::from(home).join(".cedict").join("cedict.redb"),
        None => PathBuf::from("cedict.redb"),
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// NFC form of a word key. Stored keys and queries both go through this,
    /// so a word is found no matter which composition the dump or the user
    /// happened to use.
    pub fn nfc(s: &str) -> String {
        s.nfc().collect()
    }

    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        nfc(s.trim())
    }
}
