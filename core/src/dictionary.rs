//! Dictionary facade: an owned word store plus lookup and load operations.
//!
//! Lifecycle:
//! 1. [`Dictionary::open`] opens (or creates) the persistent store.
//! 2. [`Dictionary::load_if_empty`] runs the entry source only on a cold
//!    start; [`Dictionary::load`] rebuilds unconditionally.
//! 3. [`Dictionary::lookup`] any number of times, from any thread.
//! 4. [`Dictionary::close`], or drop.
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info};

use crate::merge::build_definitions;
use crate::segment::Chains;
use crate::store::SortedStore;
use crate::{utils, Config, Definition, Entry, Error, Index, RedbStore, Result};

/// Counts reported by a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Source records consumed.
    pub entries: usize,
    /// Distinct word keys written.
    pub keys: usize,
}

struct QueryCache {
    lru: LruCache<String, Vec<Definition>>,
    // bumped on every load; results computed against an older store are not cached
    generation: u64,
}

pub struct Dictionary {
    store: Box<dyn SortedStore>,
    cache: Option<Mutex<QueryCache>>,
    generation: AtomicU64,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("cache_stats", &self.cache_stats())
            .finish_non_exhaustive()
    }
}

impl Dictionary {
    /// Open the redb store at `config.database_path`.
    ///
    /// Fails if the store cannot be created or opened; there is nothing to
    /// look words up in without it.
    pub fn open(config: &Config) -> Result<Self> {
        let store = RedbStore::open(&config.database_path)?;
        Ok(Self::with_store(store, config))
    }

    /// Wrap an arbitrary store backend.
    pub fn with_store<S: SortedStore + 'static>(store: S, config: &Config) -> Self {
        let cache = NonZeroUsize::new(config.max_cache_size).map(|cap| {
            Mutex::new(QueryCache {
                lru: LruCache::new(cap),
                generation: 0,
            })
        });
        Self {
            store: Box::new(store),
            cache,
            generation: AtomicU64::new(0),
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
        }
    }

    /// True if no dictionary has been loaded yet.
    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    /// Number of word keys in the store.
    pub fn key_count(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn store(&self) -> &dyn SortedStore {
        self.store.as_ref()
    }

    /// Rebuild the store from `entries`, replacing whatever it held.
    ///
    /// On failure the previous contents stay authoritative.
    pub fn load<I>(&self, entries: I) -> Result<LoadStats>
    where
        I: IntoIterator<Item = Entry>,
    {
        self.commit(crate::index(entries))
    }

    /// Like [`Dictionary::load`] for a fallible entry source. The store is
    /// left untouched if the source fails part-way.
    pub fn try_load<I, E>(&self, entries: I) -> std::result::Result<LoadStats, E>
    where
        I: IntoIterator<Item = std::result::Result<Entry, E>>,
        E: From<Error>,
    {
        let index = crate::try_index(entries)?;
        Ok(self.commit(index)?)
    }

    /// Load from `source` only if the store is empty. Returns `None` when the
    /// existing contents were kept; `source` is not called in that case.
    pub fn load_if_empty<F, I, E>(&self, source: F) -> std::result::Result<Option<LoadStats>, E>
    where
        F: FnOnce() -> std::result::Result<I, E>,
        I: IntoIterator<Item = std::result::Result<Entry, E>>,
        E: From<Error>,
    {
        if !self.is_empty()? {
            debug!("word store already populated, skipping load");
            return Ok(None);
        }
        self.try_load(source()?).map(Some)
    }

    fn commit(&self, index: Index) -> Result<LoadStats> {
        info!(entries = index.entry_count(), keys = index.len(), "writing word index");
        self.store.replace_all(&index)?;
        self.invalidate_cache();
        Ok(LoadStats {
            entries: index.entry_count(),
            keys: index.len(),
        })
    }

    /// Look up every dictionary word found in `query`.
    ///
    /// The query is trimmed and NFC-normalized, matching how keys were
    /// filed. Definitions come in order of the offset where their word first
    /// appears. An empty query, or one with no known words, yields an empty
    /// list.
    pub fn lookup(&self, query: &str) -> Result<Vec<Definition>> {
        let query = utils::normalize(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let generation = self.generation.load(Ordering::Acquire);
        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.lru.get(&query) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                debug!(%query, "lookup cache hit");
                return Ok(hit.clone());
            }
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }

        let snapshot = self.store.snapshot()?;
        let defs = build_definitions(Chains::new(&*snapshot, &query));
        debug!(%query, definitions = defs.len(), "lookup");

        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if cache.generation == generation {
                cache.lru.put(query, defs.clone());
            }
        }
        Ok(defs)
    }

    fn invalidate_cache(&self) {
        match &self.cache {
            Some(cache) => {
                let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                cache.generation = generation;
                cache.lru.clear();
            }
            None => {
                self.generation.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    /// (hits, misses) of the lookup cache.
    pub fn cache_stats(&self) -> (usize, usize) {
        (
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
        )
    }

    /// Number of cached queries.
    pub fn cache_len(&self) -> usize {
        self.cache
            .as_ref()
            .map(|c| c.lock().unwrap_or_else(PoisonError::into_inner).lru.len())
            .unwrap_or(0)
    }

    /// Release the store.
    /// Release the store. For redb this closes the database file, so it can
    /// be reopened right after.
    pub fn close(self) {
        let Self { store, .. } = self;
        drop(store);
        debug!("dictionary closed");
    }
}
