//! Sorted word store abstraction.
//!
//! A store maps word keys to their entry lists in byte order of the key.
//! The only read primitive is the successor query: the smallest stored key
//! that is greater than or equal to a target. Prefix search is built on top of
//! it by the segmenter.
//!
//! Backends:
//! - [`RedbStore`](crate::RedbStore): persistent, one redb table.
//! - [`FstStore`](crate::FstStore): in-memory fst map plus payload vector,
//!   optionally saved to / loaded from disk artifacts.
use std::sync::Arc;

use crate::{Entry, Index, Result};

/// A stored key together with its entries.
pub type Hit = (String, Vec<Entry>);

/// A consistent read view of a store.
///
/// All queries issued through one snapshot observe the same store contents,
/// even if a replace commits in the meantime.
pub trait Snapshot {
    /// Smallest stored key `>= target`, or `None` past the last key.
    fn successor(&self, target: &str) -> Result<Option<Hit>>;

    /// Exact lookup.
    fn get(&self, key: &str) -> Result<Option<Vec<Entry>>> {
        Ok(self
            .successor(key)?
            .and_then(|(k, entries)| (k == key).then_some(entries)))
    }
}

impl<T: Snapshot + ?Sized> Snapshot for Arc<T> {
    fn successor(&self, target: &str) -> Result<Option<Hit>> {
        (**self).successor(target)
    }
}

impl<T: Snapshot + ?Sized> Snapshot for Box<T> {
    fn successor(&self, target: &str) -> Result<Option<Hit>> {
        (**self).successor(target)
    }
}

/// Persistent or in-memory sorted key/value store of word entries.
pub trait SortedStore: Send + Sync {
    /// True iff no keys are stored.
    fn is_empty(&self) -> Result<bool>;

    /// Number of stored keys.
    fn len(&self) -> Result<usize>;

    /// Discard all existing keys and write `index` in their place.
    ///
    /// Either the whole index becomes visible or, on error, the previous
    /// contents stay in place. Readers never observe a state in between.
    fn replace_all(&self, index: &Index) -> Result<()>;

    /// Open a read view of the current contents.
    fn snapshot(&self) -> Result<Box<dyn Snapshot + '_>>;

    /// One-shot successor query against the current contents.
    fn successor(&self, target: &str) -> Result<Option<Hit>> {
        self.snapshot()?.successor(target)
    }

    /// One-shot exact lookup against the current contents.
    fn get(&self, key: &str) -> Result<Option<Vec<Entry>>> {
        self.snapshot()?.get(key)
    }
}

impl<S: SortedStore + ?Sized> SortedStore for Box<S> {
    fn is_empty(&self) -> Result<bool> {
        (**self).is_empty()
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn replace_all(&self, index: &Index) -> Result<()> {
        (**self).replace_all(index)
    }

    fn snapshot(&self) -> Result<Box<dyn Snapshot + '_>> {
        (**self).snapshot()
    }
}
