//! In-memory [`SortedStore`] backed by an `fst::Map`.
//!
//! The fst maps each word key to an index into a payload vector holding the
//! entry lists. A replace builds a fresh map and payload vector and swaps
//! them in under a lock, so readers holding an older snapshot keep working
//! against it.
//!
//! The pair can be written to disk as `words.fst` + `words.bincode`
//! artifacts and loaded back without re-indexing.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use tracing::info;

use crate::store::{Hit, Snapshot, SortedStore};
use crate::{Entry, Error, Index, Result};

#[derive(Debug, Default)]
struct FstSnapshot {
    map: Map<Vec<u8>>,
    payloads: Vec<Vec<Entry>>,
}

impl FstSnapshot {
    fn build(index: &Index) -> Result<Self> {
        let mut builder = MapBuilder::memory();
        let mut payloads = Vec::with_capacity(index.len());
        for (i, (key, entries)) in index.iter().enumerate() {
            builder.insert(key, i as u64)?;
            payloads.push(entries.to_vec());
        }
        let map = Map::new(builder.into_inner()?)?;
        Ok(Self { map, payloads })
    }
}

impl Snapshot for FstSnapshot {
    fn successor(&self, target: &str) -> Result<Option<Hit>> {
        let mut stream = self.map.range().ge(target).into_stream();
        let Some((key, idx)) = stream.next() else {
            return Ok(None);
        };
        let key = std::str::from_utf8(key).map_err(|_| Error::InvalidKey)?;
        let entries = self
            .payloads
            .get(idx as usize)
            .ok_or(Error::MissingPayload(idx))?;
        Ok(Some((key.to_string(), entries.clone())))
    }
}

#[derive(Debug, Default)]
pub struct FstStore {
    current: RwLock<Arc<FstSnapshot>>,
}

impl FstStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store directly from an index.
    pub fn from_index(index: &Index) -> Result<Self> {
        Ok(Self {
            current: RwLock::new(Arc::new(FstSnapshot::build(index)?)),
        })
    }

    fn current(&self) -> Arc<FstSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write the current contents as an fst file and a bincode payload file.
    pub fn save<P: AsRef<Path>>(&self, fst_path: P, bincode_path: P) -> Result<()> {
        let snap = self.current();

        let mut out = File::create(fst_path.as_ref())?;
        out.write_all(snap.map.as_fst().as_bytes())?;
        out.sync_all()?;

        let mut writer = BufWriter::new(File::create(bincode_path.as_ref())?);
        bincode::serialize_into(&mut writer, &snap.payloads)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Load a store from artifacts produced by [`FstStore::save`].
    ///
    /// Fails if the two files do not describe the same number of keys.
    pub fn load<P: AsRef<Path>>(fst_path: P, bincode_path: P) -> Result<Self> {
        let fst_path = fst_path.as_ref();

        let mut buf = Vec::new();
        File::open(fst_path)?.read_to_end(&mut buf)?;
        let map = Map::new(buf)?;

        let reader = BufReader::new(File::open(bincode_path.as_ref())?);
        let payloads: Vec<Vec<Entry>> = bincode::deserialize_from(reader)?;
        if map.len() != payloads.len() {
            return Err(Error::ArtifactMismatch {
                keys: map.len(),
                payloads: payloads.len(),
            });
        }

        info!(keys = map.len(), path = %fst_path.display(), "loaded fst word store");
        Ok(Self {
            current: RwLock::new(Arc::new(FstSnapshot { map, payloads })),
        })
    }
}

impl SortedStore for FstStore {
    fn is_empty(&self) -> Result<bool> {
        Ok(self.current().map.is_empty())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.current().map.len())
    }

    fn replace_all(&self, index: &Index) -> Result<()> {
        // Build outside the lock; only the swap is serialized with readers.
        let next = Arc::new(FstSnapshot::build(index)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!(keys = index.len(), "fst word store replaced");
        Ok(())
    }

    fn snapshot(&self) -> Result<Box<dyn Snapshot + '_>> {
        Ok(Box::new(self.current()))
    }
}
