//! redb-backed [`SortedStore`].
//!
//! Layout: a single table `words` mapping `&str` word keys to a bincode
//! encoded `Vec<Entry>`. redb keeps `&str` keys in byte order, which is the
//! order the successor query relies on.
use std::path::{Path, PathBuf};

use redb::{Database, ReadOnlyTable, ReadableTable, ReadableTableMetadata, TableDefinition, WriteTransaction};
use tracing::{debug, info, warn};

use crate::store::{Hit, Snapshot, SortedStore};
use crate::{Entry, Index, Result};

const WORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("words");

pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl RedbStore {
    /// Create or open a store at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Make sure the table exists so read transactions can always open it.
        let txn = db.begin_write()?;
        txn.open_table(WORDS)?;
        txn.commit()?;

        debug!(path = %path.display(), "opened word store");
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(txn: &WriteTransaction, index: &Index) -> Result<()> {
        txn.delete_table(WORDS)?;
        let mut table = txn.open_table(WORDS)?;
        for (key, entries) in index.iter() {
            let payload = bincode::serialize(entries)?;
            table.insert(key, payload.as_slice())?;
        }
        Ok(())
    }
}

impl SortedStore for RedbStore {
    fn is_empty(&self) -> Result<bool> {
        let txn = self.db.begin_read()?;
        Ok(txn.open_table(WORDS)?.is_empty()?)
    }

    fn len(&self) -> Result<usize> {
        let txn = self.db.begin_read()?;
        Ok(txn.open_table(WORDS)?.len()? as usize)
    }

    fn replace_all(&self, index: &Index) -> Result<()> {
        let txn = self.db.begin_write()?;
        if let Err(e) = Self::write_snapshot(&txn, index) {
            warn!(error = %e, "word store replace failed, rolling back");
            txn.abort()?;
            return Err(e);
        }
        txn.commit()?;
        info!(keys = index.len(), path = %self.path.display(), "word store replaced");
        Ok(())
    }

    fn snapshot(&self) -> Result<Box<dyn Snapshot + '_>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WORDS)?;
        Ok(Box::new(RedbSnapshot { table }))
    }
}

struct RedbSnapshot {
    table: ReadOnlyTable<&'static str, &'static [u8]>,
}

impl Snapshot for RedbSnapshot {
    fn successor(&self, target: &str) -> Result<Option<Hit>> {
        let mut range = self.table.range(target..)?;
        let Some(item) = range.next() else {
            return Ok(None);
        };
        let (key, value) = item?;
        let entries: Vec<Entry> = bincode::deserialize(value.value())?;
        Ok(Some((key.value().to_string(), entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index;

    fn temp_store(name: &str) -> (RedbStore, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "cedict_redb_{}_{}.redb",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        (RedbStore::open(&path).expect("open store"), path)
    }

    fn sample() -> Index {
        index(vec![
            Entry::new("你", "你", "ni3", ["you"]),
            Entry::new("你好", "你好", "ni3 hao3", ["hello"]),
            Entry::new("漢字", "汉字", "Han4 zi4", ["Chinese character"]),
        ])
    }

    #[test]
    fn fresh_store_is_empty() {
        let (store, path) = temp_store("fresh");
        assert!(store.is_empty().unwrap());
        assert_eq!(store.successor("你").unwrap(), None);
        drop(store);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn successor_returns_smallest_key_not_below_target() {
        let (store, path) = temp_store("successor");
        store.replace_all(&sample()).unwrap();
        assert_eq!(store.len().unwrap(), 4);

        let (k, v) = store.successor("你").unwrap().unwrap();
        assert_eq!(k, "你");
        assert_eq!(v[0].glosses, vec!["you"]);

        // "你" + U+0000 sorts between 你 and 你好
        let (k, _) = store.successor("你\u{0}").unwrap().unwrap();
        assert_eq!(k, "你好");

        assert_eq!(store.successor("\u{10FFFF}").unwrap(), None);
        drop(store);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn replace_discards_previous_keys() {
        let (store, path) = temp_store("replace");
        store.replace_all(&sample()).unwrap();
        store
            .replace_all(&index(vec![Entry::new("好", "好", "hao3", ["good"])]))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("你").unwrap(), None);
        assert!(store.get("好").unwrap().is_some());
        drop(store);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn snapshot_is_isolated_from_later_replace() {
        let (store, path) = temp_store("isolation");
        store.replace_all(&sample()).unwrap();
        let snap = store.snapshot().unwrap();
        store.replace_all(&Index::default()).unwrap();
        assert!(store.is_empty().unwrap());
        assert!(snap.get("你好").unwrap().is_some());
        drop(snap);
        drop(store);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn reopen_keeps_contents() {
        let (store, path) = temp_store("reopen");
        store.replace_all(&sample()).unwrap();
        drop(store);
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("汉字").unwrap().unwrap()[0].traditional, "漢字");
        drop(store);
        let _ = std::fs::remove_file(path);
    }
}
