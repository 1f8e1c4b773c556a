// core/tests/lookup.rs
//
// End-to-end tests for Dictionary over the persistent redb store.
//
// Tests cover:
// - store round-trip of indexed entry lists
// - prefix correctness and chain monotonicity
// - deduplicated, hierarchical definitions
// - empty store, empty load, queries with no coverage
// - idempotent reload and reopen of an existing store

use cedict_core::{index, match_chain, Config, Dictionary, Entry, RedbStore, SortedStore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

struct TempDb(PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "cedict_it_{}_{}.redb",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        TempDb(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn config(&self) -> Config {
        Config {
            database_path: self.0.clone(),
            ..Config::default()
        }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn e(trad: &str, simp: &str, py: &str, gloss: &str) -> Entry {
    Entry::new(trad, simp, py, [gloss])
}

fn sample_entries() -> Vec<Entry> {
    vec![
        e("你", "你", "ni3", "you"),
        e("你好", "你好", "ni3 hao3", "hello"),
        e("你好嗎", "你好吗", "ni3 hao3 ma5", "how are you?"),
        e("好", "好", "hao3", "good"),
        e("好", "好", "hao4", "to be fond of"),
        e("嗎", "吗", "ma5", "question particle"),
        e("中", "中", "zhong1", "middle"),
        e("中國", "中国", "Zhong1 guo2", "China"),
        e("國", "国", "guo2", "country"),
        e("人", "人", "ren2", "person"),
        e("中國人", "中国人", "Zhong1 guo2 ren2", "Chinese person"),
    ]
}

#[test]
fn stored_values_match_index() {
    let db = TempDb::new("roundtrip");
    let store = RedbStore::open(db.path()).unwrap();
    let idx = index(sample_entries());
    store.replace_all(&idx).unwrap();

    for (key, entries) in idx.iter() {
        let (found, stored) = store.successor(key).unwrap().expect("key present");
        assert_eq!(found, key);
        assert_eq!(stored, entries);
    }
    assert_eq!(store.len().unwrap(), idx.len());
}

#[test]
fn chain_hits_key_only_when_it_prefixes_query() {
    let db = TempDb::new("prefix");
    let store = RedbStore::open(db.path()).unwrap();
    let idx = index(sample_entries());
    store.replace_all(&idx).unwrap();
    let snap = store.snapshot().unwrap();

    let queries = ["中国人好", "你好吗", "你们好", "国人", "好吗中国"];
    for q in queries {
        let chars: Vec<char> = q.chars().collect();
        for start in 0..chars.len() {
            let rest: String = chars[start..].iter().collect();
            let chain = match_chain(&*snap, q, start).unwrap();
            let lens: Vec<usize> = chain.iter().map(|m| m.char_len()).collect();
            assert!(lens.windows(2).all(|w| w[0] < w[1]), "{q}@{start}: {lens:?}");

            for m in &chain {
                assert!(rest.starts_with(&m.key), "{} not a prefix of {rest}", m.key);
                assert_eq!(Some(m.entries.as_slice()), idx.get(&m.key));
            }
            // the longest stored prefix is always the last link
            let longest = idx
                .iter()
                .map(|(k, _)| k)
                .filter(|k| rest.starts_with(k))
                .max_by_key(|k| k.len());
            assert_eq!(chain.last().map(|m| m.key.as_str()), longest, "{q}@{start}");
        }
    }
}

#[test]
fn nested_words_become_children_of_longest() {
    let db = TempDb::new("scenario");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(vec![
        e("你", "你", "ni3", "you"),
        e("你好", "你好", "ni3 hao3", "hello"),
        e("你好嗎", "你好吗", "ni3 hao3 ma5", "how are you?"),
    ])
    .unwrap();

    let defs = dict.lookup("你好吗").unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].primary.traditional, "你好嗎");
    let children: Vec<_> = defs[0].children.iter().map(|c| c.simplified.as_str()).collect();
    assert_eq!(children, vec!["你", "你好"]);
}

#[test]
fn definitions_are_deduplicated() {
    let db = TempDb::new("dedup");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(sample_entries()).unwrap();

    for q in ["中国人好吗", "你好你好", "好好好", "中國人", "國中国"] {
        let defs = dict.lookup(q).unwrap();
        let mut primaries = HashSet::new();
        for d in &defs {
            assert!(primaries.insert(d.primary.word_pair()), "duplicate primary in {q}");
            let mut seen = HashSet::new();
            for c in &d.children {
                assert_ne!(c.word_pair(), d.primary.word_pair());
                assert!(seen.insert(c.word_pair()), "duplicate child in {q}");
            }
            for r in &d.readings {
                assert_eq!(r.word_pair(), d.primary.word_pair());
            }
        }
    }
}

#[test]
fn homograph_readings_survive_lookup() {
    let db = TempDb::new("readings");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(sample_entries()).unwrap();

    let defs = dict.lookup("好").unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].primary.pronunciation, "hao4");
    assert_eq!(defs[0].readings[0].pronunciation, "hao3");
}

#[test]
fn mixed_scripts_resolve_to_same_word() {
    let db = TempDb::new("scripts");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(sample_entries()).unwrap();

    let trad = dict.lookup("中國人").unwrap();
    let simp = dict.lookup("中国人").unwrap();
    assert_eq!(trad[0].primary, simp[0].primary);
    assert_eq!(trad[0].primary.glosses, vec!["Chinese person"]);
}

#[test]
fn empty_store_and_empty_load() {
    let db = TempDb::new("empty");
    let dict = Dictionary::open(&db.config()).unwrap();
    assert!(dict.is_empty().unwrap());
    assert!(dict.lookup("你好").unwrap().is_empty());

    let stats = dict.load(Vec::new()).unwrap();
    assert_eq!((stats.entries, stats.keys), (0, 0));
    assert!(dict.is_empty().unwrap());
    assert!(dict.lookup("你好").unwrap().is_empty());
}

#[test]
fn uncovered_query_is_not_an_error() {
    let db = TempDb::new("uncovered");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(sample_entries()).unwrap();
    assert!(dict.lookup("xyz 123").unwrap().is_empty());
    assert!(dict.lookup("").unwrap().is_empty());
}

#[test]
fn reload_is_idempotent() {
    let db = TempDb::new("reload");
    let dict = Dictionary::open(&db.config()).unwrap();
    let queries = ["你好吗", "中国人", "好国"];

    dict.load(sample_entries()).unwrap();
    let first: Vec<_> = queries.iter().map(|q| dict.lookup(q).unwrap()).collect();
    dict.load(sample_entries()).unwrap();
    let second: Vec<_> = queries.iter().map(|q| dict.lookup(q).unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn reopened_store_skips_rebuild() {
    let db = TempDb::new("reopen");
    {
        let dict = Dictionary::open(&db.config()).unwrap();
        let stats = dict
            .load_if_empty(|| Ok::<_, cedict_core::Error>(sample_entries().into_iter().map(Ok)))
            .unwrap();
        assert!(stats.is_some());
        dict.close();
    }

    let dict = Dictionary::open(&db.config()).unwrap();
    let mut ran = false;
    let stats = dict
        .load_if_empty(|| {
            ran = true;
            Ok::<_, cedict_core::Error>(Vec::new().into_iter())
        })
        .unwrap();
    assert!(stats.is_none());
    assert!(!ran);
    assert_eq!(dict.lookup("中国").unwrap()[0].primary.traditional, "中國");
}

#[test]
fn lookups_run_concurrently_with_reload() {
    let db = TempDb::new("concurrent");
    let dict = Dictionary::open(&db.config()).unwrap();
    dict.load(sample_entries()).unwrap();
    let expected = dict.lookup("中国人").unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(dict.lookup("中国人").unwrap(), expected);
                }
            });
        }
        s.spawn(|| {
            for _ in 0..5 {
                dict.load(sample_entries()).unwrap();
            }
        });
    });
}
