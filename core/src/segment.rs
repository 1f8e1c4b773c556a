//! Longest-prefix segmentation over a sorted word store.
//!
//! For a start offset in the query, [`match_chain`] finds every stored key
//! that is a prefix of the remaining text, shortest first. It emulates trie
//! descent with successor queries: extend the current match by one more
//! character, and take the smallest key not below that target. If that key
//! begins with the target and the query text begins with that key, it is the
//! next match and the search continues past it. Anything else ends the chain.
//!
//! A successor that shares the target but then diverges from the query ends
//! the chain even if a longer key further along in key order would still
//! match; no partial-overlap credit is given.
use std::str::CharIndices;

use tracing::warn;

use crate::store::Snapshot;
use crate::{Entry, Result};

/// One accepted step of a match chain: a stored key that is a prefix of the
/// query at some offset, with all of its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub key: String,
    pub entries: Vec<Entry>,
}

impl Match {
    /// Length of the matched key in characters.
    pub fn char_len(&self) -> usize {
        self.key.chars().count()
    }
}

/// Matches at one start offset, ordered by strictly increasing key length.
pub type MatchChain = Vec<Match>;

/// Chain of dictionary words starting at character offset `start` of `query`.
///
/// Offsets at or past the end of the query yield an empty chain.
pub fn match_chain<S>(snapshot: &S, query: &str, start: usize) -> Result<MatchChain>
where
    S: Snapshot + ?Sized,
{
    match query.char_indices().nth(start) {
        Some((byte_start, _)) => chain_from(snapshot, &query[byte_start..]),
        None => Ok(Vec::new()),
    }
}

fn chain_from<S>(snapshot: &S, rest: &str) -> Result<MatchChain>
where
    S: Snapshot + ?Sized,
{
    let mut chain = Vec::new();
    // bytes of `rest` covered by the last accepted key
    let mut matched = 0;

    while let Some(next) = rest[matched..].chars().next() {
        let target = &rest[..matched + next.len_utf8()];
        let Some((key, entries)) = snapshot.successor(target)? else {
            break;
        };
        if !key.starts_with(target) || !rest.starts_with(key.as_str()) {
            break;
        }
        matched = key.len();
        chain.push(Match { key, entries });
    }

    Ok(chain)
}

/// Lazily yields one match chain per character offset of a query.
///
/// A store error at an offset is logged and reported as an empty chain, so a
/// failing successor query reads as "no word here" rather than aborting the lookup.
pub struct Chains<'a, S: ?Sized> {
    snapshot: &'a S,
    query: &'a str,
    offsets: CharIndices<'a>,
}

impl<'a, S: Snapshot + ?Sized> Chains<'a, S> {
    pub fn new(snapshot: &'a S, query: &'a str) -> Self {
        Self {
            snapshot,
            query,
            offsets: query.char_indices(),
        }
    }
}

impl<S: Snapshot + ?Sized> Iterator for Chains<'_, S> {
    type Item = MatchChain;

    fn next(&mut self) -> Option<MatchChain> {
        let (byte_start, _) = self.offsets.next()?;
        let chain = chain_from(self.snapshot, &self.query[byte_start..]).unwrap_or_else(|e| {
            warn!(error = %e, byte_offset = byte_start, "successor query failed, treating offset as unmatched");
            Vec::new()
        });
        Some(chain)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

/// All chains of `query`, one per character offset.
pub fn all_chains<S>(snapshot: &S, query: &str) -> Vec<MatchChain>
where
    S: Snapshot + ?Sized,
{
    Chains::new(snapshot, query).collect()
}
