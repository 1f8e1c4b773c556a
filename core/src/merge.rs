//! Turning per-offset match chains into lookup results.
//!
//! Each non-empty chain contributes one candidate definition: its last entry
//! (from the longest key) is the primary, everything before it is an
//! alternate. Definitions are deduplicated on the (traditional, simplified)
//! pair across the whole query, first sighting wins.
use ahash::AHashSet;
use serde::Serialize;

use crate::segment::MatchChain;
use crate::Entry;

/// A lookup result: the longest word found at some offset, plus the shorter
/// words found on the way to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub primary: Entry,
    /// Other entries for the primary's own word, e.g. alternative readings.
    pub readings: Vec<Entry>,
    /// Shorter words matched at the same offset.
    pub children: Vec<Entry>,
}

type WordPair = (String, String);

fn pair_of(entry: &Entry) -> WordPair {
    (entry.traditional.clone(), entry.simplified.clone())
}

/// Merge chains, given in ascending offset order, into deduplicated
/// definitions.
///
/// - A primary whose word pair was already emitted as a primary is dropped
///   together with its alternates.
/// - Alternates sharing the primary's pair become `readings`.
/// - Any other alternate becomes a child unless its pair was already
///   attached as a child of this or an earlier definition.
pub fn build_definitions<I>(chains: I) -> Vec<Definition>
where
    I: IntoIterator<Item = MatchChain>,
{
    let mut emitted: AHashSet<WordPair> = AHashSet::new();
    let mut attached: AHashSet<WordPair> = AHashSet::new();
    let mut defs = Vec::new();

    for chain in chains {
        let mut alternates: Vec<Entry> = chain.into_iter().flat_map(|m| m.entries).collect();
        let Some(primary) = alternates.pop() else {
            continue;
        };
        if !emitted.insert(pair_of(&primary)) {
            continue;
        }

        let mut readings = Vec::new();
        let mut children = Vec::new();
        for alt in alternates {
            if alt.word_pair() == primary.word_pair() {
                readings.push(alt);
            } else if attached.insert(pair_of(&alt)) {
                children.push(alt);
            }
        }

        defs.push(Definition {
            primary,
            readings,
            children,
        });
    }

    defs
}
