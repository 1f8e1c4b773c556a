//! Plain-text rendering of lookup results.
use cedict_core::{Definition, Entry};
use std::fmt::Write;

/// `中國 中国 [Zhong1 guo2] China; Middle Kingdom`
pub fn format_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push_str(&entry.traditional);
    if entry.simplified != entry.traditional {
        out.push(' ');
        out.push_str(&entry.simplified);
    }
    let _ = write!(out, " [{}] {}", entry.pronunciation, entry.glosses.join("; "));
    out
}

/// Primary line, then readings and children indented underneath.
pub fn format_definition(def: &Definition) -> String {
    let mut out = format_entry(&def.primary);
    for reading in &def.readings {
        let _ = write!(out, "\n  = {}", format_entry(reading));
    }
    for child in &def.children {
        let _ = write!(out, "\n  - {}", format_entry(child));
    }
    out
}
