//! Tooling around cedict-core: the CC-CEDICT text parser and result
//! rendering used by the `cedict` binary.
pub mod parser;
pub use parser::{parse_line, EntryReader};

pub mod render;
pub use render::{format_definition, format_entry};
