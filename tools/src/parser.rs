//! CC-CEDICT text parser.
//!
//! Each non-comment line has the shape
//!
//! ```text
//! 中國 中国 [Zhong1 guo2] /China/Middle Kingdom/
//! ```
//!
//! i.e. traditional, simplified, bracketed pinyin and a slash-delimited gloss
//! list. Lines starting with `#` are header comments. Input must already be
//! decompressed text.
use anyhow::{bail, Context, Result};
use cedict_core::Entry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s(\S+)\s\[([^\]]+)\]\s/(.+)/$").expect("CC-CEDICT line pattern")
});

/// Parse a single dictionary line.
pub fn parse_line(line: &str) -> Result<Entry> {
    let Some(caps) = LINE.captures(line) else {
        bail!("could not parse line '{}'", line);
    };
    Ok(Entry::new(
        &caps[1],
        &caps[2],
        &caps[3],
        caps[4].split('/'),
    ))
}

/// Lazily parses entries from a line-oriented reader, one line at a time.
///
/// Both `\n` and `\r\n` line endings are accepted. Comment and blank lines
/// are skipped; a malformed line is reported with its 1-based line number.
pub struct EntryReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl EntryReader<BufReader<File>> {
    /// Open a plain-text dump on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        if p.extension().is_some_and(|ext| ext == "gz") {
            bail!("{} is compressed; decompress it first (e.g. gunzip -k)", p.display());
        }
        let f = File::open(p).with_context(|| format!("opening dictionary file {}", p.display()))?;
        Ok(Self::new(BufReader::new(f)))
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e).context(format!("reading line {}", self.line_no))))
                }
            };
            // a stray '\r' can survive when the file mixes line endings
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = self.line_no;
            return Some(parse_line(line).with_context(|| format!("line {}", line_no)));
        }
    }
}
