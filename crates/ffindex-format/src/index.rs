//! Text index parsing
//!
//! An FFindex index file holds one entry per line:
//!
//! ```text
//! name<TAB>offset<TAB>length
//! ```
//!
//! `offset` and `length` are decimal byte counts into the data file and
//! `length` includes the record's terminator byte. Line order is preserved;
//! it is the order records are unpacked in.

use crate::entry::Entry;
use crate::error::{FormatError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// How malformed index lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Stop at the first malformed line and report it.
    #[default]
    Strict,
    /// Log and skip malformed lines.
    Lenient,
}

/// Ordered collection of entries parsed from an index file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<Entry>,
    skipped_lines: usize,
}

/// Count newline-terminated lines in the index file at `path`.
///
/// Only newline bytes are counted; nothing is parsed. The result is meant for
/// pre-sizing storage before [`Index::parse_file`].
pub fn count_entries(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FormatError::io(path, e))?;
    count_lines(BufReader::new(file)).map_err(|e| FormatError::io(path, e))
}

fn count_lines<R: BufRead>(mut reader: R) -> std::io::Result<usize> {
    let mut count = 0;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(count);
        }
        count += buf.iter().filter(|&&b| b == b'\n').count();
        let consumed = buf.len();
        reader.consume(consumed);
    }
}

impl Index {
    /// Build an index from already parsed entries.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            skipped_lines: 0,
        }
    }

    /// Parse the index file at `path`.
    ///
    /// `expected_count` only pre-sizes storage; the result holds however many
    /// lines were parsed.
    pub fn parse_file(path: impl AsRef<Path>, expected_count: usize, mode: ParseMode) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FormatError::io(path, e))?;

        Self::parse(file, expected_count, mode).map_err(|e| match e {
            FormatError::Io { source, .. } => FormatError::io(path, source),
            other => other,
        })
    }

    /// Parse index lines from a reader.
    ///
    /// Lines end at `\n`; a trailing `\r` is dropped. A line that is not
    /// valid UTF-8 is malformed like any other and follows `mode`.
    pub fn parse<R: Read>(reader: R, expected_count: usize, mode: ParseMode) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut entries = Vec::with_capacity(expected_count);
        let mut skipped_lines = 0;
        let mut line_number = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| FormatError::io("<index>", e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let line = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            let parsed = match std::str::from_utf8(line) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => Entry::parse_line(text),
                Err(e) => Err(format!("invalid UTF-8 at byte {}", e.valid_up_to())),
            };

            match parsed {
                Ok(entry) => entries.push(entry),
                Err(reason) => match mode {
                    ParseMode::Strict => return Err(FormatError::parse(line_number, reason)),
                    ParseMode::Lenient => {
                        warn!("Skipping index line {}: {}", line_number, reason);
                        skipped_lines += 1;
                    }
                },
            }
        }

        debug!(
            "Parsed {} index entries ({} skipped, {} expected)",
            entries.len(),
            skipped_lines,
            expected_count
        );

        Ok(Self {
            entries,
            skipped_lines,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at position `i` in file order.
    pub fn get(&self, i: usize) -> Option<&Entry> {
        self.entries.get(i)
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterate entries in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// First entry called `name`.
    pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Lines dropped in [`ParseMode::Lenient`].
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Sum of extracted lengths over all entries.
    pub fn total_content_len(&self) -> u64 {
        self.entries.iter().map(Entry::content_len).sum()
    }

    /// Check that every entry lies inside a data region of `data_size` bytes.
    pub fn check_bounds(&self, data_size: u64) -> Result<()> {
        match self.entries.iter().find(|e| !e.fits_within(data_size)) {
            Some(entry) => Err(FormatError::EntryOutOfBounds {
                name: entry.name.clone(),
                offset: entry.offset,
                length: entry.length,
                data_size,
            }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
