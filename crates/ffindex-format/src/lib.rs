//! Reader for FFindex archives.
//!
//! An FFindex archive is a pair of files: a flat data file holding records
//! back to back, each followed by a single terminator byte, and a text index
//! naming every record's offset and stored length. This crate maps the data
//! file and parses the index; it does not build archives.
//!
//! # Example
//!
//! ```no_run
//! use ffindex_format::{Index, MappedData, ParseMode, count_entries};
//!
//! # fn main() -> ffindex_format::Result<()> {
//! let data = MappedData::open("db.ffdata")?;
//! let expected = count_entries("db.ffindex")?;
//! let index = Index::parse_file("db.ffindex", expected, ParseMode::Strict)?;
//! index.check_bounds(data.len())?;
//!
//! for entry in &index {
//!     let content = data.entry_content(entry)?;
//!     println!("{}: {} bytes", entry.name, content.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod data;
pub mod entry;
pub mod error;
pub mod index;

pub use data::MappedData;
pub use entry::Entry;
pub use error::{FormatError, Result};
pub use index::{Index, ParseMode, count_entries};
