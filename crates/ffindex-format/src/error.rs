//! Error types for FFindex loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised while opening, mapping or parsing an FFindex archive.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A data or index file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The data file was opened but could not be memory-mapped.
    #[error("Failed to memory-map {path}: {source}")]
    Map {
        /// File that failed to map
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line of the index file is structurally invalid.
    #[error("Invalid index line {line}: {reason}")]
    Parse {
        /// 1-based line number in the index file
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// An index entry points past the end of the data file.
    #[error(
        "Entry '{name}' is out of bounds: offset={offset}, length={length}, data size={data_size}"
    )]
    EntryOutOfBounds {
        /// Entry name
        name: String,
        /// Entry offset
        offset: u64,
        /// Entry length, terminator included
        length: u64,
        /// Size of the mapped data
        data_size: u64,
    },

    /// A raw read reaches past the end of the mapped data.
    #[error("Read beyond data bounds: offset={offset}, length={length}, data size={data_size}")]
    OutOfBounds {
        /// Requested offset
        offset: u64,
        /// Requested length
        length: u64,
        /// Size of the mapped data
        data_size: u64,
    },
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = FormatError::parse(7, "expected 3 fields, found 2");
        assert_eq!(
            err.to_string(),
            "Invalid index line 7: expected 3 fields, found 2"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = FormatError::io(
            "missing.ffdata",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("missing.ffdata"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
