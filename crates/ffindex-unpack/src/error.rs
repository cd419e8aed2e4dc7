//! Error types for unpacking.
//!
//! Errors are split by how far they reach: [`BatchError`] abandons a single
//! batch and the run continues, [`UnpackError`] ends the run.

use ffindex_format::FormatError;
use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid unpack configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The batch count must be at least one.
    #[error("Number of batches must be at least 1")]
    ZeroBatches,

    /// The output directory is missing or not a directory.
    #[error("Invalid output directory {path}: {reason}")]
    OutputDir {
        /// Offending path
        path: PathBuf,
        /// Why it cannot be used
        reason: String,
    },
}

/// Failure of one batch. The batch is skipped; later batches still run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Creating, writing or persisting the batch file failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Batch file being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The concatenation buffer could not grow to the batch's size.
    #[error("Failed to allocate {requested} bytes for batch {ordinal}: {source}")]
    Allocation {
        /// Batch ordinal
        ordinal: usize,
        /// Bytes requested
        requested: u64,
        /// Allocator error
        #[source]
        source: TryReserveError,
    },

    /// The batch names positions past the end of the index.
    #[error("Batch {ordinal} ends at entry {end} but the index has {index_len} entries")]
    RangeOutsideIndex {
        /// Batch ordinal
        ordinal: usize,
        /// Exclusive end position of the batch
        end: usize,
        /// Number of index entries
        index_len: usize,
    },

    /// An entry of the batch could not be read from the data file.
    #[error("Failed to read entry: {0}")]
    Format(#[from] FormatError),
}

/// Fatal errors that stop an unpack run.
#[derive(Debug, Error)]
pub enum UnpackError {
    /// The data or index file could not be loaded.
    #[error("Load error: {0}")]
    Format(#[from] FormatError),

    /// The configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::ZeroBatches.to_string(),
            "Number of batches must be at least 1"
        );

        let err = ConfigError::OutputDir {
            path: PathBuf::from("/nope"),
            reason: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid output directory /nope: not found");
    }

    #[test]
    fn test_unpack_error_conversion() {
        let err: UnpackError = ConfigError::ZeroBatches.into();
        assert!(err.to_string().starts_with("Configuration error:"));

        let err: UnpackError = FormatError::Parse {
            line: 3,
            reason: "expected 3 fields, found 1".to_string(),
        }
        .into();
        assert!(err.to_string().contains("Invalid index line 3"));
    }
}
