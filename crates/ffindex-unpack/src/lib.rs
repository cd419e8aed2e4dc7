//! Unpack FFindex archives into batch files.
//!
//! The entries of an archive, in index order, are split into a fixed number
//! of contiguous batches. Each batch's entries are concatenated, without their
//! terminator bytes, into one file named `<ordinal>.txt`.
//!
//! # Architecture
//!
//! - `plan`: pure partitioning of the entry sequence into batch ranges
//! - `extract`: builds and writes one batch at a time
//! - `config`: command-line and environment configuration
//! - `error`: per-batch and fatal error types
//!
//! # Example
//!
//! ```no_run
//! use ffindex_unpack::{UnpackConfig, unpack};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = UnpackConfig::new("db.ffdata", "db.ffindex", "out").with_batches(16);
//!     let report = unpack(&config)?;
//!     println!("{} batch files written", report.batches_written);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod extract;
pub mod plan;

pub use config::{LogLevel, UnpackConfig};
pub use error::{BatchError, ConfigError, UnpackError};
pub use extract::{BatchFailure, ExtractReport, Extractor};
pub use plan::{BatchPlan, BatchRange, DEFAULT_NUM_BATCHES};

use ffindex_format::{Index, MappedData, count_entries};
use tracing::{info, warn};

/// Run a complete unpack described by `config`.
///
/// Loading the data and index files, bounds checking and configuration
/// problems are fatal. Failures of individual batches are recorded in the
/// returned report and do not stop the run.
pub fn unpack(config: &UnpackConfig) -> Result<ExtractReport, UnpackError> {
    config.validate()?;

    let data = MappedData::open(&config.data)?;
    let expected = count_entries(&config.index)?;
    let index = Index::parse_file(&config.index, expected, config.parse_mode())?;

    if index.skipped_lines() > 0 {
        warn!(
            "Skipped {} malformed lines in {}",
            index.skipped_lines(),
            config.index.display()
        );
    }
    index.check_bounds(data.len())?;

    info!(
        "Loaded {} entries from {} over {} bytes of data",
        index.len(),
        config.index.display(),
        data.len()
    );

    let plan = BatchPlan::new(index.len(), config.batches)?;
    Ok(Extractor::new(&data, &index, &config.out_dir).run(&plan))
}
