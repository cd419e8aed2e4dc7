//! ffindex-unpack binary entry point.
//!
//! Parses arguments, initializes logging and runs [`ffindex_unpack::unpack`].
//! Loading and configuration errors exit non-zero; batches that could not be
//! written are logged and the run still succeeds.

use anyhow::{Context, Result};
use ffindex_unpack::{UnpackConfig, unpack};
use tracing::{Level, warn};

fn main() -> Result<()> {
    let config = UnpackConfig::from_args();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(config.log_level))
        .with_target(false)
        .init();

    let report = unpack(&config).with_context(|| {
        format!(
            "Failed to unpack {} with index {}",
            config.data.display(),
            config.index.display()
        )
    })?;

    if !report.is_complete() {
        warn!(
            "{} batches could not be written: {:?}",
            report.failures.len(),
            report
                .failures
                .iter()
                .map(|f| f.ordinal)
                .collect::<Vec<_>>()
        );
    }

    Ok(())
}
