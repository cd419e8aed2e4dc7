//! Batch extraction
//!
//! Each batch is assembled in a single buffer sized up front, written to a
//! temporary file in the output directory and renamed over `<ordinal>.txt`.
//! A batch that fails leaves no file behind and does not stop the run.

use crate::error::BatchError;
use crate::plan::{BatchPlan, BatchRange};
use ffindex_format::{Entry, Index, MappedData};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info, warn};

/// A batch that was abandoned.
#[derive(Debug)]
pub struct BatchFailure {
    /// Batch ordinal
    pub ordinal: usize,
    /// What went wrong
    pub error: BatchError,
}

/// Outcome of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Batch files written
    pub batches_written: usize,
    /// Entries contained in the written batches
    pub entries_written: usize,
    /// Bytes contained in the written batches
    pub bytes_written: u64,
    /// Batches that were skipped
    pub failures: Vec<BatchFailure>,
}

impl ExtractReport {
    /// Whether every planned batch was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes the batches of a [`BatchPlan`] into an output directory.
pub struct Extractor<'a> {
    data: &'a MappedData,
    index: &'a Index,
    out_dir: PathBuf,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over mapped data and its index.
    pub fn new(data: &'a MappedData, index: &'a Index, out_dir: impl AsRef<Path>) -> Self {
        Self {
            data,
            index,
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory batch files are written to.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of the file for `batch`.
    pub fn batch_path(&self, batch: &BatchRange) -> PathBuf {
        self.out_dir.join(batch.file_name())
    }

    /// Write every batch of `plan`, one at a time, in order.
    pub fn run(&self, plan: &BatchPlan) -> ExtractReport {
        info!(
            "{} entries, in {} batches, batch_size: {}",
            plan.num_entries(),
            plan.requested_batches(),
            plan.batch_size()
        );

        self.data.advise_sequential();

        let mut report = ExtractReport::default();
        for batch in plan.iter() {
            info!("{}, from {} to {}", batch.ordinal, batch.start, batch.end);

            match self.extract_batch(&batch) {
                Ok(written) => {
                    info!("{}, written: {}", batch.ordinal, written);
                    report.batches_written += 1;
                    report.entries_written += batch.len();
                    report.bytes_written += written;
                }
                Err(error) => {
                    warn!("Skipping batch {}: {}", batch.ordinal, error);
                    report.failures.push(BatchFailure {
                        ordinal: batch.ordinal,
                        error,
                    });
                }
            }
        }

        info!(
            "Wrote {} of {} batches ({} entries, {} bytes)",
            report.batches_written,
            plan.len(),
            report.entries_written,
            report.bytes_written
        );
        report
    }

    /// Build and write one batch, returning the number of bytes written.
    pub fn extract_batch(&self, batch: &BatchRange) -> Result<u64, BatchError> {
        let content = self.build_batch(batch)?;
        let path = self.batch_path(batch);
        self.write_batch(&path, &content)?;
        Ok(content.len() as u64)
    }

    /// Concatenate the contents of the batch's entries, terminators removed.
    pub fn build_batch(&self, batch: &BatchRange) -> Result<Vec<u8>, BatchError> {
        let entries = self.index.entries().get(batch.entries()).ok_or(
            BatchError::RangeOutsideIndex {
                ordinal: batch.ordinal,
                end: batch.end,
                index_len: self.index.len(),
            },
        )?;

        let requested: u64 = entries.iter().map(Entry::content_len).sum();
        let mut content = Vec::new();
        // A size beyond the address space saturates and fails the reserve.
        content
            .try_reserve_exact(usize::try_from(requested).unwrap_or(usize::MAX))
            .map_err(|source| BatchError::Allocation {
                ordinal: batch.ordinal,
                requested,
                source,
            })?;

        for entry in entries {
            content.extend_from_slice(self.data.entry_content(entry)?);
        }

        debug!(
            "Batch {}: {} entries, {} bytes",
            batch.ordinal,
            entries.len(),
            content.len()
        );
        Ok(content)
    }

    fn write_batch(&self, path: &Path, content: &[u8]) -> Result<(), BatchError> {
        let io_error = |source: std::io::Error| BatchError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = temp_file_builder()
            .tempfile_in(&self.out_dir)
            .map_err(io_error)?;
        file.write_all(content).map_err(io_error)?;
        file.flush().map_err(io_error)?;
        file.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

/// Batch files get mode 0666 minus the umask, the same as any newly created
/// file, rather than tempfile's owner-only 0600.
#[cfg(unix)]
fn temp_file_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> Builder<'static, 'static> {
    Builder::new()
}
