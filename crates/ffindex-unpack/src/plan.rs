//! Partitioning of the entry sequence into batches.
//!
//! The batch size is `n_entries / num_batches`, truncated. Batches are taken
//! in strides of that size from the start of the index, so the last batch
//! holds the remainder and the number of batches is
//! `ceil(n_entries / batch_size)`. When the division is not exact this is
//! more than `num_batches` (999 entries over 500 batches gives 999 batches of
//! one entry).

use crate::error::ConfigError;
use std::ops::Range;
use tracing::warn;

/// Batch count used when none is configured.
pub const DEFAULT_NUM_BATCHES: usize = 500;

/// File name written for batch `ordinal`.
pub fn batch_file_name(ordinal: usize) -> String {
    format!("{ordinal}.txt")
}

/// Contiguous run of index positions written to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRange {
    /// Batch number, also the output file stem
    pub ordinal: usize,
    /// First entry position (inclusive)
    pub start: usize,
    /// Last entry position (exclusive)
    pub end: usize,
}

impl BatchRange {
    /// Number of entries in the batch.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Entry positions as a range.
    pub fn entries(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Output file name, `<ordinal>.txt`.
    pub fn file_name(&self) -> String {
        batch_file_name(self.ordinal)
    }
}

/// Partition of `n_entries` entries into batches of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    num_entries: usize,
    requested_batches: usize,
    batch_size: usize,
}

impl BatchPlan {
    /// Plan `num_entries` entries over `num_batches` batches.
    ///
    /// When there are fewer entries than batches the size is clamped to one
    /// entry per batch.
    pub fn new(num_entries: usize, num_batches: usize) -> Result<Self, ConfigError> {
        if num_batches == 0 {
            return Err(ConfigError::ZeroBatches);
        }

        let mut batch_size = num_entries / num_batches;
        if batch_size == 0 && num_entries > 0 {
            warn!(
                "{} entries is fewer than {} batches, writing one entry per batch",
                num_entries, num_batches
            );
            batch_size = 1;
        }

        Ok(Self {
            num_entries,
            requested_batches: num_batches,
            batch_size,
        })
    }

    /// Number of entries being partitioned.
    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    /// Batch count the plan was created with.
    pub fn requested_batches(&self) -> usize {
        self.requested_batches
    }

    /// Entries per batch (the last batch may hold fewer). Zero only for an
    /// empty index.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches the plan yields.
    pub fn len(&self) -> usize {
        if self.batch_size == 0 {
            0
        } else {
            self.num_entries.div_ceil(self.batch_size)
        }
    }

    /// Whether the plan yields no batches.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Batch `ordinal`, if it exists.
    pub fn batch(&self, ordinal: usize) -> Option<BatchRange> {
        if ordinal >= self.len() {
            return None;
        }
        let start = ordinal * self.batch_size;
        Some(BatchRange {
            ordinal,
            start,
            end: (start + self.batch_size).min(self.num_entries),
        })
    }

    /// Batches in order.
    pub fn iter(&self) -> impl Iterator<Item = BatchRange> + '_ {
        (0..self.len()).filter_map(|ordinal| self.batch(ordinal))
    }
}
