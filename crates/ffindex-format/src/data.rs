//! Memory-mapped access to the FFindex data file

use crate::entry::Entry;
use crate::error::{FormatError, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only view of a data file's contents.
///
/// The mapping lives as long as this value. Empty files are never mapped
/// and expose an empty slice.
pub struct MappedData {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl MappedData {
    /// Open `path` and map its full contents read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FormatError::io(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| FormatError::io(path, e))?
            .len();

        let mmap = if size == 0 {
            None
        } else {
            // The data file is treated as immutable for the lifetime of the run.
            #[allow(unsafe_code)]
            let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| {
                FormatError::Map {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            Some(mmap)
        };

        debug!("Mapped data file {} ({} bytes)", path.display(), size);

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Path the data was mapped from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the mapped region in bytes.
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Whether the data file was empty.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Whole mapped region.
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }

    /// Bounds-checked view of `length` bytes starting at `offset`.
    pub fn slice(&self, offset: u64, length: u64) -> Result<&[u8]> {
        let out_of_bounds = || FormatError::OutOfBounds {
            offset,
            length,
            data_size: self.len(),
        };

        let end = offset.checked_add(length).ok_or_else(out_of_bounds)?;
        if end > self.len() {
            return Err(out_of_bounds());
        }

        Ok(&self.as_bytes()[offset as usize..end as usize])
    }

    /// Bytes of `entry` with its trailing terminator removed.
    pub fn entry_content(&self, entry: &Entry) -> Result<&[u8]> {
        if !entry.fits_within(self.len()) {
            return Err(FormatError::EntryOutOfBounds {
                name: entry.name.clone(),
                offset: entry.offset,
                length: entry.length,
                data_size: self.len(),
            });
        }
        self.slice(entry.offset, entry.content_len())
    }

    /// Tell the kernel the region will be read front to back.
    #[cfg(unix)]
    pub fn advise_sequential(&self) {
        use memmap2::Advice;

        if let Some(ref mmap) = self.mmap
            && let Err(e) = mmap.advise(Advice::Sequential)
        {
            debug!(
                "madvise(SEQUENTIAL) failed for {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Tell the kernel the region will be read front to back.
    #[cfg(not(unix))]
    pub fn advise_sequential(&self) {}
}

impl std::fmt::Debug for MappedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedData")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}
