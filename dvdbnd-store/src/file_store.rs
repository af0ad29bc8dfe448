//! File-backed data store with memory mapping support.

use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

use crate::{Result, StoreError};

/// Read-only store over a data file on disk.
///
/// Memory-maps the file when possible and falls back to seek+read for
/// very large files or when mapping fails. A single handle is not safe for
/// concurrent readers; multi-threaded consumers must serialize access or
/// open independent handles.
pub struct FileStore {
    /// Memory-mapped file (if available)
    mmap: Option<Mmap>,
    /// Regular file reader (fallback)
    file: Option<BufReader<File>>,
    /// Size of the data file
    size: u64,
}

impl FileStore {
    /// Open a data file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        debug!("Opening data file: {:?} (size: {} bytes)", path, size);

        // Limit mmap to 2GB files; the tail archives routinely exceed that.
        let mmap = if size > 0 && size < 2_147_483_648 {
            match unsafe { MmapOptions::new().map(&file) } {
                Ok(mmap) => Some(mmap),
                Err(e) => {
                    debug!("Failed to memory-map data file, using file reader: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let file = if mmap.is_none() {
            Some(BufReader::new(file))
        } else {
            None
        };

        Ok(Self { mmap, file, size })
    }

    /// Total length in bytes.
    pub fn len(&self) -> u64 {
        self.size
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether the fast memory-mapped path is active.
    pub fn is_memory_mapped(&self) -> bool {
        self.mmap.is_some()
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        if offset + len as u64 > self.size {
            return Err(StoreError::OutOfRange {
                offset,
                len,
                size: self.size,
            });
        }

        if let Some(ref mmap) = self.mmap {
            // Fast path: memory-mapped access
            Ok(mmap[offset as usize..offset as usize + len].to_vec())
        } else if let Some(ref mut file) = self.file {
            // Slow path: seek and read
            file.seek(SeekFrom::Start(offset))?;
            let mut buffer = vec![0u8; len];
            file.read_exact(&mut buffer)?;
            Ok(buffer)
        } else {
            // Empty file, len must be 0 here
            Ok(Vec::new())
        }
    }
}
