//! In-memory data store chunked into fixed-size segments.

use tracing::trace;

use crate::{Result, StoreError};

/// Segment width in bytes.
///
/// The historical host stream type backing this format cannot reliably
/// address a single buffer larger than ~2 GiB, so payload storage is modeled
/// as a run of fixed segments. Callers never see the seams.
pub const SEGMENT_SIZE: usize = 10_000_000;

/// Fixed-length in-memory store over a sequence of fixed-size segments.
///
/// Used for building archive payloads in memory and as the test double for
/// the file-backed store; reads that cross a segment boundary are stitched
/// together transparently.
#[derive(Debug, Clone)]
pub struct SegmentedBuffer {
    segments: Vec<Vec<u8>>,
    len: u64,
}

impl SegmentedBuffer {
    /// Create a zero-filled store of `len` bytes.
    pub fn with_len(len: u64) -> Self {
        let mut segments = Vec::new();
        let mut remaining = len as usize;
        while remaining > 0 {
            let take = remaining.min(SEGMENT_SIZE);
            segments.push(vec![0u8; take]);
            remaining -= take;
        }

        trace!("Allocated {} segments for {} bytes", segments.len(), len);
        Self { segments, len }
    }

    /// Build a store holding a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut store = Self::with_len(data.len() as u64);
        // Fresh store, bounds hold by construction.
        let _ = store.write_at(0, data);
        store
    }

    /// Total length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of backing segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.check_bounds(offset, len)?;

        let mut out = Vec::with_capacity(len);
        let mut pos = offset as usize;
        let mut remaining = len;
        while remaining > 0 {
            let segment = &self.segments[pos / SEGMENT_SIZE];
            let start = pos % SEGMENT_SIZE;
            let take = remaining.min(segment.len() - start);
            out.extend_from_slice(&segment[start..start + take]);
            pos += take;
            remaining -= take;
        }

        Ok(out)
    }

    /// Write `data` starting at `offset`. The store does not grow.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        self.check_bounds(offset, data.len())?;

        let mut pos = offset as usize;
        let mut data = data;
        while !data.is_empty() {
            let segment = &mut self.segments[pos / SEGMENT_SIZE];
            let start = pos % SEGMENT_SIZE;
            let take = data.len().min(segment.len() - start);
            segment[start..start + take].copy_from_slice(&data[..take]);
            pos += take;
            data = &data[take..];
        }

        Ok(())
    }

    fn check_bounds(&self, offset: u64, len: usize) -> Result<()> {
        if offset + len as u64 > self.len {
            return Err(StoreError::OutOfRange {
                offset,
                len,
                size: self.len,
            });
        }
        Ok(())
    }
}
