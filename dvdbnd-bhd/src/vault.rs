//! A parsed index paired with its data store.

use tracing::{debug, warn};

use dvdbnd_crypto::decrypt_ecb;
use dvdbnd_store::DataStore;

use crate::Result;
use crate::entry::Entry;
use crate::index::VaultIndex;

/// An opened archive pair: index plus payload store.
pub struct Vault<S: DataStore> {
    index: VaultIndex,
    store: S,
}

/// Outcome of a bulk extraction pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Entries successfully produced.
    pub processed: usize,
    /// Entries skipped after a per-entry failure.
    pub failed: usize,
    /// Total payload bytes produced.
    pub bytes: u64,
}

impl<S: DataStore> Vault<S> {
    /// Pair a parsed index with a data store.
    pub fn new(index: VaultIndex, store: S) -> Self {
        Self { index, store }
    }

    /// The parsed index.
    pub fn index(&self) -> &VaultIndex {
        &self.index
    }

    /// Read and decrypt one entry's payload.
    ///
    /// Reads the padded span, applies range-limited ECB when the entry
    /// carries key material, and truncates to the logical size.
    pub fn read_entry(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let padded = self
            .store
            .read_at(entry.file_offset, entry.padded_file_size as usize)?;

        let mut data = match &entry.aes_key {
            Some(entry_key) => decrypt_ecb(&padded, &entry_key.key, &entry_key.ranges),
            None => padded,
        };

        data.truncate(entry.file_size as usize);
        Ok(data)
    }

    /// Produce every entry in on-disk order, skipping per-entry failures.
    ///
    /// Only whole-archive structural problems abort; a truncated or
    /// out-of-range entry is logged, counted and skipped so its siblings
    /// still extract.
    pub fn extract_all(&mut self, mut sink: impl FnMut(&Entry, Vec<u8>)) -> ExtractSummary {
        let entries: Vec<Entry> = self.index.entries().cloned().collect();
        let mut summary = ExtractSummary::default();

        for entry in &entries {
            match self.read_entry(entry) {
                Ok(data) => {
                    summary.processed += 1;
                    summary.bytes += data.len() as u64;
                    sink(entry, data);
                }
                Err(e) => {
                    warn!(
                        "Skipping entry {:016x} at {:#x}: {}",
                        entry.file_name_hash, entry.file_offset, e
                    );
                    summary.failed += 1;
                }
            }
        }

        debug!(
            "Extraction pass: {} produced, {} failed, {} bytes",
            summary.processed, summary.failed, summary.bytes
        );
        summary
    }
}

impl<S: DataStore> Vault<S> {
    /// Validate that an entry's padded span lies inside the store.
    pub fn entry_in_bounds(&self, entry: &Entry) -> bool {
        entry.file_offset + entry.padded_file_size <= self.store.len()
    }
}
