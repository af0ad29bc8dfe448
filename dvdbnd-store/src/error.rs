//! Error types for data store operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading a data store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Read beyond the end of the store.
    #[error("read beyond store bounds: offset={offset}, len={len}, size={size}")]
    OutOfRange {
        /// Requested start offset.
        offset: u64,
        /// Requested length.
        len: usize,
        /// Total store size.
        size: u64,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
