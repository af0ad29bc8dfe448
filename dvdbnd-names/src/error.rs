//! Error types for name resolution operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while building dictionaries or hash lists.
#[derive(Error, Debug)]
pub enum NameError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A hash list file does not hold what its count field claims.
    #[error("invalid hash list: {0}")]
    InvalidHashList(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NameError>;
