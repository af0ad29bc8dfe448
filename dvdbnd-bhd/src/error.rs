//! Error types for index and archive operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading an archive pair.
#[derive(Error, Debug)]
pub enum BhdError {
    /// The index does not start with the expected signature.
    #[error("bad index signature: expected \"BHD5\", got {0:?}")]
    BadSignature([u8; 4]),

    /// A key or salted-hash record carries an unknown version tag.
    #[error("unsupported side-record version: {0}")]
    UnsupportedVersion(u32),

    /// No asymmetric key registered for this archive file name.
    #[error("no decryption key registered for archive: {0}")]
    MissingKey(String),

    /// Decompression produced nothing usable.
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// Crypto error.
    #[error(transparent)]
    Crypto(#[from] dvdbnd_crypto::CryptoError),

    /// Data store error (out-of-range entry reads land here).
    #[error(transparent)]
    Store(#[from] dvdbnd_store::StoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BhdError>;
