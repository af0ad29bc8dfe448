//! Error types for dvdbnd-crypto operations.

use thiserror::Error;

/// Errors that can occur during crypto operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A PEM blob could not be parsed as an RSA public key.
    #[error("invalid public key PEM: {0}")]
    InvalidPem(String),

    /// A ciphertext block does not decrypt to a value the framing allows.
    #[error("ciphertext block {0} out of range for the key modulus")]
    InvalidBlock(usize),

    /// Invalid key size.
    #[error("invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Required key width in bytes.
        expected: usize,
        /// Width actually supplied.
        actual: usize,
    },

    /// Buffer is not a whole number of cipher blocks.
    #[error("data length {0} is not block-aligned")]
    UnalignedData(usize),

    /// Buffer too short to carry its IV prefix.
    #[error("truncated data: expected at least {expected} bytes, got {actual}")]
    TruncatedData {
        /// Minimum bytes the layout requires.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Invalid key file format.
    #[error("invalid key file format: {0}")]
    InvalidKeyFile(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
