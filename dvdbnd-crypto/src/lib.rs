//! Cryptographic operations for the BHD/BDT archive family.
//!
//! This crate provides the primitives needed to open the encrypted archive
//! index files and their entry payloads:
//!
//! - **Asymmetric**: RSA public-key opening of index streams (the build
//!   tooling encrypts with the private key as obfuscation)
//! - **Symmetric**: AES-128 in ECB (optionally range-limited), CBC and CTR,
//!   plus the derived-nonce construction used by the rules blob
//! - **Key management**: per-file-name key registry loaded once at startup
//!
//! All decrypt operations are pure functions over byte buffers; nothing is
//! cached between calls.
//!
//! # Examples
//!
//! ```
//! use dvdbnd_crypto::KeyRegistry;
//!
//! let mut registry = KeyRegistry::new();
//! registry.insert_symmetric("enc_regulation.bnd.dcx", [0u8; 16]);
//! assert!(registry.symmetric_key("ENC_REGULATION.BND.DCX").is_some());
//! ```

#![warn(missing_docs)]

pub mod asymmetric;
pub mod error;
pub mod registry;
pub mod symmetric;

pub use error::CryptoError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CryptoError>;

// Re-export commonly used items
pub use asymmetric::{load_public_key_pem, open_index};
pub use registry::{KeyRegistry, parse_key_hex};
pub use rsa::RsaPublicKey;
pub use symmetric::{
    BLOCK_SIZE, EncryptedRange, decrypt_cbc, decrypt_ctr, decrypt_ecb, decrypt_iv_prefixed_cbc,
    decrypt_rules_blob, derive_rules_nonce,
};
