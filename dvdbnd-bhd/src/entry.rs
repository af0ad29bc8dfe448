//! Entry records and their key/hash side records.

use dvdbnd_crypto::EncryptedRange;

/// One archived file's metadata record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Filename hash; 32-bit schemas are zero-extended.
    pub file_name_hash: u64,
    /// Payload offset in the paired data file.
    pub file_offset: u64,
    /// Logical payload size in bytes.
    pub file_size: u64,
    /// Block-aligned size on disk.
    pub padded_file_size: u64,
    /// Per-entry AES key material, when the payload is encrypted.
    pub aes_key: Option<EntryKey>,
    /// Optional post-decryption verification material.
    pub salted_hash: Option<SaltedHash>,
}

impl Entry {
    /// Whether the payload needs per-entry decryption.
    pub fn is_encrypted(&self) -> bool {
        self.aes_key.is_some()
    }
}

/// Per-entry AES key record.
///
/// When `ranges` is non-empty, only those byte spans of the padded payload
/// are ciphertext; everything outside passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey {
    /// AES-128 key.
    pub key: [u8; 16],
    /// Record version tag (1 or 3).
    pub version: u32,
    /// Encrypted byte spans within the padded payload.
    pub ranges: Vec<EncryptedRange>,
}

/// Salted integrity hash record.
///
/// Carried for optional verification after decryption; extraction does not
/// depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedHash {
    /// 32-byte salted hash.
    pub hash: [u8; 32],
    /// Record version tag (1 or 3).
    pub version: u32,
}
