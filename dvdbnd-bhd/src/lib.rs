//! Reader for the encrypted, hash-indexed BHD/BDT archive pairs.
//!
//! An archive is two files: a small RSA-encrypted index (`.bhd`/`.bhd5`)
//! holding a bucketed directory of entry records, and a large data file
//! (`.bdt`) holding the payload bytes those records point at. Entries may
//! carry their own AES key (optionally limited to byte ranges of the
//! payload) and a salted integrity hash.
//!
//! Opening an archive:
//!
//! 1. look the archive's public key up in the
//!    [`KeyRegistry`](dvdbnd_crypto::KeyRegistry) and RSA-open the index,
//! 2. parse header, bucket directory, entries and side records
//!    ([`VaultIndex`]),
//! 3. pair the index with a [`DataStore`](dvdbnd_store::DataStore) over the
//!    data file ([`Vault`]) and read entries out.
//!
//! Schema differences between titles are isolated behind
//! [`EntryCodec`](codec::EntryCodec) implementations selected once per
//! archive via [`GameVersion`](dvdbnd_names::GameVersion).

#![warn(missing_docs)]

pub mod codec;
pub mod decompress;
pub mod entry;
pub mod error;
pub mod index;
mod ioutils;
pub mod vault;

pub use error::{BhdError, Result};

// Re-export commonly used items
pub use decompress::inflate;
pub use entry::{Entry, EntryKey, SaltedHash};
pub use index::{Bucket, SIGNATURE, VaultIndex};
pub use vault::{ExtractSummary, Vault};
