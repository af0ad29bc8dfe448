//! Filename hashing and hash-to-path resolution for BHD/BDT archives.
//!
//! Archive indices identify files by hash only. This crate holds the pieces
//! needed to turn hashes back into paths:
//!
//! - [`hash`]: the per-title polynomial path hash
//! - [`dictionary`]: collision-aware reverse index built from an offline
//!   path corpus
//! - [`hashlist`]: persisted target sets for the brute-force engine
//!
//! # Examples
//!
//! ```
//! use dvdbnd_names::{GameVersion, hash_path};
//!
//! // Case and separator style do not matter.
//! assert_eq!(
//!     hash_path("/chr/C0000.anibnd", GameVersion::DarkSouls),
//!     hash_path("\\CHR\\c0000.ANIBND", GameVersion::DarkSouls),
//! );
//! ```

#![warn(missing_docs)]

pub mod dictionary;
pub mod error;
pub mod hash;
pub mod hashlist;
pub mod version;

pub use error::{NameError, Result};

// Re-export commonly used items
pub use dictionary::{NameDictionary, Resolution, synthetic_name, to_host_path};
pub use hash::{hash_path, normalize};
pub use hashlist::{load_hash_list, save_hash_list};
pub use version::GameVersion;
