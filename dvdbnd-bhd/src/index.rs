//! Index file parsing.
//!
//! An index file is a bucket directory over entry records: a fixed header,
//! `bucket_count` directory pairs of `(entry_count, bucket_offset)`, and the
//! bucket payloads themselves, all interleaved in one stream. Parsing is a
//! single pass under exclusive stream ownership; every nested seek is
//! cursor-neutral.
//!
//! Shipped index files are RSA-encrypted; [`VaultIndex::open_encrypted`]
//! resolves the archive's public key from the registry and opens the stream
//! first.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, trace};

use dvdbnd_crypto::KeyRegistry;
use dvdbnd_names::GameVersion;

use crate::codec::codec_for;
use crate::entry::Entry;
use crate::ioutils::{ReadSeek, with_position};
use crate::{BhdError, Result};

/// Index file signature.
pub const SIGNATURE: [u8; 4] = *b"BHD5";

/// A directory page holding a subset of entries.
///
/// On-disk bucket order is preserved; it is not a hash order.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    /// Entries in on-disk order.
    pub entries: Vec<Entry>,
}

/// A parsed index file.
#[derive(Debug, Clone)]
pub struct VaultIndex {
    version: GameVersion,
    salt: String,
    buckets: Vec<Bucket>,
}

impl VaultIndex {
    /// Parse a plaintext index stream.
    pub fn open<R: ReadSeek>(reader: &mut R, version: GameVersion) -> Result<Self> {
        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        if signature != SIGNATURE {
            return Err(BhdError::BadSignature(signature));
        }

        let bucket_count = reader.read_u32::<LittleEndian>()?;
        let bucket_directory_offset = reader.read_u32::<LittleEndian>()?;

        // Part of the format (feeds the salted hashes), not needed to read.
        let salt_len = reader.read_u32::<LittleEndian>()?;
        let mut salt_bytes = vec![0u8; salt_len as usize];
        reader.read_exact(&mut salt_bytes)?;
        let salt = String::from_utf8_lossy(&salt_bytes).into_owned();

        debug!(
            "Index header: {} buckets at {:#x}, salt {:?}",
            bucket_count, bucket_directory_offset, salt
        );

        let codec = codec_for(version);
        let mut buckets = Vec::with_capacity(bucket_count as usize);

        reader.seek(SeekFrom::Start(u64::from(bucket_directory_offset)))?;
        for bucket_index in 0..bucket_count {
            let entry_count = reader.read_u32::<LittleEndian>()?;
            let bucket_offset = reader.read_u32::<LittleEndian>()?;

            trace!(
                "Bucket {}: {} entries at {:#x}",
                bucket_index, entry_count, bucket_offset
            );

            let entries = with_position(reader, u64::from(bucket_offset), |r| {
                let mut entries = Vec::with_capacity(entry_count as usize);
                for _ in 0..entry_count {
                    entries.push(codec.read_entry(r)?);
                }
                Ok(entries)
            })?;

            buckets.push(Bucket { entries });
        }

        debug!(
            "Parsed {} buckets, {} entries",
            buckets.len(),
            buckets.iter().map(|b| b.entries.len()).sum::<usize>()
        );

        Ok(Self {
            version,
            salt,
            buckets,
        })
    }

    /// Parse a plaintext index held in memory.
    pub fn from_bytes(data: &[u8], version: GameVersion) -> Result<Self> {
        Self::open(&mut Cursor::new(data), version)
    }

    /// Open an RSA-encrypted index.
    ///
    /// The public key PEM is looked up by archive file name; a missing
    /// registration fails the whole archive with [`BhdError::MissingKey`].
    pub fn open_encrypted(
        data: &[u8],
        archive_file_name: &str,
        registry: &KeyRegistry,
        version: GameVersion,
    ) -> Result<Self> {
        let pem = registry
            .asymmetric_key(archive_file_name)
            .ok_or_else(|| BhdError::MissingKey(archive_file_name.to_string()))?;

        let key = dvdbnd_crypto::load_public_key_pem(pem)?;
        let plaintext = dvdbnd_crypto::open_index(data, &key)?;
        Self::from_bytes(&plaintext, version)
    }

    /// The schema this index was parsed with.
    pub fn version(&self) -> GameVersion {
        self.version
    }

    /// The header salt string.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// All buckets, in on-disk order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// All entries, in on-disk bucket order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.buckets.iter().flat_map(|b| b.entries.iter())
    }

    /// Total entry count.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    /// Look an entry up by filename hash.
    ///
    /// Probes the `hash % bucket_count` bucket first, then falls back to a
    /// full scan: the modulus convention is the format's intended fast path
    /// but is not exercised by full extraction, so it is not trusted as the
    /// only route.
    pub fn find(&self, hash: u64) -> Option<&Entry> {
        if self.buckets.is_empty() {
            return None;
        }

        let probe = (hash % self.buckets.len() as u64) as usize;
        self.buckets[probe]
            .entries
            .iter()
            .find(|e| e.file_name_hash == hash)
            .or_else(|| self.entries().find(|e| e.file_name_hash == hash))
    }
}
