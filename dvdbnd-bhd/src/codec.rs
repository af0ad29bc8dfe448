//! Per-title entry record layouts.
//!
//! Field widths changed across titles, so decoding goes through one
//! [`EntryCodec`] implementation per schema, selected once per archive.
//! Side records (key, salted hash) are located by absolute offsets stored
//! in the entry and are read with the cursor saved and restored.

use byteorder::{LittleEndian, ReadBytesExt};
use dvdbnd_crypto::EncryptedRange;
use dvdbnd_names::GameVersion;
use std::io::Read;
use tracing::trace;

use crate::entry::{Entry, EntryKey, SaltedHash};
use crate::ioutils::{ReadSeek, with_position};
use crate::{BhdError, Result};

/// Decodes one entry record from the index stream.
pub trait EntryCodec: Sync {
    /// Read a single entry at the current cursor, following side-record
    /// offsets (cursor-neutral) where the schema has them.
    fn read_entry(&self, reader: &mut dyn ReadSeek) -> Result<Entry>;
}

/// Pick the codec for a title.
pub fn codec_for(version: GameVersion) -> &'static dyn EntryCodec {
    match version {
        GameVersion::DarkSouls => &DarkSoulsCodec,
        GameVersion::DarkSouls2 => &DarkSouls2Codec,
        GameVersion::DarkSouls3 | GameVersion::Sekiro => &ModernCodec { wide_hash: false },
        GameVersion::EldenRing => &ModernCodec { wide_hash: true },
    }
}

/// Dark Souls: 32-bit hash, explicit size, no side records.
struct DarkSoulsCodec;

impl EntryCodec for DarkSoulsCodec {
    fn read_entry(&self, reader: &mut dyn ReadSeek) -> Result<Entry> {
        let file_name_hash = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_size = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_offset = reader.read_u64::<LittleEndian>()?;

        Ok(Entry {
            file_name_hash,
            file_offset,
            file_size,
            padded_file_size: file_size,
            aes_key: None,
            salted_hash: None,
        })
    }
}

/// Dark Souls II: as Dark Souls, plus a salted-hash side record.
struct DarkSouls2Codec;

impl EntryCodec for DarkSouls2Codec {
    fn read_entry(&self, reader: &mut dyn ReadSeek) -> Result<Entry> {
        let file_name_hash = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_size = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_offset = reader.read_u64::<LittleEndian>()?;
        let salted_hash_offset = reader.read_u64::<LittleEndian>()?;

        let salted_hash = read_optional(reader, salted_hash_offset, read_salted_hash)?;

        Ok(Entry {
            file_name_hash,
            file_offset,
            file_size,
            padded_file_size: file_size,
            aes_key: None,
            salted_hash,
        })
    }
}

/// Dark Souls III onwards: padded size plus a size field that may be zero,
/// salted-hash and AES-key side records. Elden Ring widens the hash.
struct ModernCodec {
    wide_hash: bool,
}

impl EntryCodec for ModernCodec {
    fn read_entry(&self, reader: &mut dyn ReadSeek) -> Result<Entry> {
        let file_name_hash = if self.wide_hash {
            reader.read_u64::<LittleEndian>()?
        } else {
            u64::from(reader.read_u32::<LittleEndian>()?)
        };
        let padded_file_size = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_size = u64::from(reader.read_u32::<LittleEndian>()?);
        let file_offset = reader.read_u64::<LittleEndian>()?;
        let salted_hash_offset = reader.read_u64::<LittleEndian>()?;
        let aes_key_offset = reader.read_u64::<LittleEndian>()?;

        let salted_hash = read_optional(reader, salted_hash_offset, read_salted_hash)?;
        let aes_key = read_optional(reader, aes_key_offset, read_entry_key)?;

        Ok(Entry {
            file_name_hash,
            file_offset,
            // A zero size means the payload fills its padded span.
            file_size: if file_size == 0 {
                padded_file_size
            } else {
                file_size
            },
            padded_file_size,
            aes_key,
            salted_hash,
        })
    }
}

/// Follow a side-record offset if it is set; zero means absent.
fn read_optional<T>(
    reader: &mut dyn ReadSeek,
    offset: u64,
    read: fn(&mut dyn ReadSeek) -> Result<T>,
) -> Result<Option<T>> {
    if offset == 0 {
        return Ok(None);
    }
    with_position(reader, offset, |r| read(r).map(Some))
}

/// Version tags the side records are allowed to carry.
///
/// Version 3 appends 32 reserved bytes after the record's fixed fields.
fn check_record_version(version: u32) -> Result<()> {
    match version {
        1 | 3 => Ok(()),
        other => Err(BhdError::UnsupportedVersion(other)),
    }
}

fn skip_reserved(reader: &mut dyn ReadSeek, version: u32) -> Result<()> {
    if version == 3 {
        let mut reserved = [0u8; 32];
        reader.read_exact(&mut reserved)?;
    }
    Ok(())
}

fn read_entry_key(reader: &mut dyn ReadSeek) -> Result<EntryKey> {
    let mut key = [0u8; 16];
    reader.read_exact(&mut key)?;
    let version = reader.read_u32::<LittleEndian>()?;
    check_record_version(version)?;
    skip_reserved(reader, version)?;

    let range_count = reader.read_u32::<LittleEndian>()?;
    let mut ranges = Vec::with_capacity(range_count.min(64) as usize);
    for _ in 0..range_count {
        let start = reader.read_i64::<LittleEndian>()?;
        let end = reader.read_i64::<LittleEndian>()?;
        ranges.push(EncryptedRange { start, end });
    }

    trace!(
        "Entry key v{} with {} encrypted ranges",
        version,
        ranges.len()
    );

    Ok(EntryKey {
        key,
        version,
        ranges,
    })
}

fn read_salted_hash(reader: &mut dyn ReadSeek) -> Result<SaltedHash> {
    let mut hash = [0u8; 32];
    reader.read_exact(&mut hash)?;
    let version = reader.read_u32::<LittleEndian>()?;
    check_record_version(version)?;
    skip_reserved(reader, version)?;

    Ok(SaltedHash { hash, version })
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn key_record(version: u32, ranges: &[(i64, i64)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&[0x11u8; 16]);
        out.write_u32::<LittleEndian>(version).unwrap();
        if version == 3 {
            out.extend_from_slice(&[0u8; 32]);
        }
        out.write_u32::<LittleEndian>(ranges.len() as u32).unwrap();
        for (start, end) in ranges {
            out.write_i64::<LittleEndian>(*start).unwrap();
            out.write_i64::<LittleEndian>(*end).unwrap();
        }
        out
    }

    #[test]
    fn test_key_record_version_1() {
        let bytes = key_record(1, &[(0, 32), (-1, -1)]);
        let mut cursor = Cursor::new(bytes);
        let key = read_entry_key(&mut cursor).unwrap();

        assert_eq!(key.version, 1);
        assert_eq!(key.key, [0x11u8; 16]);
        assert_eq!(key.ranges.len(), 2);
        assert_eq!(key.ranges[0], EncryptedRange { start: 0, end: 32 });
    }

    #[test]
    fn test_key_record_version_3_skips_reserved() {
        // Range data sits after the 32 reserved bytes; reading it proves
        // they were consumed.
        let bytes = key_record(3, &[(16, 48)]);
        let mut cursor = Cursor::new(bytes);
        let key = read_entry_key(&mut cursor).unwrap();

        assert_eq!(key.version, 3);
        assert_eq!(key.ranges, vec![EncryptedRange { start: 16, end: 48 }]);
    }

    #[test]
    fn test_key_record_version_2_rejected() {
        let bytes = key_record(2, &[]);
        let mut cursor = Cursor::new(bytes);
        let err = read_entry_key(&mut cursor).unwrap_err();

        assert!(matches!(err, BhdError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_salted_hash_record() {
        let mut bytes = vec![0xAAu8; 32];
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 32]);

        let mut cursor = Cursor::new(bytes);
        let hash = read_salted_hash(&mut cursor).unwrap();
        assert_eq!(hash.hash, [0xAAu8; 32]);
        assert_eq!(hash.version, 3);
    }
}
