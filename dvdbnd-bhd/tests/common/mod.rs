//! Shared fixture builder: serializes index files the way the build
//! tooling lays them out, so parser tests can exercise real offsets.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use dvdbnd_names::GameVersion;

/// One entry to serialize, with optional side records.
#[derive(Debug, Clone, Default)]
pub struct TestEntry {
    pub hash: u64,
    pub offset: u64,
    pub size: u32,
    pub padded: u32,
    /// (record version, key bytes, encrypted ranges)
    pub key: Option<(u32, [u8; 16], Vec<(i64, i64)>)>,
    /// (record version, salted hash bytes)
    pub salted: Option<(u32, [u8; 32])>,
}

/// Serializes buckets of entries into an index byte blob.
pub struct TestIndexBuilder {
    version: GameVersion,
    salt: String,
    buckets: Vec<Vec<TestEntry>>,
}

impl TestIndexBuilder {
    pub fn new(version: GameVersion) -> Self {
        Self {
            version,
            salt: "TESTSALT".to_string(),
            buckets: Vec::new(),
        }
    }

    pub fn salt(mut self, salt: &str) -> Self {
        self.salt = salt.to_string();
        self
    }

    pub fn bucket(mut self, entries: Vec<TestEntry>) -> Self {
        self.buckets.push(entries);
        self
    }

    fn entry_width(&self) -> usize {
        match self.version {
            GameVersion::DarkSouls => 16,
            GameVersion::DarkSouls2 => 24,
            GameVersion::DarkSouls3 | GameVersion::Sekiro => 36,
            GameVersion::EldenRing => 40,
        }
    }

    fn key_record_len(version: u32, ranges: usize) -> usize {
        16 + 4 + if version == 3 { 32 } else { 0 } + 4 + 16 * ranges
    }

    fn salted_record_len(version: u32) -> usize {
        32 + 4 + if version == 3 { 32 } else { 0 }
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = 4 + 4 + 4 + 4 + self.salt.len();
        let directory_len = 8 * self.buckets.len();
        let entries_len: usize = self
            .buckets
            .iter()
            .map(|b| b.len() * self.entry_width())
            .sum();
        let side_base = header_len + directory_len + entries_len;

        // Side records are appended in entry order after the buckets.
        let mut side = Vec::new();
        let mut side_offsets: Vec<(u64, u64)> = Vec::new();
        for entry in self.buckets.iter().flatten() {
            let mut salted_offset = 0u64;
            let mut key_offset = 0u64;

            if let Some((version, hash)) = &entry.salted {
                salted_offset = (side_base + side.len()) as u64;
                side.extend_from_slice(hash);
                side.write_u32::<LittleEndian>(*version).unwrap();
                if *version == 3 {
                    side.extend_from_slice(&[0u8; 32]);
                }
                debug_assert_eq!(
                    side.len() + side_base,
                    salted_offset as usize + Self::salted_record_len(*version)
                );
            }

            if let Some((version, key, ranges)) = &entry.key {
                key_offset = (side_base + side.len()) as u64;
                side.extend_from_slice(key);
                side.write_u32::<LittleEndian>(*version).unwrap();
                if *version == 3 {
                    side.extend_from_slice(&[0u8; 32]);
                }
                side.write_u32::<LittleEndian>(ranges.len() as u32).unwrap();
                for (start, end) in ranges {
                    side.write_i64::<LittleEndian>(*start).unwrap();
                    side.write_i64::<LittleEndian>(*end).unwrap();
                }
                debug_assert_eq!(
                    side.len() + side_base,
                    key_offset as usize + Self::key_record_len(*version, ranges.len())
                );
            }

            side_offsets.push((salted_offset, key_offset));
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"BHD5");
        out.write_u32::<LittleEndian>(self.buckets.len() as u32)
            .unwrap();
        out.write_u32::<LittleEndian>(header_len as u32).unwrap();
        out.write_u32::<LittleEndian>(self.salt.len() as u32)
            .unwrap();
        out.extend_from_slice(self.salt.as_bytes());

        // Directory pairs, then the bucket payloads they point at.
        let mut bucket_offset = header_len + directory_len;
        for bucket in &self.buckets {
            out.write_u32::<LittleEndian>(bucket.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(bucket_offset as u32).unwrap();
            bucket_offset += bucket.len() * self.entry_width();
        }

        let mut side_iter = side_offsets.into_iter();
        for entry in self.buckets.iter().flatten() {
            let (salted_offset, key_offset) = side_iter.next().unwrap();
            match self.version {
                GameVersion::DarkSouls => {
                    out.write_u32::<LittleEndian>(entry.hash as u32).unwrap();
                    out.write_u32::<LittleEndian>(entry.size).unwrap();
                    out.write_u64::<LittleEndian>(entry.offset).unwrap();
                }
                GameVersion::DarkSouls2 => {
                    out.write_u32::<LittleEndian>(entry.hash as u32).unwrap();
                    out.write_u32::<LittleEndian>(entry.size).unwrap();
                    out.write_u64::<LittleEndian>(entry.offset).unwrap();
                    out.write_u64::<LittleEndian>(salted_offset).unwrap();
                }
                GameVersion::DarkSouls3 | GameVersion::Sekiro => {
                    out.write_u32::<LittleEndian>(entry.hash as u32).unwrap();
                    out.write_u32::<LittleEndian>(entry.padded).unwrap();
                    out.write_u32::<LittleEndian>(entry.size).unwrap();
                    out.write_u64::<LittleEndian>(entry.offset).unwrap();
                    out.write_u64::<LittleEndian>(salted_offset).unwrap();
                    out.write_u64::<LittleEndian>(key_offset).unwrap();
                }
                GameVersion::EldenRing => {
                    out.write_u64::<LittleEndian>(entry.hash).unwrap();
                    out.write_u32::<LittleEndian>(entry.padded).unwrap();
                    out.write_u32::<LittleEndian>(entry.size).unwrap();
                    out.write_u64::<LittleEndian>(entry.offset).unwrap();
                    out.write_u64::<LittleEndian>(salted_offset).unwrap();
                    out.write_u64::<LittleEndian>(key_offset).unwrap();
                }
            }
        }

        out.extend_from_slice(&side);
        out
    }
}
