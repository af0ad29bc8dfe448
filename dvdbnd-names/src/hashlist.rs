//! Persisted hash-target lists.
//!
//! Unresolved hashes are saved between brute-force runs as a small binary
//! file: an 8-byte little-endian count, then that many 8-byte hash values,
//! sorted ascending.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use tracing::debug;

use crate::{NameError, Result};

/// Write a hash list to disk, sorted ascending.
pub fn save_hash_list(path: &Path, hashes: &[u64]) -> Result<()> {
    let mut sorted = hashes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_u64::<LittleEndian>(sorted.len() as u64)?;
    for hash in &sorted {
        writer.write_u64::<LittleEndian>(*hash)?;
    }

    debug!("Saved {} hashes to {}", sorted.len(), path.display());
    Ok(())
}

/// Read a hash list back. The result is ascending, as written.
pub fn load_hash_list(path: &Path) -> Result<Vec<u64>> {
    let mut reader = BufReader::new(File::open(path)?);
    let count = reader.read_u64::<LittleEndian>()?;

    let mut hashes = Vec::with_capacity(count.min(1 << 20) as usize);
    for _ in 0..count {
        hashes.push(reader.read_u64::<LittleEndian>()?);
    }

    // A trailing byte means the count lied.
    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(NameError::InvalidHashList(format!(
            "trailing data after {count} hashes"
        )));
    }

    debug!("Loaded {} hashes from {}", hashes.len(), path.display());
    Ok(hashes)
}
