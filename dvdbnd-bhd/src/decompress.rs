//! Tolerant DEFLATE wrapper for compressed entry payloads.
//!
//! Compressed payloads are the concern of the per-format decoders, but the
//! length contract lives here: the codecs used by this format family can
//! report a length mismatch (or a zero length) while still having produced
//! usable bytes, so a mismatch is a warning and the bytes win.

use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::{trace, warn};

use crate::{BhdError, Result};

/// Inflate a zlib-wrapped payload.
///
/// A result shorter or longer than `expected_len` is logged and returned
/// as-is; only a stream the decoder rejects outright is an error.
pub fn inflate(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    trace!("Inflating {} bytes, expecting {}", data.len(), expected_len);

    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::with_capacity(expected_len);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| BhdError::DecompressionFailed(e.to_string()))?;

    if out.len() != expected_len {
        warn!(
            "Decompressed length mismatch: expected {}, got {}; continuing with produced bytes",
            expected_len,
            out.len()
        );
    }

    Ok(out)
}
