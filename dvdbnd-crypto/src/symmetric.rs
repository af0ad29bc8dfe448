//! AES decryption for entry payloads and encrypted containers.
//!
//! Three conventions appear across the format family:
//!
//! - per-entry payloads: AES-128-ECB, optionally limited to a set of byte
//!   ranges inside the padded payload (everything outside the ranges is
//!   plaintext padding and passes through unchanged),
//! - generic containers and save-data user blocks: AES-128-CBC with the
//!   first 16 bytes of the stream as IV,
//! - the rules/configuration blob: AES-128-CTR with a nonce *derived* from
//!   the stored 16-byte value (see [`derive_rules_nonce`]).

use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockDecryptMut, KeyInit, KeyIvInit, StreamCipher};
use cipher::block_padding::NoPadding;
use tracing::trace;

use crate::{CryptoError, Result};

type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// AES block width in bytes.
pub const BLOCK_SIZE: usize = 16;

/// One encrypted byte span inside a padded entry payload.
///
/// Records with a negative bound are placeholders and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedRange {
    /// First encrypted byte, inclusive.
    pub start: i64,
    /// One past the last encrypted byte.
    pub end: i64,
}

impl EncryptedRange {
    /// Whether this range selects any bytes at all.
    pub fn is_effective(&self) -> bool {
        self.start >= 0 && self.end >= 0 && self.start < self.end
    }
}

/// Decrypt an entry payload with AES-128-ECB, no chaining.
///
/// With an empty `ranges` the whole buffer is deciphered; otherwise only the
/// listed spans are. Spans are clamped to the buffer and truncated down to
/// whole cipher blocks.
pub fn decrypt_ecb(data: &[u8], key: &[u8; 16], ranges: &[EncryptedRange]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut out = data.to_vec();

    if ranges.is_empty() {
        decrypt_blocks(&cipher, &mut out);
        return out;
    }

    for range in ranges.iter().filter(|r| r.is_effective()) {
        let start = (range.start as usize).min(out.len());
        let end = (range.end as usize).min(out.len());
        trace!("Deciphering range {}..{} of {}", start, end, out.len());
        decrypt_blocks(&cipher, &mut out[start..end]);
    }

    out
}

fn decrypt_blocks(cipher: &Aes128, buf: &mut [u8]) {
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// Decrypt a full buffer with AES-128-CBC. Padding is left in place.
pub fn decrypt_cbc(data: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    let cipher = Aes128CbcDec::new(key.into(), iv.into());
    cipher
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| CryptoError::UnalignedData(data.len()))?;
    Ok(buf)
}

/// Decrypt a full buffer with AES-128-CTR (big-endian counter).
pub fn decrypt_ctr(data: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(&mut buf);
    buf
}

/// Decrypt an IV-prefixed CBC container: the first 16 bytes of the stream
/// are the IV, the remainder is ciphertext.
pub fn decrypt_iv_prefixed_cbc(data: &[u8], key: &[u8; 16]) -> Result<Vec<u8>> {
    if data.len() < BLOCK_SIZE {
        return Err(CryptoError::TruncatedData {
            expected: BLOCK_SIZE,
            actual: data.len(),
        });
    }

    let mut iv = [0u8; BLOCK_SIZE];
    iv.copy_from_slice(&data[..BLOCK_SIZE]);
    decrypt_cbc(&data[BLOCK_SIZE..], key, &iv)
}

/// Derive the CTR nonce for the rules/configuration blob.
///
/// The stored 16-byte value is not used as-is: bytes 0..=10 shift into
/// positions 1..=11, byte 0 becomes `0x80`, bytes 12..=14 are cleared and
/// byte 15 becomes `0x01`. This is the format's own construction, not a
/// standard CTR counter seed.
pub fn derive_rules_nonce(stored: &[u8; 16]) -> [u8; 16] {
    let mut nonce = [0u8; 16];
    nonce[0] = 0x80;
    nonce[1..12].copy_from_slice(&stored[..11]);
    nonce[15] = 0x01;
    nonce
}

/// Decrypt the rules blob: 16 stored nonce-seed bytes, then CTR ciphertext.
pub fn decrypt_rules_blob(data: &[u8], key: &[u8; 16]) -> Result<Vec<u8>> {
    if data.len() < BLOCK_SIZE {
        return Err(CryptoError::TruncatedData {
            expected: BLOCK_SIZE,
            actual: data.len(),
        });
    }

    let mut stored = [0u8; BLOCK_SIZE];
    stored.copy_from_slice(&data[..BLOCK_SIZE]);
    let nonce = derive_rules_nonce(&stored);

    Ok(decrypt_ctr(&data[BLOCK_SIZE..], key, &nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::BlockEncrypt;
    use proptest::prelude::*;

    fn encrypt_ecb(data: &[u8], key: &[u8; 16]) -> Vec<u8> {
        let cipher = Aes128::new(GenericArray::from_slice(key));
        let mut out = data.to_vec();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        out
    }

    const KEY: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ];

    #[test]
    fn test_ecb_full_buffer_round_trip() {
        let plaintext = [0x5Au8; 64];
        let ciphertext = encrypt_ecb(&plaintext, &KEY);
        assert_ne!(ciphertext, plaintext);

        let opened = decrypt_ecb(&ciphertext, &KEY, &[]);
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_ecb_ranges_leave_padding_untouched() {
        // 32 encrypted bytes in the middle of 96 bytes of plaintext padding.
        let mut data = vec![0xEEu8; 96];
        let secret = [0x42u8; 32];
        data[32..64].copy_from_slice(&encrypt_ecb(&secret, &KEY));

        let ranges = [EncryptedRange { start: 32, end: 64 }];
        let opened = decrypt_ecb(&data, &KEY, &ranges);

        assert_eq!(&opened[..32], &[0xEEu8; 32][..]);
        assert_eq!(&opened[32..64], &secret[..]);
        assert_eq!(&opened[64..], &[0xEEu8; 32][..]);
    }

    #[test]
    fn test_ecb_placeholder_range_skipped() {
        let data = vec![0x17u8; 32];
        let ranges = [EncryptedRange { start: -1, end: -1 }];
        assert_eq!(decrypt_ecb(&data, &KEY, &ranges), data);
    }

    #[test]
    fn test_ecb_range_clamps_to_buffer() {
        let plaintext = [0x33u8; 32];
        let ciphertext = encrypt_ecb(&plaintext, &KEY);

        let ranges = [EncryptedRange { start: 0, end: 1024 }];
        assert_eq!(decrypt_ecb(&ciphertext, &KEY, &ranges), plaintext);
    }

    #[test]
    fn test_cbc_iv_prefixed_round_trip() {
        use cbc::Encryptor;
        use cipher::BlockEncryptMut;

        let iv = [0x0Fu8; 16];
        let plaintext = [0x77u8; 48];

        let mut buf = plaintext.to_vec();
        Encryptor::<Aes128>::new((&KEY).into(), (&iv).into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, plaintext.len())
            .unwrap();

        let mut stream = iv.to_vec();
        stream.extend_from_slice(&buf);

        assert_eq!(decrypt_iv_prefixed_cbc(&stream, &KEY).unwrap(), plaintext);
    }

    #[test]
    fn test_cbc_rejects_unaligned() {
        let err = decrypt_cbc(&[0u8; 17], &KEY, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::UnalignedData(17)));
    }

    #[test]
    fn test_derive_rules_nonce() {
        let stored: [u8; 16] = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
            0x0F, 0x10,
        ];
        let nonce = derive_rules_nonce(&stored);
        assert_eq!(
            nonce,
            [
                0x80, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x00,
                0x00, 0x00, 0x01,
            ]
        );
    }

    #[test]
    fn test_rules_blob_round_trip() {
        let stored = [0xABu8; 16];
        let nonce = derive_rules_nonce(&stored);
        let plaintext = b"regulation rows go here, any length is fine";

        // CTR is symmetric.
        let ciphertext = decrypt_ctr(plaintext, &KEY, &nonce);
        let mut blob = stored.to_vec();
        blob.extend_from_slice(&ciphertext);

        assert_eq!(decrypt_rules_blob(&blob, &KEY).unwrap(), plaintext);
    }

    #[test]
    fn test_rules_blob_too_short() {
        let err = decrypt_rules_blob(&[0u8; 4], &KEY).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::TruncatedData {
                expected: 16,
                actual: 4
            }
        ));
    }

    proptest! {
        #[test]
        fn prop_ctr_round_trip(data in proptest::collection::vec(any::<u8>(), 0..512), iv in any::<[u8; 16]>()) {
            let ciphertext = decrypt_ctr(&data, &KEY, &iv);
            prop_assert_eq!(decrypt_ctr(&ciphertext, &KEY, &iv), data);
        }

        #[test]
        fn prop_ecb_round_trip(blocks in 0usize..8, seed in any::<u8>()) {
            let data = vec![seed; blocks * BLOCK_SIZE];
            let ciphertext = encrypt_ecb(&data, &KEY);
            prop_assert_eq!(decrypt_ecb(&ciphertext, &KEY, &[]), data);
        }
    }
}
