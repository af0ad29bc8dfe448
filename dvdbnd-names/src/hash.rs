//! The filename hash used by archive indices.
//!
//! A simple polynomial fold over the normalized path: lowercase, all
//! backslashes converted to forward slashes, then
//! `acc = acc * PRIME + byte` starting from 0. Titles before Elden Ring use
//! a 32-bit accumulator with multiplier 37; Elden Ring widened the hash to
//! 64 bits and multiplier 133.
//!
//! The fold is relied on beyond plain lookup: two archive halves whose
//! names differ only in extension (`.bhd` vs `.bdt`) have hashes at a fixed
//! distance (`('h'-'d')*PRIME + ('d'-'t')`), which lets paired files be
//! matched when only their hashes are known.

use crate::GameVersion;

/// Normalize a path for hashing: lowercase, backslashes to forward slashes.
pub fn normalize(path: &str) -> String {
    path.to_ascii_lowercase().replace('\\', "/")
}

/// Hash a path with the parameters of the given title.
///
/// 32-bit results are zero-extended; the wire width is decided by the
/// entry codec, not here.
pub fn hash_path(path: &str, version: GameVersion) -> u64 {
    let normalized = normalize(path);

    if version.uses_wide_hash() {
        let prime = version.hash_prime();
        normalized
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(prime).wrapping_add(u64::from(b)))
    } else {
        let prime = version.hash_prime() as u32;
        u64::from(
            normalized
                .bytes()
                .fold(0u32, |acc, b| acc.wrapping_mul(prime).wrapping_add(u32::from(b))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // 0*37 + '/' = 47, 47*37 + 'a' = 1836
        assert_eq!(hash_path("/a", GameVersion::DarkSouls), 1836);
    }

    #[test]
    fn test_normalization_invariance() {
        let reference = hash_path("/chr/c1234.chrbnd", GameVersion::DarkSouls3);
        assert_eq!(hash_path("/CHR/C1234.CHRBND", GameVersion::DarkSouls3), reference);
        assert_eq!(
            hash_path("\\chr\\c1234.chrbnd", GameVersion::DarkSouls3),
            reference
        );
    }

    #[test]
    fn test_deterministic() {
        let a = hash_path("/map/m10_00_00_00.msb", GameVersion::EldenRing);
        let b = hash_path("/map/m10_00_00_00.msb", GameVersion::EldenRing);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sibling_extension_distance_narrow() {
        // hash(".bhd") - hash(".bdt") == ('h'-'d')*37 + ('d'-'t') == 132
        let bhd = hash_path("/dvdbnd0.bhd", GameVersion::DarkSouls);
        let bdt = hash_path("/dvdbnd0.bdt", GameVersion::DarkSouls);
        assert_eq!(bhd.wrapping_sub(bdt) as u32, 132);
    }

    #[test]
    fn test_sibling_extension_distance_wide() {
        // Same relation with the 64-bit multiplier: 4*133 - 16 == 516
        let bhd = hash_path("/data0.bhd", GameVersion::EldenRing);
        let bdt = hash_path("/data0.bdt", GameVersion::EldenRing);
        assert_eq!(bhd.wrapping_sub(bdt), 516);
    }

    #[test]
    fn test_narrow_hash_fits_in_32_bits() {
        let h = hash_path(
            "/obj/o123456_very_long_path_that_overflows_many_times.objbnd.dcx",
            GameVersion::Sekiro,
        );
        assert!(h <= u64::from(u32::MAX));
    }
}
