//! Perceptual-hash similarity primitives.
//!
//! Media fingerprints are 64-bit perceptual hashes stored as 8-byte blobs.
//! Similarity is plain Hamming distance; hash computation itself lives
//! outside this crate and hands us the finished bit vector.

use crate::error::CoreError;

/// Width of a stored perceptual hash, in bytes.
pub const HASH_BYTES: usize = 8;

/// Width of a stored perceptual hash, in bits.
pub const HASH_BITS: u32 = (HASH_BYTES as u32) * 8;

/// Default duplicate threshold: at most 8 of 64 bits may differ, i.e. at
/// least 87.5% bit agreement.
pub const DEFAULT_MAX_HAMMING_DISTANCE: u32 = HASH_BITS / 8;

/// Count of differing bits between two equal-length hashes.
///
/// Fails with [`CoreError::InvalidFingerprint`] on a length mismatch --
/// truncating or padding would silently change what "similar" means, so a
/// mismatch is treated as an upstream data bug.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32, CoreError> {
    if a.len() != b.len() {
        return Err(CoreError::InvalidFingerprint(format!(
            "hash length mismatch: {} vs {} bytes",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x ^ y).count_ones())
        .sum())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn identical_hashes_have_distance_zero() {
        let h = [0xAB; HASH_BYTES];
        assert_eq!(hamming_distance(&h, &h).unwrap(), 0);
    }

    #[test]
    fn counts_differing_bits() {
        assert_eq!(hamming_distance(&[0b1111_0000], &[0b1111_0001]).unwrap(), 1);
        assert_eq!(hamming_distance(&[0b1111_0000], &[0b1100_0000]).unwrap(), 2);
        assert_eq!(hamming_distance(&[0x00; 8], &[0xFF; 8]).unwrap(), 64);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = hamming_distance(&[0x00; 8], &[0x00; 4]).unwrap_err();
        assert_matches!(err, CoreError::InvalidFingerprint(_));
    }

    #[test]
    fn default_threshold_is_one_eighth_of_the_width() {
        assert_eq!(DEFAULT_MAX_HAMMING_DISTANCE, 8);
    }
}
