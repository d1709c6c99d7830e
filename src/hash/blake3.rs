//! BLAKE3 block digest.

use super::{BlockDigest, check_output};
use crate::error::DigestError;

/// Raw 32-byte BLAKE3 digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

impl Blake3 {
    /// The size of the digest in bytes.
    pub const SIZE: usize = blake3::OUT_LEN;

    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> [u8; Self::SIZE] {
        blake3::hash(data).into()
    }
}

impl BlockDigest for Blake3 {
    fn output_len(&self) -> usize {
        Self::SIZE
    }

    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
        check_output(Self::SIZE, out)?;
        out.copy_from_slice(blake3::hash(data).as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash() {
        let hash = Blake3::hash(b"hello world");
        assert_eq!(hash.len(), 32);

        // Hash should be deterministic
        let hash2 = Blake3::hash(b"hello world");
        assert_eq!(hash, hash2);

        // Different data should give different hash
        let hash3 = Blake3::hash(b"hello world!");
        assert_ne!(hash, hash3);
    }

    #[test]
    fn test_digest_into_matches_one_shot() {
        let mut out = [0u8; 32];
        Blake3.digest_into(b"hello world", &mut out).unwrap();
        assert_eq!(out, Blake3::hash(b"hello world"));
    }

    #[test]
    fn test_empty_input_known_value() {
        let mut out = [0u8; 32];
        Blake3.digest_into(b"", &mut out).unwrap();
        assert_eq!(
            out[..4],
            [0xaf, 0x13, 0x49, 0xb9],
            "BLAKE3 of empty input starts with af1349b9"
        );
    }

    #[test]
    fn test_wrong_output_width() {
        let mut out = [0u8; 16];
        assert!(Blake3.digest_into(b"data", &mut out).is_err());
    }
}
