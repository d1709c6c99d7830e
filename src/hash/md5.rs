//! MD5 block digests.
//!
//! [`Md5Hex`] produces the classic signature file format: one 32-character
//! lowercase hex digest per block, concatenated without separators.

use md5::{Digest, Md5 as Md5State};

use super::{BlockDigest, check_output};
use crate::error::DigestError;

/// Raw 16-byte MD5 digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Md5;

impl Md5 {
    /// The size of the digest in bytes.
    pub const SIZE: usize = 16;

    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> [u8; Self::SIZE] {
        Md5State::digest(data).into()
    }
}

impl BlockDigest for Md5 {
    fn output_len(&self) -> usize {
        Self::SIZE
    }

    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
        check_output(Self::SIZE, out)?;
        out.copy_from_slice(&Self::hash(data));
        Ok(())
    }
}

/// MD5 digest encoded as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Md5Hex;

impl Md5Hex {
    /// The size of the encoded digest in bytes.
    pub const SIZE: usize = Md5::SIZE * 2;
}

impl BlockDigest for Md5Hex {
    fn output_len(&self) -> usize {
        Self::SIZE
    }

    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
        check_output(Self::SIZE, out)?;
        hex::encode_to_slice(Md5::hash(data), out)
            .map_err(|e| DigestError::with_source("hex encoding failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(
            hex::encode(Md5::hash(b"")),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            hex::encode(Md5::hash(b"The quick brown fox jumps over the lazy dog")),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[test]
    fn test_md5_hex_encoding() {
        let mut out = [0u8; 32];
        Md5Hex.digest_into(b"abc", &mut out).unwrap();
        assert_eq!(&out, b"900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_md5_hex_matches_raw() {
        let mut raw = [0u8; 16];
        let mut text = [0u8; 32];
        Md5.digest_into(b"block payload", &mut raw).unwrap();
        Md5Hex.digest_into(b"block payload", &mut text).unwrap();
        assert_eq!(hex::decode(text).unwrap(), raw);
    }

    #[test]
    fn test_wrong_output_width() {
        let mut out = [0u8; 16];
        assert!(Md5Hex.digest_into(b"data", &mut out).is_err());
        let mut out = [0u8; 32];
        assert!(Md5.digest_into(b"data", &mut out).is_err());
    }
}
