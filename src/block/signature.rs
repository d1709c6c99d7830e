//! The Signature type - per-block digests in block order.

use bytes::Bytes;
use std::fmt;

/// A completed signature.
///
/// The bytes are the digests of every block, concatenated in block order with
/// no headers or separators. Block `i` occupies
/// `[i * digest_len, (i + 1) * digest_len)`.
///
/// # Example
///
/// ```
/// use blocksig::{Md5Hex, Signer, SignatureConfig};
/// use std::io::Cursor;
///
/// let signer = Signer::new(SignatureConfig::new(4, 2)?, Md5Hex);
/// let signature = signer.sign(Cursor::new(b"0123456789"))?;
///
/// assert_eq!(signature.block_count(), 3);
/// assert_eq!(signature.len(), 3 * 32);
/// assert_eq!(signature.block(2).map(|d| d.len()), Some(32));
/// # Ok::<(), blocksig::SignatureError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    data: Bytes,
    digest_len: usize,
}

impl Signature {
    pub(crate) fn new(data: impl Into<Bytes>, digest_len: usize) -> Self {
        let data = data.into();
        debug_assert!(digest_len > 0 && data.len() % digest_len == 0);
        Self { data, digest_len }
    }

    /// Returns the width of one block digest in bytes.
    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Returns the total length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the signature covers no blocks.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of block digests.
    pub fn block_count(&self) -> usize {
        self.data.len() / self.digest_len
    }

    /// Returns the digest of block `index`, if present.
    pub fn block(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.digest_len)?;
        self.data.get(start..start.checked_add(self.digest_len)?)
    }

    /// Iterates over block digests in block order.
    pub fn blocks(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.digest_len)
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the signature and returns the underlying bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature({} blocks x {} bytes)",
            self.block_count(),
            self.digest_len
        )
    }
}
