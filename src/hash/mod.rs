//! Block digest functions.
//!
//! The pipeline treats hashing as an opaque, pure, CPU-bound function behind
//! [`BlockDigest`]. Bundled backends:
//!
//! - [`Blake3`] - raw 32-byte BLAKE3 (requires `hash-blake3` feature)
//! - [`Md5`] - raw 16-byte MD5 (requires `hash-md5` feature)
//! - [`Md5Hex`] - MD5 as 32 lowercase hex characters (requires `hash-md5` feature)

#[cfg(feature = "hash-blake3")]
mod blake3;
#[cfg(feature = "hash-md5")]
mod md5;

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3;
#[cfg(feature = "hash-md5")]
pub use self::md5::{Md5, Md5Hex};

use crate::error::DigestError;

/// A fixed-width digest computed over one block.
///
/// Implementations must be deterministic and safe to call from many threads
/// at once on different inputs; one instance is shared by every worker.
///
/// # Example
///
/// ```
/// use blocksig::{BlockDigest, DigestError};
///
/// /// Sum of all bytes, little endian.
/// struct ByteSum;
///
/// impl BlockDigest for ByteSum {
///     fn output_len(&self) -> usize {
///         8
///     }
///
///     fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
///         let sum: u64 = data.iter().map(|&b| u64::from(b)).sum();
///         out.copy_from_slice(&sum.to_le_bytes());
///         Ok(())
///     }
/// }
///
/// let mut out = [0u8; 8];
/// ByteSum.digest_into(&[1, 2, 3], &mut out)?;
/// assert_eq!(u64::from_le_bytes(out), 6);
/// # Ok::<(), DigestError>(())
/// ```
pub trait BlockDigest: Send + Sync {
    /// Width of one encoded digest in bytes. Must be non-zero and constant.
    fn output_len(&self) -> usize;

    /// Writes the digest of `data` into `out`, which is exactly
    /// [`output_len`](Self::output_len) bytes long.
    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError>;
}

impl<D: BlockDigest + ?Sized> BlockDigest for &D {
    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
        (**self).digest_into(data, out)
    }
}

impl<D: BlockDigest + ?Sized> BlockDigest for Box<D> {
    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
        (**self).digest_into(data, out)
    }
}

/// Rejects an output slice whose width does not match the digest.
#[cfg(feature = "hash")]
fn check_output(expected: usize, out: &[u8]) -> Result<(), DigestError> {
    if out.len() != expected {
        return Err(DigestError::output_len(expected, out.len()));
    }
    Ok(())
}
