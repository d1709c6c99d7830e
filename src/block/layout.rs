//! Fixed-size block arithmetic.
//!
//! A stream of `file_size` bytes splits into `ceil(file_size / block_size)`
//! blocks. Every block is `block_size` bytes except the last, which holds the
//! remainder when the size is not an exact multiple. A zero-length remainder
//! never produces a block.

/// Returns the number of blocks a stream of `file_size` bytes splits into.
///
/// # Panics
///
/// Panics if `block_size` is zero.
///
/// # Example
///
/// ```
/// use blocksig::blocks_count;
///
/// assert_eq!(blocks_count(10, 4), 3);
/// assert_eq!(blocks_count(8, 4), 2);
/// assert_eq!(blocks_count(0, 4), 0);
/// ```
pub fn blocks_count(file_size: u64, block_size: u64) -> u64 {
    assert!(block_size > 0, "block_size must be non-zero");
    file_size.div_ceil(block_size)
}

/// Returns the payload length of block `index`, or `None` past the last block.
///
/// # Example
///
/// ```
/// use blocksig::block_len;
///
/// assert_eq!(block_len(10, 4, 0), Some(4));
/// assert_eq!(block_len(10, 4, 2), Some(2));
/// assert_eq!(block_len(10, 4, 3), None);
/// ```
pub fn block_len(file_size: u64, block_size: u64, index: u64) -> Option<u64> {
    let start = index.checked_mul(block_size)?;
    if start >= file_size {
        return None;
    }
    Some((file_size - start).min(block_size))
}
