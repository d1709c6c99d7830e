//! Block layout and signature types.
//!
//! - [`Signature`] - Ordered concatenation of per-block digests
//! - [`blocks_count`] / [`block_len`] - Fixed-size block arithmetic

mod layout;
mod signature;

pub use layout::{block_len, blocks_count};
pub use signature::Signature;
