//! blocksig
//!
//! Fixed-size block signatures for Rust.
//!
//! `blocksig` splits a seekable byte stream into fixed-size blocks, hashes the
//! blocks in parallel and returns the digests concatenated in block order. It
//! is designed as a small, composable primitive for:
//!
//! - file comparison and change detection
//! - delta synchronization
//! - integrity manifests
//!
//! One reader thread feeds a bounded pool of reusable block buffers; a fixed
//! set of worker threads hash them. Memory stays at `2 × workers` blocks no
//! matter how large the input, and the result does not depend on how many
//! workers ran.
//!
//! The crate intentionally:
//! - does NOT open or write files (the `cli` binary does)
//! - does NOT support streams of unknown length
//! - does NOT resume interrupted runs
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use blocksig::{Md5Hex, Signer, SignatureConfig, SignatureError};
//!
//! fn main() -> Result<(), SignatureError> {
//!     let file = File::open("data.bin")?;
//!     let signer = Signer::new(SignatureConfig::default(), Md5Hex);
//!
//!     let signature = signer.sign(file)?;
//!     for (i, digest) in signature.blocks().enumerate() {
//!         println!("block {} {}", i, String::from_utf8_lossy(digest));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # One-shot
//!
//! ```
//! use std::io::Cursor;
//!
//! let mut progress = |total: u64, done: u64| eprintln!("{done}/{total}");
//! let signature = blocksig::signature(Cursor::new(vec![7u8; 10]), 4, 2, Some(&mut progress))?;
//! assert_eq!(signature.block_count(), 3);
//! # Ok::<(), blocksig::SignatureError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod error;
mod signer;

mod buffer; // internal slot pool
mod hash; // digest trait + backends

//
// Public surface (intentionally tiny)
//

pub use block::{Signature, block_len, blocks_count};
pub use config::{DEFAULT_BLOCK_SIZE, SLOTS_PER_WORKER, SignatureConfig, default_workers};
pub use error::{DigestError, SignatureError};
pub use hash::BlockDigest;
pub use signer::{Progress, Signer, signature_with};

#[cfg(feature = "hash-blake3")]
pub use hash::Blake3;
#[cfg(feature = "hash-md5")]
pub use hash::{Md5, Md5Hex};
#[cfg(feature = "hash-blake3")]
pub use signer::signature;
