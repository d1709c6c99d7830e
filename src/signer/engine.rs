//! Pipeline orchestration - Signer and the `signature` entry points.
//!
//! One reader (the calling thread) and `workers` hashing threads share a pool
//! of `2 × workers` block buffers:
//!
//! ```text
//! input ──read──► slot ──publish──► ready queue ──take──► worker ──digest──► output[i]
//!                  ▲                                         │
//!                  └──────────────── free list ◄─────free────┘
//! ```
//!
//! The output buffer is sized up front from the stream length. Each block's
//! digest range travels with its slot, so workers write disjoint ranges
//! without further synchronization and the result is in block order whatever
//! order the blocks were hashed in.

use std::io::{Read, Seek, SeekFrom};
use std::thread;

use tracing::debug;

use crate::block::{Signature, blocks_count};
use crate::buffer::SlotPool;
use crate::config::SignatureConfig;
use crate::error::SignatureError;
use crate::hash::BlockDigest;

#[cfg(feature = "hash-blake3")]
use crate::hash::Blake3;

use super::reader::{BlockReader, Progress};
use super::state::RunState;
use super::worker::Worker;

/// Computes block signatures with a fixed configuration and digest.
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
/// // 3 blocks: "0123", "4567", "89"
/// assert_eq!(signature.block_count(), 3);
/// assert_eq!(signature.block(2), Some(&b"7647966b7343c29048673252e490f736"[..]));
/// # Ok::<(), blocksig::SignatureError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Signer<D> {
    config: SignatureConfig,
    digest: D,
}

impl<D: BlockDigest> Signer<D> {
    /// Creates a new signer.
    pub fn new(config: SignatureConfig, digest: D) -> Self {
        Self { config, digest }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Returns the digest.
    pub fn digest(&self) -> &D {
        &self.digest
    }

    /// Computes the signature of `input`.
    ///
    /// The stream's length is measured by seeking to its end, then it is read
    /// from the start. Reading fewer bytes than measured is an error.
    pub fn sign<R: Read + Seek>(&self, input: R) -> Result<Signature, SignatureError> {
        self.run(input, None)
    }

    /// Computes the signature of `input`, calling `progress(total, done)` on the
    /// calling thread after each block is read.
    pub fn sign_with_progress<R, F>(
        &self,
        input: R,
        mut progress: F,
    ) -> Result<Signature, SignatureError>
    where
        R: Read + Seek,
        F: FnMut(u64, u64),
    {
        self.run(input, Some(&mut progress))
    }

    fn run<R: Read + Seek>(
        &self,
        mut input: R,
        progress: Option<Progress<'_>>,
    ) -> Result<Signature, SignatureError> {
        self.config.validate()?;
        let digest_len = self.digest.output_len();
        if digest_len == 0 {
            return Err(SignatureError::InvalidConfig {
                message: "digest output length must be non-zero",
            });
        }

        let file_size = input.seek(SeekFrom::End(0))?;
        input.seek(SeekFrom::Start(0))?;

        let block_size = self.config.block_size();
        let workers = self.config.workers();
        let blocks = blocks_count(file_size, block_size as u64);
        let output_len = usize::try_from(blocks)
            .ok()
            .and_then(|blocks| blocks.checked_mul(digest_len))
            .ok_or(SignatureError::InvalidConfig {
                message: "signature does not fit in memory",
            })?;

        debug!(
            file_size,
            block_size,
            blocks,
            workers,
            slots = self.config.slots(),
            "starting signature run"
        );

        // No block is ever longer than the input.
        let capacity = usize::try_from(file_size).map_or(block_size, |size| size.min(block_size));

        let mut output = Vec::new();
        output
            .try_reserve_exact(output_len)
            .map_err(|source| SignatureError::Alloc {
                bytes: output_len,
                source,
            })?;
        output.resize(output_len, 0);
        let state = RunState::new();
        let (feeder, taker) = SlotPool::new(self.config.slots(), capacity)?;
        let targets = output.chunks_exact_mut(digest_len);
        let reader = BlockReader::new(input, file_size, block_size, blocks, progress);

        let hashed = thread::scope(|s| {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let worker = Worker::new(id, taker.clone(), &self.digest, blocks, &state);
                let spawned = thread::Builder::new()
                    .name(format!("blocksig-worker-{id}"))
                    .spawn_scoped(s, move || worker.run());
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        state.abort(SignatureError::Io(err));
                        break;
                    }
                }
            }
            drop(taker);

            reader.run(feeder, targets, &state);

            let mut hashed = 0u64;
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(n) => hashed += n,
                    Err(_) => state.abort(SignatureError::WorkerPanicked { worker: id }),
                }
            }
            hashed
        });

        state.into_result()?;
        debug!(blocks, hashed, "signature run complete");
        Ok(Signature::new(output, digest_len))
    }
}

#[cfg(feature = "hash-blake3")]
impl Default for Signer<Blake3> {
    fn default() -> Self {
        Self::new(SignatureConfig::default(), Blake3)
    }
}

/// Computes the BLAKE3 block signature of `input`.
///
/// Splits the stream into `block_size` blocks, hashes them on `worker_count`
/// threads and returns the digests in block order. `progress`, if given, is
/// called with `(total_blocks, blocks_read)` after each block is read.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
///
/// let signature = blocksig::signature(Cursor::new(vec![0u8; 10]), 4, 2, None)?;
/// assert_eq!(signature.len(), 3 * 32);
/// # Ok::<(), blocksig::SignatureError>(())
/// ```
#[cfg(feature = "hash-blake3")]
pub fn signature<R: Read + Seek>(
    input: R,
    block_size: usize,
    worker_count: usize,
    progress: Option<Progress<'_>>,
) -> Result<Signature, SignatureError> {
    signature_with(input, block_size, worker_count, Blake3, progress)
}

/// Computes the block signature of `input` with any [`BlockDigest`].
pub fn signature_with<R, D>(
    input: R,
    block_size: usize,
    worker_count: usize,
    digest: D,
    progress: Option<Progress<'_>>,
) -> Result<Signature, SignatureError>
where
    R: Read + Seek,
    D: BlockDigest,
{
    let config = SignatureConfig::new(block_size, worker_count)?;
    Signer::new(config, digest).run(input, progress)
}
