//! Error types for blocksig.

use thiserror::Error;

/// Errors that can occur while computing a signature.
///
/// Only the first fatal error of a run is ever surfaced; errors raised by other
/// threads while the run is already shutting down are dropped.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// An I/O error occurred while measuring or rewinding the input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The input did not deliver the bytes of a block (short read or I/O failure).
    #[error("read error at block {block}: {source}")]
    Read {
        /// Index of the block being read.
        block: u64,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A block buffer or the output buffer could not be allocated.
    #[error("unable to allocate {bytes} bytes: {source}")]
    Alloc {
        /// Size of the failed reservation.
        bytes: usize,
        /// The allocator's error.
        source: std::collections::TryReserveError,
    },

    /// A block index fell outside the range computed from the input length.
    #[error("stream size changed during processing: block {block} of {blocks}")]
    SizeChanged {
        /// The offending block index.
        block: u64,
        /// Number of blocks expected when the run started.
        blocks: u64,
    },

    /// The digest function failed for a block.
    #[error("digest failed at block {block}: {source}")]
    Digest {
        /// Index of the block being hashed.
        block: u64,
        /// The error reported by the digest implementation.
        source: DigestError,
    },

    /// A pipeline thread panicked.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker thread (the reader is never a spawned thread).
        worker: usize,
    },

    /// A pool channel closed while the run was still expected to make progress.
    #[error("slot pool disconnected")]
    Disconnected,
}

/// Error reported by a [`BlockDigest`](crate::BlockDigest) implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DigestError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DigestError {
    /// Creates an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an error for an output slice of the wrong width.
    pub fn output_len(expected: usize, actual: usize) -> Self {
        Self::new(format!(
            "output slice is {} bytes, digest needs {}",
            actual, expected
        ))
    }
}
