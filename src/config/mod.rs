//! Configuration for signature runs.
//!
//! - [`SignatureConfig`] - Block size and worker count
//!
//! # Example
//!
//! ```
//! use blocksig::SignatureConfig;
//!
//! // 64 KiB blocks hashed by 4 workers
//! let config = SignatureConfig::new(64 * 1024, 4)?;
//! assert_eq!(config.slots(), 8);
//!
//! // Builder pattern
//! let config = SignatureConfig::default().with_block_size(4096).with_workers(2);
//! config.validate()?;
//! # Ok::<(), blocksig::SignatureError>(())
//! ```

use std::num::NonZeroUsize;
use std::thread;

use crate::error::SignatureError;

/// Default block size (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Number of pool slots allotted to each worker.
///
/// Two per worker lets the reader fill one slot while the worker hashes the other.
pub const SLOTS_PER_WORKER: usize = 2;

/// Configuration for a signature run.
///
/// `block_size` must be non-zero and `workers` at least one. The slot pool holds
/// [`SLOTS_PER_WORKER`] buffers of `block_size` bytes per worker, which bounds the
/// memory a run uses regardless of input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureConfig {
    block_size: usize,
    workers: usize,
}

impl SignatureConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if `block_size` or `workers` is zero.
    pub fn new(block_size: usize, workers: usize) -> Result<Self, SignatureError> {
        if block_size == 0 {
            return Err(SignatureError::InvalidConfig {
                message: "block_size must be non-zero",
            });
        }

        if workers == 0 {
            return Err(SignatureError::InvalidConfig {
                message: "workers must be at least 1",
            });
        }

        if workers.checked_mul(SLOTS_PER_WORKER).is_none() {
            return Err(SignatureError::InvalidConfig {
                message: "workers is too large",
            });
        }

        Ok(Self {
            block_size,
            workers,
        })
    }

    /// Sets the block size.
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the number of hashing workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of hashing workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the number of reusable buffers in the slot pool.
    pub fn slots(&self) -> usize {
        self.workers.saturating_mul(SLOTS_PER_WORKER)
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), SignatureError> {
        Self::new(self.block_size, self.workers).map(|_| ())
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            workers: default_workers(),
        }
    }
}

/// Returns the host's available parallelism, never less than one.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_config_default() {
        let config = SignatureConfig::default();
        assert_eq!(config.block_size(), 1024 * 1024);
        assert!(config.workers() >= 1);
        assert_eq!(config.slots(), config.workers() * 2);
    }

    #[test]
    fn test_signature_config_builder() {
        let config = SignatureConfig::default()
            .with_block_size(4096)
            .with_workers(3);
        assert_eq!(config.block_size(), 4096);
        assert_eq!(config.workers(), 3);
        assert_eq!(config.slots(), 6);
    }

    #[test]
    fn test_signature_config_valid() {
        let config = SignatureConfig::new(4, 1).unwrap();
        assert_eq!(config.block_size(), 4);
        assert_eq!(config.workers(), 1);
    }

    #[test]
    fn test_signature_config_invalid_zero() {
        assert!(SignatureConfig::new(0, 4).is_err());
        assert!(SignatureConfig::new(4096, 0).is_err());
    }

    #[test]
    fn test_signature_config_too_many_workers() {
        assert!(SignatureConfig::new(4096, usize::MAX).is_err());
    }

    #[test]
    fn test_signature_config_validate() {
        let config = SignatureConfig::default().with_block_size(0);
        assert!(config.validate().is_err());

        let config = SignatureConfig::default().with_workers(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_workers_at_least_one() {
        assert!(default_workers() >= 1);
    }
}
