//! The signing pipeline.
//!
//! - [`Signer`] - Config + digest; `sign()` runs one pipeline
//! - [`signature`] / [`signature_with`] - One-shot entry points

mod engine;
mod reader;
mod state;
mod worker;

#[cfg(feature = "hash-blake3")]
pub use engine::signature;
pub use engine::{Signer, signature_with};
pub use reader::Progress;
