//! Shared run state: the abort flag and the first-error cell.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{trace, warn};

use crate::error::SignatureError;

/// State shared by the reader and every worker for one run.
///
/// `aborted` only ever goes from `false` to `true`. The first error recorded
/// wins; errors raised by other threads while the run winds down are dropped.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    aborted: AtomicBool,
    first_error: OnceLock<SignatureError>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once any thread has hit a fatal error.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Records `err` if it is the first one and raises the abort flag.
    pub fn abort(&self, err: SignatureError) {
        match self.first_error.set(err) {
            Ok(()) => {
                if let Some(err) = self.first_error.get() {
                    warn!(error = %err, "aborting signature run");
                }
            }
            Err(secondary) => trace!(error = %secondary, "dropping error raised during abort"),
        }
        self.aborted.store(true, Ordering::Release);
    }

    /// Consumes the state, yielding the first recorded error if any.
    pub fn into_result(self) -> Result<(), SignatureError> {
        match self.first_error.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
