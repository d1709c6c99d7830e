//! Slot pool and job queue.
//!
//! A fixed set of block-sized buffers circulates between the reader and the
//! hashing workers for the whole run. It is an implementation detail and not
//! part of the public API.

mod pool;

pub(crate) use pool::{Slot, SlotFeeder, SlotPool, SlotTaker};
