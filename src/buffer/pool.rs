//! Fixed-capacity slot pool shared by the reader and the hashing workers.
//!
//! Two bounded channels carry [`Slot`]s:
//!
//! ```text
//!            allocate()            publish()
//!   free ───────────────► reader ─────────────► ready
//!    ▲                                            │
//!    │        free()                   take()     │
//!    └──────────────────── worker ◄───────────────┘
//! ```
//!
//! Both channels are sized to the pool, so a send never waits on a slot that
//! does not exist. The reader blocks in `allocate()` when every slot is loaded
//! or in flight, which caps how far it can run ahead of the workers.
//!
//! A loaded slot also carries the output range its digest belongs in. The
//! range moves with the slot, so the worker holding the slot is the only
//! party able to write it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::error::SignatureError;

/// A reusable block buffer.
///
/// Owned by exactly one party at a time: the free list, the ready queue, the
/// reader filling it, or the worker hashing it.
#[derive(Debug)]
pub(crate) struct Slot<'out> {
    index: usize,
    number: u64,
    payload: Vec<u8>,
    target: &'out mut [u8],
}

impl<'out> Slot<'out> {
    /// Returns the slot's position in the pool.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the block index last stamped by the reader.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Stamps the block index this slot now carries.
    pub fn set_number(&mut self, number: u64) {
        self.number = number;
    }

    /// Returns the loaded bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Swaps `buf` with the slot's buffer.
    ///
    /// The reader hands over freshly read bytes and gets the slot's previous
    /// allocation back for the next read.
    pub fn swap_payload(&mut self, buf: &mut Vec<u8>) {
        std::mem::swap(&mut self.payload, buf);
    }

    /// Attaches the output range for the block this slot carries.
    pub fn set_target(&mut self, target: &'out mut [u8]) {
        self.target = target;
    }

    /// Detaches the output range, leaving an empty one behind.
    pub fn take_target(&mut self) -> &'out mut [u8] {
        std::mem::take(&mut self.target)
    }
}

/// Constructor for the two halves of a pool.
pub(crate) struct SlotPool;

impl SlotPool {
    /// Creates a pool of `size` slots, each with room for `capacity` bytes.
    ///
    /// All slots start on the free list. Fails with
    /// [`SignatureError::Alloc`] if the buffers cannot be reserved.
    pub fn new<'out>(
        size: usize,
        capacity: usize,
    ) -> Result<(SlotFeeder<'out>, SlotTaker<'out>), SignatureError> {
        debug_assert!(size > 0, "slot pool must not be empty");

        let (free_tx, free_rx) = bounded(size);
        let (ready_tx, ready_rx) = bounded(size);
        let active = Arc::new(AtomicBool::new(true));

        for index in 0..size {
            let mut payload = Vec::new();
            payload
                .try_reserve_exact(capacity)
                .map_err(|source| SignatureError::Alloc {
                    bytes: capacity,
                    source,
                })?;
            let slot = Slot {
                index,
                number: 0,
                payload,
                target: &mut [],
            };
            // The free list holds exactly `size` slots.
            free_tx
                .try_send(slot)
                .map_err(|_| SignatureError::Disconnected)?;
        }

        let feeder = SlotFeeder {
            free: free_rx,
            ready: Some(ready_tx),
            active: Arc::clone(&active),
        };
        let taker = SlotTaker {
            ready: ready_rx,
            free: free_tx,
            active,
        };
        Ok((feeder, taker))
    }
}

/// Reader side of the pool.
#[derive(Debug)]
pub(crate) struct SlotFeeder<'out> {
    free: Receiver<Slot<'out>>,
    ready: Option<Sender<Slot<'out>>>,
    active: Arc<AtomicBool>,
}

impl<'out> SlotFeeder<'out> {
    /// Waits for a free slot.
    ///
    /// Fails with [`SignatureError::Disconnected`] once every worker has gone,
    /// which only happens when the run is aborting.
    pub fn allocate(&self) -> Result<Slot<'out>, SignatureError> {
        self.free.recv().map_err(|_| SignatureError::Disconnected)
    }

    /// Queues a loaded slot for hashing, waiting while the ready queue is full.
    pub fn publish(&self, slot: Slot<'out>) -> Result<(), SignatureError> {
        let ready = self.ready.as_ref().ok_or(SignatureError::Disconnected)?;
        ready.send(slot).map_err(|_| SignatureError::Disconnected)
    }

    /// Marks the pool inactive.
    ///
    /// Slots already queued are still handed out by [`SlotTaker::take`];
    /// end-of-input is signalled only once the queue is drained.
    pub fn close(&mut self) {
        self.active.store(false, Ordering::Release);
        self.ready = None;
    }
}

impl Drop for SlotFeeder<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Worker side of the pool. Cloned once per worker.
#[derive(Debug, Clone)]
pub(crate) struct SlotTaker<'out> {
    ready: Receiver<Slot<'out>>,
    free: Sender<Slot<'out>>,
    active: Arc<AtomicBool>,
}

impl<'out> SlotTaker<'out> {
    /// Waits for a loaded slot.
    ///
    /// Returns `None` when the pool is closed and nothing is left to drain.
    pub fn take(&self) -> Option<Slot<'out>> {
        self.ready.recv().ok()
    }

    /// Returns a slot to the free list.
    pub fn free(&self, slot: Slot<'out>) {
        // The reader is gone once the free list is disconnected; the slot
        // simply drops with the rest of the pool.
        let _ = self.free.send(slot);
    }

    /// Returns `true` while the reader may still publish slots.
    ///
    /// Informational only. [`take`](Self::take) ends on the closed ready
    /// queue, never on this flag, so queued slots are always drained.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
