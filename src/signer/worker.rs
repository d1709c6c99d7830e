//! Hashing workers.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use crate::buffer::{Slot, SlotTaker};
use crate::error::SignatureError;
use crate::hash::BlockDigest;

use super::state::RunState;

/// One hashing worker.
///
/// Pulls loaded slots until end-of-input or abort, writes each digest into the
/// output range the slot carries, and hands the slot back to the free list.
pub(crate) struct Worker<'a, 'out, D: ?Sized> {
    id: usize,
    taker: SlotTaker<'out>,
    digest: &'a D,
    blocks: u64,
    state: &'a RunState,
}

impl<'a, 'out, D: BlockDigest + ?Sized> Worker<'a, 'out, D> {
    pub fn new(
        id: usize,
        taker: SlotTaker<'out>,
        digest: &'a D,
        blocks: u64,
        state: &'a RunState,
    ) -> Self {
        Self {
            id,
            taker,
            digest,
            blocks,
            state,
        }
    }

    /// Runs until the pool drains or the run aborts. Returns blocks hashed.
    ///
    /// A panic in the digest is recorded as a fatal error before this worker
    /// releases its end of the pool.
    pub fn run(self) -> u64 {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_loop()));
        let hashed = match outcome {
            Ok(hashed) => hashed,
            Err(_) => {
                self.state
                    .abort(SignatureError::WorkerPanicked { worker: self.id });
                0
            }
        };
        debug!(worker = self.id, hashed, "worker finished");
        hashed
    }

    fn run_loop(&self) -> u64 {
        let mut hashed = 0;
        loop {
            if self.state.is_aborted() {
                trace!(worker = self.id, "run aborted");
                return hashed;
            }

            let Some(mut slot) = self.taker.take() else {
                trace!(worker = self.id, active = self.taker.is_active(), "end of input");
                return hashed;
            };

            if let Err(err) = self.hash_slot(&mut slot) {
                self.state.abort(err);
                return hashed;
            }
            hashed += 1;
            self.taker.free(slot);
        }
    }

    fn hash_slot(&self, slot: &mut Slot<'out>) -> Result<(), SignatureError> {
        let number = slot.number();
        if number >= self.blocks {
            return Err(SignatureError::SizeChanged {
                block: number,
                blocks: self.blocks,
            });
        }

        let target = slot.take_target();
        trace!(worker = self.id, block = number, len = slot.payload().len(), "hashing block");
        self.digest
            .digest_into(slot.payload(), target)
            .map_err(|source| SignatureError::Digest {
                block: number,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SlotPool;
    use crate::error::DigestError;

    /// Writes the first payload byte and the payload length.
    struct FirstByte;

    impl BlockDigest for FirstByte {
        fn output_len(&self) -> usize {
            2
        }

        fn digest_into(&self, data: &[u8], out: &mut [u8]) -> Result<(), DigestError> {
            out[0] = data.first().copied().unwrap_or(0);
            out[1] = data.len() as u8;
            Ok(())
        }
    }

    struct Failing;

    impl BlockDigest for Failing {
        fn output_len(&self) -> usize {
            2
        }

        fn digest_into(&self, _data: &[u8], _out: &mut [u8]) -> Result<(), DigestError> {
            Err(DigestError::new("no digest today"))
        }
    }

    struct Panicking;

    impl BlockDigest for Panicking {
        fn output_len(&self) -> usize {
            2
        }

        fn digest_into(&self, _data: &[u8], _out: &mut [u8]) -> Result<(), DigestError> {
            panic!("digest exploded");
        }
    }

    fn load<'out>(
        pool: &crate::buffer::SlotFeeder<'out>,
        number: u64,
        payload: &[u8],
        target: &'out mut [u8],
    ) {
        let mut slot = pool.allocate().unwrap();
        let mut buf = payload.to_vec();
        slot.swap_payload(&mut buf);
        slot.set_number(number);
        slot.set_target(target);
        pool.publish(slot).unwrap();
    }

    #[test]
    fn test_hashes_into_carried_ranges() {
        let mut output = [0u8; 4];
        let state = RunState::new();
        {
            let (mut feeder, taker) = SlotPool::new(2, 4).unwrap();
            let mut ranges = output.chunks_exact_mut(2);
            load(&feeder, 0, b"abcd", ranges.next().unwrap());
            load(&feeder, 1, b"xy", ranges.next().unwrap());
            feeder.close();

            let hashed = Worker::new(0, taker, &FirstByte, 2, &state).run();
            assert_eq!(hashed, 2);
        }
        assert!(!state.is_aborted());
        assert_eq!(output, [b'a', 4, b'x', 2]);
    }

    #[test]
    fn test_out_of_range_block_aborts() {
        let mut output = [0u8; 2];
        let state = RunState::new();
        {
            let (mut feeder, taker) = SlotPool::new(1, 4).unwrap();
            load(&feeder, 5, b"abcd", &mut output);
            feeder.close();
            assert_eq!(Worker::new(0, taker, &FirstByte, 1, &state).run(), 0);
        }
        assert_eq!(output, [0, 0], "nothing written out of range");
        assert!(matches!(
            state.into_result(),
            Err(SignatureError::SizeChanged { block: 5, blocks: 1 })
        ));
    }

    #[test]
    fn test_digest_error_aborts() {
        let mut output = [0u8; 2];
        let state = RunState::new();
        {
            let (mut feeder, taker) = SlotPool::new(1, 4).unwrap();
            load(&feeder, 0, b"abcd", &mut output);
            feeder.close();
            Worker::new(0, taker, &Failing, 1, &state).run();
        }
        assert!(matches!(
            state.into_result(),
            Err(SignatureError::Digest { block: 0, .. })
        ));
    }

    #[test]
    fn test_digest_panic_is_recorded() {
        let mut output = [0u8; 2];
        let state = RunState::new();
        {
            let (mut feeder, taker) = SlotPool::new(1, 4).unwrap();
            load(&feeder, 0, b"abcd", &mut output);
            feeder.close();
            Worker::new(3, taker, &Panicking, 1, &state).run();
        }
        assert!(matches!(
            state.into_result(),
            Err(SignatureError::WorkerPanicked { worker: 3 })
        ));
    }

    #[test]
    fn test_aborted_worker_takes_nothing() {
        let mut output = [0u8; 2];
        let state = RunState::new();
        state.abort(SignatureError::Disconnected);
        {
            let (mut feeder, taker) = SlotPool::new(1, 4).unwrap();
            load(&feeder, 0, b"abcd", &mut output);
            feeder.close();
            assert_eq!(Worker::new(0, taker.clone(), &FirstByte, 1, &state).run(), 0);
            assert!(taker.take().is_some(), "job left queued");
        }
        assert_eq!(output, [0, 0]);
    }
}
