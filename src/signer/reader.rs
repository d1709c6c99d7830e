//! The reader: turns a sequential stream into published blocks.

use std::io::Read;
use std::slice::ChunksExactMut;

use tracing::{debug, trace};

use crate::block::block_len;
use crate::buffer::SlotFeeder;
use crate::error::SignatureError;

use super::state::RunState;

/// Progress callback: `(total_blocks, blocks_read)`.
pub type Progress<'a> = &'a mut dyn FnMut(u64, u64);

/// Reads `blocks` blocks from `input` into pool slots, in order.
pub(crate) struct BlockReader<'a, R> {
    input: R,
    file_size: u64,
    block_size: usize,
    blocks: u64,
    progress: Option<Progress<'a>>,
}

impl<'a, R: Read> BlockReader<'a, R> {
    pub fn new(
        input: R,
        file_size: u64,
        block_size: usize,
        blocks: u64,
        progress: Option<Progress<'a>>,
    ) -> Self {
        Self {
            input,
            file_size,
            block_size,
            blocks,
            progress,
        }
    }

    /// Runs the read loop to completion or abort, then closes the pool.
    ///
    /// `targets` yields the output range of each block in block order. Errors
    /// are recorded in `state` rather than returned.
    pub fn run<'out>(
        mut self,
        mut feeder: SlotFeeder<'out>,
        mut targets: ChunksExactMut<'out, u8>,
        state: &RunState,
    ) -> u64 {
        let mut staging = Vec::new();
        let mut read = 0u64;

        while read != self.blocks && !state.is_aborted() {
            if let Err(err) = self.read_block(read, &mut staging, &feeder, &mut targets) {
                state.abort(err);
                break;
            }
            read += 1;
            if let Some(progress) = self.progress.as_mut() {
                progress(self.blocks, read);
            }
        }

        feeder.close();
        debug!(read, blocks = self.blocks, "reader finished");
        read
    }

    fn read_block<'out>(
        &mut self,
        number: u64,
        staging: &mut Vec<u8>,
        feeder: &SlotFeeder<'out>,
        targets: &mut ChunksExactMut<'out, u8>,
    ) -> Result<(), SignatureError> {
        let blocks = self.blocks;
        let size_changed = move || SignatureError::SizeChanged {
            block: number,
            blocks,
        };
        let len = block_len(self.file_size, self.block_size as u64, number)
            .ok_or_else(size_changed)? as usize;

        staging.clear();
        staging
            .try_reserve_exact(len)
            .map_err(|source| SignatureError::Alloc { bytes: len, source })?;
        staging.resize(len, 0);
        self.input
            .read_exact(staging)
            .map_err(|source| SignatureError::Read {
                block: number,
                source,
            })?;

        let target = targets.next().ok_or_else(size_changed)?;

        let mut slot = feeder.allocate()?;
        slot.swap_payload(staging);
        slot.set_number(number);
        slot.set_target(target);
        trace!(block = number, slot = slot.index(), len, "publishing block");
        feeder.publish(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SlotPool;
    use std::io::{self, Cursor};

    fn drain(taker: &crate::buffer::SlotTaker<'_>) -> Vec<(u64, Vec<u8>)> {
        let mut blocks = Vec::new();
        while let Some(slot) = taker.take() {
            blocks.push((slot.number(), slot.payload().to_vec()));
            taker.free(slot);
        }
        blocks
    }

    #[test]
    fn test_reads_blocks_in_order_with_short_tail() {
        let mut output = [0u8; 3];
        let (feeder, taker) = SlotPool::new(4, 4).unwrap();
        let state = RunState::new();
        let reader = BlockReader::new(Cursor::new(b"0123456789".to_vec()), 10, 4, 3, None);

        let read = reader.run(feeder, output.chunks_exact_mut(1), &state);
        assert_eq!(read, 3);
        assert!(!state.is_aborted());

        let blocks = drain(&taker);
        assert_eq!(
            blocks,
            vec![
                (0, b"0123".to_vec()),
                (1, b"4567".to_vec()),
                (2, b"89".to_vec()),
            ]
        );
    }

    #[test]
    fn test_progress_is_reported_per_block() {
        let mut output = [0u8; 3];
        let (feeder, taker) = SlotPool::new(4, 4).unwrap();
        let state = RunState::new();
        let mut calls = Vec::new();
        let mut progress = |total: u64, done: u64| calls.push((total, done));

        let reader = BlockReader::new(
            Cursor::new(vec![7u8; 10]),
            10,
            4,
            3,
            Some(&mut progress),
        );
        reader.run(feeder, output.chunks_exact_mut(1), &state);
        drop(taker);

        assert_eq!(calls, vec![(3, 1), (3, 2), (3, 3)]);
    }

    #[test]
    fn test_short_read_aborts() {
        let mut output = [0u8; 3];
        let (feeder, taker) = SlotPool::new(4, 4).unwrap();
        let state = RunState::new();

        // Claims 10 bytes, delivers 6.
        let reader = BlockReader::new(Cursor::new(vec![1u8; 6]), 10, 4, 3, None);
        let read = reader.run(feeder, output.chunks_exact_mut(1), &state);

        assert_eq!(read, 1);
        assert!(state.is_aborted());
        assert_eq!(drain(&taker).len(), 1);
        match state.into_result() {
            Err(SignatureError::Read { block, source }) => {
                assert_eq!(block, 1);
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_stops_when_already_aborted() {
        let mut output = [0u8; 3];
        let (feeder, taker) = SlotPool::new(4, 4).unwrap();
        let state = RunState::new();
        state.abort(SignatureError::Disconnected);

        let reader = BlockReader::new(Cursor::new(vec![0u8; 10]), 10, 4, 3, None);
        assert_eq!(reader.run(feeder, output.chunks_exact_mut(1), &state), 0);
        assert!(taker.take().is_none());
    }

    #[test]
    fn test_missing_output_range_is_size_change() {
        let mut output = [0u8; 1];
        let (feeder, _taker) = SlotPool::new(4, 4).unwrap();
        let state = RunState::new();

        let reader = BlockReader::new(Cursor::new(vec![0u8; 8]), 8, 4, 2, None);
        assert_eq!(reader.run(feeder, output.chunks_exact_mut(1), &state), 1);
        assert!(matches!(
            state.into_result(),
            Err(SignatureError::SizeChanged { block: 1, blocks: 2 })
        ));
    }
}
