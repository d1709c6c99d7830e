#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use blocksig::{Md5, SignatureError, signature_with};

/// Claims `extra` more bytes than it can deliver.
struct Truncated {
    data: Cursor<Vec<u8>>,
    extra: u64,
}

impl Read for Truncated {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Seek for Truncated {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::End(0) => Ok(self.data.get_ref().len() as u64 + self.extra),
            other => self.data.seek(other),
        }
    }
}

fuzz_target!(|input: (u8, u8, u8, Vec<u8>)| {
    let (block_size, workers, extra, data) = input;
    let block_size = usize::from(block_size).max(1);
    let workers = usize::from(workers % 8) + 1;
    let extra = u64::from(extra).max(1);

    let input = Truncated {
        data: Cursor::new(data),
        extra,
    };

    // Verify: a stream shorter than its reported length never yields a signature
    match signature_with(input, block_size, workers, Md5, None) {
        Err(SignatureError::Read { .. }) => {}
        other => panic!("expected read error, got {:?}", other),
    }
});
