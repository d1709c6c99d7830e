#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use blocksig::{BlockDigest, Md5, SignatureConfig, Signer, blocks_count};

fuzz_target!(|input: (u16, u8, Vec<u8>)| {
    let (block_size, workers, data) = input;
    let block_size = usize::from(block_size).max(1);
    let workers = usize::from(workers % 8) + 1;

    let config = SignatureConfig::new(block_size, workers).unwrap();
    let sig = Signer::new(config, Md5).sign(Cursor::new(&data)).unwrap();

    // Verify: one digest per block
    assert_eq!(
        sig.block_count() as u64,
        blocks_count(data.len() as u64, block_size as u64)
    );

    // Verify: matches a sequential, single-threaded computation
    for (block, digest) in data.chunks(block_size).zip(sig.blocks()) {
        let mut expected = [0u8; Md5::SIZE];
        Md5.digest_into(block, &mut expected).unwrap();
        assert_eq!(digest, expected);
    }

    // Verify: worker count never changes the result
    let single = SignatureConfig::new(block_size, 1).unwrap();
    let sig1 = Signer::new(single, Md5).sign(Cursor::new(&data)).unwrap();
    assert_eq!(sig, sig1);
});
