//! File signing example.
//!
//! Run with:
//!     cargo run --example sign_file -- /path/to/file [block size]

use std::env;
use std::fs::File;

use blocksig::{Md5Hex, SignatureConfig, Signer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let block_size = match env::args().nth(2) {
        Some(arg) => arg.parse()?,
        None => 4 * 1024,
    };

    println!("Signing file: {}\n", path);

    let file = File::open(&path)?;
    println!("File size: {} bytes\n", file.metadata()?.len());

    let config = SignatureConfig::default().with_block_size(block_size);
    let signer = Signer::new(config, Md5Hex);
    println!(
        "Block size: {} bytes, workers: {}\n",
        config.block_size(),
        config.workers()
    );

    let signature = signer.sign(file)?;
    for (i, digest) in signature.blocks().enumerate() {
        println!(
            "Block {:>6}: offset={:>10}, md5={}",
            i,
            i * block_size,
            String::from_utf8_lossy(digest)
        );
    }

    println!(
        "\nTotal: {} blocks, {} signature bytes",
        signature.block_count(),
        signature.len()
    );

    Ok(())
}
