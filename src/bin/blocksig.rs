//! blocksig: write the block signature of a file.
//!
//!   blocksig -i <input> -o <output> [-b <block size>] [-j <workers>] [--digest md5-hex|md5|blake3]
//!
//! Progress is printed to stderr. A failed run never leaves an output file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use blocksig::{
    BlockDigest, Blake3, DEFAULT_BLOCK_SIZE, Md5, Md5Hex, SignatureConfig, Signer, default_workers,
};

#[derive(Parser, Debug)]
#[command(
    name = "blocksig",
    version,
    about = "Compute a fixed-size block signature of a file"
)]
struct Cli {
    /// File to sign
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Where to write the signature
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Reading block size in bytes
    #[arg(long = "block", short = 'b', default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Hashing threads (default: available parallelism)
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Per-block digest
    #[arg(long, value_enum, default_value_t = DigestKind::Md5Hex)]
    digest: DigestKind,

    /// Do not print progress
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DigestKind {
    /// MD5 as 32 hex characters per block
    Md5Hex,
    /// Raw 16-byte MD5 per block
    Md5,
    /// Raw 32-byte BLAKE3 per block
    Blake3,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SignatureConfig::new(cli.block_size, cli.jobs.unwrap_or_else(default_workers))
        .context("Failed. Reason")?;

    match cli.digest {
        DigestKind::Md5Hex => sign(cli, config, Md5Hex),
        DigestKind::Md5 => sign(cli, config, Md5),
        DigestKind::Blake3 => sign(cli, config, Blake3),
    }
}

fn sign<D: BlockDigest>(cli: &Cli, config: SignatureConfig, digest: D) -> Result<()> {
    let file = match File::open(&cli.input) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!("File {} not found.", cli.input.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Unable to open {}", cli.input.display()));
        }
    };

    let signer = Signer::new(config, digest);
    let mut last_percent = None;
    let quiet = cli.quiet;
    let signature = signer
        .sign_with_progress(file, |total, done| {
            if quiet {
                return;
            }
            let percent = done * 100 / total;
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                eprint!("\rProcessed {}% ({}/{} blocks)", percent, done, total);
            }
        })
        .context("Failed. Reason")?;

    if !quiet && signature.block_count() > 0 {
        eprintln!();
    }

    save(&cli.output, signature.as_bytes())
        .with_context(|| format!("Unable to save file {}", cli.output.display()))
}

/// Writes through a sibling temp file so a partial write never looks like a signature.
fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);

    let written = File::create(&tmp)
        .and_then(|mut file| file.write_all(bytes).and_then(|()| file.sync_all()))
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
