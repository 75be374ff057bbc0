use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use timelock_rsw::{CancellationToken, MaskMode, PuzzleRsw, TimelockConfig, TimelockRsw};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Xor,
    Add,
}

impl From<ModeArg> for MaskMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Xor => MaskMode::Xor,
            ModeArg::Add => MaskMode::Add,
        }
    }
}

/// Lock a key behind sequential squarings, then unlock it the slow way.
#[derive(Debug, Parser)]
#[command(name = "timelock-rsw", version)]
struct Args {
    /// Modulus size in bits
    #[arg(long, default_value_t = 2048)]
    bits: u32,

    /// Number of sequential squarings
    #[arg(long, short = 't', default_value_t = 100_000)]
    duration: u64,

    #[arg(long, default_value_t = 2)]
    base: u64,

    /// Secret to lock, as UTF-8
    #[arg(long, default_value = "attack at dawn")]
    key: String,

    #[arg(long, value_enum, default_value_t = ModeArg::Xor)]
    mode: ModeArg,

    /// Abort the solve after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = TimelockConfig {
        modulus_bits: args.bits,
        mask_mode: args.mode.into(),
        ..TimelockConfig::get_default()
    };

    let start = Instant::now();
    let mut timelock = TimelockRsw::with_config(args.key.as_bytes(), args.base, &config)?;
    info!(elapsed = ?start.elapsed(), bits = args.bits, "Modulus generated");

    let start = Instant::now();
    let (puzzle, answer) = timelock.setup(args.duration)?;
    timelock.forget_primes();
    info!(elapsed = ?start.elapsed(), duration = args.duration, "Puzzle created");

    let encoded = puzzle.to_bytes();
    println!("Puzzle record: {} bytes", encoded.len());
    let received = PuzzleRsw::from_bytes(&encoded)?;

    let token = match args.timeout_secs {
        Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
        None => CancellationToken::new(),
    };

    let start = Instant::now();
    let solved = received.solve_with(&token)?;
    let elapsed = start.elapsed();
    info!(?elapsed, "Puzzle solved");

    if solved != answer {
        bail!("recovered key does not match the locked key");
    }
    println!(
        "Recovered {:?} after {} squarings in {:?}",
        String::from_utf8_lossy(&solved),
        args.duration,
        elapsed
    );

    Ok(())
}
