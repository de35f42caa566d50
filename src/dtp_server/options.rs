use clap::Parser;

use crate::prelude::*;

/// Command-line configuration for the DTP front end.
#[derive(Clone, Debug, Parser)]
#[command(version, about = "A Blokus Duo engine speaking DTP over stdin/stdout.")]
pub struct DTPServerOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Side length of the square board (area is capped at 256 cells).
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub board_size: usize,

    /// Which seats the engine plays: "x", "o", "both", or "none".
    #[arg(short, long, default_value = "both")]
    pub ai_seats: String,

    /// Tie-break RNG seed; drawn from entropy when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl DTPServerOptions {
    /// Resolves `--ai-seats` into per-player flags, indexed by `Player`.
    pub fn ai_flags(&self) -> Result<[bool; 2]> {
        match self.ai_seats.to_lowercase().as_str() {
            "x" => Ok([true, false]),
            "o" => Ok([false, true]),
            "both" => Ok([true, true]),
            "none" => Ok([false, false]),
            other => Err(anyhow!("unrecognized seat selector {other}; use x, o, both or none")),
        }
    }
}
