//! Weights command - write difficulty presets to JSON files

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cascade_core::Difficulty;

use crate::DifficultyArg;

#[derive(Args)]
pub struct WeightsArgs {
    /// Difficulty preset to dump
    #[arg(long, value_enum, default_value = "hard")]
    pub difficulty: DifficultyArg,

    /// Output JSON file
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn run(args: WeightsArgs) -> Result<()> {
    let difficulty: Difficulty = args.difficulty.into();
    let weights = difficulty.weights();

    weights
        .save(&args.output)
        .with_context(|| format!("failed to write preset: {}", args.output.display()))?;

    tracing::info!(
        "Wrote {:?} weights (depth {}) to {}",
        args.difficulty,
        difficulty.depth(),
        args.output.display()
    );

    Ok(())
}
