//! CASCADE CLI - Command-line interface
//!
//! Commands:
//! - play: run AI-vs-AI matches
//! - weights: write a difficulty's weight preset to a JSON file

use clap::{Parser, Subcommand, ValueEnum};

use cascade_core::Difficulty;

mod match_cmd;
mod weights_cmd;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "CASCADE hex territory game - match runner")]
struct Cli {
    /// RNG seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play AI-vs-AI matches
    Play(match_cmd::MatchArgs),
    /// Write a weight preset to a JSON file
    Weights(weights_cmd::WeightsArgs),
}

/// Difficulty as a CLI value
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => match_cmd::run(args, cli.seed),
        Commands::Weights(args) => weights_cmd::run(args),
    }
}
