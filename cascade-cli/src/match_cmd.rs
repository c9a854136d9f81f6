//! Play command - run AI-vs-AI matches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_configs(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cascade_core::{Difficulty, GameResult, GameState, MinimaxAi, Player, Weights};

use crate::DifficultyArg;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// P1 difficulty preset
    #[arg(long, value_enum, default_value = "hard")]
    pub p1: DifficultyArg,

    /// P2 difficulty preset
    #[arg(long, value_enum, default_value = "hard")]
    pub p2: DifficultyArg,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Board size (hexagon of radius size-1)
    #[arg(long, default_value = "5")]
    pub size: i32,

    /// Weights JSON file overriding both presets
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,

    /// Search depth used with --weights
    #[arg(long, default_value = "4")]
    pub depth: f32,

    /// Maximum moves per game
    #[arg(long, default_value = "200")]
    pub max_moves: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// How one side's engine is built
#[derive(Clone, Debug)]
enum AiConfig {
    Preset(Difficulty),
    Custom { depth: f32, weights: Weights },
}

impl AiConfig {
    fn build(&self, seed: u64) -> MinimaxAi {
        match *self {
            AiConfig::Preset(difficulty) => MinimaxAi::with_seed(difficulty, seed),
            AiConfig::Custom { depth, weights } => MinimaxAi::custom(depth, weights, seed),
        }
    }
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    moves: u32,
    continuations: u32,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    p1_wins: usize,
    p2_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the play command
///
/// This function reads like a table of contents:
/// 1. Build both AI configurations
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (p1_config, p2_config) = build_configs(&args)?;

    tracing::info!(
        "Starting match: {:?} vs {:?} ({} games, size={})",
        args.p1,
        args.p2,
        args.games,
        args.size
    );

    let results = play_match(&p1_config, &p2_config, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build both AI configurations from the arguments
fn build_configs(args: &MatchArgs) -> Result<(AiConfig, AiConfig)> {
    if let Some(path) = &args.weights {
        let weights = Weights::load(path)
            .with_context(|| format!("failed to load weights: {}", path.display()))?;
        let config = AiConfig::Custom {
            depth: args.depth,
            weights,
        };
        return Ok((config.clone(), config));
    }

    Ok((
        AiConfig::Preset(args.p1.into()),
        AiConfig::Preset(args.p2.into()),
    ))
}

/// Play all games in the match
fn play_match(
    p1_config: &AiConfig,
    p2_config: &AiConfig,
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let record = play_single_game(p1_config, p2_config, game_num + 1, args, &mut rng)?;

        tracing::info!(
            "Game {}: {:?} ({} moves, {} continuations)",
            record.game_number,
            record.result,
            record.moves,
            record.continuations
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play a single game, honoring turn continuation
fn play_single_game(
    p1_config: &AiConfig,
    p2_config: &AiConfig,
    game_number: usize,
    args: &MatchArgs,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let mut state = GameState::new(args.size)?;
    let mut p1 = p1_config.build(rng.gen());
    let mut p2 = p2_config.build(rng.gen());
    let mut game_rng = ChaCha8Rng::seed_from_u64(rng.gen());

    let mut current = Player::P1;
    let mut moves = 0u32;
    let mut continuations = 0u32;
    let mut stalled_in_a_row = 0u8;

    while state.result() == GameResult::Ongoing && moves < args.max_moves {
        let ai = match current {
            Player::P1 => &mut p1,
            Player::P2 => &mut p2,
        };

        // A player with no territory passes; two passes in a row ends the
        // game where it stands
        let Some((target, value)) = ai.best_move(&state, current) else {
            stalled_in_a_row += 1;
            if stalled_in_a_row >= 2 {
                break;
            }
            current = current.opponent();
            continue;
        };
        stalled_in_a_row = 0;

        let continues = state.apply_move(target, current, &mut game_rng);
        moves += 1;

        tracing::debug!(
            "game {game_number}: {current:?} plays ({}, {}) value={value:.0} continues={continues}",
            target.q,
            target.r
        );

        if continues {
            continuations += 1;
        } else {
            current = current.opponent();
        }
    }

    Ok(GameRecord {
        game_number,
        result: state.result(),
        moves,
        continuations,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let p1_wins = games
        .iter()
        .filter(|g| g.result == GameResult::P1Wins)
        .count();
    let p2_wins = games
        .iter()
        .filter(|g| g.result == GameResult::P2Wins)
        .count();
    let draws = games.iter().filter(|g| g.result == GameResult::Draw).count();
    let unfinished = games
        .iter()
        .filter(|g| g.result == GameResult::Ongoing)
        .count();

    let total_moves: u32 = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        p1_wins,
        p2_wins,
        draws,
        unfinished,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or entropy
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: String,
        moves: u32,
        continuations: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        p1_wins: usize,
        p2_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        p1_wins: results.p1_wins,
        p2_wins: results.p2_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: format!("{:?}", g.result),
                moves: g.moves,
                continuations: g.continuations,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();
    let pct = |n: usize| {
        if total > 0 {
            n as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("P1 wins:     {} ({:.1}%)", results.p1_wins, pct(results.p1_wins));
    println!("P2 wins:     {} ({:.1}%)", results.p2_wins, pct(results.p2_wins));
    println!("Draws:       {} ({:.1}%)", results.draws, pct(results.draws));
    println!("Unfinished:  {}", results.unfinished);
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} moves ({} continuations)",
            game.game_number, game.result, game.moves, game.continuations
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, result: GameResult, moves: u32) -> GameRecord {
        GameRecord {
            game_number,
            result,
            moves,
            continuations: 0,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.p1_wins, 0);
        assert_eq!(results.p2_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameResult::P1Wins, 10),
            record(2, GameResult::P2Wins, 20),
            record(3, GameResult::P1Wins, 30),
            record(4, GameResult::Ongoing, 40),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.p1_wins, 2);
        assert_eq!(results.p2_wins, 1);
        assert_eq!(results.draws, 0);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_moves, 25.0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
