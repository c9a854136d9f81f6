//! CASCADE Core - Game engine and AI
//!
//! This crate provides the core game logic for CASCADE:
//! - Board geometry (hex grid with axial coordinates)
//! - Per-player hands of delta vectors
//! - Move resolution with burst cascades, chain rewards, and turn continuation
//! - Position evaluation with configurable weights
//! - Minimax AI with alpha-beta pruning and fractional depth budgeting

pub mod board;
pub mod hand;
pub mod game;
pub mod eval;
pub mod ai;
pub mod error;

// Re-exports for convenient access
pub use board::{Cell, Grid, Hex, DIRECTIONS, OVERFLOW_LIMIT};
pub use hand::{Hand, HandVector, HAND_SIZE, MAX_MAGNITUDE, MIN_MAGNITUDE};
pub use game::{
    ChainCounter, GameResult, GameState, Player, ENEMY_CHAIN_THRESHOLD, OWN_CHAIN_THRESHOLD,
};
pub use eval::{evaluate, Weights};
pub use ai::{minimax, score_moves, search, Difficulty, MinimaxAi, STALL_VALUE, TERMINAL_VALUE};
pub use error::CoreError;
