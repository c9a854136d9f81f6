//! Minimax AI with alpha-beta pruning and fractional depth budgeting

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::Hex;
use crate::eval::{evaluate, Weights};
use crate::game::{GameResult, GameState, Player};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Base score for a decided game (adjusted by remaining depth so faster
/// wins and slower losses score higher).
pub const TERMINAL_VALUE: f32 = 2_000_000.0;

/// Sentinel for an actor with no legal move; stalling is strongly
/// unfavorable to the stalled side.
pub const STALL_VALUE: f32 = 1_000_000.0;

/// Depth cost of a move that keeps the mover's turn. A full turn pass
/// costs 1.0, so cascading lines are searched deeper.
const CONTINUATION_COST: f32 = 0.5;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// AI difficulty presets: search depth, weights, and move-selection policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 3.0,
            Difficulty::Hard => 5.0,
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            Difficulty::Easy => Weights {
                w_core: 200_000.0,
                w_territory: 10.0,
                w_energy: 5.0,
                w_chain: 0.0,
            },
            Difficulty::Normal => Weights {
                w_core: 200_000.0,
                w_territory: 15.0,
                w_energy: 10.0,
                w_chain: 20.0,
            },
            Difficulty::Hard => Weights {
                w_core: 200_000.0,
                w_territory: 15.0,
                w_energy: 12.0,
                w_chain: 45.0,
            },
        }
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Minimax over the move tree from `root`'s perspective.
///
/// `depth` is a real-valued budget: a move that keeps the mover's turn
/// costs half a ply, a move that passes it costs a full ply. When a move
/// continues the current actor's turn, the child frame keeps this frame's
/// `maximizing` flag; otherwise it is negated.
pub fn minimax<R: Rng + ?Sized>(
    state: &GameState,
    depth: f32,
    mut alpha: f32,
    mut beta: f32,
    maximizing: bool,
    root: Player,
    weights: &Weights,
    rng: &mut R,
) -> f32 {
    // Terminal check comes before the depth check, on every call
    match state.result() {
        GameResult::Ongoing => {}
        GameResult::Draw => return 0.0,
        GameResult::P1Wins => {
            return if root == Player::P1 {
                TERMINAL_VALUE + depth
            } else {
                -TERMINAL_VALUE - depth
            };
        }
        GameResult::P2Wins => {
            return if root == Player::P2 {
                TERMINAL_VALUE + depth
            } else {
                -TERMINAL_VALUE - depth
            };
        }
    }

    if depth <= 0.0 {
        return evaluate(state, root, weights);
    }

    let actor = if maximizing { root } else { root.opponent() };
    let candidates = state.candidate_moves(actor);
    if candidates.is_empty() {
        return if maximizing { -STALL_VALUE } else { STALL_VALUE };
    }

    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };

    for target in candidates {
        let mut child = state.clone();
        let continues = child.apply_move(target, actor, rng);
        let child_depth = depth - if continues { CONTINUATION_COST } else { 1.0 };
        let child_maximizing = if continues { maximizing } else { !maximizing };

        let value = minimax(
            &child,
            child_depth,
            alpha,
            beta,
            child_maximizing,
            root,
            weights,
            rng,
        );

        if maximizing {
            best = best.max(value);
            alpha = alpha.max(value);
        } else {
            best = best.min(value);
            beta = beta.min(value);
        }
        if beta <= alpha {
            break;
        }
    }

    best
}

/// Score every root candidate for `player`, best first. Each root move is
/// searched with a fresh full window so all values are comparable.
pub fn score_moves<R: Rng + ?Sized>(
    state: &GameState,
    depth: f32,
    player: Player,
    weights: &Weights,
    rng: &mut R,
) -> Vec<(Hex, f32)> {
    let mut scored = Vec::new();

    for target in state.candidate_moves(player) {
        let mut child = state.clone();
        let continues = child.apply_move(target, player, rng);
        let child_depth = depth - if continues { CONTINUATION_COST } else { 1.0 };

        let value = minimax(
            &child,
            child_depth,
            f32::NEG_INFINITY,
            f32::INFINITY,
            continues,
            player,
            weights,
            rng,
        );
        scored.push((target, value));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

/// Best move and its value for `player`, or None if they cannot move
pub fn search<R: Rng + ?Sized>(
    state: &GameState,
    depth: f32,
    player: Player,
    weights: &Weights,
    rng: &mut R,
) -> Option<(Hex, f32)> {
    score_moves(state, depth, player, weights, rng).into_iter().next()
}

// ============================================================================
// ENGINE
// ============================================================================

/// Seeded minimax engine with difficulty-based move selection
pub struct MinimaxAi {
    pub depth: f32,
    pub weights: Weights,
    difficulty: Difficulty,
    rng: ChaCha8Rng,
}

impl MinimaxAi {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, 42)
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            depth: difficulty.depth(),
            weights: difficulty.weights(),
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Custom depth and weights; always plays the strongest move
    pub fn custom(depth: f32, weights: Weights, seed: u64) -> Self {
        Self {
            depth,
            weights,
            difficulty: Difficulty::Hard,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a move for `player` on the current board.
    ///
    /// Hard always plays the top move; Normal picks among the top three
    /// with 60/30/10 odds; Easy picks uniformly among the top five.
    pub fn best_move(&mut self, state: &GameState, player: Player) -> Option<(Hex, f32)> {
        let scored = score_moves(state, self.depth, player, &self.weights, &mut self.rng);
        if scored.is_empty() {
            return None;
        }

        let index = match self.difficulty {
            Difficulty::Hard => 0,
            Difficulty::Normal => {
                let roll: f32 = self.rng.gen();
                if roll < 0.6 || scored.len() < 2 {
                    0
                } else if roll < 0.9 || scored.len() < 3 {
                    1
                } else {
                    2
                }
            }
            Difficulty::Easy => self.rng.gen_range(0..scored.len().min(5)),
        };

        Some(scored[index])
    }

    /// Static evaluation for `player`
    pub fn evaluate(&self, state: &GameState, player: Player) -> f32 {
        evaluate(state, player, &self.weights)
    }
}

// ============================================================================
// TESTS
// ============================================================================
