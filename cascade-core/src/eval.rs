//! Position evaluation

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::game::{GameState, Player};

/// Enemy-chain progress is worth triple the own-chain progress
const ENEMY_CHAIN_FACTOR: f32 = 3.0;

/// Evaluation weights.
///
/// Every key is required; a configuration file missing one fails at parse
/// time rather than falling back to a default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Value of holding a flag
    #[serde(rename = "W_CORE")]
    pub w_core: f32,
    /// Flat value of owning a cell
    #[serde(rename = "W_TERRITORY")]
    pub w_territory: f32,
    /// Value per unit of height on an owned cell
    #[serde(rename = "W_ENERGY")]
    pub w_energy: f32,
    /// Value per unit of chain progress
    #[serde(rename = "W_CHAIN")]
    pub w_chain: f32,
}

impl Weights {
    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weights file: {}", path.display()))?;
        let weights = serde_json::from_str(&content)
            .with_context(|| format!("malformed weights file: {}", path.display()))?;
        Ok(weights)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write weights file: {}", path.display()))?;
        Ok(())
    }
}

/// Score a board from `player`'s perspective
pub fn evaluate(state: &GameState, player: Player, weights: &Weights) -> f32 {
    let opponent = player.opponent();
    let mut score = 0.0f32;

    for (_, cell) in state.grid().iter() {
        // Flags
        if cell.has_flag {
            if cell.flag_owner == Some(player) {
                score += weights.w_core;
            } else if cell.flag_owner == Some(opponent) {
                score -= weights.w_core;
            }
        }

        // Territory and stored energy
        let value = weights.w_territory + cell.height.abs() as f32 * weights.w_energy;
        if cell.owner == Some(player) {
            score += value;
        } else if cell.owner == Some(opponent) {
            score -= value;
        }
    }

    // Chain progress toward the next reward
    let chain = state.chain(player);
    score += chain.own as f32 * weights.w_chain;
    score += chain.enemy as f32 * weights.w_chain * ENEMY_CHAIN_FACTOR;

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Hex};

    fn test_weights() -> Weights {
        Weights {
            w_core: 200_000.0,
            w_territory: 15.0,
            w_energy: 12.0,
            w_chain: 45.0,
        }
    }

    #[test]
    fn test_symmetric_board_scores_zero() {
        let state = GameState::new(5).unwrap();
        let w = test_weights();
        assert_eq!(evaluate(&state, Player::P1, &w), 0.0);
        assert_eq!(evaluate(&state, Player::P2, &w), 0.0);
    }

    #[test]
    fn test_territory_and_chains_counted() {
        let mut state = GameState::new(5).unwrap();
        state.grid_mut().set(
            Hex::new(0, 0),
            Cell {
                height: 4,
                owner: Some(Player::P1),
                has_flag: false,
                flag_owner: None,
            },
        );
        state.chain_mut(Player::P1).own = 2;
        state.chain_mut(Player::P1).enemy = 1;

        let w = test_weights();
        let score = evaluate(&state, Player::P1, &w);
        let expected = (15.0 + 4.0 * 12.0) + 2.0 * 45.0 + 1.0 * 45.0 * 3.0;
        assert_eq!(score, expected);

        // The same cell counts against the opponent, whose own chains are
        // clean
        assert_eq!(evaluate(&state, Player::P2, &w), -(15.0 + 4.0 * 12.0));
    }

    #[test]
    fn test_raising_a_weight_never_lowers_the_score() {
        // Board where every term is positive for P1
        let mut state = GameState::new(5).unwrap();
        state.grid_mut().set(
            Hex::new(0, 0),
            Cell {
                height: 5,
                owner: Some(Player::P1),
                has_flag: true,
                flag_owner: Some(Player::P1),
            },
        );
        state.chain_mut(Player::P1).own = 1;
        state.chain_mut(Player::P1).enemy = 1;

        let base = test_weights();
        let raised = [
            Weights { w_core: base.w_core + 100.0, ..base },
            Weights { w_territory: base.w_territory + 100.0, ..base },
            Weights { w_energy: base.w_energy + 100.0, ..base },
            Weights { w_chain: base.w_chain + 100.0, ..base },
        ];

        let score = evaluate(&state, Player::P1, &base);
        for w in &raised {
            assert!(evaluate(&state, Player::P1, w) >= score);
        }
    }

    #[test]
    fn test_missing_key_fails_parse() {
        let incomplete = r#"{"W_CORE": 1.0, "W_TERRITORY": 2.0, "W_ENERGY": 3.0}"#;
        assert!(serde_json::from_str::<Weights>(incomplete).is_err());

        let complete =
            r#"{"W_CORE": 1.0, "W_TERRITORY": 2.0, "W_ENERGY": 3.0, "W_CHAIN": 4.0}"#;
        let w: Weights = serde_json::from_str(complete).unwrap();
        assert_eq!(w.w_chain, 4.0);
    }
}
