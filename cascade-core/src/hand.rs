//! Per-player hands of delta vectors
//!
//! A hand is an ordered set of exactly 7 vectors: one large self-vector at
//! the target itself plus six unit vectors on the neighboring cells. The
//! hand is never resized; its magnitudes drift over the game through the
//! rebalancing rule applied after every move.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::DIRECTIONS;
use crate::game::Player;

/// Number of vectors in a hand
pub const HAND_SIZE: usize = 7;

/// Lower bound on a vector's absolute magnitude
pub const MIN_MAGNITUDE: i8 = 1;

/// Upper bound on a vector's absolute magnitude
pub const MAX_MAGNITUDE: i8 = 5;

/// Seed magnitude of the (0,0) self-vector
const CENTER_MAGNITUDE: i8 = 3;

/// A single delta vector: adds `dh` to the cell at target + (dq, dr)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandVector {
    pub dq: i32,
    pub dr: i32,
    pub dh: i8,
}

/// Rebalancing rule selected by whether the move caused a burst
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationPattern {
    /// Burst occurred: spread magnitude out
    Diffuse,
    /// Quiet move: concentrate magnitude
    Focus,
}

/// Ordered set of exactly [`HAND_SIZE`] vectors for one player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    vectors: [HandVector; HAND_SIZE],
}

impl Hand {
    /// Starting hand: (0,0) self-vector of magnitude 3 plus six unit
    /// neighbor vectors. P1 magnitudes are positive, P2 the negation.
    pub fn new(player: Player) -> Self {
        let sign = player.sign();
        let mut vectors = [HandVector {
            dq: 0,
            dr: 0,
            dh: sign * CENTER_MAGNITUDE,
        }; HAND_SIZE];
        for (v, &(dq, dr)) in vectors[1..].iter_mut().zip(DIRECTIONS.iter()) {
            *v = HandVector { dq, dr, dh: sign };
        }
        Self { vectors }
    }

    pub fn vectors(&self) -> &[HandVector; HAND_SIZE] {
        &self.vectors
    }

    /// Rebalance two distinct random vectors. Guards keep every magnitude
    /// within [MIN_MAGNITUDE, MAX_MAGNITUDE]; the sign never flips.
    pub(crate) fn rebalance<R: Rng + ?Sized>(
        &mut self,
        player: Player,
        pattern: MutationPattern,
        rng: &mut R,
    ) {
        let a = rng.gen_range(0..HAND_SIZE);
        let mut b = rng.gen_range(0..HAND_SIZE);
        while b == a {
            b = rng.gen_range(0..HAND_SIZE);
        }

        let change = player.sign();
        match pattern {
            MutationPattern::Diffuse => {
                if self.vectors[a].dh.abs() > MIN_MAGNITUDE {
                    self.vectors[a].dh -= change;
                }
                if self.vectors[b].dh.abs() < MAX_MAGNITUDE {
                    self.vectors[b].dh += change;
                }
            }
            MutationPattern::Focus => {
                if self.vectors[a].dh.abs() < MAX_MAGNITUDE {
                    self.vectors[a].dh += change;
                }
                if self.vectors[b].dh.abs() > MIN_MAGNITUDE {
                    self.vectors[b].dh -= change;
                }
            }
        }
    }

    /// Strengthen one random vector toward the player's sign. Silently does
    /// nothing if the chosen vector is already saturated.
    pub(crate) fn buff_random<R: Rng + ?Sized>(&mut self, player: Player, rng: &mut R) {
        let v = &mut self.vectors[rng.gen_range(0..HAND_SIZE)];
        if v.dh.abs() < MAX_MAGNITUDE {
            v.dh += player.sign();
        }
    }
}
