//! Game state, chain tracking, and move resolution

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Grid, Hex, OVERFLOW_LIMIT};
use crate::error::CoreError;
use crate::hand::{Hand, MutationPattern};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Bursts of own or neutral cells needed for a hand reward
pub const OWN_CHAIN_THRESHOLD: u32 = 4;

/// Bursts of enemy cells needed for a flag reward
pub const ENEMY_CHAIN_THRESHOLD: u32 = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Height sign convention: P1 builds positive, P2 negative
    pub fn sign(self) -> i8 {
        match self {
            Player::P1 => 1,
            Player::P2 => -1,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }
}

/// Game result, decided by surviving flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    P1Wins,
    P2Wins,
    Draw,
}

/// Per-player burst chain counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainCounter {
    /// Consecutive bursts of cells previously owned by the mover or neutral
    pub own: u32,
    /// Consecutive bursts of cells previously owned by the opponent
    pub enemy: u32,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full game state: grid, hands, and chain counters.
///
/// Clone is a deep, independent copy; the search clones one state per
/// explored branch and discards it afterwards.
#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    hands: [Hand; 2],
    chains: [ChainCounter; 2],
}

impl GameState {
    /// New game: seeded corner bases and starting hands on a hexagon of
    /// radius size-1.
    pub fn new(size: i32) -> Result<Self, CoreError> {
        Ok(Self {
            grid: Grid::generate(size)?,
            hands: [Hand::new(Player::P1), Hand::new(Player::P2)],
            chains: [ChainCounter::default(); 2],
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn chain(&self, player: Player) -> ChainCounter {
        self.chains[player.index()]
    }

    pub fn chain_mut(&mut self, player: Player) -> &mut ChainCounter {
        &mut self.chains[player.index()]
    }

    /// Count active flags belonging to a player
    pub fn flag_count(&self, player: Player) -> usize {
        self.grid
            .iter()
            .filter(|(_, c)| c.has_flag && c.flag_owner == Some(player))
            .count()
    }

    /// The game ends once either side has no active flags left
    pub fn result(&self) -> GameResult {
        let p1 = self.flag_count(Player::P1);
        let p2 = self.flag_count(Player::P2);
        match (p1, p2) {
            (0, 0) => GameResult::Draw,
            (0, _) => GameResult::P2Wins,
            (_, 0) => GameResult::P1Wins,
            _ => GameResult::Ongoing,
        }
    }

    /// Positions a player may target: every cell they currently own
    pub fn candidate_moves(&self, player: Player) -> Vec<Hex> {
        self.grid
            .iter()
            .filter(|(_, c)| c.owner == Some(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    // ========================================================================
    // MOVE RESOLUTION
    // ========================================================================

    /// Resolve a single move: apply the player's hand at `target`, detect
    /// bursts, advance chain counters and rewards, rebalance the hand, and
    /// decide turn continuation.
    ///
    /// Returns true when the mover keeps the turn. A target whose hand
    /// vectors all land outside the grid is a complete no-op and returns
    /// false without touching counters or hand.
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        target: Hex,
        player: Player,
        rng: &mut R,
    ) -> bool {
        let vectors = *self.hands[player.index()].vectors();

        // Apply every vector, recording the pre-burst owner of each cell
        // that overflowed
        let mut burst_owners = Vec::new();
        let mut touched = 0usize;
        for v in &vectors {
            let Some(cell) = self.grid.get_mut(target.offset(v.dq, v.dr)) else {
                continue;
            };
            touched += 1;

            let prior = cell.owner;
            cell.height += v.dh;
            if cell.height.abs() > OVERFLOW_LIMIT {
                cell.height = 0;
                burst_owners.push(prior);
            }
            cell.update_owner();

            // A flag dies when its cell turns neutral or changes sides
            if cell.has_flag && (cell.owner.is_none() || cell.owner != cell.flag_owner) {
                cell.has_flag = false;
            }
        }

        if touched == 0 {
            return false;
        }

        let overflow_occurred = !burst_owners.is_empty();

        // Chain accounting: each burst feeds the own or enemy counter; a
        // counter hitting its threshold resets and fires the reward
        let mut own_reward_fired = false;
        for prior in burst_owners {
            let is_enemy = prior.is_some_and(|o| o != player);
            let chain = &mut self.chains[player.index()];
            if is_enemy {
                chain.enemy += 1;
                if chain.enemy >= ENEMY_CHAIN_THRESHOLD {
                    chain.enemy = 0;
                    self.grant_flag(player, rng);
                }
            } else {
                chain.own += 1;
                if chain.own >= OWN_CHAIN_THRESHOLD {
                    chain.own = 0;
                    self.hands[player.index()].buff_random(player, rng);
                    own_reward_fired = true;
                }
            }
        }

        let pattern = if overflow_occurred {
            MutationPattern::Diffuse
        } else {
            MutationPattern::Focus
        };
        self.hands[player.index()].rebalance(player, pattern, rng);

        // A burst keeps the turn unless the hand reward fired; losing the
        // turn always resets the own chain
        let continuation = overflow_occurred && !own_reward_fired;
        if !continuation {
            self.chains[player.index()].own = 0;
        }
        continuation
    }

    /// Enemy-chain reward: raise a flag on a random owned, unflagged cell.
    /// Silently does nothing if no such cell exists.
    fn grant_flag<R: Rng + ?Sized>(&mut self, player: Player, rng: &mut R) {
        let candidates: Vec<Hex> = self
            .grid
            .iter()
            .filter(|(_, c)| c.owner == Some(player) && !c.has_flag)
            .map(|(pos, _)| pos)
            .collect();
        if candidates.is_empty() {
            return;
        }

        let pos = candidates[rng.gen_range(0..candidates.len())];
        if let Some(cell) = self.grid.get_mut(pos) {
            cell.has_flag = true;
            cell.flag_owner = Some(player);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Radius-4 board, the standard game size
    fn fresh() -> GameState {
        GameState::new(5).unwrap()
    }

    fn assert_invariants(state: &GameState) {
        for (pos, cell) in state.grid().iter() {
            if cell.has_flag {
                assert!(cell.flag_owner.is_some(), "flag without owner at {pos:?}");
            }
            let expected = match cell.height {
                h if h > 0 => Some(Player::P1),
                h if h < 0 => Some(Player::P2),
                _ => None,
            };
            assert_eq!(cell.owner, expected, "owner out of sync at {pos:?}");
        }
    }

    #[test]
    fn test_fresh_board() {
        let state = fresh();
        assert_eq!(state.result(), GameResult::Ongoing);
        assert_eq!(state.flag_count(Player::P1), 3);
        assert_eq!(state.flag_count(Player::P2), 3);
        assert_eq!(state.candidate_moves(Player::P1).len(), 3);
        assert_eq!(state.candidate_moves(Player::P2).len(), 3);
        assert_invariants(&state);
    }

    #[test]
    fn test_quiet_move_ends_turn() {
        // Moving on an own base without bursting anything passes the turn
        let mut state = fresh();
        let base = Hex::new(4, 0);
        let cont = state.apply_move(base, Player::P1, &mut rng());

        assert!(!cont);
        assert_eq!(state.chain(Player::P1), ChainCounter::default());
        assert_eq!(state.grid().get(base).unwrap().height, 6);
        assert_invariants(&state);
    }

    #[test]
    fn test_burst_continues_turn() {
        // Pre-charged cell bursts under the self-vector and keeps the turn
        let mut state = fresh();
        let target = Hex::new(0, 0);
        state.grid_mut().set(
            target,
            Cell {
                height: 9,
                owner: Some(Player::P1),
                has_flag: false,
                flag_owner: None,
            },
        );

        let cont = state.apply_move(target, Player::P1, &mut rng());

        assert!(cont);
        assert_eq!(state.chain(Player::P1).own, 1);
        let cell = state.grid().get(target).unwrap();
        assert_eq!(cell.height, 0);
        assert_eq!(cell.owner, None);
        assert_invariants(&state);
    }

    #[test]
    fn test_own_reward_ends_turn() {
        // Fourth own burst fires the hand reward and forces the turn over,
        // overflow notwithstanding
        let mut state = fresh();
        state.chain_mut(Player::P1).own = 3;
        let target = Hex::new(0, 0);
        state.grid_mut().set(
            target,
            Cell {
                height: 9,
                owner: Some(Player::P1),
                has_flag: false,
                flag_owner: None,
            },
        );

        let cont = state.apply_move(target, Player::P1, &mut rng());

        assert!(!cont);
        assert_eq!(state.chain(Player::P1).own, 0);
        assert_invariants(&state);
    }

    #[test]
    fn test_enemy_reward_keeps_turn() {
        // Second enemy burst grants a flag but does not end the turn
        let mut state = fresh();
        state.chain_mut(Player::P1).enemy = 1;
        let target = Hex::new(0, 0);
        state.grid_mut().set(
            target,
            Cell {
                height: 9,
                owner: Some(Player::P2),
                has_flag: false,
                flag_owner: None,
            },
        );

        let cont = state.apply_move(target, Player::P1, &mut rng());

        assert!(cont);
        assert_eq!(state.chain(Player::P1).enemy, 0);
        // Three bases plus the granted flag
        assert_eq!(state.flag_count(Player::P1), 4);
        assert_invariants(&state);
    }

    #[test]
    fn test_out_of_range_move_is_noop() {
        let mut state = fresh();
        state.chain_mut(Player::P1).own = 2;
        let hand_before = state.hand(Player::P1).clone();

        let cont = state.apply_move(Hex::new(100, 100), Player::P1, &mut rng());

        assert!(!cont);
        assert_eq!(state.chain(Player::P1).own, 2);
        assert_eq!(state.hand(Player::P1), &hand_before);
    }

    #[test]
    fn test_flag_dies_when_cell_changes_sides() {
        let mut state = fresh();
        let contested = Hex::new(1, 0);
        state.grid_mut().set(
            contested,
            Cell {
                height: -1,
                owner: Some(Player::P2),
                has_flag: true,
                flag_owner: Some(Player::P2),
            },
        );

        // P1's unit vector at (1,0) lifts the cell to neutral
        state.apply_move(Hex::new(0, 0), Player::P1, &mut rng());

        let cell = state.grid().get(contested).unwrap();
        assert!(!cell.has_flag);
        assert_eq!(cell.flag_owner, Some(Player::P2), "original owner retained");
        assert_invariants(&state);
    }

    #[test]
    fn test_result_from_flags() {
        let mut state = fresh();
        assert_eq!(state.result(), GameResult::Ongoing);

        // Strip P2's flags
        let stripped: Vec<Hex> = state
            .grid()
            .iter()
            .filter(|(_, c)| c.flag_owner == Some(Player::P2))
            .map(|(pos, _)| pos)
            .collect();
        for pos in &stripped {
            let mut cell = *state.grid().get(*pos).unwrap();
            cell.has_flag = false;
            state.grid_mut().set(*pos, cell);
        }
        assert_eq!(state.result(), GameResult::P1Wins);

        // Strip P1's as well: a dead heat is a draw
        let stripped: Vec<Hex> = state
            .grid()
            .iter()
            .filter(|(_, c)| c.flag_owner == Some(Player::P1))
            .map(|(pos, _)| pos)
            .collect();
        for pos in &stripped {
            let mut cell = *state.grid().get(*pos).unwrap();
            cell.has_flag = false;
            state.grid_mut().set(*pos, cell);
        }
        assert_eq!(state.result(), GameResult::Draw);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = fresh();
        let snapshot = state.clone();

        state.apply_move(Hex::new(4, 0), Player::P1, &mut rng());
        state.chain_mut(Player::P2).enemy = 7;

        assert_eq!(snapshot.grid().get(Hex::new(4, 0)).unwrap().height, 3);
        assert_eq!(snapshot.chain(Player::P2).enemy, 0);
    }

    #[test]
    fn test_invariants_hold_through_play() {
        let mut state = fresh();
        let mut rng = rng();
        let mut player = Player::P1;

        for _ in 0..60 {
            if state.result() != GameResult::Ongoing {
                break;
            }
            let candidates = state.candidate_moves(player);
            let Some(&target) = candidates.first() else {
                player = player.opponent();
                continue;
            };
            let cont = state.apply_move(target, player, &mut rng);
            assert_invariants(&state);
            if !cont {
                player = player.opponent();
            }
        }
    }
}
