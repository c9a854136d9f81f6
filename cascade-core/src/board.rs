//! Hex board geometry and cell grid with axial coordinates

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::game::Player;

/// Height magnitude beyond which a cell bursts back to neutral
pub const OVERFLOW_LIMIT: i8 = 9;

/// Seed height of the corner bases
const BASE_HEIGHT: i8 = 3;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i32 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Translate by an axial offset
    pub const fn offset(&self, dq: i32, dr: i32) -> Hex {
        Hex::new(self.q + dq, self.r + dr)
    }
}

/// Direction vectors in axial coordinates (dq, dr).
/// Scaled by the board radius, these are also the six corner positions.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (0, -1),
    (1, -1),
];

/// A single territory cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Signed stack height, kept within [-OVERFLOW_LIMIT, OVERFLOW_LIMIT]
    pub height: i8,
    /// Derived from the sign of height; maintained by `update_owner`
    pub owner: Option<Player>,
    /// Whether a flag is currently active on this cell
    pub has_flag: bool,
    /// The player the flag belongs to; retained even after the flag is lost
    pub flag_owner: Option<Player>,
}

impl Cell {
    pub const fn neutral() -> Self {
        Self {
            height: 0,
            owner: None,
            has_flag: false,
            flag_owner: None,
        }
    }

    /// A seeded player base: height toward the owner, flag raised
    fn base(player: Player) -> Self {
        Self {
            height: player.sign() * BASE_HEIGHT,
            owner: Some(player),
            has_flag: true,
            flag_owner: Some(player),
        }
    }

    /// Recompute owner from the sign of height
    pub fn update_owner(&mut self) {
        self.owner = match self.height {
            h if h > 0 => Some(Player::P1),
            h if h < 0 => Some(Player::P2),
            _ => None,
        };
    }
}

/// The hexagonal cell grid, radius size-1 around the origin
#[derive(Clone, Debug)]
pub struct Grid {
    radius: i32,
    cells: FxHashMap<Hex, Cell>,
    /// Positions in generation order, for deterministic iteration
    positions: Vec<Hex>,
}

impl Grid {
    /// Build all cells for the hexagon of radius size-1, seeding the six
    /// corner cells as alternating player bases.
    pub fn generate(size: i32) -> Result<Self, CoreError> {
        if size <= 0 {
            return Err(CoreError::InvalidSize(size));
        }
        let radius = size - 1;

        let corners: Vec<Hex> = DIRECTIONS
            .iter()
            .map(|&(dq, dr)| Hex::new(dq * radius, dr * radius))
            .collect();

        let mut cells = FxHashMap::default();
        let mut positions = Vec::new();
        for q in -radius..=radius {
            let r_lo = (-radius).max(-q - radius);
            let r_hi = radius.min(-q + radius);
            for r in r_lo..=r_hi {
                let pos = Hex::new(q, r);
                let cell = match corners.iter().position(|&c| c == pos) {
                    // Alternate corners between P1 and P2 (a radius-0 board
                    // degenerates to a single neutral cell)
                    Some(i) if radius > 0 => Cell::base(if i % 2 == 0 {
                        Player::P1
                    } else {
                        Player::P2
                    }),
                    _ => Cell::neutral(),
                };
                cells.insert(pos, cell);
                positions.push(pos);
            }
        }

        Ok(Self {
            radius,
            cells,
            positions,
        })
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, pos: Hex) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn get_mut(&mut self, pos: Hex) -> Option<&mut Cell> {
        self.cells.get_mut(&pos)
    }

    /// Overwrite a cell. Positions outside the generated region are ignored.
    pub fn set(&mut self, pos: Hex, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(&pos) {
            *slot = cell;
        }
    }

    pub fn contains(&self, pos: Hex) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Iterate cells in generation order
    pub fn iter(&self) -> impl Iterator<Item = (Hex, &Cell)> + '_ {
        self.positions.iter().map(move |&p| (p, &self.cells[&p]))
    }
}
