//! Core domain types: player colors and cell occupants.

use super::grid::{Cell, MAX_COORD};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// A player's color. Doubles as the player's seat in turn order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    /// Moves first; starts in the bottom-right corner.
    Red,
    /// Starts in the bottom-left corner.
    Green,
    /// Starts in the top-left corner.
    Blue,
    /// Starts in the top-right corner.
    Yellow,
}

/// Starting corner per color, indexed by [`PlayerColor::index`].
const STARTING_CORNERS: [Cell; 4] = [
    Cell { x: MAX_COORD, y: 0 },
    Cell { x: 0, y: 0 },
    Cell { x: 0, y: MAX_COORD },
    Cell {
        x: MAX_COORD,
        y: MAX_COORD,
    },
];

/// Single-letter glyph per color, indexed by [`PlayerColor::index`].
const GLYPHS: [char; 4] = ['R', 'G', 'B', 'Y'];

impl PlayerColor {
    /// Fixed round-robin order.
    pub const TURN_ORDER: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Blue,
        PlayerColor::Yellow,
    ];

    /// Position in turn order, also the wire code.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Color at the given turn-order position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::TURN_ORDER.get(index).copied()
    }

    /// The next color in turn order, wrapping after yellow.
    pub fn next(self) -> Self {
        Self::TURN_ORDER[(self.index() + 1) % Self::TURN_ORDER.len()]
    }

    /// The corner cell this color's first piece must cover.
    pub fn starting_corner(self) -> Cell {
        STARTING_CORNERS[self.index()]
    }

    /// Glyph used in text renderings of the board.
    pub fn glyph(self) -> char {
        GLYPHS[self.index()]
    }
}

/// What a board cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupant {
    /// Nobody has covered this cell.
    #[default]
    Empty,
    /// Covered by a piece of this color.
    Occupied(PlayerColor),
}

impl Occupant {
    /// Wire code of the empty occupant.
    pub const EMPTY_CODE: i8 = -1;

    /// Wire code: -1 for empty, 0..=3 for colors in turn order.
    pub fn code(self) -> i8 {
        match self {
            Occupant::Empty => Self::EMPTY_CODE,
            Occupant::Occupied(color) => color.index() as i8,
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            Self::EMPTY_CODE => Some(Occupant::Empty),
            0..=3 => PlayerColor::from_index(code as usize).map(Occupant::Occupied),
            _ => None,
        }
    }

    /// The occupying color, if any.
    pub fn color(self) -> Option<PlayerColor> {
        match self {
            Occupant::Empty => None,
            Occupant::Occupied(color) => Some(color),
        }
    }

    /// True if no piece covers the cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Occupant::Empty)
    }

    /// Glyph used in text renderings of the board.
    pub fn glyph(self) -> char {
        self.color().map_or('.', PlayerColor::glyph)
    }
}

impl From<PlayerColor> for Occupant {
    fn from(color: PlayerColor) -> Self {
        Occupant::Occupied(color)
    }
}
