//! Grid geometry: cells, bounds, and neighbor offsets.
//!
//! Everything here is pure. Cells are plain coordinate pairs and may
//! lie outside the board; callers decide what to do with those.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Width and height of the square board.
pub const BOARD_SIZE: i32 = 20;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// Highest valid coordinate on either axis.
pub const MAX_COORD: i32 = BOARD_SIZE - 1;

/// Offsets of the four cells sharing an edge with a cell.
pub const SIDE_OFFSETS: [Cell; 4] = [
    Cell { x: -1, y: 0 },
    Cell { x: 1, y: 0 },
    Cell { x: 0, y: -1 },
    Cell { x: 0, y: 1 },
];

/// Offsets of the four cells touching a cell only at a corner.
pub const CORNER_OFFSETS: [Cell; 4] = [
    Cell { x: -1, y: -1 },
    Cell { x: 1, y: 1 },
    Cell { x: -1, y: 1 },
    Cell { x: 1, y: -1 },
];

/// A grid coordinate, or a relative offset when used inside a shape.
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
    derive_new::new,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Cell {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing upward.
    pub y: i32,
}

impl Cell {
    /// The origin cell `(0, 0)`, also the anchor offset of every shape.
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    /// Returns true if the cell lies inside `[0, 20) x [0, 20)`.
    pub fn is_on_board(self) -> bool {
        is_on_board(self)
    }

    /// Row-major index (`x + y * 20`) for on-board cells.
    pub fn index(self) -> Option<usize> {
        if self.is_on_board() {
            Some((self.x + self.y * BOARD_SIZE) as usize)
        } else {
            None
        }
    }

    /// Component-wise sum, or `None` if either axis overflows.
    pub fn checked_add(self, rhs: Cell) -> Option<Cell> {
        Some(Cell::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }

    /// Inverse of [`Cell::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        let index = index as i32;
        Some(Self::new(index % BOARD_SIZE, index / BOARD_SIZE))
    }
}


/// Pure bounds predicate.
pub fn is_on_board(cell: Cell) -> bool {
    (0..BOARD_SIZE).contains(&cell.x) && (0..BOARD_SIZE).contains(&cell.y)
}

/// On-board cells sharing an edge with `cell`.
#[instrument(level = "trace")]
pub fn side_neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    neighbors(cell, &SIDE_OFFSETS)
}

/// On-board cells touching `cell` diagonally.
#[instrument(level = "trace")]
pub fn corner_neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    neighbors(cell, &CORNER_OFFSETS)
}

fn neighbors(cell: Cell, offsets: &'static [Cell; 4]) -> impl Iterator<Item = Cell> {
    offsets
        .iter()
        .filter_map(move |offset| cell.checked_add(*offset))
        .filter(|neighbor| neighbor.is_on_board())
}

/// Iterates every board cell in row-major order.
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (0..CELL_COUNT).filter_map(Cell::from_index)
}
