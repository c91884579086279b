//! Authoritative occupancy grid.

use super::codec::CodecError;
use super::grid::{self, BOARD_SIZE, CELL_COUNT, Cell};
use super::types::{Occupant, PlayerColor};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Error raised by board lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The cell lies outside `[0, 20) x [0, 20)`.
    #[display("Cell {} is outside the board", _0)]
    OutOfBounds(Cell),
}

impl std::error::Error for BoardError {}

/// Dense 20x20 occupancy grid.
///
/// Every cell holds exactly one [`Occupant`]. Cells start empty and are
/// only ever written with a color, so a covered cell never reverts.
/// Serializes as the 400 row-major occupant codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<i8>", try_from = "Vec<i8>")]
pub struct Board {
    cells: Vec<Occupant>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: vec![Occupant::Empty; CELL_COUNT],
        }
    }

    /// Returns the occupant of `cell`.
    pub fn occupant_at(&self, cell: Cell) -> Result<Occupant, BoardError> {
        cell.index()
            .map(|index| self.cells[index])
            .ok_or(BoardError::OutOfBounds(cell))
    }

    /// Returns true if `cell` is on the board and occupied by `color`.
    pub fn is_occupied_by(&self, cell: Cell, color: PlayerColor) -> bool {
        matches!(self.occupant_at(cell), Ok(Occupant::Occupied(c)) if c == color)
    }

    /// Pure bounds predicate.
    pub fn is_on_board(&self, cell: Cell) -> bool {
        grid::is_on_board(cell)
    }

    /// Writes `color` into every cell.
    ///
    /// No legality checks: callers validate first. Off-board cells are
    /// skipped rather than written.
    #[instrument(skip(self, cells), fields(count = cells.len()))]
    pub fn mark_occupied(&mut self, cells: &[Cell], color: PlayerColor) {
        for cell in cells {
            match cell.index() {
                Some(index) => self.cells[index] = Occupant::Occupied(color),
                None => warn!(%cell, "Skipping off-board cell in bulk write"),
            }
        }
    }

    /// Number of covered cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|o| !o.is_empty()).count()
    }

    /// Number of cells covered by `color`.
    pub fn count_of(&self, color: PlayerColor) -> usize {
        self.cells
            .iter()
            .filter(|o| o.color() == Some(color))
            .count()
    }

    /// Row-major occupant codes (-1 empty, 0..=3 colors).
    pub fn codes(&self) -> Vec<i8> {
        self.cells.iter().map(|o| o.code()).collect()
    }

    /// Rebuilds a board from row-major occupant codes.
    pub fn from_codes(codes: &[i8]) -> Result<Self, CodecError> {
        if codes.len() != CELL_COUNT {
            return Err(CodecError::GridLength {
                expected: CELL_COUNT,
                actual: codes.len(),
            });
        }
        let cells = codes
            .iter()
            .map(|&code| Occupant::from_code(code).ok_or(CodecError::UnknownOccupant(code)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }

    /// Renders the board with the top row (y = 19) first.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(CELL_COUNT + BOARD_SIZE as usize);
        for y in (0..BOARD_SIZE).rev() {
            for x in 0..BOARD_SIZE {
                let glyph = self
                    .occupant_at(Cell::new(x, y))
                    .map_or('?', Occupant::glyph);
                out.push(glyph);
            }
            if y > 0 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<i8> {
    fn from(board: Board) -> Self {
        board.codes()
    }
}

impl TryFrom<Vec<i8>> for Board {
    type Error = CodecError;

    fn try_from(codes: Vec<i8>) -> Result<Self, Self::Error> {
        Board::from_codes(&codes)
    }
}
