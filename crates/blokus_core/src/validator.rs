//! Placement legality.
//!
//! Each rule is a small precondition that can be checked on its own.
//! [`LegalPlacement`] chains them in order and stops at the first
//! failure. All checks read the board as it is now; nothing here
//! mutates state.

use super::action::PlacementError;
use super::board::Board;
use super::grid::{self, Cell};
use super::registry::PlayerRegistry;
use super::PlayerColor;
use tracing::{debug, instrument, warn};

/// Precondition: the footprint has at least one cell.
pub struct NonEmptyFootprint;

impl NonEmptyFootprint {
    /// Rejects an empty candidate list.
    pub fn check(cells: &[Cell]) -> Result<(), PlacementError> {
        if cells.is_empty() {
            Err(PlacementError::EmptyFootprint)
        } else {
            Ok(())
        }
    }
}

/// Precondition: every cell is on the board.
pub struct WithinBoard;

impl WithinBoard {
    /// Rejects the first off-board cell.
    pub fn check(cells: &[Cell]) -> Result<(), PlacementError> {
        match cells.iter().find(|cell| !grid::is_on_board(**cell)) {
            Some(cell) => Err(PlacementError::OutOfBounds(*cell)),
            None => Ok(()),
        }
    }
}

/// Precondition: every cell is empty.
pub struct CellsVacant;

impl CellsVacant {
    /// Rejects the first covered cell.
    pub fn check(cells: &[Cell], board: &Board) -> Result<(), PlacementError> {
        for cell in cells {
            let occupant = board
                .occupant_at(*cell)
                .map_err(|_| PlacementError::OutOfBounds(*cell))?;
            if !occupant.is_empty() {
                return Err(PlacementError::CellOccupied(*cell));
            }
        }
        Ok(())
    }
}

/// First-move rule: the footprint covers the color's starting corner.
pub struct CoversStartingCorner;

impl CoversStartingCorner {
    /// Rejects a first placement away from the starting corner.
    pub fn check(cells: &[Cell], color: PlayerColor) -> Result<(), PlacementError> {
        let corner = color.starting_corner();
        if cells.contains(&corner) {
            Ok(())
        } else {
            Err(PlacementError::MissingStartingCorner(corner))
        }
    }
}

/// Later-move rule: touch own color at a corner, never along an edge.
///
/// Every cell is scanned for edge contact before the verdict, so one
/// corner contact cannot excuse an edge contact elsewhere in the piece.
pub struct CornerContactOnly;

impl CornerContactOnly {
    /// Rejects edge contact with own color, or a lack of corner contact.
    pub fn check(cells: &[Cell], color: PlayerColor, board: &Board) -> Result<(), PlacementError> {
        let mut has_corner_contact = false;
        for cell in cells {
            if grid::side_neighbors(*cell).any(|n| board.is_occupied_by(n, color)) {
                return Err(PlacementError::SideContact(*cell));
            }
            if !has_corner_contact {
                has_corner_contact =
                    grid::corner_neighbors(*cell).any(|n| board.is_occupied_by(n, color));
            }
        }

        if has_corner_contact {
            Ok(())
        } else {
            Err(PlacementError::NoCornerContact)
        }
    }
}

/// Composite legality check for a candidate footprint.
pub struct LegalPlacement;

impl LegalPlacement {
    /// Runs every rule in order, returning the first failure.
    #[instrument(skip(cells, board, registry), fields(cells = cells.len()))]
    pub fn check(
        cells: &[Cell],
        color: PlayerColor,
        board: &Board,
        registry: &PlayerRegistry,
    ) -> Result<(), PlacementError> {
        let record = registry.get(color).ok_or_else(|| {
            warn!(%color, "Validation requested for unseated color");
            PlacementError::UnknownPlayer(color.to_string())
        })?;

        NonEmptyFootprint::check(cells)?;
        WithinBoard::check(cells)?;
        CellsVacant::check(cells, board)?;

        if !record.first_piece_placed() {
            debug!(%color, "Checking first-move corner rule");
            return CoversStartingCorner::check(cells, color);
        }
        CornerContactOnly::check(cells, color, board)
    }
}

/// Boolean form of [`LegalPlacement::check`].
pub fn validate(
    cells: &[Cell],
    color: PlayerColor,
    board: &Board,
    registry: &PlayerRegistry,
) -> bool {
    LegalPlacement::check(cells, color, board, registry).is_ok()
}
