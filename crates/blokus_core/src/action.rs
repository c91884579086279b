//! Placement attempts, committed placements, and rejection reasons.
//!
//! An attempt is a snapshot of what the client proposed: the piece,
//! its shape in the orientation the client chose, and the anchor cell.
//! Nothing in an attempt is shared with the caller after submission.

use super::grid::Cell;
use super::piece::{PieceId, Shape};
use super::registry::ClientId;
use super::PlayerColor;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A proposed placement, captured atomically at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementAttempt {
    /// Color the caller is playing.
    pub color: PlayerColor,
    /// Piece being placed.
    pub piece_id: PieceId,
    /// Shape in the orientation the caller chose.
    pub shape: Shape,
    /// Board cell the shape's `(0, 0)` offset lands on.
    pub anchor: Cell,
}

impl PlacementAttempt {
    /// Creates an attempt.
    #[instrument(skip(shape))]
    pub fn new(color: PlayerColor, piece_id: PieceId, shape: Shape, anchor: Cell) -> Self {
        Self {
            color,
            piece_id,
            shape,
            anchor,
        }
    }

    /// Candidate cells: the anchor plus each offset, in shape order.
    ///
    /// A footprint that leaves the `i32` range is out of bounds.
    pub fn candidate_cells(&self) -> Result<Vec<Cell>, PlacementError> {
        self.shape
            .footprint(self.anchor)
            .ok_or(PlacementError::OutOfBounds(self.anchor))
    }
}

/// A placement accepted onto the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Placement {
    /// Who placed.
    pub color: PlayerColor,
    /// Which piece.
    pub piece_id: PieceId,
    /// Cells now covered.
    pub cells: Vec<Cell>,
    /// Points credited.
    pub points: u32,
}

/// Why a placement attempt was refused.
///
/// Every variant is recoverable: a rejected attempt leaves no trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PlacementError {
    /// The footprint has no cells.
    #[display("Placement covers no cells")]
    EmptyFootprint,

    /// A cell lies off the board.
    #[display("Cell {} is outside the board", _0)]
    OutOfBounds(Cell),

    /// A cell is already covered.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Cell),

    /// A first placement must cover the player's starting corner.
    #[display("First piece must cover starting corner {}", _0)]
    MissingStartingCorner(Cell),

    /// A cell shares an edge with the player's own color.
    #[display("Cell {} touches an own piece along an edge", _0)]
    SideContact(Cell),

    /// No cell touches the player's own color at a corner.
    #[display("Placement must touch an own piece at a corner")]
    NoCornerContact,

    /// The caller is not the acting color.
    #[display("It is not {}'s turn", actual)]
    NotYourTurn {
        /// Color whose turn it is, if any.
        expected: Option<PlayerColor>,
        /// Color that tried to act.
        actual: PlayerColor,
    },

    /// Placements are only taken while the game is in progress.
    #[display("Game is not in progress")]
    GameNotInProgress,

    /// The caller holds no seat.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(ClientId),

    /// No such piece in the player's inventory.
    #[display("Unknown piece {}", _0)]
    UnknownPiece(PieceId),

    /// The piece is already on the board.
    #[display("Piece {} has already been placed", _0)]
    PieceAlreadyPlaced(PieceId),

    /// The submitted shape is not a rotation or reflection of the piece.
    #[display("Shape does not match piece {}", _0)]
    ShapeMismatch(PieceId),

    /// A postcondition failed after commit.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for PlacementError {}
