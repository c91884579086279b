//! Contract-based validation for placements.
//!
//! Preconditions decide whether an attempt may be committed;
//! postconditions confirm the commit kept every invariant.

use super::action::{PlacementAttempt, PlacementError};
use super::invariants::{BlokusInvariants, InvariantSet};
use super::piece::Piece;
use super::typestate::GameInProgress;
use super::validator::LegalPlacement;
use super::Occupant;
use tracing::{instrument, warn};

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), PlacementError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), PlacementError>;
}

/// Precondition: the attempt comes from the acting color.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects attempts from anyone but the acting color.
    #[instrument(skip(game))]
    pub fn check(attempt: &PlacementAttempt, game: &GameInProgress) -> Result<(), PlacementError> {
        if game.registry().is_turn_of(attempt.color) {
            Ok(())
        } else {
            Err(PlacementError::NotYourTurn {
                expected: game.registry().acting_color(),
                actual: attempt.color,
            })
        }
    }
}

/// Precondition: the piece is in the player's inventory and unplaced.
pub struct PieceAvailable;

impl PieceAvailable {
    /// Returns the piece on success.
    #[instrument(skip(game))]
    pub fn check<'g>(
        attempt: &PlacementAttempt,
        game: &'g GameInProgress,
    ) -> Result<&'g Piece, PlacementError> {
        let piece = game
            .pieces_of(attempt.color)
            .iter()
            .find(|piece| *piece.id() == attempt.piece_id)
            .ok_or(PlacementError::UnknownPiece(attempt.piece_id))?;
        if *piece.placed() {
            return Err(PlacementError::PieceAlreadyPlaced(attempt.piece_id));
        }
        Ok(piece)
    }
}

/// Precondition: the submitted shape is a rotation or reflection of the piece.
pub struct OrientationMatches;

impl OrientationMatches {
    /// Compares the attempt's shape with the piece's catalog shape.
    pub fn check(attempt: &PlacementAttempt, piece: &Piece) -> Result<(), PlacementError> {
        if attempt.shape.is_orientation_of(piece.shape()) {
            Ok(())
        } else {
            Err(PlacementError::ShapeMismatch(attempt.piece_id))
        }
    }
}

/// Contract for placement attempts.
///
/// Preconditions, in order:
/// - the caller is the acting color
/// - the piece exists and has not been placed
/// - the shape is an orientation of the piece
/// - the footprint is legal on the current board
///
/// Postconditions:
/// - no previously covered cell changed
/// - every game invariant holds
pub struct PlacementContract;

impl Contract<GameInProgress, PlacementAttempt> for PlacementContract {
    fn pre(game: &GameInProgress, attempt: &PlacementAttempt) -> Result<(), PlacementError> {
        PlayersTurn::check(attempt, game)?;
        let piece = PieceAvailable::check(attempt, game)?;
        OrientationMatches::check(attempt, piece)?;
        LegalPlacement::check(
            &attempt.candidate_cells()?,
            attempt.color,
            game.board(),
            game.registry(),
        )
    }

    fn post(before: &GameInProgress, after: &GameInProgress) -> Result<(), PlacementError> {
        let overwritten = before
            .board()
            .codes()
            .iter()
            .zip(after.board().codes())
            .any(|(was, now)| *was != Occupant::EMPTY_CODE && *was != now);
        if overwritten {
            warn!("Committed placement overwrote a covered cell");
            return Err(PlacementError::InvariantViolation(
                "Postcondition failed: covered cell changed".to_string(),
            ));
        }

        BlokusInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            PlacementError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
