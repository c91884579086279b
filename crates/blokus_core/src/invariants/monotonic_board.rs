//! Monotonic board invariant: cells never change once covered.

use super::super::{Board, GameInProgress};
use super::Invariant;

/// Invariant: the board equals the replay of the placement history, and
/// no placement in the history covered an already covered cell.
pub struct MonotonicBoardInvariant;

impl Invariant<GameInProgress> for MonotonicBoardInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let mut reconstructed = Board::new();

        for placement in game.history() {
            let vacant = placement
                .cells
                .iter()
                .all(|cell| reconstructed.occupant_at(*cell).is_ok_and(|o| o.is_empty()));
            if !vacant {
                return false;
            }
            reconstructed.mark_occupied(&placement.cells, placement.color);
        }

        reconstructed == *game.board()
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}
