//! Inventory invariant: placed flags match the placement history.

use super::super::GameInProgress;
use super::Invariant;

/// Invariant: a piece is flagged placed iff exactly one history entry
/// placed it.
pub struct InventoryInvariant;

impl Invariant<GameInProgress> for InventoryInvariant {
    fn holds(game: &GameInProgress) -> bool {
        game.inventories().iter().all(|(color, pieces)| {
            pieces.iter().all(|piece| {
                let times = game
                    .history()
                    .iter()
                    .filter(|p| p.color == *color && p.piece_id == *piece.id())
                    .count();
                times == usize::from(*piece.placed())
            })
        })
    }

    fn description() -> &'static str {
        "Each placed piece appears exactly once in the history"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, PlayerColor, Shape};

    #[test]
    fn test_holds_after_placement() {
        let mut game = GameInProgress::for_tests(&[PlayerColor::Yellow]);
        game.attempt_placement(PlayerColor::Yellow, 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 19))
            .unwrap();
        assert!(InventoryInvariant::holds(&game));
    }

    #[test]
    fn test_duplicated_history_violates() {
        let mut game = GameInProgress::for_tests(&[PlayerColor::Yellow]);
        game.attempt_placement(PlayerColor::Yellow, 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 19))
            .unwrap();
        let entry = game.history[0].clone();
        game.history.push(entry);
        assert!(!InventoryInvariant::holds(&game));
    }
}
