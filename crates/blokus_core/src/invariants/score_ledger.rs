//! Score ledger invariant: records agree with the placement history.

use super::super::GameInProgress;
use super::Invariant;

/// Invariant: each player's points, remaining pieces, and first-piece
/// flag are exactly what their placements in the history imply.
pub struct ScoreLedgerInvariant;

impl Invariant<GameInProgress> for ScoreLedgerInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let initial = game.registry().pieces_per_player();
        game.registry().records().all(|record| {
            let placed: Vec<_> = game
                .history()
                .iter()
                .filter(|p| p.color == *record.color())
                .collect();
            let points: u32 = placed.iter().map(|p| p.points).sum();

            *record.points() == points
                && *record.available_pieces() == initial.saturating_sub(placed.len() as u32)
                && *record.first_piece_placed() == !placed.is_empty()
        })
    }

    fn description() -> &'static str {
        "Player scores and piece counts match the placement history"
    }
}
