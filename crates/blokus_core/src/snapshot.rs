//! Read-only views of a game for late joiners and renderers.

use super::phases::{GameOverSummary, GamePhase};
use super::piece::Piece;
use super::registry::{ClientId, PlayerRecord};
use super::PlayerColor;
use serde::{Deserialize, Serialize};

/// One seated player as observers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Owning client.
    pub client_id: ClientId,
    /// Seat color.
    pub color: PlayerColor,
    /// Points so far.
    pub points: u32,
    /// Pieces not yet placed.
    pub available_pieces: u32,
    /// Whether the first piece is down.
    pub first_piece_placed: bool,
    /// No more turns for this player.
    pub finished: bool,
    /// The player asked to stop.
    pub finish_requested: bool,
    /// Whether to offer this player a finish control.
    pub finish_available: bool,
    /// The player's inventory.
    pub pieces: Vec<Piece>,
}

impl PlayerView {
    pub(crate) fn new(record: &PlayerRecord, pieces: &[Piece], finish_available: bool) -> Self {
        Self {
            client_id: record.identity().clone(),
            color: *record.color(),
            points: *record.points(),
            available_pieces: *record.available_pieces(),
            first_piece_placed: *record.first_piece_placed(),
            finished: *record.finished(),
            finish_requested: *record.finish_requested(),
            finish_available,
            pieces: pieces.to_vec(),
        }
    }
}

/// Complete state of a game at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Lifecycle phase.
    pub phase: GamePhase,
    /// 400 occupant codes, row-major.
    pub grid: Vec<i8>,
    /// Seated players in turn order.
    pub players: Vec<PlayerView>,
    /// Color whose turn it is.
    pub acting_color: Option<PlayerColor>,
    /// Turn advances so far.
    pub moves_played: u32,
    /// Final standings once the game is over.
    pub summary: Option<GameOverSummary>,
}
