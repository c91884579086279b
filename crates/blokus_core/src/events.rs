//! Outbound game events and placement outcomes.

use super::action::PlacementError;
use super::grid::Cell;
use super::phases::GameOverSummary;
use super::piece::PieceId;
use super::registry::ClientId;
use super::PlayerColor;
use serde::{Deserialize, Serialize};

/// Something observers of a game need to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A client took a seat.
    PlayerJoined {
        /// The joining client.
        client_id: ClientId,
        /// Seat it took.
        color: PlayerColor,
    },
    /// Cells were covered by an accepted placement.
    CellsOccupied {
        /// Newly covered cells.
        cells: Vec<Cell>,
        /// Their new occupant.
        color: PlayerColor,
    },
    /// A new color is acting.
    TurnChanged {
        /// The acting color.
        color: PlayerColor,
    },
    /// Every player is finished.
    GameOver {
        /// Final standings.
        summary: GameOverSummary,
    },
    /// A placement was refused. Meant for the requester only.
    PlacementRejected {
        /// The requester.
        client_id: ClientId,
        /// Piece it tried to place.
        piece_id: PieceId,
        /// Why.
        reason: PlacementError,
    },
}

impl GameEvent {
    /// Stable name of the event type, matching its serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::CellsOccupied { .. } => "cells_occupied",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::GameOver { .. } => "game_over",
            GameEvent::PlacementRejected { .. } => "placement_rejected",
        }
    }

    /// The single client this event is addressed to, or `None` for a broadcast.
    pub fn recipient(&self) -> Option<&str> {
        match self {
            GameEvent::PlacementRejected { client_id, .. } => Some(client_id),
            _ => None,
        }
    }
}

/// Answer to a placement attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The placement is on the board.
    Accepted,
    /// Nothing changed.
    Rejected {
        /// Why.
        reason: PlacementError,
    },
}

impl Outcome {
    /// True for [`Outcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

/// Outcome of a request plus the events it produced, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    /// Answer for the requester.
    pub outcome: Outcome,
    /// Events to publish.
    pub events: Vec<GameEvent>,
}

/// A seat granted to a joining client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seated {
    /// Color assigned.
    pub color: PlayerColor,
    /// Events to publish.
    pub events: Vec<GameEvent>,
}
