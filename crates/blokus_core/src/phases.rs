//! Game phase and end-of-game summary.

use super::PlayerColor;
use serde::{Deserialize, Serialize};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Seats are being filled; nobody may place yet.
    WaitingForPlayers,
    /// Turns are being played.
    InProgress,
    /// Every player is finished.
    GameOver,
}

/// Final points of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct PlayerScore {
    /// The player.
    pub color: PlayerColor,
    /// Sum of the values of the player's placed pieces.
    pub points: u32,
}

/// Outcome of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    /// More than one player reached the top score.
    pub is_draw: bool,
    /// Every player holding the top score, in turn order.
    pub winners: Vec<PlayerColor>,
    /// The top score.
    pub max_points: u32,
    /// Every registered player's score, in turn order.
    pub scores: Vec<PlayerScore>,
}

impl GameOverSummary {
    /// Returns the sole winner, if the game was not drawn.
    pub fn winner(&self) -> Option<PlayerColor> {
        match self.winners.as_slice() {
            [only] if !self.is_draw => Some(*only),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameOverSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let winners = self
            .winners
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if self.is_draw {
            write!(f, "Draw between {} at {} points", winners, self.max_points)
        } else {
            write!(f, "{} wins with {} points", winners, self.max_points)
        }
    }
}
