//! Rule settings for a game.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Pieces each player starts with unless configured otherwise.
pub const DEFAULT_PIECES_PER_PLAYER: u32 = 3;

/// Most pieces a player may hold, the size of a full polyomino set.
pub const MAX_PIECES_PER_PLAYER: u32 = 21;

/// Moves played before the finish control is offered.
pub const DEFAULT_FINISH_CONTROL_THRESHOLD: u32 = 8;

/// Tunable rules. The board size is fixed and not part of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Pieces handed to each player at registration.
    pub pieces_per_player: u32,
    /// Seats that must be filled before the game starts (1 to 4).
    pub required_players: usize,
    /// Moves played before presentation layers offer a finish control.
    pub finish_control_threshold: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            pieces_per_player: DEFAULT_PIECES_PER_PLAYER,
            required_players: 4,
            finish_control_threshold: DEFAULT_FINISH_CONTROL_THRESHOLD,
        }
    }
}

impl RulesConfig {
    /// Checks that the settings describe a playable game.
    #[instrument]
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(1..=4).contains(&self.required_players) {
            return Err(RulesError::RequiredPlayers(self.required_players));
        }
        if self.pieces_per_player > MAX_PIECES_PER_PLAYER {
            return Err(RulesError::PiecesPerPlayer(self.pieces_per_player));
        }
        Ok(())
    }
}

/// Invalid rule settings.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RulesError {
    /// Seat count outside 1..=4.
    #[display("required_players must be between 1 and 4, got {}", _0)]
    RequiredPlayers(usize),

    /// More pieces than a full set.
    #[display(
        "pieces_per_player must be at most {}, got {}",
        MAX_PIECES_PER_PLAYER,
        _0
    )]
    PiecesPerPlayer(u32),
}

impl std::error::Error for RulesError {}
