//! Player records and turn sequencing.

use super::phases::{GameOverSummary, PlayerScore};
use super::PlayerColor;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Stable identity of a connected client.
pub type ClientId = String;

/// Per-player state.
///
/// A record moves one way from active to finished, either by running
/// out of pieces or by asking to finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerRecord {
    /// Client that owns this seat.
    identity: ClientId,
    /// Seat color.
    color: PlayerColor,
    /// Sum of placed piece values.
    points: u32,
    /// Pieces not yet placed.
    available_pieces: u32,
    /// Set by the first accepted placement.
    first_piece_placed: bool,
    /// No more turns for this player.
    finished: bool,
    /// The player asked to stop.
    finish_requested: bool,
}

impl PlayerRecord {
    fn new(identity: ClientId, color: PlayerColor, pieces: u32) -> Self {
        Self {
            identity,
            color,
            points: 0,
            available_pieces: pieces,
            first_piece_placed: false,
            // Zero pieces finishes the record regardless of first-move status.
            finished: pieces == 0,
            finish_requested: false,
        }
    }

    fn settle(&mut self) {
        if self.available_pieces == 0 || self.finish_requested {
            self.finished = true;
        }
    }
}

/// Why a seat could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum RegistrationError {
    /// Another client already holds the color.
    #[display("Color {} is already taken", _0)]
    DuplicateColor(PlayerColor),

    /// The client already holds a seat.
    #[display("Client {} is already registered", _0)]
    AlreadyRegistered(ClientId),

    /// All four colors are taken.
    #[display("All seats are taken")]
    GameFull,

    /// Seats close when the game starts.
    #[display("Game has already started")]
    GameAlreadyStarted,
}

impl std::error::Error for RegistrationError {}

/// Caller-ordering faults in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum RegistryError {
    /// No record for the color.
    #[display("No player holds {}", _0)]
    UnknownPlayer(PlayerColor),

    /// An operation was called in a state that forbids it.
    #[display("State inconsistency: {}", _0)]
    StateInconsistency(String),
}

impl std::error::Error for RegistryError {}

/// Player records keyed by color, plus turn state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    records: BTreeMap<PlayerColor, PlayerRecord>,
    acting: Option<PlayerColor>,
    moves_played: u32,
    pieces_per_player: u32,
}

impl PlayerRegistry {
    /// Creates an empty registry handing each player `pieces_per_player` pieces.
    #[instrument]
    pub fn new(pieces_per_player: u32) -> Self {
        Self {
            records: BTreeMap::new(),
            acting: None,
            moves_played: 0,
            pieces_per_player,
        }
    }

    /// Seats `identity` as `color`.
    #[instrument(skip(self))]
    pub fn register_player(
        &mut self,
        identity: ClientId,
        color: PlayerColor,
    ) -> Result<&PlayerRecord, RegistrationError> {
        if self.records.contains_key(&color) {
            warn!(%color, "Color already assigned");
            return Err(RegistrationError::DuplicateColor(color));
        }
        if self.color_of(&identity).is_some() {
            warn!(%identity, "Client already seated");
            return Err(RegistrationError::AlreadyRegistered(identity));
        }

        info!(%identity, %color, pieces = self.pieces_per_player, "Registering player");
        let record = PlayerRecord::new(identity, color, self.pieces_per_player);
        Ok(self.records.entry(color).or_insert(record))
    }

    /// First color in turn order nobody holds.
    pub fn next_free_color(&self) -> Option<PlayerColor> {
        PlayerColor::iter().find(|color| !self.records.contains_key(color))
    }

    /// Record for `color`.
    pub fn get(&self, color: PlayerColor) -> Option<&PlayerRecord> {
        self.records.get(&color)
    }

    /// Color seated by `identity`.
    pub fn color_of(&self, identity: &str) -> Option<PlayerColor> {
        self.records
            .values()
            .find(|record| record.identity == identity)
            .map(|record| record.color)
    }

    /// All records in turn order.
    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.values()
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pieces each player starts with.
    pub fn pieces_per_player(&self) -> u32 {
        self.pieces_per_player
    }

    /// Color whose turn it is, `None` before the game starts.
    pub fn acting_color(&self) -> Option<PlayerColor> {
        self.acting
    }

    /// Turn advances so far.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// True if `color` is acting.
    pub fn is_turn_of(&self, color: PlayerColor) -> bool {
        self.acting == Some(color)
    }

    /// Credits a placed piece: adds points, consumes a piece, and
    /// finishes the player on the last piece or a pending finish request.
    ///
    /// Returns whether the player is now finished.
    #[instrument(skip(self))]
    pub fn record_placement(
        &mut self,
        color: PlayerColor,
        piece_value: u32,
    ) -> Result<bool, RegistryError> {
        let record = self.record_mut(color)?;
        record.points += piece_value;
        record.available_pieces = record.available_pieces.saturating_sub(1);
        record.first_piece_placed = true;
        record.settle();
        debug!(
            points = record.points,
            remaining = record.available_pieces,
            finished = record.finished,
            "Recorded placement"
        );
        Ok(record.finished)
    }

    /// Flags `color` as wanting to finish.
    ///
    /// On the player's own turn this finishes them immediately; otherwise
    /// the flag is settled at the end of their next placement. Returns
    /// whether the player is now finished.
    #[instrument(skip(self))]
    pub fn request_finish(&mut self, color: PlayerColor) -> Result<bool, RegistryError> {
        let on_turn = self.is_turn_of(color);
        let record = self.record_mut(color)?;
        record.finish_requested = true;
        if on_turn {
            record.settle();
        }
        info!(%color, on_turn, finished = record.finished, "Finish requested");
        Ok(record.finished)
    }

    /// Makes the first unfinished player in turn order the actor.
    ///
    /// Returns `None` when every seated player is already finished.
    #[instrument(skip(self))]
    pub fn begin(&mut self) -> Option<PlayerColor> {
        self.acting = PlayerColor::iter().find(|color| self.is_active(*color));
        info!(acting = ?self.acting, "Turn order started");
        self.acting
    }

    /// Passes the turn to the next unfinished seated color after the
    /// current actor, wrapping around, and counts a move.
    ///
    /// Fails if nobody is left to act; check [`Self::all_finished`] first.
    #[instrument(skip(self), fields(from = ?self.acting))]
    pub fn advance_turn(&mut self) -> Result<PlayerColor, RegistryError> {
        let start = self.acting.map_or(PlayerColor::TURN_ORDER.len() - 1, PlayerColor::index);
        let next = (1..=PlayerColor::TURN_ORDER.len())
            .map(|step| PlayerColor::TURN_ORDER[(start + step) % PlayerColor::TURN_ORDER.len()])
            .find(|color| self.is_active(*color))
            .ok_or_else(|| {
                warn!("Turn advance requested with no active player");
                RegistryError::StateInconsistency(
                    "advance_turn called with every player finished".to_string(),
                )
            })?;

        self.acting = Some(next);
        self.moves_played += 1;
        debug!(to = %next, moves_played = self.moves_played, "Turn advanced");
        Ok(next)
    }

    /// True iff every seated player is finished.
    pub fn all_finished(&self) -> bool {
        self.records.values().all(|record| record.finished)
    }

    /// Scores every seated player and picks the top scorers.
    #[instrument(skip(self))]
    pub fn determine_winners(&self) -> GameOverSummary {
        let max_points = self
            .records
            .values()
            .map(|record| record.points)
            .max()
            .unwrap_or(0);
        let winners: Vec<PlayerColor> = self
            .records
            .values()
            .filter(|record| record.points == max_points)
            .map(|record| record.color)
            .collect();
        let scores = self
            .records
            .values()
            .map(|record| PlayerScore::new(record.color, record.points))
            .collect();

        GameOverSummary {
            is_draw: winners.len() > 1,
            winners,
            max_points,
            scores,
        }
    }

    fn is_active(&self, color: PlayerColor) -> bool {
        self.records
            .get(&color)
            .is_some_and(|record| !record.finished)
    }

    fn record_mut(&mut self, color: PlayerColor) -> Result<&mut PlayerRecord, RegistryError> {
        self.records
            .get_mut(&color)
            .ok_or(RegistryError::UnknownPlayer(color))
    }

    #[cfg(test)]
    pub(crate) fn set_acting(&mut self, color: PlayerColor) {
        self.acting = Some(color);
    }

    #[cfg(test)]
    pub(crate) fn force(&mut self, color: PlayerColor, points: u32, finished: bool) {
        if let Some(record) = self.records.get_mut(&color) {
            record.points = points;
            record.finished = finished;
        }
    }
}
