//! Phase-specific typestate structs.
//!
//! Each phase is its own type with phase-specific fields. Only
//! [`GameSetup`] seats players, only [`GameInProgress`] takes
//! placements, and a [`GameFinished`] always carries its summary.

use super::action::{Placement, PlacementAttempt, PlacementError};
use super::board::Board;
use super::contracts::{Contract, PlacementContract};
use super::grid::Cell;
use super::phases::GameOverSummary;
use super::piece::{self, Piece, PieceId, Shape};
use super::registry::{ClientId, PlayerRegistry, RegistrationError};
use super::rules::RulesConfig;
use super::PlayerColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Pieces held by each seated color.
pub type Inventories = BTreeMap<PlayerColor, Vec<Piece>>;

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Seats are being filled. The board is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    board: Board,
    registry: PlayerRegistry,
    inventories: Inventories,
    rules: RulesConfig,
}

impl GameSetup {
    /// Creates an empty table under `rules`.
    #[instrument]
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            board: Board::new(),
            registry: PlayerRegistry::new(rules.pieces_per_player),
            inventories: BTreeMap::new(),
            rules,
        }
    }

    /// Seats `identity`, as `color` or else the first free color.
    #[instrument(skip(self))]
    pub fn register(
        &mut self,
        identity: ClientId,
        color: Option<PlayerColor>,
    ) -> Result<PlayerColor, RegistrationError> {
        let color = match color {
            Some(color) => color,
            None => self
                .registry
                .next_free_color()
                .ok_or(RegistrationError::GameFull)?,
        };
        self.registry.register_player(identity, color)?;
        self.inventories
            .insert(color, piece::starting_inventory(self.rules.pieces_per_player));
        Ok(color)
    }

    /// True once enough seats are filled to start.
    pub fn is_ready(&self) -> bool {
        self.registry.len() >= self.rules.required_players
    }

    /// Starts turn order (consumes setup).
    ///
    /// Goes straight to [`GameResult::Finished`] when no seated player
    /// can act.
    #[instrument(skip(self), fields(players = self.registry.len()))]
    pub fn start(mut self) -> GameResult {
        let first = self.registry.begin();
        let game = GameInProgress {
            board: self.board,
            registry: self.registry,
            inventories: self.inventories,
            history: Vec::new(),
            rules: self.rules,
        };
        match first {
            Some(first) => {
                info!(%first, "Game started");
                GameResult::InProgress(game)
            }
            None => {
                warn!("Every seated player is already finished");
                GameResult::Finished(game.conclude())
            }
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player registry.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Returns the rules.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Pieces held by `color`; empty if unseated.
    pub fn pieces_of(&self, color: PlayerColor) -> &[Piece] {
        self.inventories
            .get(&color)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Turns are being played.
///
/// The acting color is always a seated, unfinished player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInProgress {
    pub(crate) board: Board,
    pub(crate) registry: PlayerRegistry,
    pub(crate) inventories: Inventories,
    pub(crate) history: Vec<Placement>,
    pub(crate) rules: RulesConfig,
}

impl GameInProgress {
    /// Validates and commits one placement.
    ///
    /// On rejection nothing changes. On acceptance the cells are covered,
    /// the piece is spent, and the player is credited; the turn itself is
    /// closed separately by [`Self::end_turn`].
    ///
    /// Contract enforcement:
    /// - Preconditions checked always
    /// - Postconditions checked in debug builds only
    #[instrument(skip(self, shape), fields(cells = shape.len()))]
    pub fn attempt_placement(
        &mut self,
        color: PlayerColor,
        piece_id: PieceId,
        shape: Shape,
        anchor: Cell,
    ) -> Result<Placement, PlacementError> {
        let attempt = PlacementAttempt::new(color, piece_id, shape, anchor);
        if let Err(reason) = PlacementContract::pre(self, &attempt) {
            warn!(%color, piece_id, %reason, "Placement rejected");
            return Err(reason);
        }

        // Everything fallible runs before the first write.
        let cells = attempt.candidate_cells()?;
        let points = self
            .pieces_of(color)
            .iter()
            .find(|piece| *piece.id() == piece_id)
            .map(|piece| *piece.points())
            .ok_or(PlacementError::UnknownPiece(piece_id))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        self.registry
            .record_placement(color, points)
            .map_err(|e| PlacementError::InvariantViolation(e.to_string()))?;
        if let Some(piece) = self
            .inventories
            .get_mut(&color)
            .and_then(|pieces| pieces.iter_mut().find(|piece| *piece.id() == piece_id))
        {
            piece.mark_placed();
        }
        self.board.mark_occupied(&cells, color);
        let placement = Placement::new(color, piece_id, cells, points);
        self.history.push(placement.clone());

        #[cfg(debug_assertions)]
        if let Err(violation) = PlacementContract::post(&before, self) {
            warn!(%color, piece_id, %violation, "Rolling back placement");
            *self = before;
            return Err(violation);
        }

        info!(%color, piece_id, points, "Placement accepted");
        Ok(placement)
    }

    /// Records a finish request from `color`.
    ///
    /// Returns true when the request finished the acting player, in which
    /// case the caller must close the turn.
    #[instrument(skip(self))]
    pub fn request_finish(&mut self, color: PlayerColor) -> Result<bool, PlacementError> {
        let on_turn = self.registry.is_turn_of(color);
        let finished = self
            .registry
            .request_finish(color)
            .map_err(|_| PlacementError::UnknownPlayer(color.to_string()))?;
        Ok(on_turn && finished)
    }

    /// Closes the acting player's turn (consumes self).
    ///
    /// Ends the game when every player is finished, otherwise hands the
    /// turn to the next active color.
    #[instrument(skip(self), fields(from = ?self.registry.acting_color()))]
    pub fn end_turn(mut self) -> GameResult {
        if self.registry.all_finished() {
            return GameResult::Finished(self.conclude());
        }
        match self.registry.advance_turn() {
            Ok(next) => {
                debug!(%next, "Turn passed");
                GameResult::InProgress(self)
            }
            Err(e) => {
                warn!(error = %e, "No player left to act");
                GameResult::Finished(self.conclude())
            }
        }
    }

    /// True if presentation layers should offer `color` a finish control.
    pub fn finish_available(&self, color: PlayerColor) -> bool {
        self.registry.get(color).is_some_and(|record| {
            !record.finished()
                && !record.finish_requested()
                && self.registry.moves_played() > self.rules.finish_control_threshold
        })
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player registry.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Returns every accepted placement in commit order.
    pub fn history(&self) -> &[Placement] {
        &self.history
    }

    /// Returns the rules.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Returns every inventory.
    pub fn inventories(&self) -> &Inventories {
        &self.inventories
    }

    /// Pieces held by `color`; empty if unseated.
    pub fn pieces_of(&self, color: PlayerColor) -> &[Piece] {
        self.inventories
            .get(&color)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Color whose turn it is.
    pub fn acting_color(&self) -> Option<PlayerColor> {
        self.registry.acting_color()
    }

    fn conclude(self) -> GameFinished {
        let summary = self.registry.determine_winners();
        info!(%summary, "Game over");
        GameFinished {
            board: self.board,
            registry: self.registry,
            inventories: self.inventories,
            history: self.history,
            rules: self.rules,
            summary,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(colors: &[PlayerColor]) -> Self {
        let rules = RulesConfig {
            required_players: colors.len(),
            ..RulesConfig::default()
        };
        let mut setup = GameSetup::new(rules);
        for color in colors {
            setup
                .register(format!("client-{}", color.index()), Some(*color))
                .unwrap();
        }
        match setup.start() {
            GameResult::InProgress(game) => game,
            GameResult::Finished(_) => panic!("test game finished at start"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// Every player is finished. The summary is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFinished {
    board: Board,
    registry: PlayerRegistry,
    inventories: Inventories,
    history: Vec<Placement>,
    rules: RulesConfig,
    summary: GameOverSummary,
}

impl GameFinished {
    /// Returns the final summary.
    pub fn summary(&self) -> &GameOverSummary {
        &self.summary
    }

    /// Returns the final board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the final player registry.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Returns every accepted placement in commit order.
    pub fn history(&self) -> &[Placement] {
        &self.history
    }

    /// Pieces held by `color`; empty if unseated.
    pub fn pieces_of(&self, color: PlayerColor) -> &[Piece] {
        self.inventories
            .get(&color)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Opens a fresh table under the same rules (consumes finished).
    #[instrument(skip(self))]
    pub fn restart(self) -> GameSetup {
        GameSetup::new(self.rules)
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Phase reached by a transition.
#[derive(Debug)]
pub enum GameResult {
    /// Turns continue.
    InProgress(GameInProgress),
    /// The game is over.
    Finished(GameFinished),
}
