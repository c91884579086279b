//! Serializable game wrapper and the placement protocol handler.
//!
//! Typestate phases cannot sit behind one lock, so [`AnyGame`] wraps
//! whichever phase is current. Its request methods run the whole
//! protocol for one request (resolve caller, validate, commit, close
//! the turn) and hand back the events to publish. Callers hold their
//! lock for the duration of a request; nothing here blocks.

use super::action::PlacementError;
use super::board::{Board, BoardError};
use super::events::{Dispatch, GameEvent, Outcome, Seated};
use super::grid::Cell;
use super::phases::{GameOverSummary, GamePhase};
use super::piece::{PieceId, Shape};
use super::registry::{ClientId, PlayerRegistry, RegistrationError};
use super::rules::RulesConfig;
use super::snapshot::{GameSnapshot, PlayerView};
use super::typestate::{GameFinished, GameInProgress, GameResult, GameSetup};
use super::{Occupant, Placement, PlayerColor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// A game in any phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "game", rename_all = "snake_case")]
pub enum AnyGame {
    /// Seats are being filled.
    Setup(GameSetup),
    /// Turns are being played.
    InProgress(GameInProgress),
    /// Every player is finished.
    Finished(GameFinished),
}

impl Default for AnyGame {
    fn default() -> Self {
        AnyGame::Setup(GameSetup::default())
    }
}

impl From<GameSetup> for AnyGame {
    fn from(game: GameSetup) -> Self {
        AnyGame::Setup(game)
    }
}

impl From<GameResult> for AnyGame {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::InProgress(game) => AnyGame::InProgress(game),
            GameResult::Finished(game) => AnyGame::Finished(game),
        }
    }
}

impl AnyGame {
    /// Opens an empty table.
    #[instrument]
    pub fn new(rules: RulesConfig) -> Self {
        AnyGame::Setup(GameSetup::new(rules))
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> GamePhase {
        match self {
            AnyGame::Setup(_) => GamePhase::WaitingForPlayers,
            AnyGame::InProgress(_) => GamePhase::InProgress,
            AnyGame::Finished(_) => GamePhase::GameOver,
        }
    }

    /// Returns the board for any phase.
    pub fn board(&self) -> &Board {
        match self {
            AnyGame::Setup(game) => game.board(),
            AnyGame::InProgress(game) => game.board(),
            AnyGame::Finished(game) => game.board(),
        }
    }

    /// Returns the registry for any phase.
    pub fn registry(&self) -> &PlayerRegistry {
        match self {
            AnyGame::Setup(game) => game.registry(),
            AnyGame::InProgress(game) => game.registry(),
            AnyGame::Finished(game) => game.registry(),
        }
    }

    /// Accepted placements in commit order.
    pub fn history(&self) -> &[Placement] {
        match self {
            AnyGame::Setup(_) => &[],
            AnyGame::InProgress(game) => game.history(),
            AnyGame::Finished(game) => game.history(),
        }
    }

    /// Occupant of `cell`.
    pub fn occupant_at(&self, cell: Cell) -> Result<Occupant, BoardError> {
        self.board().occupant_at(cell)
    }

    /// Color whose turn it is, while the game is in progress.
    pub fn acting_color(&self) -> Option<PlayerColor> {
        match self {
            AnyGame::InProgress(game) => game.acting_color(),
            _ => None,
        }
    }

    /// Final standings, once the game is over.
    pub fn summary(&self) -> Option<&GameOverSummary> {
        match self {
            AnyGame::Finished(game) => Some(game.summary()),
            _ => None,
        }
    }

    /// True once every player is finished.
    pub fn is_over(&self) -> bool {
        matches!(self, AnyGame::Finished(_))
    }

    /// Seats a client and starts the game when the table is full.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn join(
        &mut self,
        client_id: ClientId,
        color: Option<PlayerColor>,
    ) -> Result<Seated, RegistrationError> {
        let AnyGame::Setup(setup) = self else {
            warn!(%client_id, "Join after start");
            return Err(RegistrationError::GameAlreadyStarted);
        };

        let color = setup.register(client_id.clone(), color)?;
        let mut events = vec![GameEvent::PlayerJoined { client_id, color }];

        if setup.is_ready() {
            info!(players = setup.registry().len(), "Table full, starting");
            self.transition(&mut events, |game| match game {
                AnyGame::Setup(setup) => setup.start().into(),
                other => other,
            });
        }

        Ok(Seated { color, events })
    }

    /// Handles one placement request end to end.
    ///
    /// A rejection changes nothing and produces only a
    /// [`GameEvent::PlacementRejected`] for the requester. An acceptance
    /// produces [`GameEvent::CellsOccupied`] followed by either
    /// [`GameEvent::TurnChanged`] or [`GameEvent::GameOver`].
    #[instrument(skip(self, shape), fields(phase = %self.phase()))]
    pub fn submit_placement(
        &mut self,
        client_id: &str,
        piece_id: PieceId,
        shape: Shape,
        anchor: Cell,
    ) -> Dispatch {
        match self.place(client_id, piece_id, shape, anchor) {
            Ok(events) => Dispatch {
                outcome: Outcome::Accepted,
                events,
            },
            Err(reason) => {
                debug!(%reason, "Answering with rejection");
                Dispatch {
                    outcome: Outcome::Rejected {
                        reason: reason.clone(),
                    },
                    events: vec![GameEvent::PlacementRejected {
                        client_id: client_id.to_string(),
                        piece_id,
                        reason,
                    }],
                }
            }
        }
    }

    /// Handles a finish request.
    ///
    /// Off turn this only flags the player; on turn it finishes them and
    /// closes the turn.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn request_finish(&mut self, client_id: &str) -> Result<Vec<GameEvent>, PlacementError> {
        let AnyGame::InProgress(game) = self else {
            return Err(PlacementError::GameNotInProgress);
        };
        let color = game
            .registry()
            .color_of(client_id)
            .ok_or_else(|| PlacementError::UnknownPlayer(client_id.to_string()))?;

        let mut events = Vec::new();
        if game.request_finish(color)? {
            self.close_turn(&mut events);
        }
        Ok(events)
    }

    /// Complete view of the game.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .registry()
            .records()
            .map(|record| {
                let color = *record.color();
                let (pieces, finish_available) = match self {
                    AnyGame::Setup(game) => (game.pieces_of(color), false),
                    AnyGame::InProgress(game) => {
                        (game.pieces_of(color), game.finish_available(color))
                    }
                    AnyGame::Finished(game) => (game.pieces_of(color), false),
                };
                PlayerView::new(record, pieces, finish_available)
            })
            .collect();

        GameSnapshot {
            phase: self.phase(),
            grid: self.board().codes(),
            players,
            acting_color: self.acting_color(),
            moves_played: self.registry().moves_played(),
            summary: self.summary().cloned(),
        }
    }

    fn place(
        &mut self,
        client_id: &str,
        piece_id: PieceId,
        shape: Shape,
        anchor: Cell,
    ) -> Result<Vec<GameEvent>, PlacementError> {
        let AnyGame::InProgress(game) = self else {
            return Err(PlacementError::GameNotInProgress);
        };
        let color = game
            .registry()
            .color_of(client_id)
            .ok_or_else(|| PlacementError::UnknownPlayer(client_id.to_string()))?;

        let placement = game.attempt_placement(color, piece_id, shape, anchor)?;
        let mut events = vec![GameEvent::CellsOccupied {
            cells: placement.cells,
            color,
        }];
        self.close_turn(&mut events);
        Ok(events)
    }

    fn close_turn(&mut self, events: &mut Vec<GameEvent>) {
        self.transition(events, |game| match game {
            AnyGame::InProgress(game) => game.end_turn().into(),
            other => other,
        });
    }

    /// Replaces the current phase with `step(current)` and reports the
    /// turn change or game over it caused.
    fn transition(&mut self, events: &mut Vec<GameEvent>, step: impl FnOnce(AnyGame) -> AnyGame) {
        *self = step(std::mem::take(self));
        match self {
            AnyGame::InProgress(game) => {
                if let Some(color) = game.acting_color() {
                    events.push(GameEvent::TurnChanged { color });
                }
            }
            AnyGame::Finished(game) => events.push(GameEvent::GameOver {
                summary: game.summary().clone(),
            }),
            AnyGame::Setup(_) => {}
        }
    }
}
