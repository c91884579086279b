//! The authority for one game session.
//!
//! Every request takes the session lock, runs to completion against the
//! game, publishes the events it produced, and only then releases the
//! lock. Observers therefore see events in commit order.

use crate::error::ServerError;
use blokus_core::{
    AnyGame, Cell, ClientId, GameEvent, GameOverSummary, GamePhase, GameSnapshot, Occupant,
    Outcome, PieceId, PlayerColor, RulesConfig, Shape,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Identifier of a game session.
pub type SessionId = String;

/// Shared handle to one game and its event channel.
#[derive(Debug, Clone)]
pub struct GameAuthority {
    session_id: SessionId,
    game: Arc<Mutex<AnyGame>>,
    events: broadcast::Sender<GameEvent>,
}

impl GameAuthority {
    /// Creates an authority for a new game.
    #[instrument(skip(rules))]
    pub fn new(session_id: SessionId, rules: RulesConfig, event_buffer: usize) -> Self {
        info!(%session_id, "Creating game authority");
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            session_id,
            game: Arc::new(Mutex::new(AnyGame::new(rules))),
            events,
        }
    }

    /// Session this authority serves.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subscribes to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Seats a client.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn join(
        &self,
        client_id: ClientId,
        color: Option<PlayerColor>,
    ) -> Result<PlayerColor, ServerError> {
        let mut game = self.lock()?;
        let seated = game.join(client_id, color)?;
        self.publish(seated.events);
        Ok(seated.color)
    }

    /// Runs one placement request.
    ///
    /// Rejections are answered, not raised; the error path is reserved
    /// for a poisoned lock.
    #[instrument(skip(self, shape), fields(session_id = %self.session_id))]
    pub fn submit_placement(
        &self,
        client_id: &str,
        piece_id: PieceId,
        shape: Shape,
        anchor: Cell,
    ) -> Result<Outcome, ServerError> {
        let mut game = self.lock()?;
        let dispatch = game.submit_placement(client_id, piece_id, shape, anchor);
        self.publish(dispatch.events);
        Ok(dispatch.outcome)
    }

    /// Runs one finish request and reports the phase and acting color
    /// it left behind.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn request_finish(
        &self,
        client_id: &str,
    ) -> Result<(GamePhase, Option<PlayerColor>), ServerError> {
        let mut game = self.lock()?;
        let events = game.request_finish(client_id)?;
        self.publish(events);
        Ok((game.phase(), game.acting_color()))
    }

    /// Phase and acting color, read together.
    pub fn turn(&self) -> Result<(GamePhase, Option<PlayerColor>), ServerError> {
        let game = self.lock()?;
        Ok((game.phase(), game.acting_color()))
    }

    /// Occupant of `cell`.
    pub fn occupant_at(&self, cell: Cell) -> Result<Occupant, ServerError> {
        Ok(self.lock()?.occupant_at(cell)?)
    }

    /// Color whose turn it is.
    pub fn acting_color(&self) -> Result<Option<PlayerColor>, ServerError> {
        Ok(self.lock()?.acting_color())
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Result<GamePhase, ServerError> {
        Ok(self.lock()?.phase())
    }

    /// Final standings, once the game is over.
    pub fn summary(&self) -> Result<GameOverSummary, ServerError> {
        self.lock()?
            .summary()
            .cloned()
            .ok_or(ServerError::SummaryUnavailable)
    }

    /// Row-major occupant codes and a text rendering of the board.
    pub fn board(&self) -> Result<(Vec<i8>, String), ServerError> {
        let game = self.lock()?;
        Ok((game.board().codes(), game.board().display()))
    }

    /// Complete view of the game.
    pub fn snapshot(&self) -> Result<GameSnapshot, ServerError> {
        Ok(self.lock()?.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, AnyGame>, ServerError> {
        self.game.lock().map_err(|_| {
            warn!(session_id = %self.session_id, "Game lock poisoned");
            ServerError::LockPoisoned
        })
    }

    fn publish(&self, events: Vec<GameEvent>) {
        for event in events {
            let kind = event.kind();
            match self.events.send(event) {
                Ok(receivers) => debug!(kind, receivers, "Published event"),
                Err(_) => debug!(kind, "Published event with no subscribers"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(players: usize) -> RulesConfig {
        RulesConfig {
            required_players: players,
            ..RulesConfig::default()
        }
    }

    #[tokio::test]
    async fn test_events_arrive_in_commit_order() {
        let authority = GameAuthority::new("t".to_string(), rules(1), 16);
        let mut rx = authority.subscribe();

        authority.join("alice".to_string(), None).unwrap();
        let outcome = authority
            .submit_placement("alice", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 0))
            .unwrap();
        assert!(outcome.is_accepted());

        let kinds: Vec<_> = (0..4).map(|_| rx.try_recv().unwrap().kind()).collect();
        assert_eq!(
            kinds,
            vec!["player_joined", "turn_changed", "cells_occupied", "turn_changed"]
        );
    }

    #[tokio::test]
    async fn test_rejection_is_published_for_requester() {
        let authority = GameAuthority::new("t".to_string(), rules(1), 16);
        authority.join("alice".to_string(), None).unwrap();
        let mut rx = authority.subscribe();

        let outcome = authority
            .submit_placement("alice", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(5, 5))
            .unwrap();
        assert!(!outcome.is_accepted());
        let event = rx.try_recv().unwrap();
        assert_eq!(event.recipient(), Some("alice"));
        assert_eq!(authority.occupant_at(Cell::new(5, 5)).unwrap(), Occupant::Empty);
    }

    #[test]
    fn test_summary_unavailable_until_over() {
        let authority = GameAuthority::new("t".to_string(), rules(1), 16);
        assert!(matches!(
            authority.summary(),
            Err(ServerError::SummaryUnavailable)
        ));
        authority.join("alice".to_string(), None).unwrap();
        authority.request_finish("alice").unwrap();
        assert_eq!(authority.phase().unwrap(), GamePhase::GameOver);
        assert_eq!(authority.summary().unwrap().winners, vec![PlayerColor::Red]);
    }

    #[test]
    fn test_finish_reports_state_it_committed() {
        let authority = GameAuthority::new("t".to_string(), rules(2), 16);
        authority.join("alice".to_string(), None).unwrap();
        authority.join("bob".to_string(), None).unwrap();

        assert_eq!(
            authority.request_finish("alice").unwrap(),
            (GamePhase::InProgress, Some(PlayerColor::Green))
        );
        assert_eq!(authority.turn().unwrap(), (GamePhase::InProgress, Some(PlayerColor::Green)));
        assert_eq!(
            authority.request_finish("bob").unwrap(),
            (GamePhase::GameOver, None)
        );
    }

    #[test]
    fn test_overflowing_anchor_keeps_session_usable() {
        let authority = GameAuthority::new("t".to_string(), rules(1), 16);
        authority.join("alice".to_string(), None).unwrap();

        let outcome = authority
            .submit_placement(
                "alice",
                1,
                Shape::from_pairs(&[(0, 0), (1, 0)]),
                Cell::new(i32::MAX, 0),
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected {
                reason: blokus_core::PlacementError::OutOfBounds(Cell::new(i32::MAX, 0))
            }
        );

        let outcome = authority
            .submit_placement("alice", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 0))
            .unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(authority.acting_color().unwrap(), Some(PlayerColor::Red));
    }

    #[test]
    fn test_clones_share_state() {
        let authority = GameAuthority::new("t".to_string(), rules(2), 16);
        let other = authority.clone();
        authority.join("alice".to_string(), None).unwrap();
        assert!(matches!(
            other.join("bob".to_string(), Some(PlayerColor::Red)),
            Err(ServerError::Registration(_))
        ));
        assert_eq!(other.join("bob".to_string(), None).unwrap(), PlayerColor::Green);
        assert_eq!(authority.acting_color().unwrap(), Some(PlayerColor::Red));
    }
}
