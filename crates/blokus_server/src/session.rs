//! Game session management.

use crate::authority::{GameAuthority, SessionId};
use crate::error::ServerError;
use blokus_core::RulesConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Manages all game sessions.
///
/// Each session has its own [`GameAuthority`]; sessions never share game
/// state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameAuthority>>>,
    rules: RulesConfig,
    event_buffer: usize,
}

impl SessionManager {
    /// Creates a session manager whose sessions use `rules`.
    #[instrument]
    pub fn new(rules: RulesConfig, event_buffer: usize) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            rules,
            event_buffer,
        }
    }

    /// Creates a new game session.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: SessionId) -> Result<GameAuthority, ServerError> {
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::LockPoisoned)?;

        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(ServerError::SessionExists(id));
        }

        let authority = GameAuthority::new(id.clone(), self.rules, self.event_buffer);
        sessions.insert(id.clone(), authority.clone());

        info!(session_id = %id, "Created new session");
        Ok(authority)
    }

    /// Gets a session by ID.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Result<GameAuthority, ServerError> {
        let sessions = self.sessions.lock().map_err(|_| ServerError::LockPoisoned)?;
        sessions.get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            ServerError::SessionNotFound(id.to_string())
        })
    }

    /// Lists all session IDs, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Result<Vec<SessionId>, ServerError> {
        let sessions = self.sessions.lock().map_err(|_| ServerError::LockPoisoned)?;
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        info!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }

    /// Rules applied to new sessions.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(RulesConfig::default(), 256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let manager = SessionManager::default();
        manager.create_session("b".to_string()).unwrap();
        manager.create_session("a".to_string()).unwrap();

        assert_eq!(manager.list_sessions().unwrap(), vec!["a", "b"]);
        assert_eq!(manager.get_session("a").unwrap().session_id(), "a");
        assert!(matches!(
            manager.get_session("zzz"),
            Err(ServerError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_session() {
        let manager = SessionManager::default();
        manager.create_session("a".to_string()).unwrap();
        assert!(matches!(
            manager.create_session("a".to_string()),
            Err(ServerError::SessionExists(_))
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let manager = SessionManager::new(
            RulesConfig {
                required_players: 1,
                ..RulesConfig::default()
            },
            8,
        );
        let first = manager.create_session("one".to_string()).unwrap();
        let second = manager.create_session("two".to_string()).unwrap();
        first.join("alice".to_string(), None).unwrap();
        assert_eq!(
            second.join("bob".to_string(), None).unwrap(),
            blokus_core::PlayerColor::Red
        );
    }
}
