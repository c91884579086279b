//! Server error type and its HTTP mapping.

use crate::config::ConfigError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blokus_core::{BoardError, PlacementError, RegistrationError};
use serde::Serialize;
use tracing::warn;

/// Failures surfaced to transport clients.
///
/// Placement legality failures are not errors here; they travel as a
/// rejected outcome.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ServerError {
    /// No session under that id.
    #[display("Session {} not found", _0)]
    SessionNotFound(String),

    /// A session with that id already exists.
    #[display("Session {} already exists", _0)]
    SessionExists(String),

    /// A seat could not be taken.
    #[display("Registration failed: {}", _0)]
    Registration(RegistrationError),

    /// A turn request was refused.
    #[display("Request refused: {}", _0)]
    Refused(PlacementError),

    /// A cell lookup failed.
    #[display("{}", _0)]
    Board(BoardError),

    /// The game is not over yet.
    #[display("Game is not over")]
    SummaryUnavailable,

    /// A game lock was poisoned by a panicking holder.
    #[display("Game state lock poisoned")]
    LockPoisoned,

    /// Configuration could not be loaded.
    #[display("{}", _0)]
    Config(ConfigError),
}

impl std::error::Error for ServerError {}

impl From<RegistrationError> for ServerError {
    fn from(err: RegistrationError) -> Self {
        ServerError::Registration(err)
    }
}

impl From<PlacementError> for ServerError {
    fn from(err: PlacementError) -> Self {
        ServerError::Refused(err)
    }
}

impl From<BoardError> for ServerError {
    fn from(err: BoardError) -> Self {
        ServerError::Board(err)
    }
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        ServerError::Config(err)
    }
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) | ServerError::SummaryUnavailable => {
                StatusCode::NOT_FOUND
            }
            ServerError::SessionExists(_) | ServerError::Registration(_) => StatusCode::CONFLICT,
            ServerError::Refused(PlacementError::GameNotInProgress) => StatusCode::CONFLICT,
            ServerError::Refused(_) | ServerError::Board(_) => StatusCode::BAD_REQUEST,
            ServerError::LockPoisoned | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request failed");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blokus_core::{Cell, PlayerColor};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::SessionNotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(RegistrationError::DuplicateColor(PlayerColor::Red)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(BoardError::OutOfBounds(Cell::new(20, 5))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(PlacementError::GameNotInProgress).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::LockPoisoned.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ServerError::SessionExists("table-1".to_string()).to_string(),
            "Session table-1 already exists"
        );
        assert_eq!(
            ServerError::from(RegistrationError::GameFull).to_string(),
            "Registration failed: All seats are taken"
        );
    }
}
