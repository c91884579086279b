//! Blokus server - the game authority behind an HTTP transport.
//!
//! # Architecture
//!
//! - **Authority**: one game behind one lock, publishing events in commit order
//! - **Session**: independent games keyed by session id
//! - **Api**: axum routes and a server-sent-events stream
//! - **Config**: TOML file, `BLOKUS_*` environment, and CLI layers
//!
//! # Example
//!
//! ```no_run
//! use blokus_server::{ServerConfig, SessionManager, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::load(None)?;
//! let sessions = SessionManager::new(*config.rules(), *config.event_buffer());
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, router(sessions)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod authority;
mod config;
mod error;
mod session;

// Crate-level exports - Transport
pub use api::{
    BoardResponse, CellResponse, EventsQuery, FinishRequest, JoinRequest, JoinResponse,
    PlacementRequest, SessionCreated, TurnResponse, router,
};

// Crate-level exports - Authority and sessions
pub use authority::{GameAuthority, SessionId};
pub use session::SessionManager;

// Crate-level exports - Configuration and errors
pub use config::{ConfigError, HOST_VAR, PIECES_VAR, PORT_VAR, ServerConfig};
pub use error::ServerError;
