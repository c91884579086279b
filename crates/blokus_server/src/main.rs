//! Blokus server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use blokus_server::{ServerConfig, SessionManager, router};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            port,
            host,
            session,
        } => run_server(config.with_overrides(host, port), session).await,
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Run the HTTP game server
#[instrument(skip(config), fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig, session: Option<String>) -> Result<()> {
    let sessions = SessionManager::new(*config.rules(), *config.event_buffer());
    if let Some(id) = session {
        sessions.create_session(id)?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        pieces_per_player = config.rules().pieces_per_player,
        required_players = config.rules().required_players,
        "Server ready at http://{}/",
        config.bind_address()
    );

    axum::serve(listener, router(sessions)).await?;
    Ok(())
}
