//! Command-line interface for blokus_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blokus server - authoritative rule engine over HTTP
#[derive(Parser, Debug)]
#[command(name = "blokus_server")]
#[command(about = "Authoritative Blokus game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Session created at startup
        #[arg(long)]
        session: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
