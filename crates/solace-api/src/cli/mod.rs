//! CLI command definitions for the `solace` binary.

pub mod config;
pub mod message;

use clap::{Parser, Subcommand};

/// Empathetic support conversations with durable-or-ephemeral history.
#[derive(Parser)]
#[command(name = "solace", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "SOLACE_OTEL")]
    pub otel: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to server.port in solace.toml).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to server.host in solace.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message and print the reply.
    Send {
        /// Conversation session id.
        session: String,

        /// What to say.
        text: String,
    },

    /// Show the message history of a session.
    History {
        /// Conversation session id.
        session: String,
    },

    /// Delete every message of a session.
    Clear {
        /// Conversation session id.
        session: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Show the effective configuration.
    Config,
}
