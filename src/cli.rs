//! Command-line interface definition for jujuchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and history inspection.

use clap::{Parser, Subcommand};

/// jujuchat - Terminal chat client
///
/// Chat with an AI assistant in the terminal, with persistent conversations
/// and a typewriter reveal for replies.
#[derive(Parser, Debug, Clone)]
#[command(name = "jujuchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Override the snapshot database path
    #[arg(long, env = "JUJUCHAT_SNAPSHOT_DB")]
    pub snapshot_db: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for jujuchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Inspect persisted conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List all conversations
    List,

    /// Render a conversation transcript
    Show {
        /// Conversation id
        id: String,
    },

    /// Delete a conversation
    Delete {
        /// Conversation id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
