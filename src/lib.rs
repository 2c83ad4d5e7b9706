//! jujuchat - Terminal chat client library
//!
//! This library provides the core functionality for the jujuchat terminal
//! chat client: persistent conversation management, a completion provider
//! abstraction, prompt construction, and the typewriter reveal presenter.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: Conversation model and the in-memory conversation store
//! - `storage`: SQLite-backed snapshot persistence
//! - `providers`: Completion provider abstraction and the Groq implementation
//! - `prompt`: Completion message-list construction
//! - `attachments`: File attachment loading, validation, and stripping
//! - `reveal`: Character-by-character reveal of assistant replies
//! - `commands`: CLI command handlers (interactive chat, history)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use jujuchat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     jujuchat::commands::chat::run_chat(config).await
//! }
//! ```

pub mod attachments;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod reveal;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{JujuError, Result};
pub use providers::{CompletionResponse, Message, Provider};
pub use reveal::{RevealState, TypingPresenter};
pub use storage::SnapshotStorage;
pub use store::{ChatMessage, Conversation, ConversationStore, Sender};
