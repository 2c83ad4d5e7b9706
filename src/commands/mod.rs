//! Command handlers
//!
//! Each CLI subcommand has a handler module: `chat` runs the interactive
//! session, `history` inspects and prunes the persisted snapshot, and
//! `special_commands` parses the `/`-prefixed commands entered during chat.

pub mod chat;
pub mod history;
pub mod special_commands;

pub use special_commands::{parse_special_command, SpecialCommand};
