//! Special commands parser for the interactive chat session
//!
//! This module parses special commands entered during chat. Special commands
//! let users:
//! - Start, switch between, and delete conversations
//! - Stage and clear file attachments for the next submission
//! - View session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive; arguments keep
//! their original casing.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command was given an argument it does not take
    #[error("Command {command} takes no argument\n\nUsage: {usage}")]
    UnexpectedArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify the session state or provide information,
/// rather than being sent to the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new conversation and make it active
    NewConversation,

    /// List all conversations with their ids and titles
    ListConversations,

    /// Switch the active conversation
    SwitchConversation(String),

    /// Delete the active conversation (after confirmation)
    DeleteConversation,

    /// Stage a file for the next submission
    Attach(String),

    /// Clear all staged attachments
    Detach,

    /// Display current session status
    ///
    /// Shows the active conversation, message count, and staged attachments.
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be submitted to the completion provider.
    None,
}

/// Parse a user input string into a special command
///
/// Commands are case-insensitive; `/switch` and `/attach` arguments keep
/// their original casing.
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not
/// a valid command, `CommandError::MissingArgument` when `/switch` or
/// `/attach` lack their argument, and `CommandError::UnexpectedArgument` for
/// trailing arguments on argument-less commands.
///
/// # Examples
///
/// ```
/// use jujuchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/new").unwrap();
/// assert_eq!(cmd, SpecialCommand::NewConversation);
///
/// let cmd = parse_special_command("/attach notes.txt").unwrap();
/// assert_eq!(cmd, SpecialCommand::Attach("notes.txt".to_string()));
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// // Invalid command returns error
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/new" => Ok(SpecialCommand::NewConversation),
        "/list" => Ok(SpecialCommand::ListConversations),
        "/delete" => Ok(SpecialCommand::DeleteConversation),
        "/detach" => Ok(SpecialCommand::Detach),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        "/switch" => Err(CommandError::MissingArgument {
            command: "/switch".to_string(),
            usage: "/switch <conversation_id>".to_string(),
        }),
        "/attach" => Err(CommandError::MissingArgument {
            command: "/attach".to_string(),
            usage: "/attach <path>".to_string(),
        }),

        input if input.starts_with("/switch ") => {
            // Take the argument from the original input to keep its casing.
            let arg = trimmed[8..].trim();
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/switch".to_string(),
                    usage: "/switch <conversation_id>".to_string(),
                })
            } else {
                Ok(SpecialCommand::SwitchConversation(arg.to_string()))
            }
        }
        input if input.starts_with("/attach ") => {
            let arg = trimmed[8..].trim();
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/attach".to_string(),
                    usage: "/attach <path>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Attach(arg.to_string()))
            }
        }

        input if input.starts_with("/new ") => Err(CommandError::UnexpectedArgument {
            command: "/new".to_string(),
            usage: "/new".to_string(),
        }),
        input if input.starts_with("/delete ") => Err(CommandError::UnexpectedArgument {
            command: "/delete".to_string(),
            usage: "/delete".to_string(),
        }),
        input if input.starts_with("/detach ") => Err(CommandError::UnexpectedArgument {
            command: "/detach".to_string(),
            usage: "/detach".to_string(),
        }),

        // Unknown command starting with "/"
        input if input.starts_with('/') => {
            let cmd = input.split_whitespace().next().unwrap_or(input);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }

        // Not a special command
        _ => Ok(SpecialCommand::None),
    }
}

/// Display help text for special commands
///
/// # Examples
///
/// ```
/// use jujuchat::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

CONVERSATIONS:
  /new            - Start a new conversation and make it active
  /list           - List all conversations
  /switch <id>    - Switch the active conversation
  /delete         - Delete the active conversation (asks for confirmation)

ATTACHMENTS:
  /attach <path>  - Stage a file for the next submission (up to 5 files)
  /detach         - Clear all staged attachments

SESSION INFORMATION:
  /status         - Show active conversation and staged attachments
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit the chat session
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Input is limited to 1000 characters per message
  - Staged attachments are sent with the next message, then cleared
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new() {
        let cmd = parse_special_command("/new").unwrap();
        assert_eq!(cmd, SpecialCommand::NewConversation);
    }

    #[test]
    fn test_parse_list() {
        let cmd = parse_special_command("/list").unwrap();
        assert_eq!(cmd, SpecialCommand::ListConversations);
    }

    #[test]
    fn test_parse_switch_with_id() {
        let cmd = parse_special_command("/switch 1724567890123").unwrap();
        assert_eq!(
            cmd,
            SpecialCommand::SwitchConversation("1724567890123".to_string())
        );
    }

    #[test]
    fn test_parse_switch_no_arg_returns_error() {
        let result = parse_special_command("/switch");
        assert!(result.is_err());
        if let Err(CommandError::MissingArgument { command, usage }) = result {
            assert_eq!(command, "/switch");
            assert_eq!(usage, "/switch <conversation_id>");
        } else {
            panic!("Expected MissingArgument error");
        }
    }

    #[test]
    fn test_parse_delete() {
        let cmd = parse_special_command("/delete").unwrap();
        assert_eq!(cmd, SpecialCommand::DeleteConversation);
    }

    #[test]
    fn test_parse_attach_keeps_path_casing() {
        let cmd = parse_special_command("/attach ~/Documents/Notes.TXT").unwrap();
        assert_eq!(
            cmd,
            SpecialCommand::Attach("~/Documents/Notes.TXT".to_string())
        );
    }

    #[test]
    fn test_parse_attach_no_arg_returns_error() {
        let result = parse_special_command("/attach");
        assert!(result.is_err());
        if let Err(CommandError::MissingArgument { command, .. }) = result {
            assert_eq!(command, "/attach");
        } else {
            panic!("Expected MissingArgument error");
        }
    }

    #[test]
    fn test_parse_detach() {
        let cmd = parse_special_command("/detach").unwrap();
        assert_eq!(cmd, SpecialCommand::Detach);
    }

    #[test]
    fn test_parse_status() {
        let cmd = parse_special_command("/status").unwrap();
        assert_eq!(cmd, SpecialCommand::ShowStatus);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_exit_variants() {
        for input in ["exit", "quit", "/exit", "/quit"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            parse_special_command("/NEW").unwrap(),
            SpecialCommand::NewConversation
        );
        assert_eq!(
            parse_special_command("EXIT").unwrap(),
            SpecialCommand::Exit
        );
    }

    #[test]
    fn test_parse_with_whitespace() {
        let cmd = parse_special_command("  /list  ").unwrap();
        assert_eq!(cmd, SpecialCommand::ListConversations);
    }

    #[test]
    fn test_parse_regular_text_returns_none() {
        let cmd = parse_special_command("hello there").unwrap();
        assert_eq!(cmd, SpecialCommand::None);
    }

    #[test]
    fn test_parse_empty_string_returns_none() {
        let cmd = parse_special_command("").unwrap();
        assert_eq!(cmd, SpecialCommand::None);
    }

    #[test]
    fn test_parse_unknown_command_returns_error() {
        let result = parse_special_command("/foo");
        assert!(result.is_err());
        if let Err(CommandError::UnknownCommand(cmd)) = result {
            assert_eq!(cmd, "/foo");
        } else {
            panic!("Expected UnknownCommand error");
        }
    }

    #[test]
    fn test_parse_new_with_arg_returns_error() {
        let result = parse_special_command("/new something");
        assert!(result.is_err());
        if let Err(CommandError::UnexpectedArgument { command, .. }) = result {
            assert_eq!(command, "/new");
        } else {
            panic!("Expected UnexpectedArgument error");
        }
    }
}
