//! Conversation and message data model
//!
//! A conversation is a named, ordered log of messages. Identifiers are
//! time-based millisecond strings, unique enough for session-local rendering
//! keys; a process-local sequence suffix disambiguates ids minted within the
//! same millisecond.

use crate::attachments::AttachedFile;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Identifier of the conversation created on first launch
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Title given to every new conversation until its first user message
pub const PLACEHOLDER_TITLE: &str = "New chat";

/// Maximum characters of the first user message used for the title
pub const TITLE_SNIPPET_CHARS: usize = 30;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human user
    User,
    /// The assistant reply
    Assistant,
}

/// One entry in a conversation's message log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Time-based identifier
    pub id: String,
    /// Message text
    pub text: String,
    /// Who sent the message
    pub sender: Sender,
    /// Files attached to the message, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachedFile>,
}

impl ChatMessage {
    /// Create a user message with a freshly minted id
    pub fn from_user(text: impl Into<String>, attachments: Vec<AttachedFile>) -> Self {
        Self {
            id: mint_time_id(),
            text: text.into(),
            sender: Sender::User,
            attachments,
        }
    }

    /// Create an assistant message with a freshly minted id
    pub fn from_assistant(text: impl Into<String>) -> Self {
        Self {
            id: mint_time_id(),
            text: text.into(),
            sender: Sender::Assistant,
            attachments: Vec::new(),
        }
    }
}

/// A named, ordered log of messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier ("default" or a time-based string)
    pub id: String,
    /// Display title; placeholder until first user message
    pub title: String,
    /// Ordered message log; no size cap
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create an empty conversation with the placeholder title
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// The conversation created when no persisted state exists
    pub fn default_conversation() -> Self {
        Self::new(DEFAULT_CONVERSATION_ID)
    }

    /// Whether the title is still the placeholder
    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }
}

/// Derive a conversation title from its first user message
///
/// Titles longer than [`TITLE_SNIPPET_CHARS`] characters are truncated and
/// suffixed with an ellipsis.
///
/// # Examples
///
/// ```
/// use jujuchat::store::title_from_message;
///
/// assert_eq!(title_from_message("Halo"), "Halo");
/// let long = "x".repeat(40);
/// let title = title_from_message(&long);
/// assert_eq!(title.chars().count(), 33);
/// assert!(title.ends_with("..."));
/// ```
pub fn title_from_message(text: &str) -> String {
    if text.chars().count() > TITLE_SNIPPET_CHARS {
        let snippet: String = text.chars().take(TITLE_SNIPPET_CHARS).collect();
        format!("{}...", snippet)
    } else {
        text.to_string()
    }
}

/// Last minted (millis, sequence) pair, for same-millisecond disambiguation
static LAST_ID: Mutex<(i64, u32)> = Mutex::new((0, 0));

/// Mint a time-based identifier
///
/// Renders the current Unix time in milliseconds as a decimal string. Ids
/// minted within the same millisecond get a `-N` sequence suffix so they
/// stay unique within the process.
pub fn mint_time_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut last = match LAST_ID.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if last.0 == millis {
        last.1 += 1;
        format!("{}-{}", millis, last.1)
    } else {
        *last = (millis, 0);
        millis.to_string()
    }
}
