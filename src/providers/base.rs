//! Base provider trait and common types for jujuchat
//!
//! This module defines the Provider trait that completion backends must
//! implement, along with the role-tagged message type and response structures.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role-tagged message sent to the completion endpoint
///
/// Represents one entry in the ordered message list: the fixed system
/// persona, a prior conversation turn, or the new user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::providers::Message;
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::providers::Message;
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the completion endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Arguments
    ///
    /// * `prompt_tokens` - Number of prompt tokens
    /// * `completion_tokens` - Number of completion tokens
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        let total_tokens = prompt_tokens + completion_tokens;
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Completion response with reply text and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The first completion choice's text content
    pub text: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse without usage data
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::providers::CompletionResponse;
    ///
    /// let response = CompletionResponse::new("Hello!");
    /// assert_eq!(response.text, "Hello!");
    /// assert!(response.usage.is_none());
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    ///
    /// # Arguments
    ///
    /// * `text` - The reply text
    /// * `usage` - Token usage information
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// Provider trait for completion backends
///
/// The completion call is a single best-effort round trip: no retry, no
/// backoff, no partial-response handling. Any transport or API failure is
/// surfaced to the caller, which owns the user-facing messaging.
///
/// # Examples
///
/// ```no_run
/// use jujuchat::providers::{Provider, Message, CompletionResponse};
/// use jujuchat::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new("Response"))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given ordered message list
    ///
    /// # Arguments
    ///
    /// * `messages` - System prompt, prior history, and the new user turn
    ///
    /// # Returns
    ///
    /// Returns the first completion's text content with token usage when
    /// the endpoint reports it
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse>;
}
