//! Groq provider implementation for jujuchat
//!
//! This module implements the Provider trait for the Groq chat-completions
//! API (OpenAI-compatible wire format). The request carries a fixed model
//! identifier, fixed temperature, and a fixed maximum output length; the
//! response's first choice supplies the reply text.

use crate::config::GroqConfig;
use crate::error::{JujuError, Result};
use crate::providers::{CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq chat-completions provider
///
/// Sends the ordered role-tagged message list to `{api_base}/chat/completions`
/// with bearer authentication. The call is a single best-effort round trip;
/// transport and API errors are surfaced as provider errors without retry.
///
/// # Examples
///
/// ```no_run
/// use jujuchat::config::GroqConfig;
/// use jujuchat::providers::{GroqProvider, Provider, Message};
///
/// # async fn example() -> jujuchat::error::Result<()> {
/// let config = GroqConfig::default();
/// let provider = GroqProvider::new(config, "gsk_test_key".to_string())?;
/// let messages = vec![Message::user("Hello!")];
/// let completion = provider.complete(&messages).await?;
/// println!("{}", completion.text);
/// # Ok(())
/// # }
/// ```
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
    api_key: String,
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: usize,
}

/// Response body from the chat-completions endpoint
#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqChoiceMessage,
}

/// Message payload inside a completion choice
#[derive(Debug, Deserialize)]
struct GroqChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Token accounting reported by the endpoint
#[derive(Debug, Deserialize)]
struct GroqUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl GroqProvider {
    /// Create a new Groq provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Groq configuration (api base, model, sampling limits)
    /// * `api_key` - Bearer token for the completion endpoint
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::config::GroqConfig;
    /// use jujuchat::providers::GroqProvider;
    ///
    /// let provider = GroqProvider::new(GroqConfig::default(), "gsk_key".to_string());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: GroqConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("jujuchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JujuError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Groq provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the full chat-completions URL from the configured api base
    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for GroqProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let url = self.completions_url();
        let request = GroqRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            "Sending completion request: model={}, messages={}",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Completion request failed: {}", e);
                JujuError::Provider(format!("Failed to reach completion endpoint: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, error_text);
            return Err(JujuError::Provider(format!(
                "Completion endpoint returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GroqResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            JujuError::Provider(format!("Failed to parse completion response: {}", e))
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| JujuError::Provider("Completion returned no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        tracing::debug!("Completion received: {} chars", text.chars().count());

        Ok(match usage {
            Some(usage) => CompletionResponse::with_usage(text, usage),
            None => CompletionResponse::new(text),
        })
    }
}
