//! Completion provider abstraction and implementations
//!
//! The `base` module defines the Provider trait and message types; `groq`
//! implements it against the Groq chat-completions API.

pub mod base;
pub mod groq;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use groq::GroqProvider;

use crate::config::Config;
use crate::error::{JujuError, Result};

/// Create a boxed provider from configuration
///
/// Resolves the API key from the configured environment variable and builds
/// the provider named in `config.provider.provider_type`.
///
/// # Arguments
///
/// * `config` - Global configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown or the API key env var is
/// unset
pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    match config.provider.provider_type.as_str() {
        "groq" => {
            let api_key = config.provider.groq.resolve_api_key()?;
            let provider = GroqProvider::new(config.provider.groq.clone(), api_key)?;
            Ok(Box::new(provider))
        }
        other => Err(JujuError::Config(format!("Unknown provider: {}", other)).into()),
    }
}
