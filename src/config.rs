//! Configuration management for jujuchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with per-field defaults, plus API key
//! resolution from the process environment.

use crate::error::{JujuError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for jujuchat
///
/// Holds provider settings, chat behavior, and attachment limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Chat session configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Attachment validation limits
    #[serde(default)]
    pub attachments: AttachmentConfig,
}

/// Provider configuration
///
/// Specifies which completion backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Groq configuration
    #[serde(default)]
    pub groq: GroqConfig,
}

fn default_provider_type() -> String {
    "groq".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            groq: GroqConfig::default(),
        }
    }
}

/// Groq provider configuration
///
/// The model identifier, temperature, and maximum output length are fixed
/// per session; the API key is read from the environment at startup and is
/// never written to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// API base URL for the completion endpoint (useful for tests and mocks)
    #[serde(default = "default_groq_api_base")]
    pub api_base: String,

    /// Model identifier sent with every request
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Sampling temperature sent with every request
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum output length in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_groq_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> usize {
    1000
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base: default_groq_api_base(),
            model: default_groq_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl GroqConfig {
    /// Resolve the API key from the configured environment variable
    ///
    /// # Errors
    ///
    /// Returns `JujuError::MissingApiKey` if the variable is unset or empty
    pub fn resolve_api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(JujuError::MissingApiKey(self.api_key_env.clone()).into()),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum user input length in characters; longer input is rejected
    /// before any network call
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// System prompt carrying the assistant persona and response-language
    /// policy, sent as the first entry of every completion request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Per-character delay for the typewriter reveal, in milliseconds
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
}

fn default_max_input_chars() -> usize {
    1000
}

fn default_system_prompt() -> String {
    "You are Juju, a calm and helpful assistant. Always respond in the same \
     language the user writes in, and keep earlier turns of the conversation \
     in mind so your answers stay relevant and consistent."
        .to_string()
}

fn default_reveal_delay_ms() -> u64 {
    5
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            system_prompt: default_system_prompt(),
            reveal_delay_ms: default_reveal_delay_ms(),
        }
    }
}

/// Attachment validation limits
///
/// Both limits are checked client-side before any file read or upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// Maximum number of attached files per submission
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum size of a single attached file in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_max_files() -> usize {
    5
}

fn default_max_file_bytes() -> u64 {
    5 * 1024 * 1024 // 5 MiB
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::config::Config;
    ///
    /// let config = Config::load("does-not-exist.yaml").unwrap();
    /// assert_eq!(config.provider.provider_type, "groq");
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| JujuError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| JujuError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error for an unknown provider type, zero limits, or an
    /// out-of-range temperature
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "groq" {
            return Err(JujuError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }
        if self.chat.max_input_chars == 0 {
            return Err(JujuError::Config("chat.max_input_chars must be positive".into()).into());
        }
        if self.attachments.max_files == 0 {
            return Err(
                JujuError::Config("attachments.max_files must be positive".into()).into(),
            );
        }
        if self.attachments.max_file_bytes == 0 {
            return Err(
                JujuError::Config("attachments.max_file_bytes must be positive".into()).into(),
            );
        }
        if !(0.0..=2.0).contains(&self.provider.groq.temperature) {
            return Err(JujuError::Config(
                "provider.groq.temperature must be between 0.0 and 2.0".into(),
            )
            .into());
        }
        Ok(())
    }
}
