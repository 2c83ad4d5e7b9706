//! Error types for jujuchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for jujuchat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, completion requests, attachment handling,
/// and snapshot persistence.
#[derive(Error, Debug)]
pub enum JujuError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion endpoint errors (API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing API credentials for the completion endpoint
    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    /// Input validation errors (empty or over-length text)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Attachment validation or loading errors
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Snapshot persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for jujuchat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = JujuError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = JujuError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_missing_api_key_display() {
        let error = JujuError::MissingApiKey("GROQ_API_KEY".to_string());
        assert_eq!(
            error.to_string(),
            "Missing API key: environment variable GROQ_API_KEY is not set"
        );
    }

    #[test]
    fn test_invalid_input_display() {
        let error = JujuError::InvalidInput("message too long".to_string());
        assert_eq!(error.to_string(), "Invalid input: message too long");
    }

    #[test]
    fn test_attachment_error_display() {
        let error = JujuError::Attachment("file too large".to_string());
        assert_eq!(error.to_string(), "Attachment error: file too large");
    }

    #[test]
    fn test_storage_error_display() {
        let error = JujuError::Storage("database locked".to_string());
        assert_eq!(error.to_string(), "Storage error: database locked");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: JujuError = io_error.into();
        assert!(matches!(error, JujuError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: JujuError = json_error.into();
        assert!(matches!(error, JujuError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: JujuError = yaml_error.into();
        assert!(matches!(error, JujuError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JujuError>();
    }
}
