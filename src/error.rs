//! Error types for Scout.

use thiserror::Error;

/// Library-level error type for Scout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{provider} unavailable after {attempts} attempt(s): {message}")]
    ProviderUnavailable {
        provider: String,
        attempts: u32,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Malformed {provider} response: {message}")]
    Decode { provider: String, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Failed to decode text on PDF page {page}: {message}")]
    PdfPage { page: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ScoutError {
    /// Shorthand for a decode failure attributed to a provider.
    pub fn decode(provider: &str, message: impl Into<String>) -> Self {
        ScoutError::Decode {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for Scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
