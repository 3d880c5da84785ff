// src/error.rs

//! Unified error handling for the bookshop.

use std::fmt;

use thiserror::Error;

/// Result type alias for bookshop operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// The catalog source could not be fetched
    #[error("Failed to load catalog from {origin}: {message}")]
    LoadFailed { origin: String, message: String },

    /// The catalog payload could not be parsed
    #[error("Failed to parse catalog at line {line}: {message}")]
    ParseFailed { line: usize, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a load failure for the given source.
    pub fn load_failed(origin: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::LoadFailed {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse failure at a 1-based line number.
    pub fn parse_failed(line: usize, message: impl fmt::Display) -> Self {
        Self::ParseFailed {
            line,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error belongs to the catalog load path.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::LoadFailed { .. } | Self::ParseFailed { .. } | Self::Http(_) | Self::Io(_)
        )
    }
}
