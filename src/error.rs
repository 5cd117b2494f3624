//! Error type shared by every layer of genrelist.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or empty settings, fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network failure or undecodable response body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog service answered with a non-success status.
    #[error("catalog service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
