//! Configuration management for genrelist.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client credentials)

use std::{env, path::PathBuf};

use crate::{Res, error::Error};

pub const APP_DIR: &str = "genrelist";

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_SCOPE: &str = "playlist-modify-public";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Returns the application directory below the platform's local data dir.
///
/// - Linux: `~/.local/share/genrelist`
/// - macOS: `~/Library/Application Support/genrelist`
/// - Windows: `%LOCALAPPDATA%/genrelist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `genrelist/.env` in the local data directory.
///
/// Creates the application directory if needed. A missing `.env` file is not
/// an error since every value can also come from the process environment;
/// an unreadable or malformed one is. Variables already set in the process
/// environment are never overridden.
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| {
        Error::Configuration(format!("cannot read {}: {}", path.display(), e))
    })
}

/// OAuth application registration and endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub oauth: OAuthApp,
    /// Base URL of the Web API, without trailing slash.
    pub api_url: String,
    /// Bind address of the local OAuth callback server.
    pub server_address: String,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_CLIENT_SECRET` is unset or blank.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Res<String> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(Error::Configuration(format!(
                    "{key} must be set. Put it into the environment or {}",
                    data_dir().join(".env").display()
                ))),
            }
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let oauth = OAuthApp {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: optional("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
        };

        Ok(Self {
            oauth,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        })
    }
}
