use std::path::PathBuf;

use chrono::Utc;

use crate::{Res, config, config::OAuthApp, error::Error, spotify, types::Token};

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    app: OAuthApp,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, app: OAuthApp) -> Self {
        TokenManager {
            token,
            app,
            path: Self::token_path(),
        }
    }

    /// Same as [`TokenManager::new`] but caches to `path` instead of the data dir.
    pub fn with_path(token: Token, app: OAuthApp, path: PathBuf) -> Self {
        TokenManager { token, app, path }
    }

    pub async fn load(app: OAuthApp) -> Res<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            Error::Auth(format!(
                "no cached token at {} ({}). Please run genrelist auth",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, app, path })
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and re-persisting it first when it
    /// is about to expire.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            let mut new_token =
                spotify::auth::refresh_token(&self.app, &self.token.refresh_token).await?;
            // Spotify may omit the refresh token when it does not rotate it.
            if new_token.refresh_token.is_empty() {
                new_token.refresh_token = self.token.refresh_token.clone();
            }
            self.token = new_token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
