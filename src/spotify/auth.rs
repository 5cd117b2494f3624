use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    Res,
    config::{OAuthApp, Settings},
    error::Error,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{PkceToken, Token},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
            scope: res.scope.unwrap_or_default(),
            expires_in: res.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the authorization code flow (with a PKCE challenge) and caches the
/// resulting token.
///
/// 1. Generates the PKCE verifier and its S256 challenge
/// 2. Starts the local callback server on `SERVER_ADDRESS`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits up to 60 seconds for the callback to deliver a token
/// 5. Persists the token through [`TokenManager`]
///
/// If the browser cannot be opened the URL is printed for manual navigation.
pub async fn auth(settings: &Settings, shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    let app = Arc::new(settings.oauth.clone());
    let server_address = settings.server_address.clone();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_address, server_state, app).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(&settings.oauth, &code_challenge)?;

    // Store verifier before redirecting, the callback needs it
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state)
        .await
        .ok_or_else(|| Error::Auth("authentication failed or timed out".to_string()))?;

    TokenManager::new(token, settings.oauth.clone())
        .persist()
        .await?;

    success!("Authentication successful!");
    Ok(())
}

/// Builds the URL the user is sent to for granting access.
pub fn authorize_url(app: &OAuthApp, code_challenge: &str) -> Res<Url> {
    Url::parse_with_params(
        &app.auth_url,
        &[
            ("client_id", app.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", app.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", app.scope.as_str()),
        ],
    )
    .map_err(|e| Error::Configuration(format!("invalid authorization url {}: {}", app.auth_url, e)))
}

/// Polls the shared state once per second until the callback stored a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token.
///
/// The client authenticates with its id and secret. Spotify does not always
/// rotate the refresh token, so the returned one may be empty.
pub async fn refresh_token(app: &OAuthApp, refresh_token: &str) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(&app.token_url)
        .basic_auth(&app.client_id, Some(&app.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

/// Exchanges the authorization code from the callback for a token.
pub async fn exchange_code(app: &OAuthApp, code: &str, verifier: &str) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(&app.token_url)
        .basic_auth(&app.client_id, Some(&app.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", app.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

async fn token_from_response(res: reqwest::Response) -> Res<Token> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("token endpoint returned {}: {}", status, body)));
    }

    let json: TokenResponse = res.json().await?;
    Ok(json.into())
}
