use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Res, api, config::OAuthApp, error::Error, types::PkceToken};

/// Builds the routes of the local auth server.
///
/// # Arguments
///
/// * `state` - Slot holding the pending PKCE verifier, filled with the token by `/callback`
/// * `app` - OAuth application the authorization code is exchanged with
///
/// # Returns
///
/// A [`Router`] serving `GET /health` and `GET /callback`.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>, app: Arc<OAuthApp>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(app))
}

/// Serves `/health` and the OAuth `/callback` until the process ends.
pub async fn start_api_server(
    address: String,
    state: Arc<Mutex<Option<PkceToken>>>,
    app: Arc<OAuthApp>,
) -> Res<()> {
    let addr = SocketAddr::from_str(&address).map_err(|e| {
        Error::Configuration(format!("failed to parse server address {}: {}", address, e))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state, app)).await?;
    Ok(())
}
