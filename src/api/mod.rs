//! # API Module
//!
//! HTTP endpoints of the short-lived local server that `genrelist auth` starts.
//!
//! - [`callback`] receives the authorization code from Spotify's authorization
//!   server and exchanges it, together with the PKCE verifier, for a token.
//! - [`health`] reports status and version.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use genrelist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
