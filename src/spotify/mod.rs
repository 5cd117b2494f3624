//! # Spotify Integration Module
//!
//! The catalog service layer of genrelist: the [`CatalogService`] seam the
//! collector and upserter are written against, its Spotify Web API
//! implementation [`SpotifyClient`], and the OAuth flow in [`auth`].
//!
//! ```text
//! Scheduler (collect + upsert)
//!          ↓
//! CatalogService trait
//!          ↓
//! SpotifyClient ── TokenManager ── auth (code flow + PKCE)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Provider limits
//!
//! - Search pages hold at most [`PAGE_SIZE`] tracks
//! - Search offsets stop at [`MAX_OFFSET`]
//! - Playlist writes take at most [`WRITE_BATCH_SIZE`] URIs per call
//!
//! ## Endpoints
//!
//! - `GET /search` - track search with `limit`/`offset` pagination
//! - `GET /me` - the authorized user
//! - `GET /users/{user_id}/playlists` - playlists, filtered to those the user owns
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `PUT /playlists/{playlist_id}/tracks` - replace (or clear) items
//! - `POST /playlists/{playlist_id}/tracks` - append items
//! - `POST /api/token` - code exchange and refresh

pub mod auth;
mod catalog;
mod client;

pub use catalog::CatalogService;
pub use client::SpotifyClient;

/// Maximum number of tracks per search page.
pub const PAGE_SIZE: usize = 50;

/// Search offsets at or beyond this value are rejected by the provider.
pub const MAX_OFFSET: usize = 1000;

/// Maximum number of URIs per playlist write.
pub const WRITE_BATCH_SIZE: usize = 100;
