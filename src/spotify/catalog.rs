use async_trait::async_trait;

use crate::{
    Res,
    types::{CatalogTrack, CurrentUser, PlaylistSummary},
};

/// Provider-agnostic view of the catalog service: track search and the
/// playlist mutations the upserter needs.
///
/// [`super::SpotifyClient`] is the production implementation; tests plug in
/// an in-memory catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Returns at most `limit` tracks matching `query`, starting at `offset`.
    /// An empty result means the query is exhausted.
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Res<Vec<CatalogTrack>>;

    /// Every playlist owned by `owner_id`, in the order the provider lists them.
    async fn list_playlists(&self, owner_id: &str) -> Res<Vec<PlaylistSummary>>;

    /// Creates an empty playlist named `name` for `owner_id`.
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
    ) -> Res<PlaylistSummary>;

    /// Replaces the whole content; an empty slice clears the playlist.
    async fn replace_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// Appends `uris` (at most [`super::WRITE_BATCH_SIZE`]) to the playlist.
    async fn add_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// The user the session is authenticated as.
    async fn current_user(&self) -> Res<CurrentUser>;
}
