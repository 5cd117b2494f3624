use std::sync::Arc;

use crate::{
    Res,
    spotify::{CatalogService, WRITE_BATCH_SIZE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub playlist_id: String,
    /// `false` when an existing playlist was cleared and refilled.
    pub created: bool,
    /// Number of append calls issued.
    pub batches: usize,
    pub tracks: usize,
}

/// Makes a named playlist hold exactly a given list of tracks.
///
/// The playlist is identified by owner and exact name; with several matches
/// the first one listed wins. An existing playlist is cleared before the new
/// items are appended in batches, so repeating an upsert with the same items
/// yields the same content. A failing batch leaves the already appended
/// prefix in place.
pub struct PlaylistUpserter<C> {
    catalog: Arc<C>,
    batch_size: usize,
}

impl<C: CatalogService> PlaylistUpserter<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_batch_size(catalog, WRITE_BATCH_SIZE)
    }

    pub fn with_batch_size(catalog: Arc<C>, batch_size: usize) -> Self {
        Self {
            catalog,
            batch_size: batch_size.max(1),
        }
    }

    /// Resolves, clears or creates the playlist, then appends `uris` in batches.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - User that owns (or will own) the playlist
    /// * `name` - Exact playlist name to look up
    /// * `uris` - Track URIs in the order they should appear
    ///
    /// # Returns
    ///
    /// - `Ok(UpsertOutcome)` - Playlist id, whether it was created, and batch/track counts
    /// - `Err(Error)` - The first failing catalog call; later batches are not attempted
    pub async fn upsert(&self, owner_id: &str, name: &str, uris: &[String]) -> Res<UpsertOutcome> {
        let existing = self
            .catalog
            .list_playlists(owner_id)
            .await?
            .into_iter()
            .find(|p| p.name == name);

        let (playlist_id, created) = match existing {
            Some(playlist) => {
                self.catalog.replace_playlist_items(&playlist.id, &[]).await?;
                (playlist.id, false)
            }
            None => {
                let playlist = self.catalog.create_playlist(owner_id, name, true).await?;
                (playlist.id, true)
            }
        };

        let mut batches = 0;
        for chunk in uris.chunks(self.batch_size) {
            self.catalog.add_playlist_items(&playlist_id, chunk).await?;
            batches += 1;
        }

        Ok(UpsertOutcome {
            playlist_id,
            created,
            batches,
            tracks: uris.len(),
        })
    }
}
