#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use genrelist::{
    Res,
    error::Error,
    spotify::CatalogService,
    types::{CatalogTrack, CurrentUser, PlaylistSummary},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search { query: String, limit: usize, offset: usize },
    ListPlaylists { owner_id: String },
    CreatePlaylist { name: String, public: bool },
    Replace { playlist_id: String, len: usize },
    Add { playlist_id: String, len: usize },
    CurrentUser,
}

#[derive(Debug, Clone)]
pub struct FakePlaylist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub public: bool,
    pub items: Vec<String>,
}

#[derive(Default)]
struct State {
    playlists: Vec<FakePlaylist>,
    calls: Vec<Call>,
    next_id: usize,
    /// Fail the n-th add call (1-based).
    fail_add_at: Option<usize>,
    adds: usize,
    fail_search: bool,
}

/// In-memory catalog: per-query track lists and a playlist store.
pub struct FakeCatalog {
    user_id: String,
    tracks: HashMap<String, Vec<CatalogTrack>>,
    search_delay: Option<Duration>,
    state: Mutex<State>,
}

pub fn track(query: &str, n: usize) -> CatalogTrack {
    CatalogTrack {
        title: format!("{query} song {n}"),
        artist: format!("{query} artist {n}"),
        uri: format!("spotify:track:{query}-{n}"),
    }
}

pub fn tracks(query: &str, count: usize) -> Vec<CatalogTrack> {
    (0..count).map(|n| track(query, n)).collect()
}

impl FakeCatalog {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            tracks: HashMap::new(),
            search_delay: None,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_query(mut self, query: &str, count: usize) -> Self {
        self.tracks.insert(query.to_string(), tracks(query, count));
        self
    }

    pub fn with_tracks(mut self, query: &str, items: Vec<CatalogTrack>) -> Self {
        self.tracks.insert(query.to_string(), items);
        self
    }

    pub fn with_playlist(self, name: &str, owner_id: &str, items: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = format!("pl-{}", state.next_id);
            state.playlists.push(FakePlaylist {
                id,
                name: name.to_string(),
                owner_id: owner_id.to_string(),
                public: true,
                items: items.iter().map(|s| s.to_string()).collect(),
            });
        }
        self
    }

    pub fn fail_add_at(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_add_at = Some(n);
        self
    }

    /// Every search call waits this long before answering.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    pub fn fail_search(self) -> Self {
        self.state.lock().unwrap().fail_search = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn search_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Search { .. }))
            .collect()
    }

    pub fn add_sizes(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add { len, .. } => Some(len),
                _ => None,
            })
            .collect()
    }

    pub fn playlists(&self) -> Vec<FakePlaylist> {
        self.state.lock().unwrap().playlists.clone()
    }

    pub fn playlist(&self, id: &str) -> Option<FakePlaylist> {
        self.playlists().into_iter().find(|p| p.id == id)
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Res<Vec<CatalogTrack>> {
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Search {
            query: query.to_string(),
            limit,
            offset,
        });
        if state.fail_search {
            return Err(Error::Api {
                status: 503,
                message: "search unavailable".to_string(),
            });
        }

        let all = self.tracks.get(query).cloned().unwrap_or_default();
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn list_playlists(&self, owner_id: &str) -> Res<Vec<PlaylistSummary>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListPlaylists {
            owner_id: owner_id.to_string(),
        });
        Ok(state
            .playlists
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| PlaylistSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                owner_id: p.owner_id.clone(),
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
    ) -> Res<PlaylistSummary> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreatePlaylist {
            name: name.to_string(),
            public,
        });
        state.next_id += 1;
        let id = format!("pl-{}", state.next_id);
        state.playlists.push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            public,
            items: Vec::new(),
        });
        Ok(PlaylistSummary {
            id,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
        })
    }

    async fn replace_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Replace {
            playlist_id: playlist_id.to_string(),
            len: uris.len(),
        });
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: "no such playlist".to_string(),
            })?;
        playlist.items = uris.to_vec();
        Ok(())
    }

    async fn add_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Add {
            playlist_id: playlist_id.to_string(),
            len: uris.len(),
        });
        state.adds += 1;
        if state.fail_add_at == Some(state.adds) {
            return Err(Error::Api {
                status: 500,
                message: "write failed".to_string(),
            });
        }
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: "no such playlist".to_string(),
            })?;
        playlist.items.extend_from_slice(uris);
        Ok(())
    }

    async fn current_user(&self) -> Res<CurrentUser> {
        self.state.lock().unwrap().calls.push(Call::CurrentUser);
        Ok(CurrentUser {
            id: self.user_id.clone(),
            display_name: None,
        })
    }
}
