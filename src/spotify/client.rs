use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    Res,
    config::Settings,
    error::Error,
    management::TokenManager,
    spotify::CatalogService,
    types::{
        CatalogTrack, CreatePlaylistRequest, CurrentUser, Paging, PlaylistItemsRequest,
        PlaylistObject, PlaylistSummary, SearchResponse, SnapshotResponse,
    },
    warning,
};

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const PLAYLIST_PAGE_SIZE: usize = 50;
const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Authenticated session against the Spotify Web API.
///
/// Every request carries a bearer token from the wrapped [`TokenManager`],
/// which refreshes it shortly before expiry. `502 Bad Gateway` and
/// `429 Too Many Requests` are retried up to three attempts in total; any
/// other non-success status becomes [`Error::Api`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    retry_delay: Duration,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            retry_delay: Duration::from_secs(10),
        }
    }

    /// Builds a session from the cached token. Fails with [`Error::Auth`]
    /// when `genrelist auth` has not been run yet.
    pub async fn connect(settings: &Settings) -> Res<Self> {
        let tokens = TokenManager::load(settings.oauth.clone()).await?;
        Ok(Self::new(settings.api_url.clone(), tokens))
    }

    /// Delay before retrying a `502 Bad Gateway`.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn execute<T, F>(&self, build: F) -> Res<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.tokens.lock().await.get_valid_token().await?;
            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::BAD_GATEWAY {
                    sleep(self.retry_delay).await;
                    continue;
                }

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds.",
                        retry_after
                    );
                }
            }

            return Err(api_error(status, response).await);
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

async fn api_error(status: StatusCode, response: Response) -> Error {
    let body = response.text().await.unwrap_or_default();
    // Web API errors look like {"error": {"status": 401, "message": "..."}}
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);

    Error::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CatalogService for SpotifyClient {
    /// Searches tracks via `GET /search?type=track`.
    ///
    /// # Arguments
    ///
    /// * `query` - Search expression, e.g. `genre:edm`
    /// * `limit` - Page size (1-50)
    /// * `offset` - Index of the first result; the Web API refuses offsets past 1000
    ///
    /// # Returns
    ///
    /// The page mapped to [`CatalogTrack`]s. Tracks without artists are
    /// attributed to "Unknown artist".
    async fn search(&self, query: &str, limit: usize, offset: usize) -> Res<Vec<CatalogTrack>> {
        let url = self.url("/search");
        let params = [
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];

        let res: SearchResponse = self
            .execute(|client| client.get(&url).query(&params))
            .await?;

        Ok(res
            .tracks
            .items
            .into_iter()
            .map(|item| CatalogTrack {
                artist: item
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                title: item.name,
                uri: item.uri,
            })
            .collect())
    }

    /// Lists playlists of `owner_id` page by page, following `next` until the
    /// listing is exhausted. Playlists owned by someone else (followed ones)
    /// are dropped.
    async fn list_playlists(&self, owner_id: &str) -> Res<Vec<PlaylistSummary>> {
        let url = self.url(&format!("/users/{}/playlists", owner_id));
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let params = [
                ("limit", PLAYLIST_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ];
            let page: Paging<PlaylistObject> = self
                .execute(|client| client.get(&url).query(&params))
                .await?;

            let fetched = page.items.len();
            playlists.extend(
                page.items
                    .into_iter()
                    .filter(|p| p.owner.id == owner_id)
                    .map(|p| PlaylistSummary {
                        id: p.id,
                        name: p.name,
                        owner_id: p.owner.id,
                    }),
            );

            if page.next.is_none() || fetched == 0 {
                return Ok(playlists);
            }
            offset += fetched;
        }
    }

    /// Creates a non-collaborative playlist with a fixed description.
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
    ) -> Res<PlaylistSummary> {
        let url = self.url(&format!("/users/{}/playlists", owner_id));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Shuffled genre picks, refreshed by genrelist.".to_string(),
            public,
            collaborative: false,
        };

        let created: PlaylistObject = self
            .execute(|client| client.post(&url).json(&body))
            .await?;

        Ok(PlaylistSummary {
            id: created.id,
            name: created.name,
            owner_id: created.owner.id,
        })
    }

    async fn replace_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = PlaylistItemsRequest {
            uris: uris.to_vec(),
        };

        let _: SnapshotResponse = self
            .execute(|client| client.put(&url).json(&body))
            .await?;
        Ok(())
    }

    async fn add_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = PlaylistItemsRequest {
            uris: uris.to_vec(),
        };

        let _: SnapshotResponse = self
            .execute(|client| client.post(&url).json(&body))
            .await?;
        Ok(())
    }

    async fn current_user(&self) -> Res<CurrentUser> {
        let url = self.url("/me");
        self.execute(|client| client.get(&url)).await
    }
}
