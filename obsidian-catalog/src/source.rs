use std::time::Instant;

use obsidian_shared::config;

use crate::{
    CatalogError, PageSource, Release, fetch_all_items, normalize_items,
    spotify::{AccessToken, Client, Page, PlaylistItem},
};

/// Something that can produce the full, normalized release list.
pub trait ReleaseSource {
    /// Produce the release list from scratch.
    fn fetch_releases(&self) -> impl Future<Output = Result<Vec<Release>, CatalogError>> + Send;
}

/// Pages of one playlist, read with an already-issued token.
pub struct SpotifyPageSource<'a> {
    client: &'a Client,
    token: &'a AccessToken,
    playlist_id: &'a str,
}
impl<'a> SpotifyPageSource<'a> {
    /// Read `playlist_id` through `client` using `token`.
    pub fn new(client: &'a Client, token: &'a AccessToken, playlist_id: &'a str) -> Self {
        Self {
            client,
            token,
            playlist_id,
        }
    }
}
impl PageSource for SpotifyPageSource<'_> {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Page<PlaylistItem>, CatalogError> {
        self.client
            .get_playlist_items(self.token, self.playlist_id, limit, offset)
            .await
            .map_err(CatalogError::from_fetch)
    }
}

/// The release list behind the label's Spotify playlist.
///
/// Every fetch performs a fresh token exchange.
pub struct SpotifyReleaseSource {
    client: Client,
    config: config::Spotify,
}
impl SpotifyReleaseSource {
    /// Create a source for the playlist named in `config`.
    pub fn new(client: Client, config: config::Spotify) -> Self {
        Self { client, config }
    }
}
impl ReleaseSource for SpotifyReleaseSource {
    async fn fetch_releases(&self) -> Result<Vec<Release>, CatalogError> {
        let playlist_id = self
            .config
            .playlist_id()
            .ok_or_else(CatalogError::missing_playlist_id)?;
        let (Some(client_id), Some(client_secret)) =
            (self.config.client_id(), self.config.client_secret())
        else {
            return Err(CatalogError::missing_credentials());
        };

        let start = Instant::now();
        let token = self
            .client
            .request_access_token(client_id, client_secret)
            .await
            .map_err(CatalogError::from_auth)?;

        let pages = SpotifyPageSource::new(&self.client, &token, playlist_id);
        let items = fetch_all_items(&pages).await?;
        let item_count = items.len();
        let releases = normalize_items(items);

        tracing::info!(
            "fetched {item_count} playlist items ({} releases) in {:?}",
            releases.len(),
            start.elapsed()
        );
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use serde_json::{Value, json};
    use warp::{Filter, http::StatusCode};

    use super::*;

    const PLAYLIST_LEN: u32 = 150;

    /// Item at the 1-based `position`; position 2 has lost its album.
    fn playlist_item(position: u32) -> Value {
        let album = (position != 2).then(|| {
            json!({
                "album_type": "single",
                "total_tracks": 1,
                "images": [{"url": format!("https://i.scdn.co/image/{position}")}],
                "external_urls": {"spotify": format!("https://open.spotify.com/album/{position}")}
            })
        });
        json!({
            "added_at": "2024-06-01T09:30:00Z",
            "track": {
                "id": format!("t{position}"),
                "name": format!("Track {position}"),
                "artists": [{"name": "Vanta"}],
                "album": album,
                "duration_ms": 180000,
                "explicit": false
            }
        })
    }

    /// A local stand-in for the accounts service and Web API. Tokens are only
    /// issued for `id`/`secret`; only playlist `label` exists. Records the
    /// requested page offsets.
    struct Spotify {
        accounts_url: String,
        api_url: String,
        offsets: Arc<Mutex<Vec<u32>>>,
    }
    impl Spotify {
        fn spawn() -> Self {
            let reply = |body: Value, status| {
                warp::reply::with_status(warp::reply::json(&body), status)
            };

            let token = warp::path!("api" / "token")
                .and(warp::post())
                .and(warp::header::<String>("authorization"))
                .and(warp::body::form::<HashMap<String, String>>())
                .map(move |authorization: String, form: HashMap<String, String>| {
                    // Base64 of `id:secret`.
                    if authorization == "Basic aWQ6c2VjcmV0"
                        && form.get("grant_type").map(String::as_str) == Some("client_credentials")
                    {
                        reply(
                            json!({"access_token": "tok", "token_type": "Bearer", "expires_in": 3600}),
                            StatusCode::OK,
                        )
                    } else {
                        reply(json!({"error": "invalid_client"}), StatusCode::BAD_REQUEST)
                    }
                });

            let offsets = Arc::new(Mutex::new(vec![]));
            let recorded = Arc::clone(&offsets);
            let tracks = warp::path!("v1" / "playlists" / String / "tracks")
                .and(warp::get())
                .and(warp::header::<String>("authorization"))
                .and(warp::query::<HashMap<String, String>>())
                .map(
                    move |playlist_id: String,
                          authorization: String,
                          query: HashMap<String, String>| {
                        if authorization != "Bearer tok" {
                            return reply(
                                json!({"error": {"status": 401, "message": "Invalid access token"}}),
                                StatusCode::UNAUTHORIZED,
                            );
                        }
                        if playlist_id != "label" {
                            return reply(
                                json!({"error": {"status": 404, "message": "Not found."}}),
                                StatusCode::NOT_FOUND,
                            );
                        }
                        let number = |key: &str| {
                            query
                                .get(key)
                                .and_then(|v| v.parse::<u32>().ok())
                                .unwrap_or_default()
                        };
                        let (offset, limit) = (number("offset"), number("limit"));
                        recorded.lock().unwrap().push(offset);

                        let end = (offset + limit).min(PLAYLIST_LEN);
                        let items: Vec<Value> = (offset + 1..=end).map(playlist_item).collect();
                        reply(
                            json!({
                                "items": items,
                                "total": PLAYLIST_LEN,
                                "offset": offset,
                                "limit": limit
                            }),
                            StatusCode::OK,
                        )
                    },
                );

            let (addr, server) =
                warp::serve(token.or(tracks)).bind_ephemeral(([127, 0, 0, 1], 0));
            tokio::spawn(server);
            Self {
                accounts_url: format!("http://{addr}"),
                api_url: format!("http://{addr}/v1"),
                offsets,
            }
        }

        fn source(&self, client_secret: &str, playlist_id: &str) -> SpotifyReleaseSource {
            SpotifyReleaseSource::new(
                Client::with_base_urls(self.accounts_url.clone(), self.api_url.clone()),
                config::Spotify {
                    client_id: Some("id".to_string()),
                    client_secret: Some(client_secret.to_string()),
                    playlist_id: Some(playlist_id.to_string()),
                },
            )
        }

        fn offsets(&self) -> Vec<u32> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_fetches_every_page_of_the_playlist() {
        let spotify = Spotify::spawn();
        let releases = spotify
            .source("secret", "label")
            .fetch_releases()
            .await
            .unwrap();

        assert_eq!(spotify.offsets(), [0, 100]);
        assert_eq!(releases.len(), 149);
        assert_eq!(releases[0].catalog_number, "OBL-001");
        assert_eq!(releases[1].catalog_number, "OBL-003");
        assert_eq!(releases[148].catalog_number, "OBL-150");
        assert_eq!(releases[148].title, "Track 150");
        assert_eq!(releases[0].cover_art_url, "https://i.scdn.co/image/1");
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_auth_error() {
        let spotify = Spotify::spawn();
        let err = spotify
            .source("wrong", "label")
            .fetch_releases()
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::UpstreamAuth(_)));
        assert_eq!(
            err.to_string(),
            r#"Spotify token error: {"error":"invalid_client"}"#
        );
        assert!(spotify.offsets().is_empty());
    }

    #[tokio::test]
    async fn test_missing_playlist_is_fetch_error() {
        let spotify = Spotify::spawn();
        let err = spotify
            .source("secret", "gone")
            .fetch_releases()
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::UpstreamFetch(_)));
        assert!(err.to_string().starts_with("Spotify playlist error: "));
        assert!(err.to_string().contains("Not found."));
    }

    // Nothing listens on the discard port, so any request would fail with a
    // transport error rather than a configuration error.
    fn offline_source(config: config::Spotify) -> SpotifyReleaseSource {
        SpotifyReleaseSource::new(
            Client::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9/v1"),
            config,
        )
    }

    #[tokio::test]
    async fn test_missing_playlist_id_fails_before_network() {
        let source = offline_source(config::Spotify {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            playlist_id: None,
        });

        let err = source.fetch_releases().await.unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "Missing SPOTIFY_PLAYLIST_ID environment variable."
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        let source = offline_source(config::Spotify {
            client_id: Some("id".to_string()),
            client_secret: Some(String::new()),
            playlist_id: Some("playlist".to_string()),
        });

        let err = source.fetch_releases().await.unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
        assert_eq!(err.to_string(), "Missing Spotify credentials.");
    }

    #[tokio::test]
    async fn test_unreachable_accounts_service_is_auth_error() {
        let source = offline_source(config::Spotify {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            playlist_id: Some("playlist".to_string()),
        });

        let err = source.fetch_releases().await.unwrap_err();
        assert!(matches!(err, CatalogError::UpstreamAuth(_)));
    }
}
