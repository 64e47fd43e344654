use serde::{Deserialize, Deserializer, Serialize};

use crate::{AccessToken, Client, ClientResult};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// External URLs for an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    /// The Spotify URL for the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
}

/// An image attached to an album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// The source URL of the image, or empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// The image height in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// The image width in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// A simplified artist, as embedded in tracks and albums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    /// The artist ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The artist name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A simplified album, as embedded in a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedAlbum {
    /// The album ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The album name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// The declared album type: `album`, `single` or `compilation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_type: Option<String>,
    /// The number of tracks on the album. Absent on partially resolved albums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,
    /// The release date, at year, month or day precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Cover art in various sizes, widest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    /// External URLs for the album.
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
}

/// A track within a playlist item.
///
/// Episodes deserialize into this as well; they carry no album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// The track ID. Absent for local files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The track name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The artists who performed the track, in credit order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<SimplifiedArtist>,
    /// The album the track appears on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<SimplifiedAlbum>,
    /// The track length in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Whether the track has explicit lyrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    /// External URLs for the track.
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
}

/// One entry of a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// When the item was added, as an ISO 8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    /// The track. `null` for items that are no longer available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

/// A page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// The items on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    /// The total number of items in the collection.
    #[serde(default)]
    pub total: u32,
    /// The offset of the first item on this page.
    #[serde(default)]
    pub offset: u32,
    /// The requested page size.
    #[serde(default)]
    pub limit: u32,
}

/// Playlist-related endpoints.
impl Client {
    /// The largest page size the playlist items endpoint accepts.
    pub const PLAYLIST_PAGE_LIMIT: u32 = 100;

    /// Get one page of a playlist's items.
    pub async fn get_playlist_items(
        &self,
        token: &AccessToken,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> ClientResult<Page<PlaylistItem>> {
        tracing::debug!("fetching playlist {playlist_id} items at offset {offset}");
        self.request(
            token,
            &format!("playlists/{playlist_id}/tracks"),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }
}
