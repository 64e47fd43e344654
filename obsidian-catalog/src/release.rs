use serde::{Deserialize, Serialize};

use crate::spotify;

/// Prefix shared by every catalog number.
pub const CATALOG_PREFIX: &str = "OBL";
/// The label name attached to every release.
pub const LABEL_NAME: &str = "Obsidian Labs";

/// Track counts at or below this are treated as EPs.
const MAX_EP_TRACKS: u32 = 6;

/// Format the catalog number for the 1-based playlist position `position`.
pub fn catalog_number(position: usize) -> String {
    format!("{CATALOG_PREFIX}-{position:03}")
}

/// How a release is presented in the catalog.
///
/// Inferred from the album metadata rather than declared by the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseType {
    /// A single.
    #[serde(rename = "single")]
    Single,
    /// A short album.
    #[serde(rename = "EP")]
    Ep,
    /// Anything else, including albums whose track count is unknown.
    #[serde(rename = "album")]
    Album,
}
impl ReleaseType {
    /// Infer the release type of an album.
    pub fn infer(album: &spotify::SimplifiedAlbum) -> Self {
        if album.album_type.as_deref() == Some("single") {
            return ReleaseType::Single;
        }

        match album.total_tracks {
            Some(total) if total > 0 && total <= MAX_EP_TRACKS => ReleaseType::Ep,
            _ => ReleaseType::Album,
        }
    }
}
impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReleaseType::Single => "single",
            ReleaseType::Ep => "EP",
            ReleaseType::Album => "album",
        })
    }
}

/// Links to the release on each streaming platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLinks {
    /// The Spotify track URL, or empty.
    pub spotify: String,
}

/// A release, as the label site presents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Sequential catalog number derived from the playlist position at fetch time.
    ///
    /// Not stable across refetches if the playlist order changes.
    pub catalog_number: String,
    /// The track title.
    pub title: String,
    /// The first credited artist, or empty.
    pub primary_artist: String,
    /// Every credited artist, in credit order.
    pub all_artists: Vec<String>,
    /// The album release date, as reported upstream.
    pub release_date: Option<String>,
    /// The widest album image, or empty.
    pub cover_art_url: String,
    /// The Spotify track URL, or empty.
    pub spotify_track_url: String,
    /// The Spotify track ID. Absent for local files.
    pub spotify_track_id: Option<String>,
    /// The Spotify album URL, or empty.
    pub spotify_album_url: String,
    /// The track length in milliseconds.
    pub duration_ms: u64,
    /// Whether the track has explicit lyrics.
    pub explicit: bool,
    /// The label name.
    pub label: String,
    /// The inferred release type.
    pub release_type: ReleaseType,
    /// Per-platform links.
    pub platform_links: PlatformLinks,
    /// When the track was added to the playlist.
    pub added_to_playlist_at: Option<String>,
}
impl Release {
    /// Build a release from the playlist item at the 1-based `position`.
    ///
    /// Returns `None` if the item has no track, or the track has no album.
    pub fn from_item(position: usize, item: spotify::PlaylistItem) -> Option<Self> {
        let track = item.track?;
        let album = track.album.as_ref()?;

        let all_artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
        let spotify_track_url = track.external_urls.spotify.unwrap_or_default();

        Some(Release {
            catalog_number: catalog_number(position),
            title: track.name.unwrap_or_default(),
            primary_artist: all_artists.first().cloned().unwrap_or_default(),
            all_artists,
            release_date: album.release_date.clone(),
            cover_art_url: album
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            spotify_track_id: track.id,
            spotify_album_url: album.external_urls.spotify.clone().unwrap_or_default(),
            duration_ms: track.duration_ms.unwrap_or_default(),
            explicit: track.explicit.unwrap_or_default(),
            label: LABEL_NAME.to_string(),
            release_type: ReleaseType::infer(album),
            platform_links: PlatformLinks {
                spotify: spotify_track_url.clone(),
            },
            spotify_track_url,
            added_to_playlist_at: item.added_at,
        })
    }
}

/// Normalize playlist items into releases.
///
/// Items without a track or album are dropped, but still consume their position,
/// so catalog numbers have gaps where items were skipped. Order is preserved.
pub fn normalize_items(items: impl IntoIterator<Item = spotify::PlaylistItem>) -> Vec<Release> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| Release::from_item(index + 1, item))
        .collect()
}
