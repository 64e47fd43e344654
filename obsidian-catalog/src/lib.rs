//! The label's release catalog: retrieval from the backing Spotify playlist,
//! normalization into [`Release`] records, and a short-lived in-memory cache.
#![deny(missing_docs)]

pub use obsidian_spotify as spotify;

mod error;
pub use error::CatalogError;

mod release;
pub use release::{
    CATALOG_PREFIX, LABEL_NAME, PlatformLinks, Release, ReleaseType, catalog_number,
    normalize_items,
};

mod fetch;
pub use fetch::{PageSource, fetch_all_items, playlist_pages};

mod source;
pub use source::{ReleaseSource, SpotifyPageSource, SpotifyReleaseSource};

mod cache;
pub use cache::{CachedReleases, CatalogCache, is_fresh};
