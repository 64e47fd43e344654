use thiserror::Error;

use crate::spotify::ClientError;

/// Why the catalog could not be produced.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required setting is missing. Raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// The credential exchange failed.
    #[error("Spotify token error: {0}")]
    UpstreamAuth(String),

    /// A playlist page request failed.
    #[error("Spotify playlist error: {0}")]
    UpstreamFetch(String),
}

impl CatalogError {
    pub(crate) const MISSING_PLAYLIST_ID: &str =
        "Missing SPOTIFY_PLAYLIST_ID environment variable.";
    pub(crate) const MISSING_CREDENTIALS: &str = "Missing Spotify credentials.";

    pub(crate) fn missing_playlist_id() -> Self {
        Self::Configuration(Self::MISSING_PLAYLIST_ID.to_string())
    }

    pub(crate) fn missing_credentials() -> Self {
        Self::Configuration(Self::MISSING_CREDENTIALS.to_string())
    }

    /// Classify an error from the token exchange.
    pub(crate) fn from_auth(err: ClientError) -> Self {
        match err {
            ClientError::MissingCredentials => Self::missing_credentials(),
            ClientError::AuthError { body, .. } | ClientError::ApiError { body, .. } => {
                Self::UpstreamAuth(body)
            }
            err => Self::UpstreamAuth(err.to_string()),
        }
    }

    /// Classify an error from a playlist page request.
    pub(crate) fn from_fetch(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { body, .. } | ClientError::AuthError { body, .. } => {
                Self::UpstreamFetch(body)
            }
            err => Self::UpstreamFetch(err.to_string()),
        }
    }
}
