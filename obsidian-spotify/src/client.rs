#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
    /// The client ID or client secret was empty.
    MissingCredentials,
    /// The accounts service rejected the credential exchange.
    AuthError {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },
    /// The Web API returned a non-success status.
    ApiError {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::MissingCredentials => write!(f, "Missing Spotify credentials."),
            ClientError::AuthError { body, .. } => write!(f, "Spotify token error: {body}"),
            ClientError::ApiError { body, .. } => write!(f, "Spotify API error: {body}"),
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// A client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) accounts_url: String,
    pub(crate) api_url: String,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// The base URL of the accounts service, which issues access tokens.
    pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
    /// The base URL of the Web API.
    pub const API_URL: &str = "https://api.spotify.com/v1";

    /// Create a new client against the public Spotify endpoints.
    pub fn new() -> Self {
        Self::with_base_urls(Self::ACCOUNTS_URL, Self::API_URL)
    }

    /// Create a new client against custom endpoints, e.g. a local stand-in.
    pub fn with_base_urls(accounts_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}
impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
