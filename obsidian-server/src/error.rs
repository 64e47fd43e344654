use std::{convert::Infallible, error::Error as _};

use obsidian_catalog::CatalogError;
use serde::Serialize;
use thiserror::Error;
use warp::{
    Rejection, Reply,
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{self, MethodNotAllowed, PayloadTooLarge, Reject, UnsupportedMediaType},
};

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing.
    #[error("{0}")]
    Configuration(String),

    /// A required form field is missing.
    #[error("{0}")]
    Validation(String),

    /// Spotify rejected the credential exchange.
    #[error("{0}")]
    UpstreamAuth(String),

    /// A playlist page could not be fetched.
    #[error("{0}")]
    UpstreamFetch(String),

    /// The webhook could not be reached or rejected the message.
    #[error("{0}")]
    NotificationDelivery(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamAuth(_) | Self::UpstreamFetch(_) | Self::NotificationDelivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::Configuration(_) => Self::Configuration(message),
            CatalogError::UpstreamAuth(_) => Self::UpstreamAuth(message),
            CatalogError::UpstreamFetch(_) => Self::UpstreamFetch(message),
        }
    }
}

impl Reject for Error {}

pub fn reject_on_error(err: impl Into<Error>) -> Rejection {
    reject::custom(err.into())
}

#[derive(Debug, Serialize)]
struct ErrorResponseBody {
    error: String,
}

fn status_code_to_string(code: StatusCode) -> String {
    code.canonical_reason()
        .unwrap_or_else(|| code.as_str())
        .to_string()
}

pub fn error_reply(code: StatusCode, error: String) -> impl Reply {
    warp::reply::with_status(warp::reply::json(&ErrorResponseBody { error }), code)
}

#[allow(clippy::unused_async)] // async needed for warp filter
pub async fn handle_rejection(reject: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if let Some(err) = reject.find::<Error>() {
        code = err.status_code();
        message = err.to_string();
        if code.is_server_error() {
            tracing::error!("{message}");
        } else {
            tracing::debug!("rejected request: {message}");
        }
    } else if reject.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = status_code_to_string(code);
    } else if let Some(err) = reject.find::<BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = err
            .source()
            .map_or_else(|| err.to_string(), ToString::to_string);
    } else if reject.find::<UnsupportedMediaType>().is_some() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = status_code_to_string(code);
    } else if reject.find::<PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = status_code_to_string(code);
    } else if reject.find::<MethodNotAllowed>().is_some() {
        // Most rejections carry a MethodNotAllowed element, so this goes last.
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = status_code_to_string(code);
    } else {
        tracing::error!("unhandled rejection {reject:?}");
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = status_code_to_string(code);
    }

    Ok(error_reply(code, message))
}
