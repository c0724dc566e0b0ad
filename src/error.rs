use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// The four failure families callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Api,
    EmptyResult,
}

/// Rejections of a playlist request. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid source '{0}', expected 'liked' or 'top'")]
    InvalidSource(String),
    #[error("invalid time range {0:?}, expected short_term, medium_term or long_term")]
    InvalidTimeRange(Option<String>),
    #[error("invalid limit {0}, expected a value between 1 and 10000")]
    InvalidLimit(String),
    #[error("invalid playlist name, expected 1 to 100 characters")]
    InvalidName,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidSource(_) => "invalid_source",
            ValidationError::InvalidTimeRange(_) => "invalid_time_range",
            ValidationError::InvalidLimit(_) => "invalid_limit",
            ValidationError::InvalidName => "invalid_name",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{method} {path} failed: {status} {body}")]
    Api {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("request to Spotify failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from Spotify: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no tracks found")]
    EmptyResult,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Api { .. }
            | Error::Transport(_)
            | Error::Decode(_)
            | Error::Config(_)
            | Error::Io(_) => ErrorKind::Api,
            Error::EmptyResult => ErrorKind::EmptyResult,
        }
    }

    /// Stable identifier reported to HTTP clients in the `kind` field.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(e) => e.code(),
            Error::Auth(_) => "auth_error",
            Error::EmptyResult => "no_tracks_found",
            Error::Config(_) | Error::Io(_) => "internal_error",
            _ => "spotify_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::EmptyResult => StatusCode::BAD_REQUEST,
            ErrorKind::Auth => StatusCode::UNAUTHORIZED,
            ErrorKind::Api => match self {
                Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Error::EmptyResult => None,
            _ => Some(self.to_string()),
        }
    }
}

pub fn error_body(kind: &str, details: Option<String>) -> serde_json::Value {
    match details {
        Some(details) => json!({ "ok": false, "kind": kind, "details": details }),
        None => json!({ "ok": false, "kind": kind }),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), Json(error_body(self.code(), self.details()))).into_response()
    }
}
