//! Error types.
//!
//! Three families of failures exist: calls against the Spotify Web API
//! ([`SpotifyError`]), the OAuth flow and token endpoint ([`AuthError`]) and
//! startup configuration ([`ConfigError`]). Only the HTTP status of a
//! [`SpotifyError`] is ever branched on; everything else is reported.

use std::{net::AddrParseError, num::ParseIntError};

use thiserror::Error;

/// Failure of a Spotify Web API call.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The API answered with a non-success status.
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },

    /// The client was asked to call the API before any token was cached.
    #[error("no access token available")]
    NotAuthenticated,

    /// Network failure or undecodable response body.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl SpotifyError {
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SpotifyError::Http { status, .. } => Some(*status),
            SpotifyError::NotAuthenticated => Some(401),
            SpotifyError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// True when the failure means the session's token is no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        self.http_status() == Some(401)
    }
}

/// Failure while authorizing or refreshing a token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization state does not match the pending login")]
    StateMismatch,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("authorization callback carried no code")]
    MissingCode,

    #[error("no login is pending for this session")]
    NoPendingLogin,

    #[error("token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("invalid authorization url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Invalid startup configuration. Fatal for `serve`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// `SERVER_ADDRESS` is not a `host:port` socket address.
    #[error("invalid server address {0}: {1}")]
    InvalidAddress(String, AddrParseError),

    /// A numeric variable does not parse as an unsigned integer.
    #[error("invalid value {1:?} for {0}: {2}")]
    InvalidNumber(&'static str, String, ParseIntError),
}
