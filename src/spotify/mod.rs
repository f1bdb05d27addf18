//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API this application needs,
//! plus the OAuth authorization-code flow that backs it.
//!
//! ```text
//! Session Controller
//!          ↓
//! SpotifyApi (trait)  ←  AuthManager (trait, owns the token cache)
//!          ↓
//! SpotifyClient / SpotifyOAuth (reqwest)
//!          ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user profile
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `GET /search` - Catalog search
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `POST /api/token` - Code exchange and token refresh
//!
//! The two traits are the seams the controller is written against, so it can
//! be driven by in-memory implementations in tests.
//!
//! Errors from the Web API are mapped to [`SpotifyError::Http`] carrying the
//! HTTP status and the message from Spotify's error body. No call is retried.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::{
    error::SpotifyError,
    types::{
        AddTrackToPlaylistResponse, ApiErrorBody, CreatePlaylistResponse, SearchKind,
        SearchResponse, Token, User,
    },
};

pub mod auth;
pub mod playlist;
pub mod search;
pub mod user;

pub use auth::{AuthManager, Authenticator, SpotifyAuthenticator, SpotifyOAuth};

/// Token cache shared between an auth manager and the clients it hands out.
pub type TokenCache = Arc<RwLock<Option<Token>>>;

/// The Web API operations the session controller consumes.
///
/// Every method is a single request without retries. A rejected or expired
/// token surfaces as an error whose [`SpotifyError::is_unauthorized`] is
/// true; the controller turns that into a logout.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Profile of the user the token belongs to.
    async fn current_user(&self) -> Result<User, SpotifyError>;

    /// Creates a playlist owned by `user_id` named `name`.
    ///
    /// # Returns
    ///
    /// The created playlist; its `id` becomes the session's active playlist.
    async fn user_playlist_create(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError>;

    /// Catalog search restricted to one item `kind`, at most `limit` items.
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError>;

    /// Appends the track `uris` to the playlist.
    async fn playlist_add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError>;
}

/// Authenticated Web API client.
///
/// The client does not own a token. It reads the access token from the cache
/// of the auth manager that created it on every call, so a refresh done by
/// the manager is picked up without rebuilding the client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    cache: TokenCache,
}

impl SpotifyClient {
    /// Creates a client for the API rooted at `api_url`.
    ///
    /// # Arguments
    ///
    /// * `http` - Connection pool, usually shared with the auth manager
    /// * `api_url` - Web API base URL without trailing slash
    ///   (e.g. `https://api.spotify.com/v1`)
    /// * `cache` - Token cache of the auth manager owning this client
    pub fn new(http: Client, api_url: impl Into<String>, cache: TokenCache) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into(),
            cache,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn access_token(&self) -> Result<String, SpotifyError> {
        self.cache
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(SpotifyError::NotAuthenticated)
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<User, SpotifyError> {
        self.me().await
    }

    async fn user_playlist_create(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.create_playlist(user_id, name).await
    }

    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError> {
        self.search_catalog(query, kind, limit).await
    }

    async fn playlist_add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        self.add_tracks(playlist_id, uris).await
    }
}

/// Decodes a Web API response, turning non-success statuses into
/// [`SpotifyError::Http`].
///
/// The error message is taken from Spotify's `{"error": {"status", "message"}}`
/// body. Bodies in any other shape are used verbatim, and an empty body falls
/// back to the status' canonical reason.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SpotifyError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body,
        };
        return Err(SpotifyError::Http {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<T>().await?)
}
