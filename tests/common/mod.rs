#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use playmaker::{
    error::{AuthError, SpotifyError},
    spotify::{AuthManager, Authenticator, SpotifyApi},
    types::{
        AddTrackToPlaylistResponse, CreatePlaylistResponse, SearchKind, SearchResponse, Token,
        Track, TrackArtist, Tracks, User,
    },
};

pub const AUTHORIZE_URL: &str = "https://accounts.example.test/authorize?state=mock";
pub const MOCK_STATE: &str = "mock-state";

/// Calls recorded by [`MockApi`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    CreatePlaylist { user_id: String, name: String },
    Search { query: String, limit: u32 },
    AddItems { playlist_id: String, uris: Vec<String> },
}

/// Error a mock call should fail with.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Status(u16),
}

impl Failure {
    fn into_error(self) -> SpotifyError {
        match self {
            Failure::Status(status) => SpotifyError::Http {
                status,
                message: format!("mock failure {}", status),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct ApiBehaviour {
    pub user_failure: Option<Failure>,
    pub create_failure: Option<Failure>,
    pub search_failure: Option<Failure>,
    pub add_failure: Option<Failure>,
    pub search_results: Vec<Track>,
    pub playlist_id: String,
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub behaviour: Arc<Mutex<ApiBehaviour>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = MockApi::default();
        api.behaviour.lock().unwrap().playlist_id = "playlist-1".to_string();
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set(&self, update: impl FnOnce(&mut ApiBehaviour)) {
        update(&mut self.behaviour.lock().unwrap());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SpotifyApi for MockApi {
    async fn current_user(&self) -> Result<User, SpotifyError> {
        self.record(Call::CurrentUser);
        if let Some(failure) = self.behaviour.lock().unwrap().user_failure {
            return Err(failure.into_error());
        }
        Ok(User {
            id: "user-1".to_string(),
            display_name: Some("Freddie".to_string()),
        })
    }

    async fn user_playlist_create(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            name: name.to_string(),
        });
        let behaviour = self.behaviour.lock().unwrap();
        if let Some(failure) = behaviour.create_failure {
            return Err(failure.into_error());
        }
        Ok(CreatePlaylistResponse {
            id: behaviour.playlist_id.clone(),
        })
    }

    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError> {
        assert_eq!(kind, SearchKind::Track);
        self.record(Call::Search {
            query: query.to_string(),
            limit,
        });
        let behaviour = self.behaviour.lock().unwrap();
        if let Some(failure) = behaviour.search_failure {
            return Err(failure.into_error());
        }
        Ok(SearchResponse {
            tracks: Some(Tracks {
                items: behaviour
                    .search_results
                    .iter()
                    .take(limit as usize)
                    .cloned()
                    .collect(),
            }),
        })
    }

    async fn playlist_add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        self.record(Call::AddItems {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        if let Some(failure) = self.behaviour.lock().unwrap().add_failure {
            return Err(failure.into_error());
        }
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: "snapshot-1".to_string(),
        })
    }
}

pub fn track(name: &str, artist: &str, uri: &str) -> Track {
    Track {
        name: name.to_string(),
        uri: uri.to_string(),
        artists: vec![TrackArtist {
            name: artist.to_string(),
        }],
    }
}

pub fn fresh_token() -> Token {
    Token {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: "playlist-modify-public playlist-modify-private".to_string(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

pub fn expired_token() -> Token {
    Token {
        obtained_at: Utc::now().timestamp() as u64 - 7200,
        ..fresh_token()
    }
}

pub struct MockAuthManager {
    pub api: MockApi,
    pub token: Mutex<Option<Token>>,
    pub refresh_calls: Arc<AtomicUsize>,
    pub refreshed_with: Arc<Mutex<Vec<String>>>,
    pub refresh_fails: bool,
}

impl MockAuthManager {
    pub fn new(api: MockApi, token: Option<Token>) -> Self {
        MockAuthManager {
            api,
            token: Mutex::new(token),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            refreshed_with: Arc::new(Mutex::new(Vec::new())),
            refresh_fails: false,
        }
    }

    pub fn failing_refresh(mut self) -> Self {
        self.refresh_fails = true;
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthManager for MockAuthManager {
    type Client = MockApi;

    fn authorize_url(&self) -> Result<String, AuthError> {
        Ok(AUTHORIZE_URL.to_string())
    }

    async fn complete_authorization(&self, code: &str, state: &str) -> Result<(), AuthError> {
        if state != MOCK_STATE {
            return Err(AuthError::StateMismatch);
        }
        let mut token = fresh_token();
        token.access_token = format!("access-for-{}", code);
        *self.token.lock().unwrap() = Some(token);
        Ok(())
    }

    async fn cached_token(&self) -> Option<Token> {
        self.token.lock().unwrap().clone()
    }

    fn is_token_expired(&self, token: &Token) -> bool {
        token.is_expired()
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshed_with
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        if self.refresh_fails {
            return Err(AuthError::TokenEndpoint {
                status: 400,
                message: "Refresh token revoked".to_string(),
            });
        }
        let token = fresh_token();
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(token)
    }

    fn client(&self) -> MockApi {
        self.api.clone()
    }
}

/// Hands out managers without a cached token, like a real fresh flow.
#[derive(Clone, Default)]
pub struct MockAuthenticator {
    pub api: MockApi,
    pub logins: Arc<AtomicUsize>,
}

impl MockAuthenticator {
    pub fn new(api: MockApi) -> Self {
        MockAuthenticator {
            api,
            logins: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl Authenticator for MockAuthenticator {
    type Manager = MockAuthManager;

    fn authenticate(&self) -> (MockApi, MockAuthManager) {
        self.logins.fetch_add(1, Ordering::SeqCst);
        let manager = MockAuthManager::new(self.api.clone(), None);
        (manager.client(), manager)
    }
}
