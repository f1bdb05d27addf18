use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Seconds before the real expiry at which a token already counts as expired.
pub const TOKEN_EXPIRY_MARGIN: u64 = 60;

/// An access token together with the data needed to refresh it.
///
/// Both timestamps are Unix seconds. `obtained_at` is taken from the local
/// clock when the token endpoint answered, so expiry never depends on the
/// server's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Unix time at which the token stops being accepted.
    ///
    /// Saturates at `u64::MAX` for absurd `expires_in` values.
    pub fn expires_at(&self) -> u64 {
        self.obtained_at.saturating_add(self.expires_in)
    }

    /// Checks expiry against an explicit clock.
    ///
    /// # Arguments
    ///
    /// * `now` - Current Unix time in seconds
    ///
    /// # Returns
    ///
    /// `true` once `now` is within [`TOKEN_EXPIRY_MARGIN`] seconds of
    /// [`Token::expires_at`].
    pub fn is_expired_at(&self, now: u64) -> bool {
        now.saturating_add(TOKEN_EXPIRY_MARGIN) >= self.expires_at()
    }

    /// Same as [`Token::is_expired_at`] using the system clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }
}

/// Body of a successful token endpoint response.
///
/// Used for both the authorization code exchange and the refresh grant.
/// `expires_in` defaults to one hour when the endpoint leaves it out.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    /// Converts the response into a cached token.
    ///
    /// Spotify may omit the refresh token on refresh; `previous_refresh`
    /// is kept in that case.
    pub fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Error body of the accounts service (`/authorize`, `/api/token`).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Error body of the Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub message: String,
}

/// Profile returned by `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    /// Display name, falling back to the user id for accounts without one.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

impl CreatePlaylistRequest {
    pub fn new(name: &str) -> Self {
        CreatePlaylistRequest {
            name: name.to_string(),
            description: String::new(),
            public: true,
            collaborative: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

/// Catalog item type passed as the `type` parameter of `/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Track,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
        }
    }
}

/// Body of `GET /search`. Only the track page is modelled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Tracks>,
}

impl SearchResponse {
    pub fn first_track(&self) -> Option<&Track> {
        self.tracks.as_ref().and_then(|t| t.items.first())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

impl Track {
    /// Name of the first credited artist.
    pub fn artist_name(&self) -> &str {
        self.artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown artist")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
