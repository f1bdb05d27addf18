use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tokio::sync::RwLock;

use crate::{
    config::{Config, SPOTIFY_SCOPE},
    error::AuthError,
    types::{OAuthErrorBody, Token, TokenResponse},
    utils,
};

use super::{SpotifyApi, SpotifyClient, TokenCache};

/// Owner of one OAuth flow and its token cache.
///
/// A manager is created per login attempt. It knows the `state` value it sent
/// to the authorization page, completes the flow when the callback arrives
/// and refreshes the cached token on request.
#[async_trait]
pub trait AuthManager: Send + Sync + 'static {
    type Client: SpotifyApi + Clone + 'static;

    /// URL the user has to visit to grant access.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidUrl`] when the configured authorization
    /// endpoint is not a valid URL.
    fn authorize_url(&self) -> Result<String, AuthError>;

    /// Exchanges the authorization `code` for a token and caches it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::StateMismatch`] when `state` is not the value this
    ///   manager issued; the token endpoint is not contacted
    /// - [`AuthError::TokenEndpoint`] when the code is rejected
    /// - [`AuthError::Request`] on network failures
    async fn complete_authorization(&self, code: &str, state: &str) -> Result<(), AuthError>;

    /// The token currently in the cache, if the flow has completed.
    async fn cached_token(&self) -> Option<Token>;

    fn is_token_expired(&self, token: &Token) -> bool;

    /// Obtains a new access token and replaces the cached one.
    ///
    /// Clients handed out by [`AuthManager::client`] read the same cache, so
    /// they use the new token from their next call on.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - Refresh token of the cached token. It is kept
    ///   when the endpoint does not rotate it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenEndpoint`] when the refresh token was
    /// revoked or is unknown, and [`AuthError::Request`] on network
    /// failures. The cache is left untouched in both cases.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, AuthError>;

    /// A fresh client bound to this manager's token cache.
    fn client(&self) -> Self::Client;
}

/// Starts new OAuth flows.
pub trait Authenticator: Send + Sync + 'static {
    type Manager: AuthManager;

    /// Creates a client and an auth manager for a brand new flow with an
    /// empty token cache.
    fn authenticate(&self) -> (<Self::Manager as AuthManager>::Client, Self::Manager);
}

/// Authorization-code flow against the Spotify accounts service, using the
/// application's client secret.
pub struct SpotifyOAuth {
    http: Client,
    config: Arc<Config>,
    state: String,
    show_dialog: bool,
    cache: TokenCache,
}

impl SpotifyOAuth {
    /// Creates a manager for one login attempt with an empty token cache.
    ///
    /// # Arguments
    ///
    /// * `http` - Connection pool used for the token endpoint and handed to
    ///   the clients of this manager
    /// * `config` - Application credentials and endpoint URLs
    /// * `state` - Random value sent to the authorization page and expected
    ///   back on the callback
    pub fn new(http: Client, config: Arc<Config>, state: String) -> Self {
        SpotifyOAuth {
            http,
            config,
            state,
            show_dialog: true,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    // Token endpoint authenticates the app with HTTP basic auth
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        read_token(response).await
    }
}

#[async_trait]
impl AuthManager for SpotifyOAuth {
    type Client = SpotifyClient;

    fn authorize_url(&self) -> Result<String, AuthError> {
        let show_dialog = if self.show_dialog { "true" } else { "false" };
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", SPOTIFY_SCOPE),
                ("state", self.state.as_str()),
                ("show_dialog", show_dialog),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

        Ok(url.to_string())
    }

    async fn complete_authorization(&self, code: &str, state: &str) -> Result<(), AuthError> {
        if state != self.state {
            return Err(AuthError::StateMismatch);
        }

        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        *self.cache.write().await = Some(response.into_token(None));
        Ok(())
    }

    async fn cached_token(&self) -> Option<Token> {
        self.cache.read().await.clone()
    }

    fn is_token_expired(&self, token: &Token) -> bool {
        token.is_expired()
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, AuthError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let token = response.into_token(Some(refresh_token));
        *self.cache.write().await = Some(token.clone());
        Ok(token)
    }

    fn client(&self) -> SpotifyClient {
        SpotifyClient::new(
            self.http.clone(),
            self.config.api_url.clone(),
            Arc::clone(&self.cache),
        )
    }
}

async fn read_token(response: Response) -> Result<TokenResponse, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<OAuthErrorBody>(&body) {
            Ok(parsed) => parsed.error_description.unwrap_or(parsed.error),
            Err(_) => body,
        };
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Creates [`SpotifyOAuth`] flows from the application configuration.
///
/// All flows share one connection pool.
#[derive(Clone)]
pub struct SpotifyAuthenticator {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyAuthenticator {
    pub fn new(config: Arc<Config>) -> Self {
        SpotifyAuthenticator {
            http: Client::new(),
            config,
        }
    }
}

impl Authenticator for SpotifyAuthenticator {
    type Manager = SpotifyOAuth;

    fn authenticate(&self) -> (SpotifyClient, SpotifyOAuth) {
        let manager = SpotifyOAuth::new(
            self.http.clone(),
            Arc::clone(&self.config),
            utils::generate_state(),
        );
        (manager.client(), manager)
    }
}
