//! Session controller.
//!
//! Every request runs [`run_cycle`] once against the caller's session. The
//! cycle decides between the login affordance and the authenticated flow,
//! refreshes an expired token when it can, and performs at most one user
//! action. Everything it wants shown ends up in the returned [`View`].

use crate::{
    error::{AuthError, SpotifyError},
    spotify::{AuthManager, Authenticator, SpotifyApi},
    types::SearchKind,
    utils, warning,
};

use super::SessionState;

/// Warning shown when a logged in session has no cached token.
pub const MSG_TOKEN_INVALID: &str = "Token invalid. Please login again.";
/// Warning shown when Spotify answers 401 during an authenticated cycle.
pub const MSG_TOKEN_EXPIRED: &str = "Token expired. Please click 'Login with Spotify' again.";
/// Error for an empty or whitespace-only playlist name.
pub const MSG_BLANK_PLAYLIST: &str = "Please enter a valid playlist name.";
/// Error for an empty or whitespace-only song query.
pub const MSG_BLANK_SONG: &str = "Please enter a song name.";
/// Error for an add-song request before any playlist was created.
pub const MSG_NO_PLAYLIST: &str = "Create a playlist first.";
/// Error when the track search has no result.
pub const MSG_SONG_NOT_FOUND: &str = "Song not found.";

/// What the user asked for in this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Plain page load.
    Render,
    /// The login button was pressed.
    Login,
    /// The playlist form was submitted with this name.
    CreatePlaylist(String),
    /// The song form was submitted with this search text.
    AddSong(String),
}

/// Message shown above the page, styled by severity.
///
/// Banners are rendered in the order they were pushed during the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Warning(String),
    Error(String),
}

impl Banner {
    /// Message text regardless of severity.
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(text) | Banner::Warning(text) | Banner::Error(text) => text,
        }
    }
}

/// Main content of the page below the banners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Login button only.
    LoggedOut,
    /// Send the browser to the authorization page.
    Redirect(String),
    /// Playlist form, plus the song form once a playlist is active.
    Authenticated {
        /// Display name of the user, or the user id when unset.
        display_name: String,
        /// Whether the session has an active playlist to add songs to.
        playlist_active: bool,
    },
    /// The profile could not be loaded; only banners and a retry link.
    Unavailable,
}

/// Result of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub banners: Vec<Banner>,
    pub screen: Screen,
}

impl View {
    /// A view showing `screen` without banners.
    pub fn new(screen: Screen) -> Self {
        View {
            banners: Vec::new(),
            screen,
        }
    }

    pub fn logged_out() -> Self {
        View::new(Screen::LoggedOut)
    }

    /// Appends `banner` after the ones already present.
    ///
    /// # Example
    ///
    /// ```
    /// use playmaker::session::{Banner, View};
    ///
    /// let view = View::logged_out().with_banner(Banner::Warning("Please login again.".into()));
    /// assert_eq!(view.banners.len(), 1);
    /// ```
    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banners.push(banner);
        self
    }

    fn push(&mut self, banner: Banner) {
        self.banners.push(banner);
    }
}

/// Returns a client with a usable token, refreshing it first if expired.
///
/// Nothing here mutates the session; the refreshed token lives in the auth
/// manager's cache, which the returned client reads.
///
/// # Arguments
///
/// * `session` - Session whose auth manager is consulted
///
/// # Returns
///
/// - `Ok(Some(client))` when a token is cached and valid, possibly after a
///   refresh
/// - `Ok(None)` when there is nothing to use: no auth manager, or a manager
///   whose flow never completed
///
/// # Errors
///
/// Returns the [`AuthError`] of a failed refresh. The caller is expected to
/// log the session out.
pub async fn get_valid_client<M: AuthManager>(
    session: &SessionState<M>,
) -> Result<Option<M::Client>, AuthError> {
    let Some(auth_manager) = session.auth_manager() else {
        return Ok(None);
    };

    let Some(token) = auth_manager.cached_token().await else {
        return Ok(None);
    };

    if auth_manager.is_token_expired(&token) {
        auth_manager
            .refresh_access_token(&token.refresh_token)
            .await?;
    }

    Ok(Some(auth_manager.client()))
}

/// Runs one UI cycle for `session`.
///
/// # Decision Flow
///
/// 1. **Logged out**: only [`Action::Login`] does anything. It calls
///    [`Authenticator::authenticate`], stores both handles in the session and
///    answers with a redirect to the authorization page. Every other action
///    renders the login button.
/// 2. **Token check**: [`get_valid_client`] decides whether the session can
///    proceed. A missing token or a failed refresh logs the session out with
///    a warning.
/// 3. **Authenticated**: the profile is fetched, then the playlist or song
///    action is performed against the fresh client.
///
/// # Exits
///
/// - Logged out view with the login button, with a warning when the session
///   was just logged out
/// - Redirect view to the authorization URL
/// - Authenticated view with the forms and the banners of the action, or the
///   unavailable view when the profile cannot be loaded
///
/// A 401 from Spotify at any point of step 3 logs the session out and keeps
/// the banners gathered so far. Other Spotify errors leave the session as is
/// and are shown as an error banner, so the user can simply retry.
///
/// # Arguments
///
/// * `authenticator` - Starts a new OAuth flow on [`Action::Login`]
/// * `session` - State of the caller's browser session, locked for the cycle
/// * `action` - What the user asked for
pub async fn run_cycle<A: Authenticator>(
    authenticator: &A,
    session: &mut SessionState<A::Manager>,
    action: Action,
) -> View {
    if !session.is_logged_in() {
        return match action {
            Action::Login => login(authenticator, session),
            _ => View::logged_out(),
        };
    }

    let client = match get_valid_client(session).await {
        Ok(Some(client)) => client,
        Ok(None) => {
            session.logout();
            return View::logged_out()
                .with_banner(Banner::Warning(MSG_TOKEN_INVALID.to_string()));
        }
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            session.logout();
            return View::logged_out().with_banner(Banner::Warning(format!(
                "Token refresh failed ({}). Please login again.",
                e
            )));
        }
    };
    session.replace_client(client.clone());

    let mut view = View::new(Screen::Unavailable);
    match authenticated_cycle(&client, session, action, &mut view).await {
        Ok(()) => {}
        Err(e) if e.is_unauthorized() => {
            warning!("Spotify rejected the session token: {}", e);
            session.logout();
            view.screen = Screen::LoggedOut;
            view.push(Banner::Warning(MSG_TOKEN_EXPIRED.to_string()));
        }
        Err(e) => view.push(Banner::Error(format!("Spotify error: {}", e))),
    }
    view
}

fn login<A: Authenticator>(authenticator: &A, session: &mut SessionState<A::Manager>) -> View {
    let (client, auth_manager) = authenticator.authenticate();
    match auth_manager.authorize_url() {
        Ok(url) => {
            session.login(client, auth_manager);
            View::new(Screen::Redirect(url))
        }
        Err(e) => View::logged_out()
            .with_banner(Banner::Error(format!("Cannot start login: {}", e))),
    }
}

async fn authenticated_cycle<M: AuthManager>(
    client: &M::Client,
    session: &mut SessionState<M>,
    action: Action,
    view: &mut View,
) -> Result<(), SpotifyError> {
    let user = client.current_user().await?;
    view.push(Banner::Success(format!("Logged in as {}", user.name())));
    view.screen = authenticated_screen(user.name(), session);

    match action {
        Action::Render | Action::Login => {}
        Action::CreatePlaylist(name) => {
            if utils::is_blank(&name) {
                view.push(Banner::Error(MSG_BLANK_PLAYLIST.to_string()));
                return Ok(());
            }

            let playlist = client.user_playlist_create(&user.id, &name).await?;
            session.set_active_playlist(playlist.id);
            view.screen = authenticated_screen(user.name(), session);
            view.push(Banner::Success(format!("Playlist '{}' created!", name)));
        }
        Action::AddSong(query) => {
            let Some(playlist_id) = session.active_playlist_id() else {
                view.push(Banner::Error(MSG_NO_PLAYLIST.to_string()));
                return Ok(());
            };

            if utils::is_blank(&query) {
                view.push(Banner::Error(MSG_BLANK_SONG.to_string()));
                return Ok(());
            }

            let results = client.search(&query, SearchKind::Track, 1).await?;
            let Some(track) = results.first_track() else {
                view.push(Banner::Error(MSG_SONG_NOT_FOUND.to_string()));
                return Ok(());
            };

            client
                .playlist_add_items(playlist_id, &[track.uri.clone()])
                .await?;
            view.push(Banner::Success(format!(
                "Added '{}' by {} to playlist!",
                track.name,
                track.artist_name()
            )));
        }
    }

    Ok(())
}

fn authenticated_screen<M: AuthManager>(display_name: &str, session: &SessionState<M>) -> Screen {
    Screen::Authenticated {
        display_name: display_name.to_string(),
        playlist_active: session.active_playlist_id().is_some(),
    }
}

/// Finishes a login started by [`Action::Login`] once the authorization
/// callback arrives.
///
/// # Arguments
///
/// * `session` - Session holding the pending auth manager
/// * `code` - Authorization code from the callback query
/// * `state` - State value from the callback query
/// * `error` - Error reported by the authorization page, e.g. `access_denied`
///
/// # Errors
///
/// - [`AuthError::Denied`] when the user cancelled or Spotify refused
/// - [`AuthError::NoPendingLogin`] when the session never started a login
/// - [`AuthError::MissingCode`] when the callback carries neither code nor
///   error
/// - any error of [`AuthManager::complete_authorization`]
///
/// On any failure the session is logged out.
pub async fn complete_login<M: AuthManager>(
    session: &mut SessionState<M>,
    code: Option<&str>,
    state: Option<&str>,
    error: Option<&str>,
) -> Result<(), AuthError> {
    let result = match (session.auth_manager(), error, code) {
        (_, Some(error), _) => Err(AuthError::Denied(error.to_string())),
        (None, _, _) => Err(AuthError::NoPendingLogin),
        (Some(_), None, None) => Err(AuthError::MissingCode),
        (Some(auth_manager), None, Some(code)) => {
            auth_manager
                .complete_authorization(code, state.unwrap_or_default())
                .await
        }
    };

    if result.is_err() {
        session.logout();
    }
    result
}
