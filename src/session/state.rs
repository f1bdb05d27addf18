use crate::spotify::AuthManager;

/// Per-browser-session record.
///
/// `client` and `auth_manager` are only ever set and cleared together
/// through [`SessionState::login`] and [`SessionState::logout`].
pub struct SessionState<M: AuthManager> {
    client: Option<M::Client>,
    auth_manager: Option<M>,
    active_playlist_id: Option<String>,
}

impl<M: AuthManager> Default for SessionState<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: AuthManager> SessionState<M> {
    /// A logged out session without an active playlist.
    pub fn new() -> Self {
        SessionState {
            client: None,
            auth_manager: None,
            active_playlist_id: None,
        }
    }

    /// Stores the handles of a freshly started OAuth flow.
    ///
    /// The session counts as logged in from here on, even before the
    /// callback completed. Until then the manager has no cached token and
    /// the next cycle logs the session out again.
    ///
    /// # Arguments
    ///
    /// * `client` - Client bound to the token cache of `auth_manager`
    /// * `auth_manager` - Manager owning the flow
    pub fn login(&mut self, client: M::Client, auth_manager: M) {
        self.client = Some(client);
        self.auth_manager = Some(auth_manager);
    }

    /// Drops both auth handles. The active playlist survives.
    pub fn logout(&mut self) {
        self.client = None;
        self.auth_manager = None;
    }

    /// Swaps in a freshly built client. Ignored while logged out.
    pub(crate) fn replace_client(&mut self, client: M::Client) {
        if self.auth_manager.is_some() {
            self.client = Some(client);
        }
    }

    /// The Web API client, present exactly when an auth manager is.
    pub fn client(&self) -> Option<&M::Client> {
        self.client.as_ref()
    }

    pub fn auth_manager(&self) -> Option<&M> {
        self.auth_manager.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.is_some()
    }

    pub fn active_playlist_id(&self) -> Option<&str> {
        self.active_playlist_id.as_deref()
    }

    /// Makes `playlist_id` the target of subsequent song additions,
    /// replacing any previous one.
    pub fn set_active_playlist(&mut self, playlist_id: String) {
        self.active_playlist_id = Some(playlist_id);
    }
}
