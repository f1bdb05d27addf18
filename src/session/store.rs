use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;

use crate::{spotify::AuthManager, utils};

use super::SessionState;

pub const SESSION_COOKIE_NAME: &str = "playmaker_session";

/// Time without requests after which a session is dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub type SharedSession<M> = Arc<Mutex<SessionState<M>>>;

struct Entry<M: AuthManager> {
    session: SharedSession<M>,
    last_seen: Instant,
}

/// In-memory map from session cookie value to session state.
///
/// Each session sits behind its own lock; a UI cycle holds it from start to
/// end, so cycles of one session never interleave.
///
/// Sessions that have not been resolved for longer than the idle timeout are
/// evicted, together with whatever token cache they hold. Eviction happens
/// whenever a new session is created and on every [`SessionStore::evict_idle`]
/// call. A browser coming back with an evicted cookie simply gets a fresh
/// session and has to log in again.
pub struct SessionStore<M: AuthManager> {
    sessions: Mutex<HashMap<String, Entry<M>>>,
    idle_timeout: Duration,
}

impl<M: AuthManager> Default for SessionStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: AuthManager> SessionStore<M> {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Returns the session for `session_id` and marks it as seen.
    pub async fn get(&self, session_id: &str) -> Option<SharedSession<M>> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// Creates an empty session and returns its id.
    ///
    /// Idle sessions are swept first, so anonymous traffic cannot grow the
    /// map past what arrives within one idle timeout.
    pub async fn create(&self) -> (String, SharedSession<M>) {
        let session_id = utils::generate_session_id();
        let session = Arc::new(Mutex::new(SessionState::new()));

        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        sweep(&mut sessions, now, self.idle_timeout);
        sessions.insert(
            session_id.clone(),
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        (session_id, session)
    }

    /// Looks up the session named by the request's cookie.
    ///
    /// A missing or unknown cookie starts a new session and the returned jar
    /// carries the cookie for it.
    pub async fn resolve(&self, jar: CookieJar) -> (CookieJar, SharedSession<M>) {
        if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
            if let Some(session) = self.get(cookie.value()).await {
                return (jar, session);
            }
        }

        let (session_id, session) = self.create().await;
        (jar.add(session_cookie(session_id)), session)
    }

    /// Drops every session idle for longer than the timeout.
    ///
    /// # Returns
    ///
    /// The number of evicted sessions.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    /// Same as [`SessionStore::evict_idle`] with an explicit clock.
    ///
    /// # Arguments
    ///
    /// * `now` - Point in time the idle periods are measured against
    pub async fn evict_idle_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().await;
        sweep(&mut sessions, now, self.idle_timeout)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sweep<M: AuthManager>(
    sessions: &mut HashMap<String, Entry<M>>,
    now: Instant,
    idle_timeout: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
    before - sessions.len()
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}
