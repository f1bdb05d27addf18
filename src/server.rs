use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};

use crate::{Res, api, info, session::SessionStore, spotify::Authenticator};

/// How often the server sweeps idle sessions out of the store.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state of the web server.
pub struct AppState<A: Authenticator> {
    pub authenticator: A,
    pub sessions: SessionStore<A::Manager>,
}

impl<A: Authenticator> AppState<A> {
    pub fn new(authenticator: A) -> Self {
        Self::with_sessions(authenticator, SessionStore::new())
    }

    pub fn with_sessions(authenticator: A, sessions: SessionStore<A::Manager>) -> Self {
        AppState {
            authenticator,
            sessions,
        }
    }
}

pub fn router<A: Authenticator>(state: Arc<AppState<A>>) -> Router {
    Router::new()
        .route("/", get(api::index::<A>))
        .route("/login", post(api::login::<A>))
        .route("/playlist", post(api::create_playlist::<A>))
        .route("/song", post(api::add_song::<A>))
        .route("/callback", get(api::callback::<A>))
        .route("/health", get(api::health))
        .with_state(state)
}

/// Serves the application on `addr` until Ctrl-C is received.
///
/// A background task evicts idle sessions every
/// [`SESSION_SWEEP_INTERVAL`] for as long as the server runs.
///
/// # Arguments
///
/// * `addr` - Socket address to bind
/// * `state` - Authenticator and session store shared by all handlers
///
/// # Errors
///
/// Returns an error when the address cannot be bound or the server fails
/// while serving.
pub async fn start_api_server<A: Authenticator>(
    addr: SocketAddr,
    state: Arc<AppState<A>>,
) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let sweeper = tokio::spawn(sweep_sessions(Arc::clone(&state)));
    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    result?;

    info!("Server stopped");
    Ok(())
}

async fn sweep_sessions<A: Authenticator>(state: Arc<AppState<A>>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let evicted = state.sessions.evict_idle().await;
        if evicted > 0 {
            info!("Evicted {} idle session(s)", evicted);
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // without a signal handler the server only stops with the process
        std::future::pending::<()>().await;
    }
}
