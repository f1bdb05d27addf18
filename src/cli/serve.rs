use std::sync::Arc;

use crate::{
    config::Config,
    error, info,
    server::{AppState, start_api_server},
    session::SessionStore,
    spotify::SpotifyAuthenticator,
    warning,
};

/// Starts the web UI with the configuration from the environment.
///
/// Exits the process when the configuration is incomplete or the server
/// cannot be started.
pub async fn serve(open: bool) {
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let addr = config.server_addr;
    info!("Redirect URI: {}", config.redirect_uri);

    let sessions = SessionStore::with_idle_timeout(config.session_idle_timeout);
    let state = Arc::new(AppState::with_sessions(
        SpotifyAuthenticator::new(config),
        sessions,
    ));

    if open {
        let url = format!("http://{}", addr);
        if webbrowser::open(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            );
        }
    }

    if let Err(e) = start_api_server(addr, state).await {
        error!("Server failed: {}", e);
    }
}
