//! Configuration management for playmaker.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. The configuration system follows a
//! hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoints and server address only)
//!
//! The three Spotify application secrets have no default; [`Config::from_env`]
//! fails when any of them is absent.

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::error::ConfigError;

/// OAuth scope requested for every login.
pub const SPOTIFY_SCOPE: &str = "playlist-modify-public playlist-modify-private";

/// Idle time in seconds after which a browser session is forgotten.
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8501";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from the `.env` file in the local data directory.
///
/// The file is looked up at:
/// - Linux: `~/.local/share/playmaker/.env`
/// - macOS: `~/Library/Application Support/playmaker/.env`
/// - Windows: `%LOCALAPPDATA%/playmaker/.env`
///
/// The directory is created when missing. Variables already present in the
/// process environment are not overridden.
///
/// # Errors
///
/// Returns an error string when the directory cannot be created or the file
/// cannot be read or parsed. Callers may treat this as non-fatal, since the
/// variables can come from the environment directly.
pub async fn load_env() -> Result<PathBuf, String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(path)
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playmaker/.env");
    path
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_addr: SocketAddr,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub session_idle_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let client_id = require("SPOTIFY_API_AUTH_CLIENT_ID")?;
        let client_secret = require("SPOTIFY_API_AUTH_CLIENT_SECRET")?;
        let redirect_uri = require("SPOTIFY_API_REDIRECT_URI")?;

        let raw_addr =
            get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddress(raw_addr.clone(), e))?;

        let session_idle_timeout = match get("SESSION_IDLE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidNumber("SESSION_IDLE_TIMEOUT_SECS", raw.clone(), e)
            })?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        };

        Ok(Config {
            client_id,
            client_secret,
            redirect_uri,
            server_addr,
            api_url: trim_url(
                get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            ),
            auth_url: get("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_TOKEN_URL.to_string()),
            session_idle_timeout: Duration::from_secs(session_idle_timeout),
        })
    }
}

// API paths are appended with a leading slash
fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
