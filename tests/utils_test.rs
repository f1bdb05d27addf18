use playmaker::{
    config::{Config, DEFAULT_SPOTIFY_API_URL},
    error::ConfigError,
    session::{Banner, Screen, View},
    types::{Token, TokenResponse},
    ui,
    utils::*,
};
use std::{collections::HashMap, time::Duration};

fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<&str, &str> = pairs.iter().copied().collect();
    move |key: &str| values.get(key).map(|v| v.to_string())
}

const REQUIRED: [(&str, &str); 3] = [
    ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
    ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
    ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8501/callback"),
];

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    assert_eq!(id.len(), SESSION_ID_LENGTH);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_is_blank() {
    assert!(is_blank(""));
    assert!(is_blank("   "));
    assert!(is_blank("\t\n"));
    assert!(!is_blank("Road Trip"));
    assert!(!is_blank("  a  "));
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html(r#"<b>"Tom & Jerry's"</b>"#),
        "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
    );
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn test_config_defaults() {
    let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(config.client_id, "id");
    assert_eq!(config.client_secret, "secret");
    assert_eq!(config.server_addr.to_string(), "127.0.0.1:8501");
    assert_eq!(config.api_url, DEFAULT_SPOTIFY_API_URL);
    assert_eq!(config.auth_url, "https://accounts.spotify.com/authorize");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(config.session_idle_timeout, Duration::from_secs(1800));
}

#[test]
fn test_config_missing_secret_is_error() {
    let result = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "   "),
        ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8501/callback"),
    ]));

    assert!(matches!(
        result,
        Err(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_SECRET"))
    ));
}

#[test]
fn test_config_overrides() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("SERVER_ADDRESS", "0.0.0.0:9000"));
    pairs.push(("SPOTIFY_API_URL", "http://localhost:1234/v1/"));

    let config = Config::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(config.server_addr.port(), 9000);
    assert_eq!(config.api_url, "http://localhost:1234/v1");

    pairs.push(("SERVER_ADDRESS", "not an address"));
    let result = Config::from_lookup(lookup(&pairs));
    assert!(matches!(result, Err(ConfigError::InvalidAddress(..))));
}

#[test]
fn test_config_session_idle_timeout() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("SESSION_IDLE_TIMEOUT_SECS", "90"));
    let config = Config::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(config.session_idle_timeout, Duration::from_secs(90));

    pairs.push(("SESSION_IDLE_TIMEOUT_SECS", "soon"));
    let result = Config::from_lookup(lookup(&pairs));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber("SESSION_IDLE_TIMEOUT_SECS", ..))
    ));
}

#[test]
fn test_token_expiry_margin() {
    let token = Token {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 1_000,
    };

    assert!(!token.is_expired_at(1_000));
    assert!(!token.is_expired_at(4_539));
    assert!(token.is_expired_at(4_540));
    assert!(token.is_expired_at(10_000));
}

#[test]
fn test_token_with_huge_lifetime_does_not_overflow() {
    let token = Token {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        scope: String::new(),
        expires_in: u64::MAX,
        obtained_at: 1_000,
    };

    assert_eq!(token.expires_at(), u64::MAX);
    assert!(!token.is_expired());
    assert!(token.is_expired_at(u64::MAX));
}

#[test]
fn test_token_response_keeps_previous_refresh_token() {
    let response: TokenResponse =
        serde_json::from_str(r#"{"access_token":"new","token_type":"Bearer","expires_in":3600}"#)
            .unwrap();

    let token = response.clone().into_token(Some("old-refresh"));
    assert_eq!(token.access_token, "new");
    assert_eq!(token.refresh_token, "old-refresh");

    let rotated: TokenResponse = serde_json::from_str(
        r#"{"access_token":"new","refresh_token":"rotated","scope":"s"}"#,
    )
    .unwrap();
    let token = rotated.into_token(Some("old-refresh"));
    assert_eq!(token.refresh_token, "rotated");
    assert_eq!(token.expires_in, 3600);
}

#[test]
fn test_render_escapes_banner_text() {
    let view = View::new(Screen::Authenticated {
        display_name: "Freddie".to_string(),
        playlist_active: false,
    })
    .with_banner(Banner::Success("Playlist '<script>' created!".to_string()));

    let html = ui::render(&view);

    assert!(html.contains("Playlist &#39;&lt;script&gt;&#39; created!"));
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"action="/playlist""#));
    assert!(!html.contains(r#"action="/song""#));
}

#[test]
fn test_render_song_form_only_with_active_playlist() {
    let view = View::new(Screen::Authenticated {
        display_name: "Freddie".to_string(),
        playlist_active: true,
    });

    let html = ui::render(&view);
    assert!(html.contains(r#"action="/song""#));
    assert!(html.contains("Enter Song Name"));
}
