//! Spotify Playlist Maker
//!
//! A small local web application that lets a user log in with a Spotify
//! account, create a playlist and append tracks found through search. Every
//! browser request is one UI cycle: the session controller re-runs its
//! decision flow against the caller's session and the page is rendered again.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the page, its forms and the OAuth callback
//! - `cli` - Command-line entry points
//! - `config` - Configuration management and environment variables
//! - `error` - Error types for the Spotify API, OAuth and configuration
//! - `server` - axum router and server startup
//! - `session` - Session state, session store and the session controller
//! - `spotify` - Spotify Web API client and OAuth manager
//! - `types` - Data structures and type definitions
//! - `ui` - HTML rendering of a cycle's view
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod ui;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI layer where errors are only reported, never matched on.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only meant for fatal startup failures in the CLI layer; request handling
/// never calls it.
///
/// ```
/// error!("Invalid configuration: {}", e);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`.
///
/// Used for recoverable problems such as an invalidated session or a failed
/// OAuth callback.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
