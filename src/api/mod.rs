//! # API Module
//!
//! HTTP endpoints of the playlist maker. Each page endpoint is one UI cycle
//! of the session controller:
//!
//! - [`index`] - `GET /`, render only
//! - [`login`] - `POST /login`, start an OAuth flow and redirect to Spotify
//! - [`create_playlist`] - `POST /playlist`, form field `name`
//! - [`add_song`] - `POST /song`, form field `query`
//!
//! Plus the OAuth redirect target [`callback`] and the [`health`] check.
//!
//! Handlers are generic over the [`crate::spotify::Authenticator`] so the
//! router can be exercised without talking to Spotify.

mod callback;
mod health;
mod page;

pub use callback::{CallbackParams, callback};
pub use health::health;
pub use page::{PlaylistForm, SongForm, add_song, create_playlist, index, login};
