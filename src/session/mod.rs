//! Per-user session handling: the state record, the store that maps browser
//! cookies to it, and the controller that runs one UI cycle against it.

pub mod controller;
mod state;
mod store;

pub use controller::{Action, Banner, Screen, View, complete_login, get_valid_client, run_cycle};
pub use state::SessionState;
pub use store::{
    DEFAULT_SESSION_IDLE_TIMEOUT, SESSION_COOKIE_NAME, SessionStore, SharedSession,
};
