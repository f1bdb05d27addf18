//! # CLI Module
//!
//! Command implementations behind the `playmaker` binary.
//!
//! - [`serve`] - runs the web UI until interrupted
//!
//! ```bash
//! playmaker serve --open
//! playmaker completions zsh
//! ```

mod serve;

pub use serve::serve;
