//! # CLI Module
//!
//! User-facing commands of bpmcli. Each function here owns the terminal:
//! it loads what the command needs, calls into the library, prints tables
//! and status lines, and reports a failed stage with `error!`
//! (which exits with status 1).
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE flow, stores the token in the data directory
//! - [`playlist`] - Runs the feature-filter pipeline and publishes the result
//!   (or prints it with `--dry-run`)
//! - [`list_playlists`] - Shows the account's playlists
//! - [`snapshot`] - Exports the saved albums to SQLite
//!
//! ## Usage
//!
//! ```bash
//! bpmcli auth                          # once
//! bpmcli playlists                     # find playlist names to read from
//! bpmcli playlist running.json --dry-run
//! bpmcli playlist running.json
//! bpmcli snapshot --max-albums 200
//! ```
//!
//! Everything except `auth` is synchronous; `auth` needs the async callback
//! server and is driven by a tokio runtime in `main`.

mod auth;
mod playlist;
mod playlists;
mod snapshot;

pub use auth::auth;
pub use playlist::playlist;
pub use playlists::list_playlists;
pub use snapshot::snapshot;
