//! bpmcli library
//!
//! This library builds Spotify playlists out of a user's saved tracks or
//! playlists by filtering them on their audio features, and exports a local
//! SQLite snapshot of the saved albums enriched with genres and Last.fm tags.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Environment variables and the playlist configuration document
//! - `enrich` - Last.fm and MusicBrainz lookups used by the snapshot
//! - `error` - The crate-wide error type
//! - `management` - Local persistence (token cache, snapshot database)
//! - `pipeline` - Paginated retrieval, feature filtering and accumulation
//! - `server` - Local HTTP server for OAuth callbacks
//! - `snapshot` - Collection of the saved-album library into relational rows
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use bpmcli::{config, pipeline, spotify::SpotifyClient};
//!
//! fn main() -> bpmcli::Res<()> {
//!     config::load_env()?;
//!     let params = config::PlaylistParams::load(None)?;
//!     let mut client = SpotifyClient::from_env()?;
//!     let published = pipeline::run(&mut client, &params)?;
//!     println!("created {}", published.id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod snapshot;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible function in the crate returns this alias so that the
/// binary can report which stage of a run failed.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Reading batch {} of saved tracks", batch);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist {} created", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the program with exit code 1 right after printing. Only the
/// binary uses it, once a stage has failed for good.
///
/// # Example
///
/// ```
/// error!("Playlist run failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, like a failed tag lookup during a snapshot.
///
/// # Example
///
/// ```
/// warning!("MusicBrainz lookup failed for {}: {}", name, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
