//! Error type shared by every layer of bpmcli.
//!
//! Each variant names the stage that failed so the CLI can tell the user
//! where a run aborted. Nothing in the crate retries on these errors except
//! the HTTP transport in [`crate::spotify::client`], which handles 502 and
//! 429 responses before they ever become an [`Error`].

use thiserror::Error;

/// Errors produced while configuring, fetching, filtering or publishing.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request itself failed (connection, timeout, body decoding).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The upstream API kept answering 429 beyond what we are willing to wait.
    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Malformed or missing configuration, detected before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Nothing survived filtering, so there is nothing to publish.
    #[error("no tracks left to publish after filtering")]
    EmptyResult,

    /// No usable stored token.
    #[error("authentication error: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    /// Builds an [`Error::Configuration`] from anything printable.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// True for failures that happened while talking to a remote service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Api { .. } | Error::RateLimited { .. }
        )
    }
}
