//! # API Module
//!
//! HTTP endpoints of the short-lived local server started by `bpmcli auth`.
//!
//! - [`callback`] - Receives the authorization code from Spotify and
//!   exchanges it, together with the PKCE verifier, for an access token.
//! - [`health`] - Reports status and version, handy to check that the
//!   callback server is reachable on `SERVER_ADDRESS`.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use bpmcli::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
