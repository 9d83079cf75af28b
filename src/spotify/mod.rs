//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It
//! implements the traits the rest of the crate is written against, so the
//! pipeline and the snapshot never see HTTP.
//!
//! ## Architecture
//!
//! ```text
//! CLI
//!  ↓
//! pipeline (TrackSource, PlaylistSink)     snapshot (AlbumSource)
//!  ↓                                        ↓
//! SpotifyClient (blocking reqwest, bearer token, retry on 502/429)
//!  ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`client`] - [`SpotifyClient`]: one `reqwest::blocking::Client` with an
//!   explicit per-request timeout, the [`TokenManager`](crate::management::TokenManager)
//!   that refreshes the access token when it is about to expire, and the
//!   transport-level retry policy.
//! - [`tracks`] - Saved tracks, playlists, playlist items and audio features.
//! - [`playlist`] - Current user, playlist creation, adding tracks.
//! - [`albums`] - Saved albums and artist details for the library snapshot.
//! - [`auth`] - OAuth 2.0 PKCE flow run once by `bpmcli auth`.
//!
//! ## Error Handling
//!
//! The client retries exactly two situations, both transient:
//!
//! - **502 Bad Gateway**: retried after 10 seconds.
//! - **429 Too Many Requests**: retried after the `Retry-After` delay when it
//!   is at most 120 seconds; a longer delay is reported as
//!   [`Error::RateLimited`](crate::Error::RateLimited).
//!
//! Each request is attempted at most five times. Every other non-success
//! status becomes [`Error::Api`](crate::Error::Api) carrying Spotify's
//! error message.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /me/tracks`, `GET /me/albums`, `GET /me/playlists`
//! - `GET /playlists/{id}/tracks`
//! - `GET /audio-features`
//! - `GET /artists`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{playlist_id}/tracks`
//! - `POST /api/token` (authorization code and refresh token grants)

pub mod albums;
pub mod auth;
pub mod client;
pub mod playlist;
pub mod tracks;

pub use client::{RetryPolicy, SpotifyClient};
