//! Configuration management for bpmcli.
//!
//! Two sources feed a run:
//!
//! 1. Environment variables, optionally loaded from a `.env` file in the
//!    local data directory. They carry the Spotify application credentials,
//!    the API endpoints and the Last.fm key.
//! 2. The playlist configuration document, a JSON file handed to
//!    `bpmcli playlist`. It says where tracks come from, how they are
//!    filtered and when to stop collecting them.
//!
//! Every getter validates its value up front so a misconfiguration is
//! reported before the first network request goes out.

use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Res, pipeline::BoundSpec, pipeline::StopConditions};

/// Largest page Spotify serves for saved tracks and playlist items.
pub const MAX_BATCH_SIZE: usize = 50;

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-library-read playlist-read-private playlist-modify-private playlist-modify-public";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const DEFAULT_MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Returns the application directory inside the platform local data dir.
///
/// - Linux: `~/.local/share/bpmcli`
/// - macOS: `~/Library/Application Support/bpmcli`
/// - Windows: `%LOCALAPPDATA%/bpmcli`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("bpmcli");
    path
}

/// Loads environment variables from `<data dir>/.env` when the file exists.
///
/// Variables already present in the process environment win over the file.
/// A missing file is fine; a file that cannot be parsed is a configuration
/// error.
pub fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::config(format!("cannot load {}: {}", path.display(), e)))?;
    }
    Ok(())
}

fn required(name: &str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(format!("{name} must be set"))),
    }
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client ID of the registered Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// OAuth redirect URI; must match the one registered with Spotify.
pub fn spotify_redirect_uri() -> String {
    or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated OAuth scopes requested during `bpmcli auth`.
pub fn spotify_scope() -> String {
    or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Per-request timeout for every blocking HTTP call (`HTTP_TIMEOUT_SECS`).
pub fn http_timeout() -> Res<Duration> {
    match env::var("HTTP_TIMEOUT_SECS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| Error::config(format!("HTTP_TIMEOUT_SECS is not a positive integer: {raw}"))),
        Err(_) => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
    }
}

/// Last.fm API key; tag enrichment is skipped when it is not set.
pub fn lastfm_api_key() -> Option<String> {
    env::var("LASTFM_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

pub fn lastfm_apiurl() -> String {
    or_default("LASTFM_API_URL", DEFAULT_LASTFM_API_URL)
}

pub fn musicbrainz_apiurl() -> String {
    or_default("MUSICBRAINZ_API_URL", DEFAULT_MUSICBRAINZ_API_URL)
}

/// MusicBrainz rejects anonymous clients, so every request carries this.
pub fn musicbrainz_user_agent() -> String {
    env::var("MUSICBRAINZ_USER_AGENT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("bpmcli/{}", env!("CARGO_PKG_VERSION")))
}

fn default_name() -> String {
    "default_playlist".to_string()
}

/// The playlist configuration document.
///
/// Every key is optional; a missing key takes its default while an explicit
/// `null` disables the option (`"max_tracks": null` means "no track cap").
///
/// ```json
/// {
///   "name": "Running 170",
///   "max_tracks": null,
///   "playlist_duration": 3600000,
///   "playlists": ["Workout"],
///   "sort_feature": "tempo",
///   "features_bounds": { "tempo": [165, 175], "energy": [0.6, null], "mode": 1 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaylistParams {
    /// Name of the playlist to create.
    pub name: String,
    pub description: String,
    pub public: bool,
    /// Stop collecting once this many tracks passed the filter.
    pub max_tracks: Option<usize>,
    /// Stop collecting once the passing tracks add up to this many milliseconds.
    pub playlist_duration: Option<u64>,
    /// Playlist names to read from; `None` reads the saved tracks.
    pub playlists: Option<Vec<String>>,
    pub batchsize: usize,
    /// Feature to sort the final playlist by, ascending.
    pub sort_feature: Option<String>,
    pub features_bounds: BoundSpec,
}

impl Default for PlaylistParams {
    fn default() -> Self {
        PlaylistParams {
            name: default_name(),
            description: String::new(),
            public: false,
            max_tracks: Some(50),
            playlist_duration: None,
            playlists: None,
            batchsize: MAX_BATCH_SIZE,
            sort_feature: None,
            features_bounds: BoundSpec::default(),
        }
    }
}

impl PlaylistParams {
    /// Reads the document at `path`, or returns the defaults when no path
    /// was given.
    pub fn load(path: Option<&Path>) -> Res<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_json(&content)
            }
        }
    }

    pub fn from_json(content: &str) -> Res<Self> {
        let params: PlaylistParams = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("invalid playlist configuration: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Res<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("playlist name must not be empty"));
        }
        if self.batchsize == 0 || self.batchsize > MAX_BATCH_SIZE {
            return Err(Error::config(format!(
                "batchsize must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batchsize
            )));
        }
        if let Some(feature) = &self.sort_feature {
            if feature.trim().is_empty() {
                return Err(Error::config("sort_feature must not be an empty string"));
            }
        }
        Ok(())
    }

    pub fn stop_conditions(&self) -> StopConditions {
        StopConditions {
            max_tracks: self.max_tracks,
            max_duration_ms: self.playlist_duration,
        }
    }
}
