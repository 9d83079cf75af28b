use std::{cmp::Ordering, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A single audio-feature value: Spotify reports numbers for everything we
/// filter on, but the object also carries a few text fields (`id`, `uri`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }

    /// Total order used when sorting a playlist: numbers first, then text.
    pub fn sort_cmp(&self, other: &FeatureValue) -> Ordering {
        match (self, other) {
            (FeatureValue::Number(a), FeatureValue::Number(b)) => a.total_cmp(b),
            (FeatureValue::Text(a), FeatureValue::Text(b)) => a.cmp(b),
            (FeatureValue::Number(_), FeatureValue::Text(_)) => Ordering::Less,
            (FeatureValue::Text(_), FeatureValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{n}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

/// Named attributes of a track, as returned by `GET /audio-features`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Features(BTreeMap<String, FeatureValue>);

impl Features {
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FeatureValue::as_f64)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Track length in milliseconds, 0 when the field is missing.
    pub fn duration_ms(&self) -> u64 {
        self.number("duration_ms")
            .filter(|d| *d > 0.0)
            .map_or(0, |d| d as u64)
    }
}

impl From<Map<String, Value>> for Features {
    fn from(object: Map<String, Value>) -> Self {
        let values = object
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Number(n) => n.as_f64().map(|n| (name, FeatureValue::Number(n))),
                Value::String(s) => Some((name, FeatureValue::Text(s))),
                _ => None,
            })
            .collect();
        Features(values)
    }
}

impl<const N: usize> From<[(&str, f64); N]> for Features {
    fn from(pairs: [(&str, f64); N]) -> Self {
        Features(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), FeatureValue::Number(value)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<Features>>,
}

/// A page of track ids from one of the paginated track collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPage {
    pub ids: Vec<String>,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<TrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<TrackItem>,
    pub next: Option<String>,
}

/// Entry of a saved-tracks or playlist-items page. `track` is null for
/// removed tracks, and `id` is null for local files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: Option<String>,
    pub name: String,
}

impl From<Vec<TrackItem>> for TrackPage {
    fn from(items: Vec<TrackItem>) -> Self {
        TrackPage {
            ids: items
                .into_iter()
                .filter_map(|item| item.track.and_then(|t| t.id))
                .collect(),
            has_next: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

/// What the cursor needs to know about a playlist before iterating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub total: u64,
}

impl From<Playlist> for PlaylistSummary {
    fn from(playlist: Playlist) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            total: playlist.tracks.total,
        }
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u64,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub position: usize,
    pub id: String,
    pub duration: String,
    pub sort_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbumsResponse {
    pub items: Vec<SavedAlbum>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub added_at: String,
    pub album: Album,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub total_tracks: u32,
    pub release_date: String,
    pub release_date_precision: String,
    #[serde(default)]
    pub popularity: Option<u32>,
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub tracks: Tracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    pub track_number: u32,
    pub disc_number: u32,
}

/// A page of saved albums.
#[derive(Debug, Clone, Default)]
pub struct AlbumPage {
    pub items: Vec<SavedAlbum>,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
}

/// A weighted Last.fm tag attached to an artist MBID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistTag {
    pub tag: String,
    pub weight: i64,
}
