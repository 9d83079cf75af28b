#![allow(dead_code)]

use std::collections::HashMap;

use bpmcli::{
    Error, Res,
    pipeline::{PlaylistSink, TrackSource},
    snapshot::{AlbumSource, ArtistTagSource},
    types::{
        Album, AlbumArtist, AlbumPage, Artist, ArtistTag, CreatePlaylistRequest, Features, Image,
        PlaylistSummary, SavedAlbum, Track, TrackPage, Tracks,
    },
};

/// In-memory stand-in for the Spotify account.
#[derive(Default)]
pub struct FakeSpotify {
    pub saved: Vec<String>,
    pub playlists: Vec<(PlaylistSummary, Vec<String>)>,
    pub features: HashMap<String, Features>,
    pub albums: Vec<SavedAlbum>,
    pub artists: HashMap<String, Artist>,

    pub saved_requests: Vec<(usize, usize)>,
    pub playlist_requests: Vec<(String, usize, usize)>,
    pub feature_requests: Vec<Vec<String>>,
    pub album_requests: Vec<(usize, usize)>,
    pub artist_requests: Vec<Vec<String>>,
    pub created: Vec<(String, CreatePlaylistRequest)>,
    pub added: Vec<(String, Vec<String>)>,

    /// Fail `audio_features` on this call number (1-based).
    pub fail_features_on: Option<usize>,
}

impl FakeSpotify {
    pub fn with_saved(ids: &[&str]) -> Self {
        FakeSpotify {
            saved: ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn add_playlist(&mut self, id: &str, name: &str, ids: Vec<String>) {
        self.playlists.push((
            PlaylistSummary {
                id: id.to_string(),
                name: name.to_string(),
                total: ids.len() as u64,
            },
            ids,
        ));
    }

    pub fn set_features(&mut self, id: &str, features: Features) {
        self.features.insert(id.to_string(), features);
    }
}

fn page(items: &[String], limit: usize, offset: usize) -> TrackPage {
    let end = (offset + limit).min(items.len());
    let start = offset.min(end);
    TrackPage {
        ids: items[start..end].to_vec(),
        has_next: end < items.len(),
    }
}

impl TrackSource for FakeSpotify {
    fn saved_tracks(&mut self, limit: usize, offset: usize) -> Res<TrackPage> {
        self.saved_requests.push((limit, offset));
        Ok(page(&self.saved, limit, offset))
    }

    fn playlists(&mut self) -> Res<Vec<PlaylistSummary>> {
        Ok(self.playlists.iter().map(|(p, _)| p.clone()).collect())
    }

    fn playlist_tracks(&mut self, playlist_id: &str, limit: usize, offset: usize) -> Res<TrackPage> {
        self.playlist_requests
            .push((playlist_id.to_string(), limit, offset));
        let (_, items) = self
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or(Error::Api {
                status: 404,
                message: format!("no playlist {playlist_id}"),
            })?;
        Ok(page(items, limit, offset))
    }

    fn audio_features(&mut self, ids: &[String]) -> Res<Vec<Option<Features>>> {
        self.feature_requests.push(ids.to_vec());
        if self.fail_features_on == Some(self.feature_requests.len()) {
            return Err(Error::Api {
                status: 500,
                message: "server error".to_string(),
            });
        }
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }
}

impl PlaylistSink for FakeSpotify {
    fn current_user_id(&mut self) -> Res<String> {
        Ok("user-1".to_string())
    }

    fn create_playlist(&mut self, owner_id: &str, request: &CreatePlaylistRequest) -> Res<String> {
        self.created.push((owner_id.to_string(), request.clone()));
        Ok(format!("pl-{}", self.created.len()))
    }

    fn add_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.added.push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

impl AlbumSource for FakeSpotify {
    fn saved_albums(&mut self, limit: usize, offset: usize) -> Res<AlbumPage> {
        self.album_requests.push((limit, offset));
        let end = (offset + limit).min(self.albums.len());
        let start = offset.min(end);
        Ok(AlbumPage {
            items: self.albums[start..end].to_vec(),
            has_next: end < self.albums.len(),
        })
    }

    fn artists(&mut self, ids: &[String]) -> Res<Vec<Option<Artist>>> {
        self.artist_requests.push(ids.to_vec());
        Ok(ids.iter().map(|id| self.artists.get(id).cloned()).collect())
    }
}

/// Tag lookup answering from fixed tables; names in `failing` error out.
#[derive(Default)]
pub struct FakeTags {
    pub mbids: HashMap<String, String>,
    pub tags: HashMap<String, Vec<ArtistTag>>,
    pub failing: Vec<String>,
    pub tag_requests: Vec<String>,
}

impl ArtistTagSource for FakeTags {
    fn artist_mbid(&mut self, name: &str) -> Res<Option<String>> {
        if self.failing.iter().any(|n| n == name) {
            return Err(Error::Api {
                status: 503,
                message: "lookup unavailable".to_string(),
            });
        }
        Ok(self.mbids.get(name).cloned())
    }

    fn top_tags(&mut self, mbid: &str) -> Res<Vec<ArtistTag>> {
        self.tag_requests.push(mbid.to_string());
        Ok(self.tags.get(mbid).cloned().unwrap_or_default())
    }
}

pub fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

pub fn tempo(bpm: f64, duration_ms: f64) -> Features {
    Features::from([("tempo", bpm), ("duration_ms", duration_ms), ("energy", 0.5)])
}

pub fn saved_album(id: &str, artists: &[(&str, &str)], tracks: &[&str]) -> SavedAlbum {
    SavedAlbum {
        added_at: "2024-03-01T10:00:00Z".to_string(),
        album: Album {
            id: id.to_string(),
            name: format!("Album {id}"),
            total_tracks: tracks.len() as u32,
            release_date: "1997-05".to_string(),
            release_date_precision: "month".to_string(),
            popularity: Some(42),
            artists: artists
                .iter()
                .map(|(id, name)| AlbumArtist {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            images: vec![
                Image {
                    url: format!("https://img/{id}/640"),
                },
                Image {
                    url: format!("https://img/{id}/64"),
                },
            ],
            tracks: Tracks {
                items: tracks
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Track {
                        id: Some(t.to_string()),
                        name: format!("Track {t}"),
                        duration_ms: 200_000,
                        track_number: i as u32 + 1,
                        disc_number: 1,
                    })
                    .collect(),
            },
        },
    }
}
