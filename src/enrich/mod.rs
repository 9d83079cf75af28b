//! External metadata for the library snapshot.
//!
//! Spotify knows an artist's genres but not its MusicBrainz identifier or
//! the crowd-sourced tags Last.fm collects. [`TagLookup`] resolves the MBID
//! through Last.fm first and MusicBrainz second, then asks Last.fm for the
//! artist's top tags. Both services are throttled to their published
//! request rates.

pub mod lastfm;
pub mod musicbrainz;
mod throttle;

use reqwest::blocking::Client;

use crate::{Res, config, snapshot::ArtistTagSource, types::ArtistTag, warning};

pub use lastfm::LastFm;
pub use musicbrainz::MusicBrainz;
pub use throttle::Throttle;

pub struct TagLookup {
    lastfm: Option<LastFm>,
    musicbrainz: MusicBrainz,
}

impl TagLookup {
    pub fn new(lastfm: Option<LastFm>, musicbrainz: MusicBrainz) -> Self {
        Self {
            lastfm,
            musicbrainz,
        }
    }

    /// Builds both clients from the environment. Without `LASTFM_API_KEY`
    /// only MusicBrainz is queried and no tags are found.
    pub fn from_env() -> Res<Self> {
        let http = Client::builder().timeout(config::http_timeout()?).build()?;
        let lastfm = config::lastfm_api_key()
            .map(|key| LastFm::new(http.clone(), config::lastfm_apiurl(), key));
        let musicbrainz = MusicBrainz::new(
            http,
            config::musicbrainz_apiurl(),
            config::musicbrainz_user_agent(),
        );

        Ok(Self::new(lastfm, musicbrainz))
    }

    pub fn has_lastfm(&self) -> bool {
        self.lastfm.is_some()
    }
}

impl ArtistTagSource for TagLookup {
    fn artist_mbid(&mut self, name: &str) -> Res<Option<String>> {
        if let Some(lastfm) = &self.lastfm {
            match lastfm.artist_mbid(name) {
                Ok(Some(mbid)) => return Ok(Some(mbid)),
                Ok(None) => {}
                Err(e) => warning!("Last.fm has no MBID for {}: {}", name, e),
            }
        }

        self.musicbrainz.artist_mbid(name)
    }

    fn top_tags(&mut self, mbid: &str) -> Res<Vec<ArtistTag>> {
        match &self.lastfm {
            Some(lastfm) => lastfm.top_tags(mbid),
            None => Ok(Vec::new()),
        }
    }
}
