use std::num::NonZeroU32;

use reqwest::{blocking::Client, header};
use serde::Deserialize;

use crate::{Error, Res, enrich::Throttle};

/// MusicBrainz artist search, used when Last.fm has no MBID.
///
/// MusicBrainz answers 503 to clients sending more than one request per
/// second, so every search waits on the throttle first.
pub struct MusicBrainz {
    http: Client,
    base_url: String,
    user_agent: String,
    throttle: Throttle,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    #[serde(default)]
    artists: Vec<ArtistHit>,
}

#[derive(Debug, Deserialize)]
struct ArtistHit {
    id: String,
}

impl MusicBrainz {
    pub fn new(http: Client, base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            throttle: Throttle::per_second(NonZeroU32::MIN),
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// MBID of the best match for `name`, taking only the top hit.
    pub fn artist_mbid(&self, name: &str) -> Res<Option<String>> {
        let query = format!("artist:\"{name}\"");
        self.throttle.wait();
        let response = self
            .http
            .get(format!("{}/artist/", self.base_url))
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "application/json")
            .query(&[("query", query.as_str()), ("fmt", "json"), ("limit", "1")])
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Api {
                status: response.status().as_u16(),
                message: format!("MusicBrainz search failed for {name}"),
            });
        }

        let res: ArtistSearchResponse = response.json()?;
        Ok(res.artists.into_iter().next().map(|hit| hit.id))
    }
}
