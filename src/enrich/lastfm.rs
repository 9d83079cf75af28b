use std::num::NonZeroU32;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Res, enrich::Throttle, types::ArtistTag};

/// Requests per second Last.fm tolerates for one API key.
const LASTFM_REQUESTS_PER_SECOND: u32 = 5;

/// Minimal Last.fm client: artist MBIDs and top tags.
pub struct LastFm {
    http: Client,
    base_url: String,
    api_key: String,
    throttle: Throttle,
}

#[derive(Debug, Deserialize)]
struct ArtistInfoResponse {
    artist: ArtistInfo,
}

#[derive(Debug, Deserialize)]
struct ArtistInfo {
    #[serde(default)]
    mbid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopTagsResponse {
    toptags: TopTags,
}

#[derive(Debug, Deserialize)]
struct TopTags {
    #[serde(default)]
    tag: Vec<LastFmTag>,
}

#[derive(Debug, Deserialize)]
struct LastFmTag {
    name: String,
    count: i64,
}

impl LastFm {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            throttle: Throttle::per_second(
                NonZeroU32::new(LASTFM_REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN),
            ),
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    fn call(&self, method: &str, params: &[(&str, &str)]) -> Res<Value> {
        self.throttle.wait();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("method", method),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .query(params)
            .send()?;

        let status = response.status().as_u16();
        let json: Value = response.json()?;

        // Last.fm reports failures in the body, sometimes with a 200
        if let Some(code) = json.get("error") {
            return Err(Error::Api {
                status,
                message: format!(
                    "Last.fm error {}: {}",
                    code,
                    json["message"].as_str().unwrap_or("unknown error")
                ),
            });
        }
        Ok(json)
    }

    /// `artist.getInfo`: the MBID Last.fm knows for `name`, if any.
    pub fn artist_mbid(&self, name: &str) -> Res<Option<String>> {
        let json = self.call("artist.getinfo", &[("artist", name)])?;
        let info: ArtistInfoResponse = serde_json::from_value(json)?;
        Ok(info.artist.mbid.filter(|mbid| !mbid.is_empty()))
    }

    /// `artist.getTopTags` by MBID.
    pub fn top_tags(&self, mbid: &str) -> Res<Vec<ArtistTag>> {
        let json = self.call("artist.gettoptags", &[("mbid", mbid)])?;
        let res: TopTagsResponse = serde_json::from_value(json)?;
        Ok(res
            .toptags
            .tag
            .into_iter()
            .map(|t| ArtistTag {
                tag: t.name,
                weight: t.count,
            })
            .collect())
    }
}
