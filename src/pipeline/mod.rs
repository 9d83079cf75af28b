//! # Playlist Pipeline
//!
//! Builds a playlist out of an existing track collection in four steps:
//!
//! ```text
//! BatchCursor ──ids──▶ filter ──passing tracks──▶ accumulate ──ids──▶ publish
//! ```
//!
//! - [`cursor`] walks the saved tracks or a list of named playlists, one
//!   page of at most `batchsize` ids at a time.
//! - [`filter`] fetches the audio features of a page and keeps the tracks
//!   that satisfy every bound of the [`BoundSpec`].
//! - [`accumulate`] repeats the two until the track or duration cap is hit
//!   or the collection is exhausted, then sorts and deduplicates.
//! - [`publish`] creates the playlist and adds the tracks.
//!
//! The pipeline is sequential and blocking; every request shares one
//! per-account rate limit. The Spotify client is passed in explicitly
//! through the [`TrackSource`] and [`PlaylistSink`] traits.

pub mod accumulate;
pub mod cursor;
pub mod filter;
pub mod publish;

pub use accumulate::{RunAccumulator, StopConditions};
pub use cursor::{Advance, BatchCursor};
pub use filter::{Bound, BoundSpec, FilterOutcome};
pub use publish::PublishedPlaylist;

use crate::{
    Res,
    config::PlaylistParams,
    types::{CreatePlaylistRequest, Features, PlaylistSummary, TrackPage},
};

/// A track that passed the filter, with the features it was judged on.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTrack {
    pub id: String,
    pub features: Features,
}

/// Read side of the Spotify API the pipeline depends on.
pub trait TrackSource {
    /// One page of the user's saved tracks.
    fn saved_tracks(&mut self, limit: usize, offset: usize) -> Res<TrackPage>;

    /// Every playlist visible to the account.
    fn playlists(&mut self) -> Res<Vec<PlaylistSummary>>;

    /// One page of a playlist's tracks.
    fn playlist_tracks(&mut self, playlist_id: &str, limit: usize, offset: usize)
    -> Res<TrackPage>;

    /// Features for `ids`, aligned with the input; `None` where Spotify has
    /// no analysis for a track.
    fn audio_features(&mut self, ids: &[String]) -> Res<Vec<Option<Features>>>;
}

/// Write side of the Spotify API used to publish the result.
pub trait PlaylistSink {
    fn current_user_id(&mut self) -> Res<String>;

    /// Creates a playlist owned by `owner_id` and returns its id.
    fn create_playlist(&mut self, owner_id: &str, request: &CreatePlaylistRequest) -> Res<String>;

    fn add_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Res<()>;
}

/// Runs cursor, filter and accumulation, and returns the final ordered,
/// deduplicated tracks without publishing them.
///
/// # Arguments
///
/// * `source` - Read side of the Spotify API
/// * `params` - Validated first; a bad document fails before any request
///
/// # Returns
///
/// - `Ok(Vec<FilteredTrack>)` - Tracks that passed every bound, sorted by
///   `sort_feature` when set, first occurrences only
/// - `Err(Error::Configuration)` - Invalid `params`
/// - `Err(_)` - The first upstream failure; nothing is retried here
///
/// # Stop Conditions
///
/// Caps are checked between batches, so the result can hold more tracks
/// (or more playtime) than `max_tracks` (or `playlist_duration`).
///
/// # Example
///
/// ```
/// let params = PlaylistParams::from_json(r#"{ "sort_feature": "tempo" }"#)?;
/// let tracks = pipeline::select_tracks(&mut client, &params)?;
/// ```
pub fn select_tracks<S>(source: &mut S, params: &PlaylistParams) -> Res<Vec<FilteredTrack>>
where
    S: TrackSource + ?Sized,
{
    params.validate()?;

    let cursor = BatchCursor::from_params(source, params)?;
    let acc = accumulate::accumulate(
        source,
        cursor,
        &params.features_bounds,
        &params.stop_conditions(),
    )?;

    Ok(acc.finalize(params.sort_feature.as_deref()))
}

/// Full run: select the tracks, then publish them as a new playlist.
///
/// Publishing only starts once selection has finished, so a failed run
/// never leaves a half-built playlist behind because of a fetch error.
///
/// # Errors
///
/// Everything [`select_tracks`] returns, plus [`Error::EmptyResult`](crate::Error::EmptyResult)
/// when no track passed the bounds.
pub fn run<C>(client: &mut C, params: &PlaylistParams) -> Res<PublishedPlaylist>
where
    C: TrackSource + PlaylistSink + ?Sized,
{
    let tracks = select_tracks(client, params)?;
    let ids: Vec<String> = tracks.into_iter().map(|t| t.id).collect();
    publish::publish(client, params, &ids)
}
