//! Publishing the selected tracks as a new playlist.
//!
//! Runs only after selection has finished. Three calls reach Spotify: the
//! current user, the playlist creation and one add-items request per chunk
//! of [`ADD_TRACKS_CHUNK`] URIs.

use crate::{
    Error, Res,
    config::PlaylistParams,
    pipeline::PlaylistSink,
    types::CreatePlaylistRequest,
};

/// Spotify accepts at most this many URIs per add-items request.
pub const ADD_TRACKS_CHUNK: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPlaylist {
    pub id: String,
    pub name: String,
    pub tracks: usize,
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{id}")
}

/// Creates the playlist described by `params` and fills it with `ids`.
///
/// # Arguments
///
/// * `sink` - Write side of the Spotify API
/// * `params` - Supplies name, description and visibility of the playlist
/// * `ids` - Final track ids, in playlist order
///
/// # Returns
///
/// - `Ok(PublishedPlaylist)` - Id and name of the new playlist and the number
///   of tracks added
/// - `Err(Error::EmptyResult)` - `ids` was empty; nothing was created
/// - `Err(_)` - Any upstream failure, returned unchanged
///
/// # Chunking
///
/// Tracks are sent as `spotify:track:<id>` URIs, at most
/// [`ADD_TRACKS_CHUNK`] per request, in order.
pub fn publish<S>(sink: &mut S, params: &PlaylistParams, ids: &[String]) -> Res<PublishedPlaylist>
where
    S: PlaylistSink + ?Sized,
{
    if ids.is_empty() {
        return Err(Error::EmptyResult);
    }

    let owner = sink.current_user_id()?;
    let request = CreatePlaylistRequest {
        name: params.name.clone(),
        description: params.description.clone(),
        public: params.public,
        collaborative: false,
    };
    let playlist_id = sink.create_playlist(&owner, &request)?;

    for chunk in ids.chunks(ADD_TRACKS_CHUNK) {
        let uris: Vec<String> = chunk.iter().map(|id| track_uri(id)).collect();
        sink.add_tracks(&playlist_id, &uris)?;
    }

    Ok(PublishedPlaylist {
        id: playlist_id,
        name: params.name.clone(),
        tracks: ids.len(),
    })
}
