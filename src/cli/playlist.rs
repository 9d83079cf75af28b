use std::path::Path;

use tabled::Table;

use crate::{
    config::PlaylistParams,
    error, info,
    pipeline::{self, FilteredTrack, publish},
    spotify::SpotifyClient,
    success,
    types::TrackTableRow,
    utils, warning,
};

/// Builds a playlist from the configuration at `config_path`, or from the
/// defaults when no path is given. With `dry_run` the selected tracks are
/// printed instead of published.
pub fn playlist(config_path: Option<&Path>, dry_run: bool) {
    let params = match PlaylistParams::load(config_path) {
        Ok(params) => params,
        Err(e) => error!("Configuration failed: {}", e),
    };

    let unknown = params.features_bounds.unknown_features();
    if !unknown.is_empty() {
        warning!(
            "Unknown audio features in features_bounds: {}. Tracks are dropped unless their bound is open on both ends.",
            unknown.join(", ")
        );
    }

    let mut client = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot set up the Spotify client: {}", e),
    };

    match &params.playlists {
        Some(names) => info!("Reading tracks from playlists: {}", names.join(", ")),
        None => info!("Reading tracks from your saved tracks"),
    }

    let tracks = match pipeline::select_tracks(&mut client, &params) {
        Ok(tracks) => tracks,
        Err(e) => error!("Track selection failed: {}", e),
    };

    let total_ms: u64 = tracks.iter().map(|t| t.features.duration_ms()).sum();
    success!(
        "Selected {} tracks ({})",
        tracks.len(),
        utils::format_duration(total_ms)
    );

    if dry_run {
        print_tracks(&tracks, params.sort_feature.as_deref());
        return;
    }

    let ids: Vec<String> = tracks.into_iter().map(|t| t.id).collect();
    match publish::publish(&mut client, &params, &ids) {
        Ok(published) => success!(
            "Playlist {} created with {} tracks (id {})",
            published.name,
            published.tracks,
            published.id
        ),
        Err(e) => error!("Publishing failed: {}", e),
    }
}

fn print_tracks(tracks: &[FilteredTrack], sort_feature: Option<&str>) {
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            id: t.id.clone(),
            duration: utils::format_duration(t.features.duration_ms()),
            sort_value: sort_feature
                .and_then(|f| t.features.get(f))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
