use tabled::Table;

use crate::{
    error, info,
    pipeline::TrackSource,
    spotify::SpotifyClient,
    types::PlaylistTableRow,
};

/// Lists the account's playlists so their names can be copied into the
/// `playlists` option.
pub fn list_playlists() {
    let mut client = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot set up the Spotify client: {}", e),
    };

    let playlists = match client.playlists() {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to read playlists: {}", e),
    };

    if playlists.is_empty() {
        info!("No playlists found");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            tracks: p.total,
            id: p.id,
        })
        .collect();

    println!("{}", Table::new(rows));
}
