use std::path::PathBuf;

use crate::{
    enrich::TagLookup,
    error, info,
    management::{SNAPSHOT_TABLES, SnapshotStore},
    snapshot::{self, SnapshotOptions},
    spotify::SpotifyClient,
    success, warning,
};

pub fn snapshot(database: Option<PathBuf>, options: SnapshotOptions) {
    let path = database.unwrap_or_else(SnapshotStore::default_path);

    let mut client = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot set up the Spotify client: {}", e),
    };

    let mut tags = if options.skip_tags {
        None
    } else {
        match TagLookup::from_env() {
            Ok(lookup) if lookup.has_lastfm() => Some(lookup),
            Ok(_) => {
                warning!("LASTFM_API_KEY is not set, artist tags are skipped");
                None
            }
            Err(e) => error!("Cannot set up the tag lookup: {}", e),
        }
    };

    let library = match snapshot::collect(&mut client, tags.as_mut(), &options) {
        Ok(library) => library,
        Err(e) => error!("Reading the library failed: {}", e),
    };

    info!("Writing snapshot to {}", path.display());
    let mut store = match SnapshotStore::open(&path) {
        Ok(store) => store,
        Err(e) => error!("Cannot open {}: {}", path.display(), e),
    };
    if let Err(e) = store.write(&library) {
        error!("Writing the snapshot failed: {}", e);
    }

    for table in SNAPSHOT_TABLES {
        match store.count(table) {
            Ok(count) => info!("{}: {} rows", table, count),
            Err(e) => warning!("Cannot count {}: {}", table, e),
        }
    }
    success!("Snapshot written to {}", path.display());
}
