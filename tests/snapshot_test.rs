mod common;

use bpmcli::{
    management::{SNAPSHOT_TABLES, SnapshotStore},
    snapshot::{self, LibrarySnapshot, SnapshotOptions, retrieve_albums},
    types::{Artist, ArtistTag},
};
use chrono::NaiveDate;
use common::{FakeSpotify, FakeTags, saved_album};

fn artist(id: &str, name: &str, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

fn account() -> FakeSpotify {
    let mut fake = FakeSpotify::default();
    fake.albums = vec![
        saved_album("al1", &[("ar1", "Boards")], &["t1", "t2"]),
        saved_album("al2", &[("ar1", "Boards"), ("ar2", "Autechre")], &["t3", "t1"]),
    ];
    fake.artists.insert("ar1".into(), artist("ar1", "Boards", &["idm", "ambient"]));
    fake.artists.insert("ar2".into(), artist("ar2", "Autechre", &["idm"]));
    fake
}

fn tags() -> FakeTags {
    let mut tags = FakeTags::default();
    tags.mbids.insert("Boards".into(), "mbid-1".into());
    tags.mbids.insert("Autechre".into(), "mbid-2".into());
    tags.tags.insert(
        "mbid-1".into(),
        vec![ArtistTag {
            tag: "electronic".into(),
            weight: 100,
        }],
    );
    tags
}

#[test]
fn test_retrieve_albums_honours_max() {
    let mut fake = FakeSpotify::default();
    fake.albums = (0..120)
        .map(|i| saved_album(&format!("al{i}"), &[("ar", "A")], &[]))
        .collect();

    let albums = retrieve_albums(&mut fake, Some(70), 50).unwrap();
    assert_eq!(albums.len(), 70);
    assert_eq!(fake.album_requests, vec![(50, 0), (20, 50)]);

    fake.album_requests.clear();
    let albums = retrieve_albums(&mut fake, None, 50).unwrap();
    assert_eq!(albums.len(), 120);
    assert_eq!(fake.album_requests, vec![(50, 0), (50, 50), (50, 100)]);
}

#[test]
fn test_rows_from_albums() {
    let fake = account();
    let snapshot = LibrarySnapshot::from_albums(&fake.albums);

    assert_eq!(snapshot.albums.len(), 2);
    let first = &snapshot.albums[0];
    assert_eq!(first.release_date, NaiveDate::from_ymd_opt(1997, 5, 1));
    assert_eq!(first.cover_url.as_deref(), Some("https://img/al1/640"));
    assert_eq!(first.popularity, Some(42));
    assert!(first.added_at.is_some());

    let artists: Vec<&str> = snapshot.artists.iter().map(|a| a.spotify_id.as_str()).collect();
    assert_eq!(artists, vec!["ar1", "ar2"]);
    assert_eq!(snapshot.album_artists.len(), 3);

    let tracks: Vec<&str> = snapshot.tracks.iter().map(|t| t.spotify_id.as_str()).collect();
    assert_eq!(tracks, vec!["t1", "t2", "t3"]);
    assert_eq!(snapshot.album_tracks.len(), 4);
    assert_eq!(snapshot.album_tracks[3].track_number, 2);
}

#[test]
fn test_collect_with_genres_and_tags() {
    let mut fake = account();
    let mut tags = tags();

    let snapshot =
        snapshot::collect(&mut fake, Some(&mut tags), &SnapshotOptions::default()).unwrap();

    assert_eq!(fake.artist_requests, vec![vec!["ar1".to_string(), "ar2".to_string()]]);
    assert_eq!(snapshot.artist_genres.len(), 3);
    assert_eq!(snapshot.artists[0].mbid.as_deref(), Some("mbid-1"));
    assert_eq!(tags.tag_requests, vec!["mbid-1", "mbid-2"]);
    assert_eq!(snapshot.artist_tags.len(), 1);
    assert_eq!(snapshot.artist_tags[0].tag, "electronic");
}

#[test]
fn test_failed_lookups_are_skipped() {
    let mut fake = account();
    let mut tags = tags();
    tags.failing.push("Boards".into());

    let snapshot =
        snapshot::collect(&mut fake, Some(&mut tags), &SnapshotOptions::default()).unwrap();

    assert_eq!(snapshot.artists[0].mbid, None);
    assert_eq!(snapshot.artists[1].mbid.as_deref(), Some("mbid-2"));
    assert_eq!(tags.tag_requests, vec!["mbid-2"]);
}

#[test]
fn test_skip_tags() {
    let mut fake = account();
    let mut tags = tags();
    let options = SnapshotOptions {
        max_albums: None,
        skip_tags: true,
    };

    let snapshot = snapshot::collect(&mut fake, Some(&mut tags), &options).unwrap();
    assert!(snapshot.artist_tags.is_empty());
    assert!(snapshot.artists.iter().all(|a| a.mbid.is_none()));
    assert!(tags.tag_requests.is_empty());
}

#[test]
fn test_artist_lookups_are_batched() {
    let mut fake = FakeSpotify::default();
    let artists: Vec<(String, String)> = (0..120)
        .map(|i| (format!("ar{i}"), format!("Artist {i}")))
        .collect();
    let refs: Vec<(&str, &str)> = artists.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    fake.albums = vec![saved_album("al", &refs, &[])];

    let mut snapshot = LibrarySnapshot::from_albums(&fake.albums);
    snapshot.add_genres(&mut fake).unwrap();

    let sizes: Vec<usize> = fake.artist_requests.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
    // unknown artists contribute no genres
    assert!(snapshot.artist_genres.is_empty());
}

#[test]
fn test_store_writes_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.db");

    let mut fake = account();
    let mut tags = tags();
    let snapshot =
        snapshot::collect(&mut fake, Some(&mut tags), &SnapshotOptions::default()).unwrap();

    let mut store = SnapshotStore::open(&path).unwrap();
    store.write(&snapshot).unwrap();

    assert!(path.is_file());
    assert_eq!(store.count("albums").unwrap(), 2);
    assert_eq!(store.count("artists").unwrap(), 2);
    assert_eq!(store.count("album_artist").unwrap(), 3);
    assert_eq!(store.count("tracks").unwrap(), 3);
    assert_eq!(store.count("album_track").unwrap(), 4);
    assert_eq!(store.count("artist_genre").unwrap(), 3);
    assert_eq!(store.count("artist_tag").unwrap(), 1);

    let genres = store.artist_genres().unwrap();
    assert_eq!(genres[0], ("Autechre".to_string(), "idm".to_string()));
}

#[test]
fn test_store_replaces_previous_snapshot() {
    let mut store = SnapshotStore::open_in_memory().unwrap();

    let fake = account();
    store.write(&LibrarySnapshot::from_albums(&fake.albums)).unwrap();
    assert_eq!(store.count("albums").unwrap(), 2);

    store
        .write(&LibrarySnapshot::from_albums(&fake.albums[..1]))
        .unwrap();
    assert_eq!(store.count("albums").unwrap(), 1);
    assert_eq!(store.count("tracks").unwrap(), 2);

    store.write(&LibrarySnapshot::default()).unwrap();
    for table in SNAPSHOT_TABLES {
        assert_eq!(store.count(table).unwrap(), 0, "{table}");
    }
}

#[test]
fn test_count_rejects_unknown_tables() {
    let store = SnapshotStore::open_in_memory().unwrap();
    assert!(store.count("sqlite_master; DROP TABLE albums").is_err());
}
