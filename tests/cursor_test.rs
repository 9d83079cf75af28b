mod common;

use bpmcli::pipeline::{Advance, BatchCursor, cursor::PlaylistBatches};
use common::{FakeSpotify, ids};

/// Advances `cursor` until it is exhausted and returns every batch read.
fn drain(mut cursor: BatchCursor, fake: &mut FakeSpotify) -> Vec<Vec<String>> {
    let mut batches = Vec::new();
    loop {
        match cursor.advance(fake).unwrap() {
            Advance::Batch(next, batch) => {
                batches.push(batch);
                cursor = next;
            }
            Advance::Exhausted => return batches,
        }
    }
}

fn workout_and_chill() -> FakeSpotify {
    let mut fake = FakeSpotify::default();
    fake.add_playlist("p1", "Workout", ids("w", 30));
    fake.add_playlist("p2", "Chill", ids("c", 10));
    fake
}

#[test]
fn test_named_playlist_yields_ceil_total_over_batchsize_batches() {
    for batchsize in [1, 7, 10, 30, 50] {
        let mut fake = workout_and_chill();
        let cursor =
            BatchCursor::playlists(&mut fake, &["Workout".to_string()], batchsize).unwrap();

        let batches = drain(cursor, &mut fake);
        assert_eq!(batches.len(), 30usize.div_ceil(batchsize), "batchsize {batchsize}");
        assert!(batches.iter().flatten().all(|id| id.starts_with('w')));
        assert!(fake.playlist_requests.iter().all(|(id, _, _)| id == "p1"));
    }
}

#[test]
fn test_playlist_table_resolves_exact_names() {
    let mut fake = workout_and_chill();
    let cursor = BatchCursor::playlists(&mut fake, &["Workout".to_string()], 10).unwrap();

    assert_eq!(
        cursor.playlist_table(),
        &[PlaylistBatches {
            id: "p1".to_string(),
            name: "Workout".to_string(),
            batches: 3,
        }]
    );
}

#[test]
fn test_no_matching_playlist_is_exhausted_immediately() {
    let mut fake = workout_and_chill();
    let cursor = BatchCursor::playlists(&mut fake, &["workout".to_string()], 10).unwrap();

    assert!(cursor.playlist_table().is_empty());
    assert_eq!(cursor.advance(&mut fake).unwrap(), Advance::Exhausted);
    assert!(fake.playlist_requests.is_empty());
}

#[test]
fn test_playlists_are_walked_in_account_order() {
    let mut fake = workout_and_chill();
    let names = vec!["Chill".to_string(), "Workout".to_string()];
    let cursor = BatchCursor::playlists(&mut fake, &names, 25).unwrap();

    drain(cursor, &mut fake);
    let order: Vec<(&str, usize)> = fake
        .playlist_requests
        .iter()
        .map(|(id, _, offset)| (id.as_str(), *offset))
        .collect();
    assert_eq!(order, vec![("p1", 0), ("p1", 25), ("p2", 0)]);
}

#[test]
fn test_empty_playlists_are_skipped() {
    let mut fake = FakeSpotify::default();
    fake.add_playlist("p0", "Empty", Vec::new());
    fake.add_playlist("p1", "Full", ids("f", 3));
    let names = vec!["Empty".to_string(), "Full".to_string()];

    let cursor = BatchCursor::playlists(&mut fake, &names, 2).unwrap();
    let batches = drain(cursor, &mut fake);

    assert_eq!(batches.len(), 2);
    assert!(fake.playlist_requests.iter().all(|(id, _, _)| id == "p1"));
}

#[test]
fn test_saved_tracks_follow_next_links() {
    let saved = ids("s", 7);
    let mut fake = FakeSpotify {
        saved: saved.clone(),
        ..Default::default()
    };

    let batches = drain(BatchCursor::saved_tracks(3), &mut fake);

    assert_eq!(batches.len(), 3);
    assert_eq!(batches.concat(), saved);
    assert_eq!(fake.saved_requests, vec![(3, 0), (3, 3), (3, 6)]);
}

#[test]
fn test_saved_tracks_with_empty_library() {
    let mut fake = FakeSpotify::default();
    let batches = drain(BatchCursor::saved_tracks(50), &mut fake);

    // one request to learn there is nothing
    assert_eq!(batches, vec![Vec::<String>::new()]);
    assert_eq!(fake.saved_requests.len(), 1);
}
