//! # Library Snapshot
//!
//! Turns the user's saved albums into relational rows: albums, artists,
//! tracks, the links between them, Spotify genres per artist and Last.fm
//! tags per artist MBID. [`SnapshotStore`](crate::management::SnapshotStore)
//! writes the result to SQLite.
//!
//! Collection runs in three sequential phases:
//!
//! 1. page through `GET /me/albums` ([`retrieve_albums`])
//! 2. fetch full artist objects 50 at a time for their genres
//!    ([`LibrarySnapshot::add_genres`])
//! 3. optionally resolve MBIDs and tags ([`LibrarySnapshot::add_tags`]);
//!    a failed lookup only costs that artist its tags

use std::{collections::HashSet, time::Duration};

use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res, info,
    types::{AlbumPage, Artist, ArtistTag, SavedAlbum},
    utils, warning,
};

/// Page size for saved albums and batch size for artist lookups.
pub const SNAPSHOT_BATCH_SIZE: usize = 50;

/// Spotify calls the snapshot needs.
pub trait AlbumSource {
    fn saved_albums(&mut self, limit: usize, offset: usize) -> Res<AlbumPage>;

    /// Full artist objects for `ids`, aligned with the input.
    fn artists(&mut self, ids: &[String]) -> Res<Vec<Option<Artist>>>;
}

/// MBID and tag lookups for artists.
pub trait ArtistTagSource {
    fn artist_mbid(&mut self, name: &str) -> Res<Option<String>>;

    fn top_tags(&mut self, mbid: &str) -> Res<Vec<ArtistTag>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRow {
    pub spotify_id: String,
    pub name: String,
    pub total_tracks: u32,
    pub release_date: Option<NaiveDate>,
    pub added_at: Option<DateTime<Utc>>,
    pub popularity: Option<u32>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub spotify_id: String,
    pub name: String,
    pub mbid: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub spotify_id: String,
    pub name: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumTrackRow {
    pub album_id: String,
    pub track_id: String,
    pub track_number: u32,
    pub disc_number: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistTagRow {
    pub mbid: String,
    pub tag: String,
    pub weight: i64,
}

/// Everything a snapshot writes, table by table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibrarySnapshot {
    pub albums: Vec<AlbumRow>,
    pub artists: Vec<ArtistRow>,
    /// `(album_id, artist_id)`
    pub album_artists: Vec<(String, String)>,
    pub tracks: Vec<TrackRow>,
    pub album_tracks: Vec<AlbumTrackRow>,
    /// `(artist_id, genre)`
    pub artist_genres: Vec<(String, String)>,
    pub artist_tags: Vec<ArtistTagRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Stop after this many saved albums.
    pub max_albums: Option<usize>,
    pub skip_tags: bool,
}

fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Reads saved albums page by page.
///
/// # Arguments
///
/// * `source` - Answers `GET /me/albums`
/// * `max` - Optional cap on the number of albums
/// * `limit` - Page size, 50 at most for Spotify
///
/// # Paging
///
/// Each request asks for at most `limit` albums and never more than what
/// is still missing to reach `max`. Reading stops on the last page or once
/// `max` albums are in.
pub fn retrieve_albums<S>(source: &mut S, max: Option<usize>, limit: usize) -> Res<Vec<SavedAlbum>>
where
    S: AlbumSource + ?Sized,
{
    let mut albums: Vec<SavedAlbum> = Vec::new();
    let mut offset = 0;

    loop {
        let batch_limit = match max {
            Some(max) => limit.min(max.saturating_sub(offset)),
            None => limit,
        };
        if batch_limit == 0 {
            break;
        }

        let page = source.saved_albums(batch_limit, offset)?;
        offset += batch_limit;
        albums.extend(page.items);

        if !page.has_next || max.is_some_and(|max| albums.len() >= max) {
            break;
        }
    }

    Ok(albums)
}

impl LibrarySnapshot {
    /// Albums, artists and tracks as Spotify lists them on the saved albums.
    ///
    /// Artists and tracks shared by several albums appear once, at their
    /// first occurrence; every album still gets its own link rows.
    pub fn from_albums(saved: &[SavedAlbum]) -> Self {
        let mut snapshot = LibrarySnapshot::default();

        for entry in saved {
            let album = &entry.album;
            snapshot.albums.push(AlbumRow {
                spotify_id: album.id.clone(),
                name: album.name.clone(),
                total_tracks: album.total_tracks,
                release_date: utils::normalize_release_date(
                    &album.release_date,
                    &album.release_date_precision,
                ),
                added_at: utils::parse_timestamp(&entry.added_at),
                popularity: album.popularity,
                // the first image is the largest one
                cover_url: album.images.first().map(|i| i.url.clone()),
            });

            for artist in &album.artists {
                snapshot.artists.push(ArtistRow {
                    spotify_id: artist.id.clone(),
                    name: artist.name.clone(),
                    mbid: None,
                });
                snapshot
                    .album_artists
                    .push((album.id.clone(), artist.id.clone()));
            }

            for track in &album.tracks.items {
                let Some(track_id) = &track.id else {
                    continue;
                };
                snapshot.tracks.push(TrackRow {
                    spotify_id: track_id.clone(),
                    name: track.name.clone(),
                    duration_ms: track.duration_ms,
                });
                snapshot.album_tracks.push(AlbumTrackRow {
                    album_id: album.id.clone(),
                    track_id: track_id.clone(),
                    track_number: track.track_number,
                    disc_number: track.disc_number,
                });
            }
        }

        utils::remove_duplicates(&mut snapshot.artists, |a| a.spotify_id.as_str());
        utils::remove_duplicates(&mut snapshot.tracks, |t| t.spotify_id.as_str());
        snapshot
    }

    /// Looks up every artist in batches and records its genres.
    pub fn add_genres<S>(&mut self, source: &mut S) -> Res<()>
    where
        S: AlbumSource + ?Sized,
    {
        let ids: Vec<String> = self.artists.iter().map(|a| a.spotify_id.clone()).collect();
        let pb = progress_bar(ids.len() as u64, "Reading artists");

        for chunk in ids.chunks(SNAPSHOT_BATCH_SIZE) {
            let artists = source.artists(chunk)?;
            for (id, artist) in chunk.iter().zip(artists) {
                let Some(artist) = artist else {
                    continue;
                };
                self.artist_genres
                    .extend(artist.genres.into_iter().map(|g| (id.clone(), g)));
            }
            pb.inc(chunk.len() as u64);
        }

        pb.finish_and_clear();
        Ok(())
    }

    /// Resolves artist MBIDs, then collects the top tags of each distinct
    /// MBID. Lookup failures are reported and skipped.
    pub fn add_tags<T>(&mut self, tags: &mut T)
    where
        T: ArtistTagSource + ?Sized,
    {
        let pb = progress_bar(self.artists.len() as u64, "Resolving MBIDs");
        for artist in &mut self.artists {
            match tags.artist_mbid(&artist.name) {
                Ok(mbid) => artist.mbid = mbid,
                Err(e) => warning!("MBID lookup failed for {}: {}", artist.name, e),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        let mut seen = HashSet::new();
        let mbids: Vec<String> = self
            .artists
            .iter()
            .filter_map(|a| a.mbid.clone())
            .filter(|mbid| seen.insert(mbid.clone()))
            .collect();

        let pb = progress_bar(mbids.len() as u64, "Reading tags");
        for mbid in mbids {
            match tags.top_tags(&mbid) {
                Ok(found) => self.artist_tags.extend(found.into_iter().map(|t| ArtistTagRow {
                    mbid: mbid.clone(),
                    tag: t.tag,
                    weight: t.weight,
                })),
                Err(e) => warning!("No tags for MBID {}: {}", mbid, e),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
    }
}

/// Runs all collection phases.
///
/// # Arguments
///
/// * `source` - Spotify albums and artists
/// * `tags` - MBID and tag lookups; skipped when `None`
/// * `options` - Album cap and `skip_tags`
///
/// # Returns
///
/// - `Ok(LibrarySnapshot)` - Every row to write
/// - `Err(_)` - A Spotify failure. Tag lookup failures never end up here;
///   they are reported as warnings and the artist keeps no tags.
pub fn collect<S, T>(
    source: &mut S,
    tags: Option<&mut T>,
    options: &SnapshotOptions,
) -> Res<LibrarySnapshot>
where
    S: AlbumSource + ?Sized,
    T: ArtistTagSource + ?Sized,
{
    info!("Reading saved albums...");
    let albums = retrieve_albums(source, options.max_albums, SNAPSHOT_BATCH_SIZE)?;
    info!("Found {} saved albums", albums.len());

    let mut snapshot = LibrarySnapshot::from_albums(&albums);
    snapshot.add_genres(source)?;

    match tags {
        Some(tags) if !options.skip_tags => snapshot.add_tags(tags),
        _ => info!("Skipping MBID and tag lookups"),
    }

    Ok(snapshot)
}
