use std::{fs, path::{Path, PathBuf}};

use rusqlite::{Connection, params};

use crate::{Error, Res, config, snapshot::LibrarySnapshot};

/// Tables a snapshot owns, in creation order.
pub const SNAPSHOT_TABLES: [&str; 7] = [
    "albums",
    "artists",
    "album_artist",
    "tracks",
    "album_track",
    "artist_genre",
    "artist_tag",
];

const SCHEMA: &str = r#"
DROP TABLE IF EXISTS artist_tag;
DROP TABLE IF EXISTS artist_genre;
DROP TABLE IF EXISTS album_track;
DROP TABLE IF EXISTS tracks;
DROP TABLE IF EXISTS album_artist;
DROP TABLE IF EXISTS artists;
DROP TABLE IF EXISTS albums;

CREATE TABLE albums (
    spotify_id   TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    total_tracks INTEGER NOT NULL,
    release_date TEXT,
    added_at     TEXT,
    popularity   INTEGER,
    cover_url    TEXT
);

CREATE TABLE artists (
    spotify_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    mbid       TEXT
);

CREATE TABLE album_artist (
    album_id  TEXT NOT NULL,
    artist_id TEXT NOT NULL,
    PRIMARY KEY (album_id, artist_id)
);

CREATE TABLE tracks (
    spotify_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    duration_ms INTEGER NOT NULL
);

CREATE TABLE album_track (
    album_id     TEXT NOT NULL,
    track_id     TEXT NOT NULL,
    track_number INTEGER NOT NULL,
    disc_number  INTEGER NOT NULL,
    PRIMARY KEY (album_id, track_id)
);

CREATE TABLE artist_genre (
    artist_id TEXT NOT NULL,
    genre     TEXT NOT NULL,
    PRIMARY KEY (artist_id, genre)
);

CREATE TABLE artist_tag (
    mbid   TEXT NOT NULL,
    tag    TEXT NOT NULL,
    weight INTEGER NOT NULL,
    PRIMARY KEY (mbid, tag)
);
"#;

/// SQLite file holding the last library snapshot.
///
/// Every [`write`](Self::write) replaces the previous snapshot completely:
/// the tables are dropped, recreated and filled inside one transaction, so
/// a failed write leaves the old snapshot in place.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Res<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Res<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("library.db")
    }

    /// Replaces the stored snapshot with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when SQLite rejects the schema or a row;
    /// the transaction is rolled back and the previous snapshot stays.
    pub fn write(&mut self, snapshot: &LibrarySnapshot) -> Res<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO albums
                 (spotify_id, name, total_tracks, release_date, added_at, popularity, cover_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for album in &snapshot.albums {
                stmt.execute(params![
                    album.spotify_id,
                    album.name,
                    album.total_tracks,
                    album.release_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    album.added_at.map(|t| t.to_rfc3339()),
                    album.popularity,
                    album.cover_url,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO artists (spotify_id, name, mbid) VALUES (?1, ?2, ?3)",
            )?;
            for artist in &snapshot.artists {
                stmt.execute(params![artist.spotify_id, artist.name, artist.mbid])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO album_artist (album_id, artist_id) VALUES (?1, ?2)",
            )?;
            for (album_id, artist_id) in &snapshot.album_artists {
                stmt.execute(params![album_id, artist_id])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO tracks (spotify_id, name, duration_ms) VALUES (?1, ?2, ?3)",
            )?;
            for track in &snapshot.tracks {
                let duration = i64::try_from(track.duration_ms).unwrap_or(i64::MAX);
                stmt.execute(params![track.spotify_id, track.name, duration])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO album_track (album_id, track_id, track_number, disc_number)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for link in &snapshot.album_tracks {
                stmt.execute(params![
                    link.album_id,
                    link.track_id,
                    link.track_number,
                    link.disc_number,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO artist_genre (artist_id, genre) VALUES (?1, ?2)",
            )?;
            for (artist_id, genre) in &snapshot.artist_genres {
                stmt.execute(params![artist_id, genre])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO artist_tag (mbid, tag, weight) VALUES (?1, ?2, ?3)",
            )?;
            for tag in &snapshot.artist_tags {
                stmt.execute(params![tag.mbid, tag.tag, tag.weight])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Number of rows in one of [`SNAPSHOT_TABLES`].
    pub fn count(&self, table: &str) -> Res<u64> {
        if !SNAPSHOT_TABLES.contains(&table) {
            return Err(Error::config(format!("unknown snapshot table {table}")));
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Every `(artist name, genre)` pair, for quick inspection.
    pub fn artist_genres(&self) -> Res<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.name, g.genre FROM artist_genre g
             JOIN artists a ON a.spotify_id = g.artist_id
             ORDER BY a.name, g.genre",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
