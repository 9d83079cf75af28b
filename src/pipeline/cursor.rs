//! Batch-wise walk over the track collection a playlist is built from.
//!
//! The cursor is a plain value. [`BatchCursor::advance`] consumes it and
//! hands back the next cursor together with the batch it fetched, so a run
//! can never resume from a stale position.

use crate::{
    Res,
    config::PlaylistParams,
    pipeline::TrackSource,
    types::PlaylistSummary,
    utils,
};

/// Cursor over the user's saved tracks.
///
/// How many pages exist is only learned from the `next` link of each page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTracksCursor {
    batchsize: usize,
    batch: usize,
    reading: bool,
}

/// A selected playlist and the number of batches it splits into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistBatches {
    pub id: String,
    pub name: String,
    pub batches: usize,
}

/// Cursor over a fixed list of playlists, walked one after the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistCursor {
    batchsize: usize,
    table: Vec<PlaylistBatches>,
    playlist: usize,
    batch: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCursor {
    SavedTracks(SavedTracksCursor),
    Playlists(PlaylistCursor),
}

/// Result of advancing a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The next cursor state and the track ids of the batch just read.
    Batch(BatchCursor, Vec<String>),
    Exhausted,
}

impl BatchCursor {
    pub fn saved_tracks(batchsize: usize) -> Self {
        BatchCursor::SavedTracks(SavedTracksCursor {
            batchsize,
            batch: 0,
            reading: true,
        })
    }

    /// Resolves `names` against the account's playlists and precomputes
    /// the batch count of each match.
    ///
    /// # Arguments
    ///
    /// * `source` - Lists the account's playlists (one call, paginated)
    /// * `names` - Playlist names to read from
    /// * `batchsize` - Tracks per page
    ///
    /// # Matching
    ///
    /// Names match exactly and case-sensitively. Matches keep the order in
    /// which the account lists them, not the order of `names`. No match at
    /// all gives a cursor that is exhausted right away.
    pub fn playlists<S>(source: &mut S, names: &[String], batchsize: usize) -> Res<Self>
    where
        S: TrackSource + ?Sized,
    {
        let table = source
            .playlists()?
            .into_iter()
            .filter(|playlist| names.contains(&playlist.name))
            .map(|PlaylistSummary { id, name, total }| PlaylistBatches {
                id,
                name,
                batches: utils::batch_count(total, batchsize),
            })
            .collect();

        Ok(Self::from_table(table, batchsize))
    }

    /// Builds a playlist cursor from an already resolved batch table.
    pub fn from_table(table: Vec<PlaylistBatches>, batchsize: usize) -> Self {
        BatchCursor::Playlists(PlaylistCursor {
            batchsize,
            table,
            playlist: 0,
            batch: 0,
        })
    }

    /// Picks the variant the configuration asks for.
    pub fn from_params<S>(source: &mut S, params: &PlaylistParams) -> Res<Self>
    where
        S: TrackSource + ?Sized,
    {
        match &params.playlists {
            Some(names) => Self::playlists(source, names, params.batchsize),
            None => Ok(Self::saved_tracks(params.batchsize)),
        }
    }

    /// The resolved playlists, empty for the saved-tracks variant.
    pub fn playlist_table(&self) -> &[PlaylistBatches] {
        match self {
            BatchCursor::SavedTracks(_) => &[],
            BatchCursor::Playlists(cursor) => &cursor.table,
        }
    }

    /// Reads the next batch.
    ///
    /// Upstream errors are returned as they are; nothing is retried here.
    pub fn advance<S>(self, source: &mut S) -> Res<Advance>
    where
        S: TrackSource + ?Sized,
    {
        match self {
            BatchCursor::SavedTracks(cursor) => cursor.advance(source),
            BatchCursor::Playlists(cursor) => cursor.advance(source),
        }
    }
}

impl SavedTracksCursor {
    fn advance<S>(self, source: &mut S) -> Res<Advance>
    where
        S: TrackSource + ?Sized,
    {
        if !self.reading {
            return Ok(Advance::Exhausted);
        }

        let page = source.saved_tracks(self.batchsize, self.batch * self.batchsize)?;
        let next = SavedTracksCursor {
            batchsize: self.batchsize,
            batch: self.batch + 1,
            reading: page.has_next,
        };

        Ok(Advance::Batch(BatchCursor::SavedTracks(next), page.ids))
    }
}

impl PlaylistCursor {
    fn advance<S>(mut self, source: &mut S) -> Res<Advance>
    where
        S: TrackSource + ?Sized,
    {
        // skip finished and empty playlists
        while self
            .table
            .get(self.playlist)
            .is_some_and(|p| self.batch >= p.batches)
        {
            self.playlist += 1;
            self.batch = 0;
        }

        let Some(current) = self.table.get(self.playlist) else {
            return Ok(Advance::Exhausted);
        };

        let page = source.playlist_tracks(
            &current.id,
            self.batchsize,
            self.batch * self.batchsize,
        )?;
        self.batch += 1;

        Ok(Advance::Batch(BatchCursor::Playlists(self), page.ids))
    }
}
