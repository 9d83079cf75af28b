//! The accumulation loop: read, filter, collect, then order and deduplicate.

use crate::{
    Res, info,
    pipeline::{
        FilteredTrack, TrackSource,
        cursor::{Advance, BatchCursor},
        filter::{self, BoundSpec, FilterOutcome},
    },
    utils,
};

/// When to stop pulling batches. `None` means no cap on that dimension.
///
/// Caps are only checked between batches: the batch that crosses a cap is
/// kept whole, so a run can end above `max_tracks` or `max_duration_ms`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopConditions {
    pub max_tracks: Option<usize>,
    pub max_duration_ms: Option<u64>,
}

/// Tracks collected so far in a run, in the order they passed the filter.
#[derive(Debug, Clone, Default)]
pub struct RunAccumulator {
    tracks: Vec<FilteredTrack>,
    duration_ms: u64,
    batches: usize,
}

impl RunAccumulator {
    pub fn push(&mut self, outcome: FilterOutcome) {
        self.tracks.extend(outcome.passed);
        self.duration_ms += outcome.duration_ms;
        self.batches += 1;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Number of batches that went through the filter.
    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn tracks(&self) -> &[FilteredTrack] {
        &self.tracks
    }

    pub fn count_cap_reached(&self, stop: &StopConditions) -> bool {
        stop.max_tracks.is_some_and(|max| self.len() >= max)
    }

    pub fn duration_cap_reached(&self, stop: &StopConditions) -> bool {
        stop.max_duration_ms
            .is_some_and(|max| self.duration_ms >= max)
    }

    pub fn is_done(&self, stop: &StopConditions) -> bool {
        self.count_cap_reached(stop) || self.duration_cap_reached(stop)
    }

    /// Sorts by `sort_feature` if given, then drops repeated track ids.
    ///
    /// Deduplication runs last and keeps the first occurrence in the
    /// (possibly sorted) sequence.
    pub fn finalize(self, sort_feature: Option<&str>) -> Vec<FilteredTrack> {
        let mut tracks = self.tracks;
        if let Some(feature) = sort_feature {
            sort_by_feature(&mut tracks, feature);
        }
        utils::remove_duplicates(&mut tracks, |t| t.id.as_str());
        tracks
    }
}

/// Stable ascending sort on one feature. Tracks lacking the feature keep
/// their relative order at the end.
pub fn sort_by_feature(tracks: &mut [FilteredTrack], feature: &str) {
    tracks.sort_by(|a, b| match (a.features.get(feature), b.features.get(feature)) {
        (Some(x), Some(y)) => x.sort_cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Pulls batches from `cursor` until a stop condition holds or the source
/// runs dry, filtering each batch against `bounds`.
///
/// # Arguments
///
/// * `source` - Answers the cursor's page requests and the feature lookups
/// * `cursor` - Starting position, consumed as the loop advances
/// * `bounds` - Applied to every batch
/// * `stop` - Checked before each batch is read
///
/// # Returns
///
/// The unsorted [`RunAccumulator`], or the first upstream error.
pub fn accumulate<S>(
    source: &mut S,
    cursor: BatchCursor,
    bounds: &BoundSpec,
    stop: &StopConditions,
) -> Res<RunAccumulator>
where
    S: TrackSource + ?Sized,
{
    let mut acc = RunAccumulator::default();
    let mut cursor = cursor;

    while !acc.is_done(stop) {
        let (next, ids) = match cursor.advance(source)? {
            Advance::Batch(next, ids) => (next, ids),
            Advance::Exhausted => break,
        };

        let outcome = filter::filter_batch(source, &ids, bounds)?;
        info!(
            "Batch {}: {} of {} tracks passed the filter",
            acc.batches() + 1,
            outcome.passed.len(),
            ids.len()
        );
        acc.push(outcome);
        cursor = next;
    }

    Ok(acc)
}
