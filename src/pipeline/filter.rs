//! Audio-feature filtering of a batch of tracks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    Res,
    pipeline::{FilteredTrack, TrackSource},
    types::{FeatureValue, Features},
};

/// Feature names `GET /audio-features` reports for a track.
pub const AUDIO_FEATURES: [&str; 13] = [
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "instrumentalness",
    "key",
    "liveness",
    "loudness",
    "mode",
    "speechiness",
    "tempo",
    "time_signature",
    "valence",
];

/// Constraint on a single feature.
///
/// In the configuration document a range is written `[lower, upper]` where
/// either end may be `null`, and anything else is an exact value:
/// `"tempo": [120, null]`, `"mode": 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Range(Option<f64>, Option<f64>),
    Exact(FeatureValue),
}

impl Bound {
    pub fn between(lower: f64, upper: f64) -> Self {
        Bound::Range(Some(lower), Some(upper))
    }

    pub fn at_least(lower: f64) -> Self {
        Bound::Range(Some(lower), None)
    }

    pub fn at_most(upper: f64) -> Self {
        Bound::Range(None, Some(upper))
    }

    pub fn exact(value: impl Into<FeatureValue>) -> Self {
        Bound::Exact(value.into())
    }

    /// Whether a track whose feature has `value` satisfies this bound.
    ///
    /// A range open on both ends accepts anything, a missing value included.
    /// Both range ends are inclusive.
    pub fn matches(&self, value: Option<&FeatureValue>) -> bool {
        match self {
            Bound::Range(None, None) => true,
            Bound::Range(lower, upper) => {
                let Some(v) = value.and_then(FeatureValue::as_f64) else {
                    return false;
                };
                lower.is_none_or(|lo| v >= lo) && upper.is_none_or(|hi| v <= hi)
            }
            Bound::Exact(expected) => value.is_some_and(|v| v == expected),
        }
    }
}

/// Per-feature constraints, applied as a conjunction.
///
/// A feature mapped to `null` is unconstrained, exactly like a feature
/// that is not listed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundSpec(BTreeMap<String, Option<Bound>>);

impl Default for BoundSpec {
    fn default() -> Self {
        let unit = [
            "acousticness",
            "danceability",
            "energy",
            "instrumentalness",
            "liveness",
            "speechiness",
            "valence",
        ];
        let open = ["key", "mode", "tempo", "time_signature"];

        let mut bounds = BTreeMap::new();
        for name in unit {
            bounds.insert(name.to_string(), Some(Bound::between(0.0, 1.0)));
        }
        for name in open {
            bounds.insert(name.to_string(), None);
        }
        BoundSpec(bounds)
    }
}

impl BoundSpec {
    /// No bounds at all.
    pub fn unconstrained() -> Self {
        BoundSpec(BTreeMap::new())
    }

    pub fn with(mut self, feature: impl Into<String>, bound: Option<Bound>) -> Self {
        self.0.insert(feature.into(), bound);
        self
    }

    pub fn get(&self, feature: &str) -> Option<&Bound> {
        self.0.get(feature).and_then(Option::as_ref)
    }

    /// Bounds that actually constrain something.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.0
            .iter()
            .filter_map(|(name, bound)| bound.as_ref().map(|b| (name.as_str(), b)))
    }

    /// Constrained feature names Spotify never reports. Every track is
    /// dropped by such a bound, which is almost always a typo.
    pub fn unknown_features(&self) -> Vec<&str> {
        self.active()
            .filter(|(_, bound)| !matches!(bound, Bound::Range(None, None)))
            .map(|(name, _)| name)
            .filter(|name| !AUDIO_FEATURES.contains(name))
            .collect()
    }

    /// True when `features` satisfies every active bound.
    pub fn accepts(&self, features: &Features) -> bool {
        self.active()
            .all(|(name, bound)| bound.matches(features.get(name)))
    }
}

/// Tracks of one batch that passed, with their summed duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub passed: Vec<FilteredTrack>,
    pub duration_ms: u64,
}

/// Keeps the tracks whose features are known and accepted by `bounds`,
/// preserving input order. Entries without features are dropped silently.
pub fn apply_bounds<I>(tracks: I, bounds: &BoundSpec) -> FilterOutcome
where
    I: IntoIterator<Item = (String, Option<Features>)>,
{
    let passed: Vec<FilteredTrack> = tracks
        .into_iter()
        .filter_map(|(id, features)| features.map(|features| FilteredTrack { id, features }))
        .filter(|track| bounds.accepts(&track.features))
        .collect();
    let duration_ms = passed.iter().map(|t| t.features.duration_ms()).sum();

    FilterOutcome {
        passed,
        duration_ms,
    }
}

/// Fetches the features of `ids` in one request and filters them.
///
/// # Returns
///
/// - `Ok(FilterOutcome)` - Passing tracks in input order with their summed
///   duration. Ids Spotify has no features for are dropped.
/// - `Err(_)` - The features request failed
pub fn filter_batch<S>(source: &mut S, ids: &[String], bounds: &BoundSpec) -> Res<FilterOutcome>
where
    S: TrackSource + ?Sized,
{
    if ids.is_empty() {
        return Ok(FilterOutcome::default());
    }

    let features = source.audio_features(ids)?;
    Ok(apply_bounds(ids.iter().cloned().zip(features), bounds))
}
