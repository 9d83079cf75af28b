use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Number of pages of `batchsize` needed to cover `total` items.
pub fn batch_count(total: u64, batchsize: usize) -> usize {
    if batchsize == 0 {
        return 0;
    }
    total.div_ceil(batchsize as u64) as usize
}

/// Drops every item whose key was already seen, keeping first occurrences
/// in their original order.
pub fn remove_duplicates<T, F>(items: &mut Vec<T>, key: F)
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(key(item).to_string()));
}

pub fn remove_duplicate_ids(ids: &mut Vec<String>) {
    remove_duplicates(ids, |id| id.as_str());
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Turns a Spotify release date into a full date.
///
/// Spotify reports `1997`, `1997-05` or `1997-05-21` depending on the
/// precision; missing parts default to the first month or day.
pub fn normalize_release_date(date: &str, precision: &str) -> Option<NaiveDate> {
    let padded = match precision {
        "year" => format!("{date}-01-01"),
        "month" => format!("{date}-01"),
        _ => date.to_string(),
    };
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
}

/// Parses an RFC 3339 timestamp such as `added_at` into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
