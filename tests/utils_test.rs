use bpmcli::utils::*;
use chrono::{Datelike, NaiveDate, Timelike};

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // SHA256 is 32 bytes, 43 characters in unpadded base64
    assert_eq!(challenge.len(), 43);
    assert!(!challenge.contains('='));
    assert!(!challenge.contains('+'));
    assert!(!challenge.contains('/'));

    // Same input gives the same challenge
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("another_verifier"));
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636 appendix B
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_batch_count() {
    assert_eq!(batch_count(30, 10), 3);
    assert_eq!(batch_count(30, 50), 1);
    assert_eq!(batch_count(31, 10), 4);
    assert_eq!(batch_count(0, 10), 0);
    assert_eq!(batch_count(1, 1), 1);
    assert_eq!(batch_count(10, 0), 0);
}

#[test]
fn test_remove_duplicate_ids_keeps_first_occurrence() {
    let mut ids: Vec<String> = ["a", "b", "a", "c", "b"].iter().map(|s| s.to_string()).collect();
    remove_duplicate_ids(&mut ids);
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_remove_duplicate_ids_is_idempotent() {
    let mut ids: Vec<String> = ["x", "y", "x", "z", "z", "y"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    remove_duplicate_ids(&mut ids);
    let once = ids.clone();
    remove_duplicate_ids(&mut ids);
    assert_eq!(ids, once);
}

#[test]
fn test_remove_duplicates_by_key() {
    let mut pairs = vec![("a", 1), ("b", 2), ("a", 3)];
    remove_duplicates(&mut pairs, |p| p.0);
    assert_eq!(pairs, vec![("a", 1), ("b", 2)]);
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59_999), "0:59");
    assert_eq!(format_duration(215_000), "3:35");
    assert_eq!(format_duration(3_600_000), "1:00:00");
    assert_eq!(format_duration(3_725_000), "1:02:05");
}

#[test]
fn test_normalize_release_date() {
    assert_eq!(
        normalize_release_date("1997", "year"),
        NaiveDate::from_ymd_opt(1997, 1, 1)
    );
    assert_eq!(
        normalize_release_date("1997-05", "month"),
        NaiveDate::from_ymd_opt(1997, 5, 1)
    );
    assert_eq!(
        normalize_release_date("1997-05-21", "day"),
        NaiveDate::from_ymd_opt(1997, 5, 21)
    );
    assert_eq!(normalize_release_date("not a date", "day"), None);
}

#[test]
fn test_parse_timestamp() {
    let ts = parse_timestamp("2024-03-01T10:15:30Z").unwrap();
    assert_eq!(ts.year(), 2024);
    assert_eq!(ts.hour(), 10);

    let offset = parse_timestamp("2024-03-01T12:15:30+02:00").unwrap();
    assert_eq!(offset, ts);

    assert!(parse_timestamp("yesterday").is_none());
}
