//! Integration tests for log parsing and distance accumulation
//!
//! Covers:
//! - Marker filtering and record ordering from a file on disk
//! - Malformed line accounting under both policies
//! - Missing input file reporting
//! - Track distance as the sum of consecutive great-circle distances

use gps_log_map::{
    annotate_track, great_circle_distance_km, parse_log_file, parse_log_str, GpsMapError,
    MalformedPolicy, ParseOptions,
};
use std::fs;
use tempfile::TempDir;

const SAMPLE_LOG: &str = "\
2023-10-01 12:00:00\tINFO\tlogger started
GPS\t2023-10-01 12:00:01\t192.168.1.20\t4711\t2023-10-01 12:00:00\t8\t52.0\t13.0\t5.0\t0.0\t0.0
2023-10-01 12:00:02\tINFO\theartbeat
GPS\t2023-10-01 12:00:11\t192.168.1.20\t4711\t2023-10-01 12:00:10\t9\t52.1\t13.0\t4.0\t12.5\t0.0
GPS\t2023-10-01 12:00:21\t192.168.1.20\t4711
GPS\t2023-10-01 12:00:31\t192.168.1.20\t4711\t2023-10-01 12:00:30\t9\tnorth\t13.0\t4.0\t12.5\t0.0
GPS\t2023-10-01 12:00:41\t192.168.1.20\t4711\t2023-10-01 12:00:40\t10\t52.1\t13.1\t3.0\t9.0\t90.0
";

#[test]
fn test_parse_file_counts_and_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("location_log.txt");
    fs::write(&log_path, SAMPLE_LOG).expect("Failed to write sample log");

    let track = parse_log_file(&log_path, &ParseOptions::default()).unwrap();

    assert_eq!(track.stats.total_lines, 7);
    assert_eq!(track.stats.marker_lines, 5);
    assert_eq!(track.stats.malformed_lines, 2);
    assert_eq!(
        track.len() as u64,
        track.stats.marker_lines - track.stats.malformed_lines
    );

    let lines: Vec<u64> = track.records.iter().map(|r| r.line_number).collect();
    assert_eq!(lines, vec![2, 4, 7]);
    assert_eq!(track.records[2].heading, 90.0);
    assert_eq!(track.records[2].satellite_count, 10);

    let malformed: Vec<u64> = track.malformed.iter().map(|m| m.line_number).collect();
    assert_eq!(malformed, vec![5, 6]);
}

#[test]
fn test_malformed_lines_do_not_touch_distance() {
    let clean: String = SAMPLE_LOG
        .lines()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 5)
        .map(|(_, line)| format!("{line}\n"))
        .collect();

    let with_errors = annotate_track(&parse_log_str(SAMPLE_LOG, &ParseOptions::default()).unwrap().records);
    let without_errors = annotate_track(&parse_log_str(&clean, &ParseOptions::default()).unwrap().records);

    assert_eq!(with_errors.len(), without_errors.len());
    assert_eq!(with_errors.total_km, without_errors.total_km);
}

#[test]
fn test_strict_policy_aborts() {
    let options = ParseOptions {
        policy: MalformedPolicy::Abort,
        ..ParseOptions::default()
    };
    let err = parse_log_str(SAMPLE_LOG, &options).unwrap_err();
    assert!(matches!(err, GpsMapError::MalformedRecord { line: 5, .. }));
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.txt");

    match parse_log_file(&missing, &ParseOptions::default()) {
        Err(GpsMapError::MissingInputFile { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected MissingInputFile, got {other:?}"),
    }
}

#[test]
fn test_total_distance_is_sum_of_segments() {
    let track = parse_log_str(SAMPLE_LOG, &ParseOptions::default()).unwrap();
    let annotated = annotate_track(&track.records);

    let expected: f64 = track
        .records
        .windows(2)
        .map(|w| great_circle_distance_km(w[0].coordinate(), w[1].coordinate()))
        .sum();
    assert!((annotated.total_km - expected).abs() < 1e-9);

    let first_step = annotated.points[1].annotation.incremental_km.unwrap();
    assert!((first_step - 11.12).abs() < 0.01);
    assert_eq!(annotated.points[2].annotation.total_km, Some(annotated.total_km));
}

#[test]
fn test_empty_log() {
    let track = parse_log_str("", &ParseOptions::default()).unwrap();
    assert!(track.is_empty());
    assert_eq!(track.stats.total_lines, 0);

    let annotated = annotate_track(&track.records);
    assert_eq!(annotated.total_km, 0.0);
    assert!(annotated.points.is_empty());
}
