//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - HTML map export with directory creation
//! - CSV export row count and distance columns
//! - Empty tracks still producing a map
//! - Render failures surfacing as errors

use gps_log_map::{
    annotate_track, export_to_csv, export_track, parse_log_str, ExportOptions, GpsMapError,
    MapConfig, ParseOptions,
};
use std::fs;
use tempfile::TempDir;

const TWO_FIXES: &str = "\
GPS\t2023-10-01 12:00:01\t10.0.0.9\t12\t2023-10-01 12:00:00\t8\t52.0\t13.0\t5.0\t0.0\t0.0
GPS\t2023-10-01 12:00:11\t10.0.0.9\t12\t2023-10-01 12:00:10\t9\t52.1\t13.0\t4.0\t12.5\t0.0
";

#[test]
fn test_export_html_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_dir = temp_dir.path().join("nonexistent").join("output");
    let html_path = output_dir.join("map.html");

    let track = parse_log_str(TWO_FIXES, &ParseOptions::default()).unwrap();
    let options = ExportOptions {
        html_path: html_path.clone(),
        csv_path: None,
    };

    let report = export_track(&track, &MapConfig::default(), &options).unwrap();

    assert!(output_dir.exists(), "Output directory should be created");
    assert!(html_path.exists(), "HTML map should be written");
    assert_eq!(report.html_path.as_deref(), Some(html_path.as_path()));
    assert_eq!(report.markers, 2);
    assert_eq!(report.polyline_points, 2);
    assert!((report.total_km - 11.12).abs() < 0.01);

    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("L.map("));
    assert!(html.contains("Total distance"));
}

#[test]
fn test_export_csv_rows_match_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("csv").join("track.csv");

    let track = parse_log_str(TWO_FIXES, &ParseOptions::default()).unwrap();
    let annotated = annotate_track(&track.records);
    export_to_csv(&annotated, &track, &csv_path).unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), track.len() + 1);
    assert!(lines[0].starts_with("line,server_timestamp"));
    assert!(lines[0].ends_with("segment_km,total_km"));

    let header_fields = lines[0].split(',').count();
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), header_fields);
    }

    let last: Vec<&str> = lines[2].split(',').collect();
    let total: f64 = last[header_fields - 1].parse().unwrap();
    assert!((total - 11.12).abs() < 0.01);
    assert_eq!(last[header_fields - 1], format!("{:.6}", annotated.total_km));
    assert!(lines[1].ends_with("0.000000,0.000000"));
}

#[test]
fn test_export_track_writes_both_outputs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = ExportOptions {
        html_path: temp_dir.path().join("map.html"),
        csv_path: Some(temp_dir.path().join("map.csv")),
    };

    let track = parse_log_str(TWO_FIXES, &ParseOptions::default()).unwrap();
    let report = export_track(&track, &MapConfig::default(), &options).unwrap();

    assert_eq!(report.csv_path, options.csv_path);
    assert!(options.html_path.exists());
    assert!(temp_dir.path().join("map.csv").exists());
}

#[test]
fn test_empty_track_still_writes_map() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = ExportOptions {
        html_path: temp_dir.path().join("empty.html"),
        csv_path: None,
    };

    let track = parse_log_str("INFO\tnothing to see\n", &ParseOptions::default()).unwrap();
    let report = export_track(&track, &MapConfig::default(), &options).unwrap();

    assert!(options.html_path.exists());
    assert_eq!(report.markers, 0);
    assert_eq!(report.polyline_points, 0);
    assert_eq!(report.total_km, 0.0);
}

#[test]
fn test_unwritable_output_is_render_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // A directory where the HTML file should go
    let html_path = temp_dir.path().join("taken");
    fs::create_dir(&html_path).unwrap();

    let options = ExportOptions {
        html_path,
        csv_path: None,
    };
    let track = parse_log_str(TWO_FIXES, &ParseOptions::default()).unwrap();

    let err = export_track(&track, &MapConfig::default(), &options).unwrap_err();
    assert!(matches!(err, GpsMapError::Render(_)));
}
