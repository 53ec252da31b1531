//! GPS Log Map Library
//!
//! A Rust library for turning tab-delimited GPS location logs into an
//! interactive HTML map with one marker per fix and a connecting track line.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Parse a log file and print the track length:
//! ```rust,no_run
//! use gps_log_map::{annotate_track, parse_log_file, ParseOptions};
//! use std::path::Path;
//!
//! let track = parse_log_file(Path::new("logs/location_log.txt"), &ParseOptions::default()).unwrap();
//! let annotated = annotate_track(&track.records);
//! println!("{} fixes, {:.2} km", track.len(), annotated.total_km);
//! ```
//!
//! Render the map using settings from the environment:
//! ```rust,no_run
//! use gps_log_map::{export_track, parse_log_file, ExportOptions, MapConfig, ParseOptions};
//!
//! let config = MapConfig::from_env(None).unwrap();
//! let track = parse_log_file(&config.input_path, &ParseOptions::from_config(&config)).unwrap();
//! let report = export_track(&track, &config, &ExportOptions::from_config(&config)).unwrap();
//! println!("{} markers written", report.markers);
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_log_file`] - Parse a log file into a [`Track`]
//! - [`parse_log_str`] / [`parse_log_reader`] - Parse log data from memory or a reader
//! - [`parse_record_line`] - Validate a single line against a [`RecordSchema`]
//!
//! ## Distance
//! - [`great_circle_distance_km`] - Haversine distance between two coordinates
//! - [`DistanceAccumulator`] - Running track length over records in file order
//!
//! ## Rendering and Export
//! - [`annotate_track`] - Build popup labels for every record
//! - [`render_track`] - Drive any [`MapRenderer`]
//! - [`export_to_html`] / [`export_to_csv`] / [`export_track`] - Write output files

pub mod annotation;
pub mod config;
pub mod distance;
pub mod error;
pub mod export;
pub mod parser;
pub mod render;
pub mod types;

pub use annotation::*;
pub use config::*;
pub use distance::*;
pub use error::*;
pub use export::*;
pub use parser::*;
pub use render::*;
pub use types::*;
