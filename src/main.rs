//! CLI binary for GPS Log Map
//!
//! Reads the location log named by the environment (or `--input`), renders
//! the track to an HTML map and prints a short summary.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use gps_log_map::{
    default_csv_path, export_track, parse_log_file, ExportOptions, MalformedPolicy, MapConfig,
    ParseOptions,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

fn build_command() -> Command {
    Command::new("gps-log-map")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render GPS fixes from a tab-delimited location log as an interactive HTML map. Map view settings come from the environment or a .env file.")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Location log to read (default: $GpsLogPath or logs/location_log.txt)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("HTML map to write (default: $GpsMapPath or log_gps_map.html)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Also export the parsed track with distances to CSV (default: next to the map)")
                .value_name("FILE")
                .num_args(0..=1),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Abort on the first malformed GPS line instead of skipping it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .help("Load settings from this file instead of ./.env")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and per-record parsing details")
                .action(ArgAction::SetTrue),
        )
}

/// `--csv` alone writes next to the map, `--csv FILE` writes to FILE
fn csv_path(matches: &ArgMatches, html_path: &Path) -> Option<PathBuf> {
    matches.value_source("csv")?;
    Some(match matches.get_one::<String>("csv") {
        Some(path) => PathBuf::from(path),
        None => default_csv_path(html_path),
    })
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    init_logging(matches.get_flag("debug"));
    debug!("gps-log-map {} ({})", env!("CARGO_PKG_VERSION"), GIT_SHA);

    let env_file = matches.get_one::<String>("env-file").map(PathBuf::from);
    let mut config =
        MapConfig::from_env(env_file.as_deref()).context("Failed to load configuration")?;

    if let Some(input) = matches.get_one::<String>("input") {
        config.input_path = PathBuf::from(input);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_path = PathBuf::from(output);
    }
    if matches.get_flag("strict") {
        config.malformed_policy = MalformedPolicy::Abort;
    }

    let mut export_options = ExportOptions::from_config(&config);
    export_options.csv_path = csv_path(&matches, &config.output_path);

    println!("Processing: {}", config.input_path.display());

    let track = parse_log_file(&config.input_path, &ParseOptions::from_config(&config))
        .with_context(|| format!("Failed to parse {}", config.input_path.display()))?;

    if track.is_empty() {
        eprintln!(
            "Warning: No GPS records found in {} ({} lines read); writing an empty map",
            config.input_path.display(),
            track.stats.total_lines
        );
    }

    let report = export_track(&track, &config, &export_options)
        .with_context(|| format!("Failed to export map to {}", config.output_path.display()))?;

    println!(
        "GPS records: {} ({} marker lines, {} malformed skipped)",
        track.stats.records, track.stats.marker_lines, track.stats.malformed_lines
    );
    println!("Total distance: {:.3} km", report.total_km);
    if let Some(path) = &report.html_path {
        println!("Map: {}", path.display());
    }
    if let Some(path) = &report.csv_path {
        println!("CSV: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_for(args: &[&str]) -> Option<PathBuf> {
        let matches = build_command()
            .try_get_matches_from(std::iter::once("gps-log-map").chain(args.iter().copied()))
            .unwrap();
        csv_path(&matches, Path::new("out/map.html"))
    }

    #[test]
    fn test_csv_option_forms() {
        assert_eq!(csv_for(&[]), None);
        assert_eq!(csv_for(&["--csv"]), Some(PathBuf::from("out/map.csv")));
        assert_eq!(csv_for(&["--csv", "track.csv"]), Some(PathBuf::from("track.csv")));
        assert_eq!(csv_for(&["--csv=track.csv", "--strict"]), Some(PathBuf::from("track.csv")));
        assert_eq!(csv_for(&["--csv", "--strict"]), Some(PathBuf::from("out/map.csv")));
    }

    #[test]
    fn test_command_definition() {
        build_command().debug_assert();
    }
}
