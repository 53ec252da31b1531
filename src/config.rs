//! Run configuration loaded from the environment
//!
//! The map view settings keep the key names used by existing `.env` files
//! (`FoliumStartpointLat`, `FoliumStartpointLon`, `FoliumMaxZoom`,
//! `FoliumStartZoom`). Everything is read once into [`MapConfig`], which is
//! then handed to the parser and renderer explicitly.

use crate::error::{GpsMapError, Result};
use crate::types::{Coordinate, Track};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_START_LAT: &str = "FoliumStartpointLat";
pub const ENV_START_LON: &str = "FoliumStartpointLon";
pub const ENV_MAX_ZOOM: &str = "FoliumMaxZoom";
pub const ENV_START_ZOOM: &str = "FoliumStartZoom";
pub const ENV_INPUT_PATH: &str = "GpsLogPath";
pub const ENV_OUTPUT_PATH: &str = "GpsMapPath";
pub const ENV_MARKER: &str = "GpsMarker";
pub const ENV_MALFORMED_POLICY: &str = "GpsMalformedPolicy";
pub const ENV_LINE_COLOR: &str = "GpsLineColor";

pub const DEFAULT_INPUT_PATH: &str = "logs/location_log.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "log_gps_map.html";
pub const DEFAULT_MARKER: &str = "GPS";
pub const DEFAULT_LINE_COLOR: &str = "blue";
pub const DEFAULT_MAX_ZOOM: u8 = 18;
pub const DEFAULT_ZOOM_START: u8 = 10;
const ZOOM_LIMIT: u8 = 24;

/// What to do with a marker line that fails schema validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Drop the line, count it and log a warning
    #[default]
    Skip,
    /// Fail the whole run on the first malformed line
    Abort,
}

impl FromStr for MalformedPolicy {
    type Err = GpsMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "abort" | "strict" => Ok(MalformedPolicy::Abort),
            other => Err(GpsMapError::Config(format!(
                "{ENV_MALFORMED_POLICY} must be 'skip' or 'abort', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub max_zoom: u8,
    pub zoom_start: u8,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub marker: String,
    pub malformed_policy: MalformedPolicy,
    pub line_color: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            start_latitude: None,
            start_longitude: None,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_start: DEFAULT_ZOOM_START,
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            marker: DEFAULT_MARKER.to_string(),
            malformed_policy: MalformedPolicy::Skip,
            line_color: DEFAULT_LINE_COLOR.to_string(),
        }
    }
}

impl MapConfig {
    /// Load `.env` (or `env_file` when given) and read the process environment
    ///
    /// A missing default `.env` is not an error; a missing explicit file is.
    /// Variables already set in the environment win over file entries.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    GpsMapError::Config(format!(
                        "Failed to load env file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    tracing::debug!("Loaded environment from {}", path.display());
                }
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, applying defaults and validation
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = MapConfig::default();

        config.start_latitude = get(ENV_START_LAT)
            .map(|v| parse_value::<f64>(ENV_START_LAT, &v))
            .transpose()?;
        config.start_longitude = get(ENV_START_LON)
            .map(|v| parse_value::<f64>(ENV_START_LON, &v))
            .transpose()?;
        if let Some(v) = get(ENV_MAX_ZOOM) {
            config.max_zoom = parse_value(ENV_MAX_ZOOM, &v)?;
        }
        if let Some(v) = get(ENV_START_ZOOM) {
            config.zoom_start = parse_value(ENV_START_ZOOM, &v)?;
        }
        if let Some(v) = get(ENV_INPUT_PATH) {
            config.input_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_OUTPUT_PATH) {
            config.output_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_MARKER) {
            config.marker = v;
        }
        if let Some(v) = get(ENV_MALFORMED_POLICY) {
            config.malformed_policy = v.parse()?;
        }
        if let Some(v) = get(ENV_LINE_COLOR) {
            config.line_color = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match (self.start_latitude, self.start_longitude) {
            (Some(lat), Some(lon)) => {
                if !Coordinate::new(lat, lon).is_valid() {
                    return Err(GpsMapError::Config(format!(
                        "start point ({lat}, {lon}) is outside valid latitude/longitude ranges"
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(GpsMapError::Config(format!(
                    "{ENV_START_LAT} and {ENV_START_LON} must be set together"
                )));
            }
        }

        if self.max_zoom > ZOOM_LIMIT {
            return Err(GpsMapError::Config(format!(
                "{ENV_MAX_ZOOM} must be at most {ZOOM_LIMIT}, got {}",
                self.max_zoom
            )));
        }
        if self.zoom_start > self.max_zoom {
            return Err(GpsMapError::Config(format!(
                "{ENV_START_ZOOM} ({}) exceeds {ENV_MAX_ZOOM} ({})",
                self.zoom_start, self.max_zoom
            )));
        }
        if self.marker.is_empty() {
            return Err(GpsMapError::Config("GPS marker token is empty".to_string()));
        }

        Ok(())
    }

    /// Initial map center: the configured start point, else the first fix
    pub fn center(&self, track: &Track) -> Coordinate {
        match (self.start_latitude, self.start_longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
            _ => track
                .first_coordinate()
                .unwrap_or_else(|| Coordinate::new(0.0, 0.0)),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        GpsMapError::Config(format!("{key} has invalid value '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GpsRecord;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = MapConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.max_zoom, 18);
        assert_eq!(config.zoom_start, 10);
        assert_eq!(config.marker, "GPS");
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = MapConfig::from_lookup(lookup(&[
            (ENV_START_LAT, "52.52"),
            (ENV_START_LON, " 13.40 "),
            (ENV_MAX_ZOOM, "19"),
            (ENV_START_ZOOM, "12"),
            (ENV_INPUT_PATH, "data/gps.log"),
            (ENV_OUTPUT_PATH, "out/map.html"),
            (ENV_MARKER, "FIX"),
            (ENV_MALFORMED_POLICY, "abort"),
            (ENV_LINE_COLOR, "red"),
        ]))
        .unwrap();

        assert_eq!(config.start_latitude, Some(52.52));
        assert_eq!(config.start_longitude, Some(13.40));
        assert_eq!(config.max_zoom, 19);
        assert_eq!(config.zoom_start, 12);
        assert_eq!(config.input_path, PathBuf::from("data/gps.log"));
        assert_eq!(config.output_path, PathBuf::from("out/map.html"));
        assert_eq!(config.marker, "FIX");
        assert_eq!(config.malformed_policy, MalformedPolicy::Abort);
        assert_eq!(config.line_color, "red");
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = MapConfig::from_lookup(lookup(&[(ENV_MAX_ZOOM, "high")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_ZOOM));

        let err = MapConfig::from_lookup(lookup(&[(ENV_START_ZOOM, "19")])).unwrap_err();
        assert!(matches!(err, GpsMapError::Config(_)));

        let err = MapConfig::from_lookup(lookup(&[(ENV_START_LAT, "52.0")])).unwrap_err();
        assert!(err.to_string().contains("set together"));

        let err = MapConfig::from_lookup(lookup(&[(ENV_START_LAT, "95.0"), (ENV_START_LON, "0")]))
            .unwrap_err();
        assert!(matches!(err, GpsMapError::Config(_)));

        assert!(MapConfig::from_lookup(lookup(&[(ENV_MALFORMED_POLICY, "maybe")])).is_err());
    }

    #[test]
    fn test_from_env_loads_explicit_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let env_path = temp_dir.path().join("map.env");
        std::fs::write(
            &env_path,
            format!("{ENV_LINE_COLOR}=green\n{ENV_MAX_ZOOM}=16\n{ENV_START_ZOOM}=12\n"),
        )
        .unwrap();

        let config = MapConfig::from_env(Some(&env_path)).unwrap();
        assert_eq!(config.line_color, "green");
        assert_eq!(config.max_zoom, 16);
        assert_eq!(config.zoom_start, 12);
    }

    #[test]
    fn test_from_env_missing_explicit_file_is_config_error() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("absent.env");

        match MapConfig::from_env(Some(&missing)) {
            Err(GpsMapError::Config(msg)) => {
                assert!(msg.contains("Failed to load env file"), "{msg}");
                assert!(msg.contains("absent.env"), "{msg}");
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_center_falls_back_to_first_record() {
        let config = MapConfig::default();
        let mut track = Track::new();
        assert_eq!(config.center(&track), Coordinate::new(0.0, 0.0));

        track.records.push(GpsRecord {
            line_number: 1,
            server_timestamp: "2023-10-01 12:00:00".to_string(),
            client_address: "10.0.0.2".to_string(),
            device_id: 7,
            fix_timestamp: "2023-10-01 11:59:58".to_string(),
            satellite_count: 9,
            latitude: 48.1,
            longitude: 11.5,
            accuracy: 4.0,
            speed: 0.0,
            heading: 0.0,
        });
        assert_eq!(config.center(&track), Coordinate::new(48.1, 11.5));

        let pinned = MapConfig {
            start_latitude: Some(1.0),
            start_longitude: Some(2.0),
            ..MapConfig::default()
        };
        assert_eq!(pinned.center(&track), Coordinate::new(1.0, 2.0));
    }
}
