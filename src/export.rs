//! Export functionality for parsed GPS tracks
//!
//! Writes the interactive HTML map and, on request, a CSV table of the
//! track with per-segment and running distances.

use crate::annotation::AnnotatedTrack;
use crate::config::MapConfig;
use crate::error::Result;
use crate::render::{render_track, LeafletMap, MapRenderer};
use crate::types::Track;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export options for controlling output files
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub html_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from(crate::config::DEFAULT_OUTPUT_PATH),
            csv_path: None,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            html_path: config.output_path.clone(),
            csv_path: None,
        }
    }
}

/// What an export run wrote
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub html_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub markers: usize,
    pub polyline_points: usize,
    pub total_km: f64,
}

/// Default CSV path next to the HTML map: `map.html` -> `map.csv`
pub fn default_csv_path(html_path: &Path) -> PathBuf {
    html_path.with_extension("csv")
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Render the track with Leaflet and write it to `output_path`
pub fn export_to_html(
    annotated: &AnnotatedTrack,
    track: &Track,
    config: &MapConfig,
    output_path: &Path,
) -> Result<ExportReport> {
    ensure_parent_dir(output_path)?;

    let mut map = LeafletMap::from_config(config, config.center(track));
    render_track(annotated, &mut map, config);
    map.save(output_path)?;

    info!(
        "Wrote map with {} markers to {}",
        map.marker_count(),
        output_path.display()
    );

    Ok(ExportReport {
        html_path: Some(output_path.to_path_buf()),
        csv_path: None,
        markers: map.marker_count(),
        polyline_points: map.polyline_points(),
        total_km: annotated.total_km,
    })
}

/// Write one CSV row per record with segment and running distance
pub fn export_to_csv(annotated: &AnnotatedTrack, track: &Track, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "line",
        "server_timestamp",
        "client_address",
        "device_id",
        "fix_timestamp",
        "satellite_count",
        "latitude",
        "longitude",
        "accuracy",
        "speed",
        "heading",
        "segment_km",
        "total_km",
    ])?;

    for (record, point) in track.records.iter().zip(&annotated.points) {
        let segment_km = point.annotation.incremental_km.unwrap_or(0.0);
        writer.write_record([
            record.line_number.to_string(),
            record.server_timestamp.clone(),
            record.client_address.clone(),
            record.device_id.to_string(),
            record.fix_timestamp.clone(),
            record.satellite_count.to_string(),
            format!("{:.7}", record.latitude),
            format!("{:.7}", record.longitude),
            record.accuracy.to_string(),
            record.speed.to_string(),
            record.heading.to_string(),
            format!("{:.6}", segment_km),
            format!("{:.6}", point.running_km),
        ])?;
    }
    writer.flush()?;

    info!(
        "Wrote {} track rows to {}",
        track.records.len(),
        output_path.display()
    );
    Ok(())
}

/// Write every output requested in `options`
pub fn export_track(
    track: &Track,
    config: &MapConfig,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let annotated = crate::annotation::annotate_track(&track.records);
    let mut report = export_to_html(&annotated, track, config, &options.html_path)?;

    if let Some(csv_path) = &options.csv_path {
        export_to_csv(&annotated, track, csv_path)?;
        report.csv_path = Some(csv_path.clone());
    }

    Ok(report)
}
