use crate::config::{MalformedPolicy, MapConfig, DEFAULT_MARKER};
use crate::error::{GpsMapError, Result};
use crate::parser::record::parse_record_line;
use crate::parser::schema::RecordSchema;
use crate::types::{MalformedLine, Track};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options controlling record extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Substring identifying GPS lines
    pub marker: String,
    pub policy: MalformedPolicy,
    pub schema: RecordSchema,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            policy: MalformedPolicy::Skip,
            schema: RecordSchema::gps_log(),
        }
    }
}

impl ParseOptions {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            policy: config.malformed_policy,
            schema: RecordSchema::gps_log(),
        }
    }
}

/// Parse a GPS log file into a track
///
/// A file that cannot be opened is reported as `MissingInputFile`.
pub fn parse_log_file(path: &Path, options: &ParseOptions) -> Result<Track> {
    let file = File::open(path).map_err(|source| GpsMapError::MissingInputFile {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Parsing GPS log {}", path.display());
    let track = parse_log_reader(file, options)?;
    info!(
        "Read {} GPS records from {} ({} malformed lines skipped)",
        track.stats.records,
        path.display(),
        track.stats.malformed_lines
    );
    Ok(track)
}

/// Parse GPS log data held in memory
pub fn parse_log_str(data: &str, options: &ParseOptions) -> Result<Track> {
    parse_log_reader(data.as_bytes(), options)
}

/// Parse GPS log data from any reader, one pass in file order
///
/// Only lines containing `options.marker` are considered. Malformed marker
/// lines are skipped and counted, or abort the parse, per `options.policy`.
pub fn parse_log_reader<R: Read>(reader: R, options: &ParseOptions) -> Result<Track> {
    let mut reader = BufReader::new(reader);
    let marker = options.marker.as_bytes();
    let mut track = Track::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        track.stats.total_lines += 1;
        let line_number = track.stats.total_lines;

        if !contains_marker(&buf, marker) {
            continue;
        }
        track.stats.marker_lines += 1;

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => parse_record_line(line, line_number, &options.schema),
            Err(_) => Err(GpsMapError::MalformedRecord {
                line: line_number,
                reason: "line is not valid UTF-8".to_string(),
            }),
        };

        match parsed {
            Ok(record) => {
                debug!(
                    "Line {}: device {} at ({:.6}, {:.6})",
                    line_number, record.device_id, record.latitude, record.longitude
                );
                track.records.push(record);
            }
            Err(GpsMapError::MalformedRecord { line, reason }) => match options.policy {
                MalformedPolicy::Abort => {
                    return Err(GpsMapError::MalformedRecord { line, reason });
                }
                MalformedPolicy::Skip => {
                    warn!("Skipping malformed GPS line {}: {}", line, reason);
                    track.stats.malformed_lines += 1;
                    track.malformed.push(MalformedLine {
                        line_number: line,
                        reason,
                    });
                }
            },
            Err(other) => return Err(other),
        }
    }

    track.stats.records = track.records.len() as u64;
    if track.is_empty() {
        warn!(
            "No GPS records found ({} lines, {} containing '{}')",
            track.stats.total_lines, track.stats.marker_lines, options.marker
        );
    }

    Ok(track)
}

fn contains_marker(line: &[u8], marker: &[u8]) -> bool {
    if marker.is_empty() {
        return true;
    }
    line.windows(marker.len()).any(|window| window == marker)
}
