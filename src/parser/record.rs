//! Single-line GPS record extraction

use crate::error::{GpsMapError, Result};
use crate::parser::schema::*;
use crate::types::GpsRecord;

/// Parse one raw log line into a record
///
/// The line is split on tabs and validated against `schema`. Any failure is
/// returned as `GpsMapError::MalformedRecord` carrying `line_number`.
pub fn parse_record_line(line: &str, line_number: u64, schema: &RecordSchema) -> Result<GpsRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let columns: Vec<&str> = line.split('\t').collect();
    record_from_columns(&columns, line_number, schema)
}

/// Build a record from already split columns
pub fn record_from_columns(
    columns: &[&str],
    line_number: u64,
    schema: &RecordSchema,
) -> Result<GpsRecord> {
    build_record(columns, line_number, schema)
        .map_err(|reason| GpsMapError::MalformedRecord {
            line: line_number,
            reason,
        })
}

fn build_record(
    columns: &[&str],
    line_number: u64,
    schema: &RecordSchema,
) -> std::result::Result<GpsRecord, String> {
    let values = schema.parse_fields(columns)?;

    let satellites = values.unsigned(FIELD_SATELLITE_COUNT)?;
    let satellite_count = u32::try_from(satellites)
        .map_err(|_| format!("field '{FIELD_SATELLITE_COUNT}' = {satellites} is out of range"))?;

    Ok(GpsRecord {
        line_number,
        server_timestamp: values.text(FIELD_SERVER_TIMESTAMP)?,
        client_address: values.text(FIELD_CLIENT_ADDRESS)?,
        device_id: values.integer(FIELD_DEVICE_ID)?,
        fix_timestamp: values.text(FIELD_FIX_TIMESTAMP)?,
        satellite_count,
        latitude: values.float(FIELD_LATITUDE)?,
        longitude: values.float(FIELD_LONGITUDE)?,
        accuracy: values.float(FIELD_ACCURACY)?,
        speed: values.float(FIELD_SPEED)?,
        heading: values.float(FIELD_HEADING)?,
    })
}
