//! Named-field schema for GPS log lines
//!
//! A schema is an ordered list of [`FieldSpec`]s matched against the trailing
//! tab-separated columns of a line. Validation happens once per line and any
//! failure is reported as a single reason string naming the offending field.

use crate::error::{GpsMapError, Result};
use std::collections::{HashMap, HashSet};

pub const FIELD_SERVER_TIMESTAMP: &str = "server_timestamp";
pub const FIELD_CLIENT_ADDRESS: &str = "client_address";
pub const FIELD_DEVICE_ID: &str = "device_id";
pub const FIELD_FIX_TIMESTAMP: &str = "fix_timestamp";
pub const FIELD_SATELLITE_COUNT: &str = "satellite_count";
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_ACCURACY: &str = "accuracy";
pub const FIELD_SPEED: &str = "speed";
pub const FIELD_HEADING: &str = "heading";

/// Fields every schema must define to build a `GpsRecord`
pub const GPS_RECORD_FIELDS: [&str; 10] = [
    FIELD_SERVER_TIMESTAMP,
    FIELD_CLIENT_ADDRESS,
    FIELD_DEVICE_ID,
    FIELD_FIX_TIMESTAMP,
    FIELD_SATELLITE_COUNT,
    FIELD_LATITUDE,
    FIELD_LONGITUDE,
    FIELD_ACCURACY,
    FIELD_SPEED,
    FIELD_HEADING,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Unsigned,
    Float,
    Latitude,
    Longitude,
    /// Column is present but its content is not used
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    /// Optional field left empty
    Missing,
}

/// Typed values of one line, keyed by field name
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    values: HashMap<&'static str, FieldValue>,
}

impl FieldValues {
    pub fn text(&self, name: &str) -> std::result::Result<String, String> {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => Ok(s.clone()),
            Some(FieldValue::Missing) => Ok(String::new()),
            other => Err(type_mismatch(name, "text", other)),
        }
    }

    pub fn integer(&self, name: &str) -> std::result::Result<i64, String> {
        match self.values.get(name) {
            Some(FieldValue::Integer(v)) => Ok(*v),
            other => Err(type_mismatch(name, "integer", other)),
        }
    }

    pub fn unsigned(&self, name: &str) -> std::result::Result<u64, String> {
        match self.values.get(name) {
            Some(FieldValue::Unsigned(v)) => Ok(*v),
            other => Err(type_mismatch(name, "unsigned integer", other)),
        }
    }

    pub fn float(&self, name: &str) -> std::result::Result<f64, String> {
        match self.values.get(name) {
            Some(FieldValue::Float(v)) => Ok(*v),
            other => Err(type_mismatch(name, "number", other)),
        }
    }
}

fn type_mismatch(name: &str, expected: &str, found: Option<&FieldValue>) -> String {
    match found {
        None => format!("field '{name}' is not defined by the schema"),
        Some(FieldValue::Missing) => format!("field '{name}' is empty"),
        Some(_) => format!("field '{name}' is not a {expected} field"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::gps_log()
    }
}

impl RecordSchema {
    /// Build a custom schema, checked once up front
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(GpsMapError::Config("record schema has no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.kind != FieldKind::Ignored && !seen.insert(field.name) {
                return Err(GpsMapError::Config(format!(
                    "record schema defines '{}' more than once",
                    field.name
                )));
            }
        }

        for name in GPS_RECORD_FIELDS {
            let field = fields
                .iter()
                .find(|f| f.name == name && f.kind != FieldKind::Ignored)
                .ok_or_else(|| {
                    GpsMapError::Config(format!("record schema is missing field '{name}'"))
                })?;
            if !accepts_kind(name, field.kind) {
                return Err(GpsMapError::Config(format!(
                    "record schema declares '{}' as {:?}, which cannot build a GPS record",
                    name, field.kind
                )));
            }
        }

        Ok(Self { fields })
    }

    /// Column layout written by the location logger
    pub fn gps_log() -> Self {
        use FieldKind::*;
        Self {
            fields: vec![
                FieldSpec::required(FIELD_SERVER_TIMESTAMP, Text),
                FieldSpec::optional(FIELD_CLIENT_ADDRESS, Text),
                FieldSpec::required(FIELD_DEVICE_ID, Integer),
                FieldSpec::required(FIELD_FIX_TIMESTAMP, Text),
                FieldSpec::required(FIELD_SATELLITE_COUNT, Unsigned),
                FieldSpec::required(FIELD_LATITUDE, Latitude),
                FieldSpec::required(FIELD_LONGITUDE, Longitude),
                FieldSpec::required(FIELD_ACCURACY, Float),
                FieldSpec::required(FIELD_SPEED, Float),
                FieldSpec::required(FIELD_HEADING, Float),
            ],
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate the trailing columns of a line against the schema
    ///
    /// Leading columns beyond the schema width are ignored, so a tag column
    /// in front of the data does not shift the layout.
    pub fn parse_fields(&self, columns: &[&str]) -> std::result::Result<FieldValues, String> {
        let width = self.fields.len();
        if columns.len() < width {
            return Err(format!(
                "expected at least {} tab-separated fields, found {}",
                width,
                columns.len()
            ));
        }

        let tail = &columns[columns.len() - width..];
        let mut values = HashMap::with_capacity(width);
        for (spec, raw) in self.fields.iter().zip(tail) {
            if spec.kind == FieldKind::Ignored {
                continue;
            }
            values.insert(spec.name, parse_field(spec, raw)?);
        }

        Ok(FieldValues { values })
    }
}

/// Kinds `build_record` can read for each record field
fn accepts_kind(name: &str, kind: FieldKind) -> bool {
    use FieldKind::*;
    match name {
        FIELD_DEVICE_ID => kind == Integer,
        FIELD_SATELLITE_COUNT => kind == Unsigned,
        FIELD_LATITUDE => matches!(kind, Latitude | Float),
        FIELD_LONGITUDE => matches!(kind, Longitude | Float),
        FIELD_ACCURACY | FIELD_SPEED | FIELD_HEADING => kind == Float,
        _ => kind == Text,
    }
}

fn parse_field(spec: &FieldSpec, raw: &str) -> std::result::Result<FieldValue, String> {
    let value = raw.trim();
    if value.is_empty() {
        return if spec.required {
            Err(format!("required field '{}' is empty", spec.name))
        } else {
            Ok(FieldValue::Missing)
        };
    }

    let invalid = |expected: &str| format!("field '{}' = '{}' is not {}", spec.name, value, expected);

    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(value.to_string())),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| invalid("an integer")),
        FieldKind::Unsigned => value
            .parse::<u64>()
            .map(FieldValue::Unsigned)
            .map_err(|_| invalid("an unsigned integer")),
        FieldKind::Float => parse_finite(value)
            .map(FieldValue::Float)
            .ok_or_else(|| invalid("a finite number")),
        FieldKind::Latitude => parse_finite(value)
            .filter(|v| (-90.0..=90.0).contains(v))
            .map(FieldValue::Float)
            .ok_or_else(|| invalid("a latitude in [-90, 90]")),
        FieldKind::Longitude => parse_finite(value)
            .filter(|v| (-180.0..=180.0).contains(v))
            .map(FieldValue::Float)
            .ok_or_else(|| invalid("a longitude in [-180, 180]")),
        FieldKind::Ignored => Ok(FieldValue::Missing),
    }
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
