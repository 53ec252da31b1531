use crate::types::{Coordinate, GpsRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Line counters collected while extracting records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseStats {
    pub total_lines: u64,
    pub marker_lines: u64,
    pub malformed_lines: u64,
    pub records: u64,
}

/// A marker line that was skipped, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MalformedLine {
    pub line_number: u64,
    pub reason: String,
}

/// Ordered GPS records from one log file
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    pub records: Vec<GpsRecord>,
    pub stats: ParseStats,
    pub malformed: Vec<MalformedLine>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the log held no usable GPS records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.records.iter().map(GpsRecord::coordinate).collect()
    }

    pub fn first_coordinate(&self) -> Option<Coordinate> {
        self.records.first().map(GpsRecord::coordinate)
    }
}
