//! Popup labels for map markers
//!
//! Each record gets an [`Annotation`] with its telemetry, the distance from
//! the previous fix and, on the final fix, the total track length.

use crate::distance::DistanceAccumulator;
use crate::types::{Coordinate, GpsRecord};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Annotation {
    pub device_id: i64,
    pub speed: f64,
    pub heading: f64,
    pub fix_timestamp: String,
    pub accuracy: f64,
    pub satellite_count: u32,
    /// Distance from the previous fix, absent on the first one
    pub incremental_km: Option<f64>,
    /// Track length so far, only set on the final fix
    pub total_km: Option<f64>,
}

impl Annotation {
    pub fn for_record(record: &GpsRecord, incremental_km: Option<f64>) -> Self {
        Self {
            device_id: record.device_id,
            speed: record.speed,
            heading: record.heading,
            fix_timestamp: record.fix_timestamp.clone(),
            accuracy: record.accuracy,
            satellite_count: record.satellite_count,
            incremental_km,
            total_km: None,
        }
    }

    pub fn with_total(mut self, total_km: f64) -> Self {
        self.total_km = Some(total_km);
        self
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device: {}", self.device_id)?;
        writeln!(f, "Speed: {}", self.speed)?;
        writeln!(f, "Heading: {}", self.heading)?;
        writeln!(f, "Time: {}", self.fix_timestamp)?;
        writeln!(f, "Accuracy: {}", self.accuracy)?;
        write!(f, "Satellites: {}", self.satellite_count)?;
        if let Some(km) = self.incremental_km {
            write!(f, "\nDistance from previous: {:.3} km", km)?;
        }
        if let Some(km) = self.total_km {
            write!(f, "\nTotal distance: {:.3} km", km)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatedPoint {
    pub coordinate: Coordinate,
    pub annotation: Annotation,
    /// Accumulated track length up to and including this fix
    pub running_km: f64,
}

/// Records paired with their labels, in file order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatedTrack {
    pub points: Vec<AnnotatedPoint>,
    pub total_km: f64,
}

impl AnnotatedTrack {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points.iter().map(|p| p.coordinate).collect()
    }
}

/// Run one distance pass over `records` and label every fix
pub fn annotate_track(records: &[GpsRecord]) -> AnnotatedTrack {
    let mut accumulator = DistanceAccumulator::new();
    let mut points = Vec::with_capacity(records.len());

    for record in records {
        let increment = accumulator.update(record);
        points.push(AnnotatedPoint {
            coordinate: record.coordinate(),
            annotation: Annotation::for_record(record, increment),
            running_km: accumulator.total_km(),
        });
    }

    let total_km = accumulator.total_km();
    if let (Some(last_record), Some(last_point)) = (accumulator.last_record(), points.last_mut()) {
        debug_assert_eq!(last_point.coordinate, last_record.coordinate());
        last_point.annotation = Annotation::for_record(last_record, last_point.annotation.incremental_km)
            .with_total(total_km);
    }

    AnnotatedTrack { points, total_km }
}
