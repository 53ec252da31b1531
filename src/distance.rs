//! Great-circle distance and running track length
//!
//! Distances use the haversine formula on a sphere of the mean Earth radius
//! (6371.0088 km), which is accurate to about 0.5% for WGS84 positions.

use crate::types::{Coordinate, GpsRecord};
use geo::{Distance, Haversine, Point};

/// Great-circle distance in kilometers between two positions
pub fn great_circle_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let origin = Point::new(a.longitude, a.latitude);
    let destination = Point::new(b.longitude, b.latitude);
    Haversine::distance(origin, destination) / 1000.0
}

/// Sum of consecutive great-circle distances over `records`
pub fn track_distance_km(records: &[GpsRecord]) -> f64 {
    records
        .windows(2)
        .map(|pair| great_circle_distance_km(pair[0].coordinate(), pair[1].coordinate()))
        .sum()
}

/// Running distance state carried across records in file order
///
/// The accumulator owns the last record it saw, so the final total can be
/// attached to that record without relying on loop-local variables.
#[derive(Debug, Clone, Default)]
pub struct DistanceAccumulator {
    previous: Option<Coordinate>,
    total_km: f64,
    last_record: Option<GpsRecord>,
}

impl DistanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next record, returning the distance from the previous one
    ///
    /// The first record only seeds the state and yields `None`.
    pub fn update(&mut self, record: &GpsRecord) -> Option<f64> {
        let current = record.coordinate();
        let increment = self.previous.map(|previous| {
            let km = great_circle_distance_km(previous, current);
            self.total_km += km;
            km
        });

        self.previous = Some(current);
        self.last_record = Some(record.clone());
        increment
    }

    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    pub fn previous(&self) -> Option<Coordinate> {
        self.previous
    }

    pub fn last_record(&self) -> Option<&GpsRecord> {
        self.last_record.as_ref()
    }
}
