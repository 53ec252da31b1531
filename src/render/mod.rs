//! Map rendering seam
//!
//! The pipeline only needs three operations from a map backend: place a
//! labelled marker, draw a polyline, write the result. [`LeafletMap`] is the
//! bundled backend; tests substitute their own.

pub mod leaflet;

pub use leaflet::*;

use crate::annotation::AnnotatedTrack;
use crate::config::MapConfig;
use crate::error::Result;
use crate::types::Coordinate;
use std::path::Path;

pub trait MapRenderer {
    fn add_marker(&mut self, coordinate: Coordinate, label: &str);

    fn add_polyline(&mut self, coordinates: &[Coordinate], color: &str);

    fn save(&self, path: &Path) -> Result<()>;
}

/// Add one marker per point, then a single polyline through all points
///
/// Both follow file order. An empty track adds nothing.
pub fn render_track<R: MapRenderer + ?Sized>(
    track: &AnnotatedTrack,
    renderer: &mut R,
    config: &MapConfig,
) {
    if track.is_empty() {
        return;
    }

    for point in &track.points {
        renderer.add_marker(point.coordinate, &point.annotation.to_string());
    }
    renderer.add_polyline(&track.coordinates(), &config.line_color);
}
