//! Self-contained Leaflet HTML map

use crate::config::MapConfig;
use crate::error::{GpsMapError, Result};
use crate::render::MapRenderer;
use crate::types::Coordinate;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const LEAFLET_VERSION: &str = "1.9.4";
const DATA_PLACEHOLDER: &str = "__MAP_DATA__";
const VERSION_PLACEHOLDER: &str = "__LEAFLET_VERSION__";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>GPS log map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; width: 100%; margin: 0; padding: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const view = __MAP_DATA__;
const map = L.map("map", { center: view.center, zoom: view.zoom, maxZoom: view.maxZoom });
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: view.maxZoom,
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
for (const m of view.markers) {
  L.marker(m.location).bindPopup(m.popup).addTo(map);
}
for (const line of view.polylines) {
  L.polyline(line.locations, { color: line.color }).addTo(map);
}
</script>
</body>
</html>
"#;

struct Marker {
    coordinate: Coordinate,
    popup_html: String,
}

struct Polyline {
    coordinates: Vec<Coordinate>,
    color: String,
}

/// Interactive map written as a single HTML page using Leaflet
pub struct LeafletMap {
    center: Coordinate,
    zoom_start: u8,
    max_zoom: u8,
    markers: Vec<Marker>,
    polylines: Vec<Polyline>,
}

impl LeafletMap {
    pub fn new(center: Coordinate, zoom_start: u8, max_zoom: u8) -> Self {
        Self {
            center,
            zoom_start,
            max_zoom,
            markers: Vec::new(),
            polylines: Vec::new(),
        }
    }

    pub fn from_config(config: &MapConfig, center: Coordinate) -> Self {
        Self::new(center, config.zoom_start, config.max_zoom)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    /// Coordinates drawn across all polylines
    pub fn polyline_points(&self) -> usize {
        self.polylines.iter().map(|p| p.coordinates.len()).sum()
    }

    fn view_data(&self) -> Value {
        let markers: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "location": location(m.coordinate),
                    "popup": m.popup_html,
                })
            })
            .collect();

        let polylines: Vec<Value> = self
            .polylines
            .iter()
            .map(|p| {
                json!({
                    "locations": p.coordinates.iter().copied().map(location).collect::<Vec<_>>(),
                    "color": p.color,
                })
            })
            .collect();

        json!({
            "center": location(self.center),
            "zoom": self.zoom_start,
            "maxZoom": self.max_zoom,
            "markers": markers,
            "polylines": polylines,
        })
    }

    /// Render the full HTML page
    pub fn to_html(&self) -> Result<String> {
        // "</" would end the inline script early
        let data = serde_json::to_string(&self.view_data())?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE
            .replace(VERSION_PLACEHOLDER, LEAFLET_VERSION)
            .replace(DATA_PLACEHOLDER, &data))
    }
}

impl MapRenderer for LeafletMap {
    fn add_marker(&mut self, coordinate: Coordinate, label: &str) {
        self.markers.push(Marker {
            coordinate,
            popup_html: label_to_html(label),
        });
    }

    fn add_polyline(&mut self, coordinates: &[Coordinate], color: &str) {
        self.polylines.push(Polyline {
            coordinates: coordinates.to_vec(),
            color: color.to_string(),
        });
    }

    fn save(&self, path: &Path) -> Result<()> {
        let html = self
            .to_html()
            .map_err(|e| GpsMapError::Render(format!("Failed to build map page: {}", e)))?;
        fs::write(path, html).map_err(|e| {
            GpsMapError::Render(format!("Failed to write map to {}: {}", path.display(), e))
        })
    }
}

fn location(c: Coordinate) -> [f64; 2] {
    [c.latitude, c.longitude]
}

/// Escape a plain-text label and turn newlines into line breaks
pub fn label_to_html(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 16);
    for ch in label.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}
