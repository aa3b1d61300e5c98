//! File input and output helpers for session data.

pub mod geo_file;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use geojson::GeoJson;

use crate::digitizer::ClickEvent;
use crate::error::{ProfileError, Result};
use crate::geometry::Point;
use crate::reference_line::ReferenceLine;

/// Reads a file to string.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing any existing content.
pub fn write_string<P: AsRef<Path>>(path: P, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

/// Reads all lines of a text file.
pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

/// Parses a reference line from GeoJSON text.
///
/// Accepts a bare `LineString` geometry, a feature holding one, or a feature
/// collection, in which case the first `LineString` feature is used.
pub fn parse_reference_line_geojson(text: &str) -> Result<ReferenceLine> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| ProfileError::GeoJson(e.to_string()))?;
    let value = match geojson {
        GeoJson::Geometry(g) => Some(g.value),
        GeoJson::Feature(f) => f.geometry.map(|g| g.value),
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .filter_map(|f| f.geometry)
            .map(|g| g.value)
            .find(|v| matches!(v, geojson::Value::LineString(_))),
    }
    .ok_or_else(|| ProfileError::GeoJson("no LineString geometry found".to_string()))?;
    let line: geo_types::LineString<f64> = value
        .try_into()
        .map_err(|e: geojson::Error| ProfileError::GeoJson(e.to_string()))?;
    ReferenceLine::new(line.coords().map(|c| Point::new(c.x, c.y)).collect())
}

/// Reads a reference line from a GeoJSON file.
pub fn read_reference_line_geojson<P: AsRef<Path>>(path: P) -> Result<ReferenceLine> {
    let text = read_to_string(path)?;
    parse_reference_line_geojson(&text)
}

/// Reads a recorded click-event stream stored as a JSON array.
pub fn read_click_events<P: AsRef<Path>>(path: P) -> Result<Vec<ClickEvent>> {
    let text = read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
