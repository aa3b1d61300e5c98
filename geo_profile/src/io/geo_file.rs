//! Writer for the D-Series geometry file format.
//!
//! The file lists every boundary vertex as a point, every boundary segment as
//! a two-point curve, the boundaries as lists of curves and the layers as
//! pairs of boundaries. Boundary 0 is the deepest one.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDateTime;
use log::info;

use super::write_string;
use crate::error::{ProfileError, Result};
use crate::geometry::Point;
use crate::normalize::ProfileGeometry;
use crate::scale::to_file_space;

const SEPARATOR: &str =
    "==============================================================================";

/// Metadata written to the file header.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryHeader {
    pub company: String,
    /// Program and version the format corresponds to.
    pub created_by: String,
    pub title: String,
    pub filename: String,
    pub timestamp: NaiveDateTime,
}

impl GeometryHeader {
    /// Header stamped with the current local time.
    pub fn now(company: &str, created_by: &str, title: &str, filename: &str) -> Self {
        Self {
            company: company.to_string(),
            created_by: created_by.to_string(),
            title: title.to_string(),
            filename: filename.to_string(),
            timestamp: chrono::Local::now().naive_local(),
        }
    }
}

/// Renders `geometry` as geometry file text.
pub fn format_geometry(geometry: &ProfileGeometry, header: &GeometryHeader) -> Result<String> {
    if geometry.boundaries.is_empty() {
        return Err(ProfileError::EmptyGeometry);
    }
    let mut out = String::new();
    write_header(&mut out, header);

    let boundaries: Vec<Vec<Point>> = geometry
        .boundaries
        .iter()
        .map(|b| file_points(&b.points, geometry.line_length))
        .collect();

    let total_points: usize = boundaries.iter().map(Vec::len).sum();
    out.push_str("[POINTS]\n");
    let _ = writeln!(out, "\t{total_points} - Number of geometry points -");
    let mut number = 1;
    for points in &boundaries {
        for p in points {
            let _ = writeln!(out, "\t\t{number}\t{:.3}\t\t{:.3}\t\t0.000", p.x, p.y);
            number += 1;
        }
    }
    out.push_str("[END OF POINTS]\n");

    // curve numbers per boundary, and the text of all curves
    let mut curves_text = String::new();
    let mut boundary_curves: Vec<Vec<usize>> = Vec::with_capacity(boundaries.len());
    let mut curve = 1;
    let mut first_point = 1;
    for points in &boundaries {
        let mut curves = Vec::new();
        for offset in 0..points.len().saturating_sub(1) {
            let start = first_point + offset;
            let _ = writeln!(curves_text, "\t{curve} - Curve number");
            curves_text.push_str("\t\t2 - number of points on curve, next line(s) are pointnumbers\n");
            let _ = writeln!(curves_text, "\t\t\t{start}\t{}", start + 1);
            curves.push(curve);
            curve += 1;
        }
        first_point += points.len();
        boundary_curves.push(curves);
    }
    out.push_str("[CURVES]\n");
    let _ = writeln!(out, "\t{}\t- Number of curves -", curve - 1);
    out.push_str(&curves_text);
    out.push_str("[END OF CURVES]\n");

    out.push_str("[BOUNDARIES]\n");
    let _ = writeln!(out, "\t{}\t- Number of boundaries -", boundary_curves.len());
    for (number, curves) in boundary_curves.iter().enumerate() {
        let _ = writeln!(out, "\t{number} - Boundary number");
        let _ = write!(
            out,
            "\t\t{} - number of curves on boundary, next line(s) are curvenumbers\n\t\t\t",
            curves.len()
        );
        for c in curves {
            let _ = write!(out, "{c}\t");
        }
        out.push('\n');
    }
    out.push_str("[END OF BOUNDARIES]\n");

    let layers = geometry.layer_count();
    out.push_str("[LAYERS]\n");
    let _ = writeln!(out, "{layers} - Number of Layers -");
    for layer in 1..=layers {
        let _ = writeln!(out, "\t{layer} - Layer number, next line is material of layer");
        out.push_str("\t\tmaterial\n");
        out.push_str("\t\t0 - Piezometric level line at top of layer\n");
        out.push_str("\t\t0 - Piezometric level line at bottom of layer\n");
        let _ = writeln!(out, "\t\t{layer} - Boundarynumber at top of layer");
        let _ = writeln!(out, "\t\t{} - Boundarynumber at bottom of layer", layer - 1);
    }
    out.push_str("[END OF LAYERS]\n");
    out.push_str("END OF GEOMETRY FILE");
    Ok(out)
}

/// Boundary vertices in file space. Vertices that round onto the same
/// distance as their predecessor are dropped so no curve has zero length.
fn file_points(points: &[Point], line_length: f64) -> Vec<Point> {
    let mut pts: Vec<Point> = points
        .iter()
        .map(|p| to_file_space(*p, line_length))
        .collect();
    pts.dedup_by(|cur, prev| cur.x == prev.x);
    pts
}

fn write_header(out: &mut String, header: &GeometryHeader) {
    out.push_str("GEOMETRY FILE FOR THE M-SERIES\n");
    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(out, "COMPANY    : {}  ", header.company);
    let _ = writeln!(out, "DATE       : {}", header.timestamp.format("%m/%d/%Y"));
    let _ = writeln!(out, "TIME       : {}", header.timestamp.format("%I:%M:%S %p"));
    let _ = writeln!(out, "FILENAME   : {}", header.filename);
    let _ = writeln!(out, "CREATED BY : {}", header.created_by);
    out.push_str("==========================    BEGINNING OF DATA     ==========================\n");
    out.push_str("[TITLES]\n");
    let _ = writeln!(out, "{}", header.title);
    out.push('\n');
    out.push_str("[END OF TITLES]\n");
    out.push_str("[EXTRA TITLE]\n\n[END OF EXTRA TITLE]\n");
    out.push_str("[ACCURACY]\n\t0.0010\n[END OF ACCURACY]\n\n");
}

/// Writes the geometry file to `path`, replacing any previous file.
pub fn write_geometry_file<P: AsRef<Path>>(
    path: P,
    geometry: &ProfileGeometry,
    header: &GeometryHeader,
) -> Result<()> {
    let text = format_geometry(geometry, header)?;
    write_string(path.as_ref(), &text)?;
    info!("wrote geometry file {}", path.as_ref().display());
    Ok(())
}
