//! Transforms between real-world profile coordinates, the drawing surface and
//! the geometry file.
//!
//! Real-world coordinates are `(distance along line, elevation)`. Canvas
//! coordinates are pixels with the origin top-left and y growing downwards.
//! The vertical scale is chosen so that the deepest measurement fits the
//! canvas height, measured from the highest ground level.

use crate::error::{ProfileError, Result};
use crate::geometry::Point;
use crate::measurements::{Cpt, SoilLayer};
use crate::reference_line::ProjectedProfile;

/// Decimal places kept in the geometry file.
pub const FILE_DECIMALS: i32 = 3;

/// Linear transform between real-world and canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasScale {
    pub width: f64,
    pub height: f64,
    pub line_length: f64,
    /// Highest ground level over all profiles.
    pub top: f64,
    /// Canvas pixels per metre of depth.
    pub y_scale: f64,
}

impl CanvasScale {
    /// Creates a scale from explicit parameters.
    pub fn new(width: f64, height: f64, line_length: f64, top: f64, y_scale: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ProfileError::InvalidCanvas { width, height });
        }
        if !(line_length > 0.0) {
            return Err(ProfileError::DegenerateLine);
        }
        Ok(Self {
            width,
            height,
            line_length,
            top,
            y_scale,
        })
    }

    /// Derives the scale from the highest ground level and the largest
    /// terminal depth of `profiles`.
    pub fn from_profiles(
        profiles: &[ProjectedProfile],
        line_length: f64,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let top = profiles
            .iter()
            .map(|p| p.profile.ground_level())
            .reduce(f64::max)
            .ok_or(ProfileError::NoProfiles)?;
        let max_depth = profiles
            .iter()
            .map(|p| p.profile.final_depth())
            .reduce(f64::max)
            .ok_or(ProfileError::NoProfiles)?;
        if !(max_depth > 0.0) {
            return Err(ProfileError::InvalidDepth(max_depth));
        }
        Self::new(width, height, line_length, top, height / max_depth)
    }

    /// Real-world point to canvas pixels.
    pub fn to_canvas(&self, real: Point) -> Point {
        Point::new(
            real.x * self.width / self.line_length,
            (self.top - real.y) * self.y_scale,
        )
    }

    /// Canvas pixels to real-world point.
    pub fn to_real(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.line_length / self.width,
            self.top - canvas.y / self.y_scale,
        )
    }

    /// Canvas y of a depth below a given ground level.
    pub fn depth_to_canvas_y(&self, ground_level: f64, depth: f64) -> f64 {
        (self.top - ground_level + depth) * self.y_scale
    }

    /// Cone resistance and friction ratio traces of a CPT in canvas pixels.
    ///
    /// Both channels are drawn next to the CPT's position, multiplied by
    /// `x_scale` pixels per unit.
    pub fn cpt_traces(&self, cpt: &Cpt, fraction: f64, x_scale: f64) -> (Vec<Point>, Vec<Point>) {
        let x0 = fraction * self.width;
        cpt.samples
            .iter()
            .map(|s| {
                let y = self.depth_to_canvas_y(cpt.ground_level, s.depth);
                (
                    Point::new(s.cone_resistance * x_scale + x0, y),
                    Point::new(s.friction_ratio * x_scale + x0, y),
                )
            })
            .unzip()
    }

    /// Vertical bar of a borehole layer in canvas pixels, top then bottom.
    pub fn layer_bar(&self, layer: &SoilLayer, fraction: f64) -> (Point, Point) {
        let x = fraction * self.width;
        (
            Point::new(x, (self.top - layer.upper) * self.y_scale),
            Point::new(x, (self.top - layer.lower) * self.y_scale),
        )
    }

    /// Ground-level track given in normalized distance, in canvas pixels.
    pub fn normalized_track(&self, track: &[Point]) -> Vec<Point> {
        track
            .iter()
            .map(|p| Point::new(p.x * self.width, (self.top - p.y) * self.y_scale))
            .collect()
    }

    /// Inverse transform of a whole polyline.
    pub fn polyline_to_real(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.to_real(*p)).collect()
    }
}

/// Real-world point as written to the geometry file.
///
/// The distance is clamped into `[0, line_length]` and both coordinates are
/// rounded to the file accuracy.
pub fn to_file_space(real: Point, line_length: f64) -> Point {
    Point::new(
        round_to(real.x.clamp(0.0, line_length), FILE_DECIMALS),
        round_to(real.y, FILE_DECIMALS),
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // avoid writing "-0.000"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
