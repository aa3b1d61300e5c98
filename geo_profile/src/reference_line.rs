//! Reference line and projection of measurements onto it.

use log::debug;

use crate::error::{ProfileError, Result};
use crate::geometry::{distance, Point, Polyline};
use crate::measurements::LocatedProfile;

/// Polyline in geographic coordinates along which the profile is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    polyline: Polyline,
    length: f64,
}

/// Result of projecting a geographic position onto a [`ReferenceLine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Position along the line normalized to `[0, 1]`.
    pub fraction: f64,
    /// Absolute distance along the line, `fraction * length`.
    pub station: f64,
    /// Perpendicular distance from the position to the line.
    pub offset: f64,
}

impl ReferenceLine {
    /// Creates a reference line from its vertices.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        let polyline = Polyline::new(vertices);
        let length = polyline.length();
        if polyline.vertices.len() < 2 || length < f64::EPSILON {
            return Err(ProfileError::DegenerateLine);
        }
        Ok(Self { polyline, length })
    }

    /// Total length of the line.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Vertices of the line.
    pub fn vertices(&self) -> &[Point] {
        &self.polyline.vertices
    }

    /// Projects `p` onto the nearest point of the line.
    ///
    /// Every segment is tested and the globally nearest candidate wins; on
    /// equal distance the earlier segment is kept. Positions far away from the
    /// line still project, check [`Projection::offset`] to detect them.
    pub fn project(&self, p: Point) -> Projection {
        let mut walked = 0.0;
        let mut best_station = 0.0;
        let mut best_offset = f64::INFINITY;
        for seg in self.polyline.segments() {
            let t = seg.project_parameter(p);
            let offset = distance(p, seg.point_at(t));
            let seg_len = seg.length();
            if offset < best_offset {
                best_offset = offset;
                best_station = walked + t * seg_len;
            }
            walked += seg_len;
        }
        let fraction = (best_station / self.length).clamp(0.0, 1.0);
        Projection {
            fraction,
            station: fraction * self.length,
            offset: best_offset,
        }
    }
}

/// A measurement together with its position along the reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedProfile {
    pub profile: LocatedProfile,
    pub projection: Projection,
}

impl ProjectedProfile {
    /// Normalized position along the line.
    pub fn fraction(&self) -> f64 {
        self.projection.fraction
    }

    /// Absolute distance along the line.
    pub fn station(&self) -> f64 {
        self.projection.station
    }
}

/// Projects every profile onto `line`, keeping the input order.
pub fn project_profiles<I>(line: &ReferenceLine, profiles: I) -> Vec<ProjectedProfile>
where
    I: IntoIterator<Item = LocatedProfile>,
{
    profiles
        .into_iter()
        .map(|profile| {
            let projection = line.project(profile.position());
            debug!(
                "projected {} at station {:.3} (offset {:.3})",
                profile.id(),
                projection.station,
                projection.offset
            );
            ProjectedProfile {
                profile,
                projection,
            }
        })
        .collect()
}
