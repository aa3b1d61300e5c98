//! Ground-level track along the reference line.

use crate::error::{ProfileError, Result};
use crate::geometry::{interp, Point};
use crate::reference_line::ProjectedProfile;

/// Piecewise linear ground surface spanning the whole reference line.
///
/// Points are `(distance, elevation)`, non-decreasing in distance, starting
/// at distance 0 and ending at the line length.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundLevelTrack {
    absolute: Vec<Point>,
    normalized: Vec<Point>,
}

impl GroundLevelTrack {
    /// Builds the track from projected profiles.
    ///
    /// Profiles are sorted by station with a stable sort, so profiles at the
    /// same station keep their input order. The ends are extended flat to
    /// distance 0 and `line_length`.
    pub fn build(profiles: &[ProjectedProfile], line_length: f64) -> Result<Self> {
        let mut absolute: Vec<Point> = profiles
            .iter()
            .map(|p| Point::new(p.station(), p.profile.ground_level()))
            .collect();
        absolute.sort_by(|a, b| a.x.total_cmp(&b.x));
        let (first, last) = match (absolute.first(), absolute.last()) {
            (Some(f), Some(l)) => (f.y, l.y),
            _ => return Err(ProfileError::NoProfiles),
        };
        absolute.insert(0, Point::new(0.0, first));
        absolute.push(Point::new(line_length, last));

        let normalized = absolute
            .iter()
            .map(|p| Point::new(p.x / line_length, p.y))
            .collect();
        Ok(Self {
            absolute,
            normalized,
        })
    }

    /// Track in absolute distance along the line.
    pub fn absolute(&self) -> &[Point] {
        &self.absolute
    }

    /// Same track with distances divided by the line length.
    pub fn normalized(&self) -> &[Point] {
        &self.normalized
    }

    /// Ground elevation at `distance`, interpolated along the track.
    pub fn elevation_at(&self, distance: f64) -> Option<f64> {
        interp(distance, &self.absolute)
    }
}
