//! Turns digitized boundaries into a consistent profile geometry.
//!
//! Every boundary is stretched to span the whole profile, the ground-level
//! boundary is replaced by the measured ground-level track, and boundaries
//! are ordered from the deepest to the ground surface.

use log::{info, warn};

use crate::digitizer::BoundarySet;
use crate::geometry::{interp, mean_y, union_x, Point};
use crate::ground_level::GroundLevelTrack;
use crate::scale::CanvasScale;

/// Boundary index replaced by the ground-level track unless configured
/// otherwise.
pub const GROUND_LEVEL_INDEX: u32 = 1;

/// A boundary spanning the full profile in real-world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBoundary {
    /// Drawing index the boundary came from.
    pub index: u32,
    pub points: Vec<Point>,
}

/// Region between two adjacent boundaries, sampled on shared x values.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerFill {
    /// Bottom-up layer number as used in the geometry file.
    pub number: u32,
    /// Top-down layer number, the order in which layers were drawn. Material
    /// tables are keyed by this number.
    pub drawn: u32,
    pub xs: Vec<f64>,
    pub top: Vec<f64>,
    pub bottom: Vec<f64>,
}

impl LayerFill {
    /// Closed outline of the layer: along the top left to right, then back
    /// along the bottom.
    pub fn outline(&self) -> Vec<Point> {
        let top = self.xs.iter().zip(&self.top).map(|(x, y)| Point::new(*x, *y));
        let bottom = self
            .xs
            .iter()
            .zip(&self.bottom)
            .rev()
            .map(|(x, y)| Point::new(*x, *y));
        top.chain(bottom).collect()
    }
}

/// Normalized boundaries, ordered bottom to top. The last one is the ground
/// surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGeometry {
    pub line_length: f64,
    pub boundaries: Vec<ProfileBoundary>,
}

impl ProfileGeometry {
    pub fn layer_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// Layers between adjacent boundaries, bottom layer first.
    pub fn layers(&self) -> Vec<LayerFill> {
        let n = self.boundaries.len();
        (1..n)
            .map(|k| {
                let top = &self.boundaries[k].points;
                let bottom = &self.boundaries[k - 1].points;
                let xs = union_x(top, bottom);
                let sample =
                    |pts: &[Point]| xs.iter().filter_map(|x| interp(*x, pts)).collect::<Vec<_>>();
                let (top, bottom) = (sample(top), sample(bottom));
                LayerFill {
                    number: k as u32,
                    drawn: (n - k) as u32,
                    xs,
                    top,
                    bottom,
                }
            })
            .collect()
    }

    /// The ground surface boundary.
    pub fn ground_surface(&self) -> Option<&ProfileBoundary> {
        self.boundaries.last()
    }
}

/// Applies the inverse canvas transform to every boundary.
pub fn to_real_world(boundaries: BoundarySet, scale: &CanvasScale) -> BoundarySet {
    boundaries
        .into_iter()
        .map(|(index, mut boundary)| {
            boundary.points = scale.polyline_to_real(&boundary.points);
            (index, boundary)
        })
        .collect()
}

/// Stretches `points` so they run from `left` to `right`.
///
/// Distances are clamped into the span and sorted, the first elevation is
/// repeated at `left` and the last one at `right`. Points sharing a distance
/// with their predecessor are dropped so the result strictly increases in x.
pub fn clamp_to_span(points: &[Point], left: f64, right: f64) -> Vec<Point> {
    let mut pts: Vec<Point> = points
        .iter()
        .map(|p| Point::new(p.x.clamp(left, right), p.y))
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x));
    let (first, last) = match (pts.first(), pts.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return pts,
    };
    pts.insert(0, Point::new(left, first.y));
    pts.push(Point::new(right, last.y));
    pts.dedup_by(|cur, prev| cur.x == prev.x);
    if let Some(end) = pts.last_mut() {
        // the right anchor always carries the last drawn elevation
        end.y = last.y;
    }
    pts
}

/// Normalizes real-world boundaries into a [`ProfileGeometry`].
pub fn normalize(
    boundaries: BoundarySet,
    ground: &GroundLevelTrack,
    line_length: f64,
    ground_index: u32,
) -> ProfileGeometry {
    let mut spanned: Vec<ProfileBoundary> = Vec::new();
    for (index, boundary) in boundaries {
        if index == ground_index {
            continue;
        }
        if boundary.is_empty() {
            warn!("boundary {index} has no points left and is dropped");
            continue;
        }
        spanned.push(ProfileBoundary {
            index,
            points: clamp_to_span(&boundary.points, 0.0, line_length),
        });
    }
    // the track keeps station ties, the boundary may not
    let mut surface = ground.absolute().to_vec();
    surface.dedup_by(|cur, prev| cur.x == prev.x);
    spanned.push(ProfileBoundary {
        index: ground_index,
        points: surface,
    });

    let ordered = order_by_elevation(spanned);
    check_crossings(&ordered);
    info!("normalized {} boundaries", ordered.len());
    ProfileGeometry {
        line_length,
        boundaries: ordered,
    }
}

/// Orders boundaries by mean elevation, deepest first. Equal means put the
/// higher index first.
fn order_by_elevation(mut boundaries: Vec<ProfileBoundary>) -> Vec<ProfileBoundary> {
    let mut by_index: Vec<u32> = boundaries.iter().map(|b| b.index).collect();
    by_index.sort_unstable_by(|a, b| b.cmp(a));

    boundaries.sort_by(|a, b| {
        let ma = mean_y(&a.points).unwrap_or(f64::NEG_INFINITY);
        let mb = mean_y(&b.points).unwrap_or(f64::NEG_INFINITY);
        ma.total_cmp(&mb).then(b.index.cmp(&a.index))
    });
    let by_elevation: Vec<u32> = boundaries.iter().map(|b| b.index).collect();
    if by_elevation != by_index {
        warn!(
            "boundaries were not drawn top-down; ordered by elevation as {:?}",
            by_elevation
        );
    }
    boundaries
}

fn check_crossings(boundaries: &[ProfileBoundary]) {
    for pair in boundaries.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let crosses = union_x(&lower.points, &upper.points).iter().any(|x| {
            match (interp(*x, &lower.points), interp(*x, &upper.points)) {
                (Some(l), Some(u)) => l > u + 1e-9,
                _ => false,
            }
        });
        if crosses {
            warn!(
                "boundary {} crosses boundary {} above it",
                lower.index, upper.index
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitizer::Boundary;
    use crate::measurements::{Cpt, LocatedProfile};
    use crate::reference_line::{ProjectedProfile, Projection};

    fn track(points: &[(f64, f64)], length: f64) -> GroundLevelTrack {
        let profiles: Vec<ProjectedProfile> = points
            .iter()
            .map(|(station, level)| ProjectedProfile {
                profile: LocatedProfile::Cpt(Cpt {
                    id: format!("CPT{station}"),
                    easting: 0.0,
                    northing: 0.0,
                    ground_level: *level,
                    final_depth: 20.0,
                    samples: Vec::new(),
                }),
                projection: Projection {
                    fraction: station / length,
                    station: *station,
                    offset: 0.0,
                },
            })
            .collect();
        GroundLevelTrack::build(&profiles, length).unwrap()
    }

    fn boundary(points: &[(f64, f64)]) -> Boundary {
        Boundary::new(points.iter().map(|p| Point::from(*p)).collect())
    }

    #[test]
    fn clamp_adds_end_points() {
        let pts = clamp_to_span(&[Point::new(10.0, -15.0), Point::new(90.0, -15.0)], 0.0, 100.0);
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, -15.0),
                Point::new(10.0, -15.0),
                Point::new(90.0, -15.0),
                Point::new(100.0, -15.0),
            ]
        );
    }

    #[test]
    fn clamp_handles_reversed_and_overshooting_points() {
        let pts = clamp_to_span(
            &[Point::new(105.0, -3.0), Point::new(40.0, -4.0), Point::new(0.0, -5.0)],
            0.0,
            100.0,
        );
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, -5.0),
                Point::new(40.0, -4.0),
                Point::new(100.0, -3.0),
            ]
        );
        assert!(pts.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn ground_boundary_is_replaced_and_on_top() {
        let ground = track(&[(20.0, 5.0), (80.0, 3.0)], 100.0);
        let mut set = BoundarySet::new();
        set.insert(1, boundary(&[(0.0, 99.0), (100.0, 99.0)]));
        set.insert(2, boundary(&[(10.0, -2.0), (90.0, -2.0)]));
        set.insert(3, boundary(&[(10.0, -15.0), (90.0, -15.0)]));
        let geom = normalize(set, &ground, 100.0, GROUND_LEVEL_INDEX);

        let indices: Vec<u32> = geom.boundaries.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![3, 2, 1]);
        assert_eq!(geom.ground_surface().unwrap().points, ground.absolute());
        for b in &geom.boundaries {
            assert_eq!(b.points.first().unwrap().x, 0.0);
            assert_eq!(b.points.last().unwrap().x, 100.0);
        }
    }

    #[test]
    fn ground_boundary_at_line_ends_is_strictly_increasing() {
        let ground = track(&[(0.0, 5.0), (100.0, 3.0)], 100.0);
        assert_eq!(ground.absolute().len(), 4);
        let mut set = BoundarySet::new();
        set.insert(2, boundary(&[(0.0, -5.0), (100.0, -5.0)]));
        let geom = normalize(set, &ground, 100.0, GROUND_LEVEL_INDEX);
        assert_eq!(
            geom.ground_surface().unwrap().points,
            vec![Point::new(0.0, 5.0), Point::new(100.0, 3.0)]
        );
        for b in &geom.boundaries {
            assert!(b.points.windows(2).all(|w| w[0].x < w[1].x), "{:?}", b.points);
        }
    }

    #[test]
    fn missing_ground_boundary_is_added() {
        let ground = track(&[(50.0, 1.0)], 100.0);
        let mut set = BoundarySet::new();
        set.insert(2, boundary(&[(10.0, -5.0), (60.0, -6.0)]));
        set.insert(3, Boundary::default());
        let geom = normalize(set, &ground, 100.0, GROUND_LEVEL_INDEX);
        assert_eq!(geom.boundaries.len(), 2);
        assert_eq!(geom.boundaries[1].index, 1);
        assert_eq!(geom.layer_count(), 1);
    }

    #[test]
    fn boundaries_drawn_bottom_up_are_reordered() {
        let ground = track(&[(50.0, 1.0)], 100.0);
        let mut set = BoundarySet::new();
        set.insert(2, boundary(&[(0.0, -20.0), (100.0, -20.0)]));
        set.insert(3, boundary(&[(0.0, -4.0), (100.0, -4.0)]));
        let geom = normalize(set, &ground, 100.0, GROUND_LEVEL_INDEX);
        let indices: Vec<u32> = geom.boundaries.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![2, 3, 1]);
    }

    #[test]
    fn layers_share_x_values() {
        let geom = ProfileGeometry {
            line_length: 100.0,
            boundaries: vec![
                ProfileBoundary {
                    index: 2,
                    points: vec![Point::new(0.0, -10.0), Point::new(100.0, -20.0)],
                },
                ProfileBoundary {
                    index: 1,
                    points: vec![
                        Point::new(0.0, 0.0),
                        Point::new(50.0, 2.0),
                        Point::new(100.0, 0.0),
                    ],
                },
            ],
        };
        let layers = geom.layers();
        assert_eq!(layers.len(), 1);
        let layer = &layers[0];
        assert_eq!((layer.number, layer.drawn), (1, 1));
        assert_eq!(layer.xs, vec![0.0, 50.0, 100.0]);
        assert_eq!(layer.top, vec![0.0, 2.0, 0.0]);
        assert_eq!(layer.bottom, vec![-10.0, -15.0, -20.0]);
        assert_eq!(layer.outline().len(), 6);
    }
}
