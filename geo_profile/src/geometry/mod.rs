//! Basic geometry primitives shared by the profile pipeline.
//!
//! The same [`Point`] type is used for geographic positions (easting,
//! northing), real-world profile coordinates (distance along the line,
//! elevation) and drawing-surface pixels. Which space a value lives in is
//! tracked by the owning type, not by the point itself.

/// Representation of a 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Representation of a 2D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    /// Creates a new line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Parameter `t` in `[0, 1]` of the point on the segment closest to `p`.
    ///
    /// A zero-length segment always yields `0.0`.
    pub fn project_parameter(&self, p: Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;
        if len2 < f64::EPSILON {
            return 0.0;
        }
        (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2).clamp(0.0, 1.0)
    }

    /// Returns the point at parameter `t` along the segment.
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.start.x + t * (self.end.x - self.start.x),
            self.start.y + t * (self.end.y - self.start.y),
        )
    }

    /// Returns the point on the segment nearest to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        self.point_at(self.project_parameter(p))
    }
}

/// Representation of a series of connected line segments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Point>,
}

impl Polyline {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Returns the total length of all segments in the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Iterator over the segments of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.vertices.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Piecewise linear interpolation of `y` at `x` over `points`.
///
/// `points` must be sorted by `x`. Values left of the first point or right of
/// the last point take the end values, so the curve is extended flat. Returns
/// `None` for an empty slice.
pub fn interp(x: f64, points: &[Point]) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x <= first.x {
        return Some(first.y);
    }
    if x >= last.x {
        return Some(last.y);
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x >= a.x && x <= b.x {
            let dx = b.x - a.x;
            if dx.abs() < f64::EPSILON {
                return Some(b.y);
            }
            return Some(a.y + (x - a.x) / dx * (b.y - a.y));
        }
    }
    Some(last.y)
}

/// Sorted, deduplicated union of the x coordinates of two point lists.
pub fn union_x(a: &[Point], b: &[Point]) -> Vec<f64> {
    let mut xs: Vec<f64> = a.iter().chain(b.iter()).map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs
}

/// Length-weighted mean of `y` over the x extent of `points`.
///
/// Falls back to the arithmetic mean when the extent is zero.
pub fn mean_y(points: &[Point]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let mut area = 0.0;
    let mut span = 0.0;
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        area += dx * (pair[0].y + pair[1].y) / 2.0;
        span += dx;
    }
    if span.abs() < f64::EPSILON {
        return Some(points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64);
    }
    Some(area / span)
}

/// Bounding box of `points` as `(min_x, min_y, max_x, max_y)`.
pub fn bbox(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for p in points.iter().skip(1) {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_length() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 9.0),
        ];
        let pl = Polyline::new(pts);
        assert!((pl.length() - 10.0).abs() < 1e-6);
        assert_eq!(pl.segments().count(), 2);
    }

    #[test]
    fn nearest_point_clamps_to_segment() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((line.project_parameter(Point::new(5.0, 3.0)) - 0.5).abs() < 1e-9);
        assert_eq!(line.project_parameter(Point::new(-4.0, 1.0)), 0.0);
        assert_eq!(line.project_parameter(Point::new(14.0, 1.0)), 1.0);
        assert_eq!(line.nearest_point(Point::new(7.0, -2.0)), Point::new(7.0, 0.0));
    }

    #[test]
    fn interp_extends_flat() {
        let pts = [Point::new(0.0, 1.0), Point::new(10.0, 3.0)];
        assert_eq!(interp(-5.0, &pts), Some(1.0));
        assert_eq!(interp(15.0, &pts), Some(3.0));
        assert!((interp(5.0, &pts).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(interp(1.0, &[]), None);
    }

    #[test]
    fn union_of_x_is_sorted_and_unique() {
        let a = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        let b = [Point::new(0.0, 1.0), Point::new(7.5, 1.0), Point::new(10.0, 1.0)];
        assert_eq!(union_x(&a, &b), vec![0.0, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn weighted_mean() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 10.0)];
        assert!((mean_y(&pts).unwrap() - 2.5).abs() < 1e-9);
        let vertical = [Point::new(1.0, 2.0), Point::new(1.0, 4.0)];
        assert!((mean_y(&vertical).unwrap() - 3.0).abs() < 1e-9);
    }
}
