//! Accumulates operator-drawn layer boundaries from click events.
//!
//! The digitizer only changes its own state and reports what changed as a
//! [`SurfaceChange`]. Drawing those changes is up to a [`DrawingSurface`]
//! implementation.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Classified input from the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClickEvent {
    /// Left click: add a point to the active boundary.
    #[serde(rename = "append")]
    AppendPoint { x: f64, y: f64 },
    /// Right click: subsequent points go to a new boundary.
    #[serde(rename = "start_new")]
    StartNewBoundary,
    /// Remove the last point of the highest-indexed boundary.
    #[serde(rename = "undo")]
    UndoLastPoint,
    /// Close the surface and hand the boundaries on.
    Finish,
}

/// Visible effect of a digitizer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceChange {
    SegmentAdded { boundary: u32, from: Point, to: Point },
    SegmentRemoved { boundary: u32 },
}

/// Rendering adapter for the digitizing surface.
pub trait DrawingSurface {
    fn apply(&mut self, change: &SurfaceChange);
}

/// Surface that just keeps the currently visible segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentLog {
    segments: Vec<(u32, Point, Point)>,
}

impl SegmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible segments in drawing order as `(boundary, from, to)`.
    pub fn segments(&self) -> &[(u32, Point, Point)] {
        &self.segments
    }
}

impl DrawingSurface for SegmentLog {
    fn apply(&mut self, change: &SurfaceChange) {
        match *change {
            SurfaceChange::SegmentAdded { boundary, from, to } => {
                self.segments.push((boundary, from, to));
            }
            SurfaceChange::SegmentRemoved { boundary } => {
                if let Some(pos) = self.segments.iter().rposition(|s| s.0 == boundary) {
                    self.segments.remove(pos);
                }
            }
        }
    }
}

/// One layer boundary as an ordered list of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub points: Vec<Point>,
}

impl Boundary {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Boundaries keyed by their 1-based drawing index.
pub type BoundarySet = BTreeMap<u32, Boundary>;

/// Digitizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitizerState {
    Idle,
    DrawingBoundary(u32),
}

/// Stateful accumulator of boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Digitizer {
    counter: u32,
    state: DigitizerState,
    boundaries: BoundarySet,
}

impl Default for Digitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Digitizer {
    /// Creates an idle digitizer with the counter at 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an idle digitizer with the counter at `counter`.
    ///
    /// Points appended before any [`ClickEvent::StartNewBoundary`] go to
    /// boundary `max(counter, 1)`.
    pub fn starting_at(counter: u32) -> Self {
        Self {
            counter,
            state: DigitizerState::Idle,
            boundaries: BoundarySet::new(),
        }
    }

    pub fn state(&self) -> DigitizerState {
        self.state
    }

    /// Index that the next appended point goes to.
    pub fn active_index(&self) -> u32 {
        self.counter.max(1)
    }

    pub fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    /// Applies an editing event. [`ClickEvent::Finish`] is not an edit and is
    /// ignored here; call [`Digitizer::finish`] instead.
    pub fn apply(&mut self, event: ClickEvent) -> Option<SurfaceChange> {
        match event {
            ClickEvent::AppendPoint { x, y } => self.append_point(Point::new(x, y)),
            ClickEvent::StartNewBoundary => {
                self.start_new_boundary();
                None
            }
            ClickEvent::UndoLastPoint => self.undo_last_point(),
            ClickEvent::Finish => None,
        }
    }

    /// Moves on to the next boundary index without adding a point.
    pub fn start_new_boundary(&mut self) {
        self.counter += 1;
        self.state = DigitizerState::DrawingBoundary(self.active_index());
        debug!("started boundary {}", self.active_index());
    }

    /// Appends `p` to the active boundary, creating it on the first point.
    pub fn append_point(&mut self, p: Point) -> Option<SurfaceChange> {
        let index = self.active_index();
        self.state = DigitizerState::DrawingBoundary(index);
        let boundary = self.boundaries.entry(index).or_default();
        boundary.points.push(p);
        match boundary.points.as_slice() {
            [.., from, to] => Some(SurfaceChange::SegmentAdded {
                boundary: index,
                from: *from,
                to: *to,
            }),
            _ => None,
        }
    }

    /// Removes the last point of the highest-indexed boundary.
    ///
    /// This is not necessarily the boundary being drawn: right after a
    /// `StartNewBoundary` it is the previous one.
    pub fn undo_last_point(&mut self) -> Option<SurfaceChange> {
        let (&index, boundary) = self.boundaries.iter_mut().next_back()?;
        let had_segment = boundary.points.len() >= 2;
        boundary.points.pop()?;
        had_segment.then_some(SurfaceChange::SegmentRemoved { boundary: index })
    }

    /// Ends digitizing and returns the boundaries in canvas coordinates.
    ///
    /// The final point of the highest-indexed boundary is dropped; closing the
    /// drawing surface registers one extra click.
    pub fn finish(mut self) -> BoundarySet {
        if let Some(mut last) = self.boundaries.last_entry() {
            last.get_mut().points.pop();
        }
        self.boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(x: f64, y: f64) -> ClickEvent {
        ClickEvent::AppendPoint { x, y }
    }

    #[test]
    fn undo_after_two_points_leaves_first() {
        let mut d = Digitizer::new();
        for ev in [
            ClickEvent::StartNewBoundary,
            append(1.0, 1.0),
            append(2.0, 2.0),
            ClickEvent::UndoLastPoint,
        ] {
            d.apply(ev);
        }
        assert_eq!(d.boundaries().len(), 1);
        assert_eq!(d.boundaries()[&1].points, vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn clicks_without_start_go_to_boundary_one() {
        let mut d = Digitizer::new();
        assert_eq!(d.state(), DigitizerState::Idle);
        assert_eq!(d.apply(append(3.0, 4.0)), None);
        assert_eq!(d.state(), DigitizerState::DrawingBoundary(1));
        assert!(d.boundaries().contains_key(&1));
    }

    #[test]
    fn second_point_adds_segment() {
        let mut d = Digitizer::starting_at(2);
        d.apply(append(0.0, 0.0));
        let change = d.apply(append(5.0, 1.0));
        assert_eq!(
            change,
            Some(SurfaceChange::SegmentAdded {
                boundary: 2,
                from: Point::new(0.0, 0.0),
                to: Point::new(5.0, 1.0),
            })
        );
    }

    #[test]
    fn undo_targets_highest_index() {
        let mut d = Digitizer::starting_at(2);
        d.apply(append(0.0, 0.0));
        d.apply(append(1.0, 0.0));
        d.apply(ClickEvent::StartNewBoundary);
        // boundary 3 has no points yet, so boundary 2 is the highest one
        assert_eq!(
            d.apply(ClickEvent::UndoLastPoint),
            Some(SurfaceChange::SegmentRemoved { boundary: 2 })
        );
        assert_eq!(d.boundaries()[&2].len(), 1);
        d.apply(append(0.0, 9.0));
        d.apply(ClickEvent::UndoLastPoint);
        assert!(d.boundaries()[&3].is_empty());
        assert_eq!(d.boundaries()[&2].len(), 1);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut d = Digitizer::new();
        assert_eq!(d.apply(ClickEvent::UndoLastPoint), None);
        d.apply(append(1.0, 1.0));
        d.apply(ClickEvent::UndoLastPoint);
        assert_eq!(d.apply(ClickEvent::UndoLastPoint), None);
        assert!(d.boundaries()[&1].is_empty());
    }

    #[test]
    fn finish_drops_trailing_point() {
        let mut d = Digitizer::starting_at(2);
        for ev in [
            append(0.0, 10.0),
            append(50.0, 12.0),
            ClickEvent::StartNewBoundary,
            append(0.0, 30.0),
            append(50.0, 31.0),
            append(70.0, 90.0),
        ] {
            d.apply(ev);
        }
        let set = d.finish();
        assert_eq!(set[&2].len(), 2);
        assert_eq!(
            set[&3].points,
            vec![Point::new(0.0, 30.0), Point::new(50.0, 31.0)]
        );
    }

    #[test]
    fn segment_log_follows_changes() {
        let mut d = Digitizer::new();
        let mut log = SegmentLog::new();
        for ev in [
            append(0.0, 0.0),
            append(1.0, 0.0),
            append(2.0, 0.0),
            ClickEvent::UndoLastPoint,
        ] {
            if let Some(change) = d.apply(ev) {
                log.apply(&change);
            }
        }
        assert_eq!(
            log.segments(),
            &[(1, Point::new(0.0, 0.0), Point::new(1.0, 0.0))]
        );
    }

    #[test]
    fn events_deserialize() {
        let events: Vec<ClickEvent> = serde_json::from_str(
            r#"[{"event": "start_new"}, {"event": "append", "x": 1.5, "y": 2}, {"event": "undo"}, {"event": "finish"}]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                ClickEvent::StartNewBoundary,
                append(1.5, 2.0),
                ClickEvent::UndoLastPoint,
                ClickEvent::Finish,
            ]
        );
    }
}
