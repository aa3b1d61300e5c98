//! Rendering of the longitudinal profile and of the digitizing backdrop.
//!
//! Both are first built as a [`ProfileScene`] of simple shapes in image
//! pixels and then encoded by [`svg`] or [`png`].

pub mod png;
pub mod svg;

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::geometry::{bbox, Point};
use crate::ground_level::GroundLevelTrack;
use crate::materials::{MaterialTable, PlotColor};
use crate::measurements::{LocatedProfile, SoilComponent};
use crate::normalize::ProfileGeometry;
use crate::reference_line::ProjectedProfile;
use crate::scale::CanvasScale;

/// Drawing primitive in image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: Vec<Point>,
        color: PlotColor,
        width: f32,
        dashed: bool,
    },
    Polygon {
        points: Vec<Point>,
        fill: PlotColor,
    },
    Text {
        at: Point,
        text: String,
        color: PlotColor,
    },
}

/// Ordered list of shapes on a canvas of a given size. Later shapes are
/// painted over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileScene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl ProfileScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    fn line(&mut self, points: Vec<Point>, color: PlotColor, width: f32) {
        self.shapes.push(Shape::Polyline {
            points,
            color,
            width,
            dashed: false,
        });
    }

    fn dashed(&mut self, points: Vec<Point>, color: PlotColor, width: f32) {
        self.shapes.push(Shape::Polyline {
            points,
            color,
            width,
            dashed: true,
        });
    }

    fn text(&mut self, at: Point, text: impl Into<String>) {
        self.shapes.push(Shape::Text {
            at,
            text: text.into(),
            color: PlotColor::Black,
        });
    }
}

/// Options for the profile image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileStyle {
    /// Horizontal pixels per metre along the line.
    pub px_per_metre: f64,
    /// Height of the plot area in pixels.
    pub plot_height: f64,
}

impl Default for ProfileStyle {
    fn default() -> Self {
        Self {
            px_per_metre: 8.0,
            plot_height: 600.0,
        }
    }
}

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICK_STEPS: [f64; 10] = [0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0];

/// Maps real-world profile coordinates onto the image.
#[derive(Debug, Clone, Copy)]
struct ProfileView {
    length: f64,
    min_y: f64,
    max_y: f64,
    sx: f64,
    sy: f64,
}

impl ProfileView {
    fn map(&self, p: Point) -> Point {
        Point::new(
            MARGIN_LEFT + p.x * self.sx,
            MARGIN_TOP + (self.max_y - p.y) * self.sy,
        )
    }

    fn map_all(&self, pts: &[Point]) -> Vec<Point> {
        pts.iter().map(|p| self.map(*p)).collect()
    }
}

fn tick_step(span: f64, max_ticks: f64) -> f64 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|s| span / s <= max_ticks)
        .unwrap_or(1000.0)
}

/// Builds the longitudinal profile: layer fills, boundaries, ground level,
/// CPT traces and borehole bars.
///
/// Fails when a layer has no entry in `materials`.
pub fn profile_scene(
    profiles: &[ProjectedProfile],
    ground: &GroundLevelTrack,
    geometry: &ProfileGeometry,
    materials: &MaterialTable,
    style: ProfileStyle,
) -> Result<ProfileScene> {
    let length = geometry.line_length;
    let mut extent: Vec<Point> = ground.absolute().to_vec();
    for b in &geometry.boundaries {
        extent.extend(&b.points);
    }
    for p in profiles {
        let level = p.profile.ground_level();
        extent.push(Point::new(p.station(), level));
        extent.push(Point::new(p.station(), level - p.profile.final_depth()));
    }
    let (_, min_y, _, max_y) = bbox(&extent).unwrap_or((0.0, -1.0, length, 1.0));
    let (min_y, max_y) = (min_y.floor() - 1.0, max_y.ceil() + 1.0);

    let plot_width = length * style.px_per_metre;
    let view = ProfileView {
        length,
        min_y,
        max_y,
        sx: style.px_per_metre,
        sy: style.plot_height / (max_y - min_y),
    };
    let mut scene = ProfileScene::new(
        MARGIN_LEFT + plot_width + MARGIN_RIGHT,
        MARGIN_TOP + style.plot_height + MARGIN_BOTTOM,
    );

    draw_grid(&mut scene, &view);

    for layer in geometry.layers() {
        let material = materials.material(layer.drawn)?;
        scene.shapes.push(Shape::Polygon {
            points: view.map_all(&layer.outline()),
            fill: material.color,
        });
    }
    for boundary in &geometry.boundaries {
        scene.line(view.map_all(&boundary.points), PlotColor::Black, 1.0);
    }
    scene.dashed(view.map_all(ground.absolute()), PlotColor::Black, 0.5);

    for p in profiles {
        let station = p.station();
        match &p.profile {
            LocatedProfile::Cpt(cpt) => {
                let level = cpt.ground_level;
                let qc: Vec<Point> = cpt
                    .samples
                    .iter()
                    .map(|s| Point::new(s.cone_resistance / 2.0 + station, level - s.depth))
                    .collect();
                let rf: Vec<Point> = cpt
                    .samples
                    .iter()
                    .map(|s| Point::new(s.friction_ratio / 2.0 + station, level - s.depth))
                    .collect();
                if let Some((min_x, _, _, top)) = bbox(&qc) {
                    scene.text(view.map(Point::new(min_x, top)), cpt.id.clone());
                }
                scene.line(view.map_all(&qc), PlotColor::Blue, 0.5);
                scene.line(view.map_all(&rf), PlotColor::Green, 0.5);
            }
            LocatedProfile::Borehole(bore) => {
                for layer in &bore.layers {
                    let color = layer
                        .dominant_component()
                        .unwrap_or(SoilComponent::NonSoil)
                        .plot_color();
                    scene.line(
                        vec![
                            view.map(Point::new(station, layer.upper)),
                            view.map(Point::new(station, layer.lower)),
                        ],
                        color,
                        4.0,
                    );
                }
                scene.text(view.map(Point::new(station, bore.ground_level)), bore.id.clone());
            }
        }
    }

    draw_frame(&mut scene, &view);
    Ok(scene)
}

fn draw_grid(scene: &mut ProfileScene, view: &ProfileView) {
    let x_step = tick_step(view.length, 20.0);
    let mut x = 0.0;
    while x <= view.length + 1e-9 {
        scene.line(
            vec![view.map(Point::new(x, view.min_y)), view.map(Point::new(x, view.max_y))],
            PlotColor::LightGray,
            0.5,
        );
        let at = view.map(Point::new(x, view.min_y));
        scene.text(Point::new(at.x - 8.0, at.y + 16.0), format!("{x}"));
        x += x_step;
    }
    let y_step = tick_step(view.max_y - view.min_y, 15.0);
    let mut y = (view.min_y / y_step).ceil() * y_step;
    while y <= view.max_y + 1e-9 {
        let left = view.map(Point::new(0.0, y));
        let right = view.map(Point::new(view.length, y));
        scene.line(vec![left, right], PlotColor::LightGray, 0.5);
        scene.text(Point::new(left.x - 40.0, left.y + 4.0), format!("{y}"));
        scene.text(Point::new(right.x + 8.0, right.y + 4.0), format!("{y}"));
        y += y_step;
    }
}

fn draw_frame(scene: &mut ProfileScene, view: &ProfileView) {
    let corners = [
        Point::new(0.0, view.min_y),
        Point::new(view.length, view.min_y),
        Point::new(view.length, view.max_y),
        Point::new(0.0, view.max_y),
        Point::new(0.0, view.min_y),
    ];
    scene.line(view.map_all(&corners), PlotColor::Black, 1.0);
    let bottom = view.map(Point::new(view.length / 2.0, view.min_y));
    scene.text(Point::new(bottom.x - 40.0, bottom.y + 36.0), "distance [m]");
    let side = view.map(Point::new(0.0, (view.min_y + view.max_y) / 2.0));
    scene.text(Point::new(4.0, side.y), "level [m]");
}

/// Builds the digitizing backdrop in canvas pixels: CPT traces, borehole
/// bars, the ground level and the segments drawn so far.
pub fn canvas_scene(
    profiles: &[ProjectedProfile],
    ground: &GroundLevelTrack,
    scale: &CanvasScale,
    cpt_x_scale: f64,
    segments: &[(u32, Point, Point)],
) -> ProfileScene {
    let mut scene = ProfileScene::new(scale.width, scale.height);
    for p in profiles {
        match &p.profile {
            LocatedProfile::Cpt(cpt) => {
                let (qc, rf) = scale.cpt_traces(cpt, p.fraction(), cpt_x_scale);
                if let Some(first) = qc.first() {
                    scene.text(*first, cpt.id.clone());
                }
                scene.line(qc, PlotColor::Blue, 1.0);
                scene.line(rf, PlotColor::Green, 1.0);
            }
            LocatedProfile::Borehole(bore) => {
                for layer in &bore.layers {
                    let (top, bottom) = scale.layer_bar(layer, p.fraction());
                    let color = layer
                        .dominant_component()
                        .unwrap_or(SoilComponent::NonSoil)
                        .plot_color();
                    scene.line(vec![top, bottom], color, 5.0);
                }
            }
        }
    }
    scene.line(scale.normalized_track(ground.normalized()), PlotColor::Black, 1.0);
    for (_, from, to) in segments {
        scene.line(vec![*from, *to], PlotColor::Black, 1.0);
    }
    scene
}

/// Paths of the two profile images for `label` inside `dir`.
pub fn image_paths(dir: &Path, label: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("gtl_{label}.svg")),
        dir.join(format!("gtl_{label}.png")),
    )
}

/// Writes the scene as `gtl_{label}.svg` and `gtl_{label}.png` into `dir`.
pub fn write_profile_images(
    dir: &Path,
    label: &str,
    scene: &ProfileScene,
) -> Result<(PathBuf, PathBuf)> {
    let (svg_path, png_path) = image_paths(dir, label);
    svg::write_svg(&svg_path, scene)?;
    png::write_png(&png_path, scene)?;
    info!(
        "wrote profile images {} and {}",
        svg_path.display(),
        png_path.display()
    );
    Ok((svg_path, png_path))
}
