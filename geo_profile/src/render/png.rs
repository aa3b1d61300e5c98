//! Raster encoding of a [`ProfileScene`] with tiny-skia.
//!
//! Text shapes are not rasterized; labels only appear in the SVG output.

use std::path::Path;

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::{ProfileScene, Shape};
use crate::error::{ProfileError, Result};
use crate::geometry::Point;
use crate::materials::PlotColor;

fn paint_for(color: PlotColor) -> Paint<'static> {
    let [r, g, b] = color.rgb();
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(r, g, b, 255));
    paint.anti_alias = true;
    paint
}

fn path_of(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Rasterizes `scene` onto a white pixmap.
pub fn render_pixmap(scene: &ProfileScene) -> Result<Pixmap> {
    let width = scene.width.ceil().max(1.0) as u32;
    let height = scene.height.ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| ProfileError::Image(format!("cannot allocate {width}x{height} image")))?;
    pixmap.fill(Color::WHITE);

    for shape in &scene.shapes {
        match shape {
            Shape::Polygon { points, fill } => {
                if let Some(path) = path_of(points, true) {
                    pixmap.fill_path(
                        &path,
                        &paint_for(*fill),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Shape::Polyline {
                points,
                color,
                width,
                dashed,
            } => {
                let mut stroke = Stroke {
                    width: *width,
                    ..Stroke::default()
                };
                if *dashed {
                    stroke.dash = StrokeDash::new(vec![6.0, 4.0], 0.0);
                }
                if let Some(path) = path_of(points, false) {
                    pixmap.stroke_path(&path, &paint_for(*color), &stroke, Transform::identity(), None);
                }
            }
            Shape::Text { .. } => {}
        }
    }
    Ok(pixmap)
}

/// Writes `scene` to a PNG file at `path`.
pub fn write_png(path: &Path, scene: &ProfileScene) -> Result<()> {
    let pixmap = render_pixmap(scene)?;
    pixmap
        .save_png(path)
        .map_err(|e| ProfileError::Image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_polygon() {
        let mut scene = ProfileScene::new(20.0, 10.0);
        scene.shapes.push(Shape::Polygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            fill: PlotColor::Blue,
        });
        let pixmap = render_pixmap(&scene).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 10));
        let px = pixmap.pixel(10, 5).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 255));
    }

    #[test]
    fn background_is_white() {
        let pixmap = render_pixmap(&ProfileScene::new(4.0, 4.0)).unwrap();
        let px = pixmap.pixel(1, 1).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
    }
}
