//! SVG encoding of a [`ProfileScene`].

use std::io::{self, Write};
use std::path::Path;

use super::{ProfileScene, Shape};
use crate::error::Result;
use crate::geometry::Point;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

fn write_points<W: Write>(out: &mut W, pts: &[Point]) -> io::Result<()> {
    for p in pts {
        write!(out, "{:.2},{:.2} ", p.x, p.y)?;
    }
    Ok(())
}

/// Writes `scene` as an SVG document to `out`.
pub fn write_scene<W: Write>(out: &mut W, scene: &ProfileScene) -> io::Result<()> {
    writeln!(
        out,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}'>",
        scene.width, scene.height
    )?;
    writeln!(out, "<rect width='100%' height='100%' fill='white' />")?;
    for shape in &scene.shapes {
        match shape {
            Shape::Polygon { points, fill } => {
                write!(out, "<polygon points='")?;
                write_points(out, points)?;
                writeln!(out, "' fill='{}' stroke='none' />", fill.hex())?;
            }
            Shape::Polyline {
                points,
                color,
                width,
                dashed,
            } => {
                write!(out, "<polyline points='")?;
                write_points(out, points)?;
                write!(out, "' fill='none' stroke='{}' stroke-width='{width}'", color.hex())?;
                if *dashed {
                    write!(out, " stroke-dasharray='6,4'")?;
                }
                writeln!(out, " />")?;
            }
            Shape::Text { at, text, color } => {
                writeln!(
                    out,
                    "<text x='{:.2}' y='{:.2}' font-size='12' fill='{}'>{}</text>",
                    at.x,
                    at.y,
                    color.hex(),
                    escape(text)
                )?;
            }
        }
    }
    writeln!(out, "</svg>")
}

/// SVG document of `scene` as a string.
pub fn svg_string(scene: &ProfileScene) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_scene(&mut buf, scene);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Writes `scene` to an SVG file at `path`.
pub fn write_svg(path: &Path, scene: &ProfileScene) -> Result<()> {
    crate::io::write_string(path, &svg_string(scene))?;
    Ok(())
}
