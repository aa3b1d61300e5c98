//! Session settings, read from a JSON file where every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::GROUND_LEVEL_INDEX;
use crate::render::ProfileStyle;

/// Format version written to the geometry file header.
pub const DEFAULT_CREATED_BY: &str = "D-Settlement version 20.1.1.29740";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Digitizing canvas size in pixels.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Canvas pixels per unit of cone resistance and friction ratio.
    pub cpt_x_scale: f64,
    /// Boundary counter the digitizer starts from. With the default of 2
    /// boundary 1 stays reserved for the ground level.
    pub first_boundary_index: u32,
    pub ground_level_index: u32,
    pub company: String,
    pub created_by: String,
    pub title: String,
    pub geometry_path: PathBuf,
    pub image_dir: PathBuf,
    pub pixels_per_metre: f64,
    pub plot_height: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let style = ProfileStyle::default();
        Self {
            canvas_width: 1200.0,
            canvas_height: 600.0,
            cpt_x_scale: 2.0,
            first_boundary_index: 2,
            ground_level_index: GROUND_LEVEL_INDEX,
            company: String::new(),
            created_by: DEFAULT_CREATED_BY.to_string(),
            title: String::new(),
            geometry_path: PathBuf::from("output.geo"),
            image_dir: PathBuf::from("."),
            pixels_per_metre: style.px_per_metre,
            plot_height: style.plot_height,
        }
    }
}

impl SessionConfig {
    pub fn profile_style(&self) -> ProfileStyle {
        ProfileStyle {
            px_per_metre: self.pixels_per_metre,
            plot_height: self.plot_height,
        }
    }
}

pub fn read_config_json<P: AsRef<Path>>(path: P) -> Result<SessionConfig> {
    let contents = crate::io::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
