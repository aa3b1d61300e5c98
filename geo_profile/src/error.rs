//! Error type shared by the whole crate.

use std::io;

use thiserror::Error;

/// Errors produced while building, digitizing or exporting a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("geojson: {0}")]
    GeoJson(String),
    #[error("reference line needs at least two vertices and a non-zero length")]
    DegenerateLine,
    #[error("no measurements loaded")]
    NoProfiles,
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("maximum terminal depth must be positive, got {0}")]
    InvalidDepth(f64),
    #[error("unknown plot color '{0}'")]
    UnknownColor(String),
    #[error("no material defined for layer {0}")]
    MissingMaterial(u32),
    #[error("material table line {line}: {message}")]
    MaterialTable { line: usize, message: String },
    #[error("spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("no boundaries left to export")]
    EmptyGeometry,
    #[error("session closed without finishing; no output written")]
    SessionAbandoned,
    #[error("image: {0}")]
    Image(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ProfileError>;
