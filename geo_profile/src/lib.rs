//! Core library for geotechnical longitudinal profiles.
//!
//! CPTs and boreholes are projected onto a reference line, the operator
//! digitizes layer boundaries on a canvas, and the result is written as a
//! D-Series geometry file together with a rendered profile image.

pub mod config;
pub mod digitizer;
pub mod error;
pub mod geometry;
pub mod ground_level;
pub mod io;
pub mod materials;
pub mod measurements;
pub mod normalize;
pub mod reference_line;
pub mod render;
pub mod scale;
pub mod session;

pub use config::SessionConfig;
pub use digitizer::{ClickEvent, Digitizer, DrawingSurface, SegmentLog, SurfaceChange};
pub use error::{ProfileError, Result};
pub use ground_level::GroundLevelTrack;
pub use materials::{Material, MaterialTable, PlotColor};
pub use measurements::{JsonRecordReader, MeasurementCollection, RecordKind, RecordReader};
pub use normalize::ProfileGeometry;
pub use reference_line::{ProjectedProfile, ReferenceLine};
pub use scale::CanvasScale;
pub use session::{ExportedFiles, ProfileSession};
