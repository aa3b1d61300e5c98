//! One profile session: measurements along a reference line, the digitizing
//! phase and the export of the result.

use std::path::PathBuf;

use log::{debug, info};

use crate::config::SessionConfig;
use crate::digitizer::{BoundarySet, ClickEvent, Digitizer, DrawingSurface, SegmentLog};
use crate::error::{ProfileError, Result};
use crate::ground_level::GroundLevelTrack;
use crate::io::geo_file::{write_geometry_file, GeometryHeader};
use crate::materials::MaterialTable;
use crate::measurements::MeasurementCollection;
use crate::normalize::{normalize, to_real_world, ProfileGeometry};
use crate::reference_line::{project_profiles, ProjectedProfile, ReferenceLine};
use crate::render::{self, canvas_scene, profile_scene, ProfileScene};
use crate::scale::CanvasScale;

/// Files written by [`ProfileSession::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub geometry: PathBuf,
    pub svg: PathBuf,
    pub png: PathBuf,
}

pub struct ProfileSession {
    config: SessionConfig,
    line: ReferenceLine,
    profiles: Vec<ProjectedProfile>,
    ground: GroundLevelTrack,
    materials: Option<MaterialTable>,
}

impl ProfileSession {
    /// Projects all measurements onto `line` and builds the ground level.
    pub fn new(
        config: SessionConfig,
        line: ReferenceLine,
        measurements: &MeasurementCollection,
        materials: Option<MaterialTable>,
    ) -> Result<Self> {
        if measurements.is_empty() {
            return Err(ProfileError::NoProfiles);
        }
        let profiles = project_profiles(&line, measurements.profiles());
        let ground = GroundLevelTrack::build(&profiles, line.length())?;
        info!(
            "projected {} profiles onto a {:.2} m reference line",
            profiles.len(),
            line.length()
        );
        Ok(Self {
            config,
            line,
            profiles,
            ground,
            materials,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn line(&self) -> &ReferenceLine {
        &self.line
    }

    pub fn profiles(&self) -> &[ProjectedProfile] {
        &self.profiles
    }

    pub fn ground_level(&self) -> &GroundLevelTrack {
        &self.ground
    }

    pub fn canvas_scale(&self) -> Result<CanvasScale> {
        CanvasScale::from_profiles(
            &self.profiles,
            self.line.length(),
            self.config.canvas_width,
            self.config.canvas_height,
        )
    }

    /// A fresh digitizer starting at the configured boundary counter.
    pub fn digitizer(&self) -> Digitizer {
        Digitizer::starting_at(self.config.first_boundary_index)
    }

    /// Digitizing backdrop with the segments drawn so far.
    pub fn backdrop(&self, log: &SegmentLog) -> Result<ProfileScene> {
        let scale = self.canvas_scale()?;
        Ok(canvas_scene(
            &self.profiles,
            &self.ground,
            &scale,
            self.config.cpt_x_scale,
            log.segments(),
        ))
    }

    /// Feeds `events` to a new digitizer, forwarding every change to
    /// `surface`, until [`ClickEvent::Finish`].
    ///
    /// Events after `Finish` are ignored. A stream without `Finish` fails
    /// with [`ProfileError::SessionAbandoned`].
    pub fn run<I, S>(&self, events: I, surface: &mut S) -> Result<ProfileGeometry>
    where
        I: IntoIterator<Item = ClickEvent>,
        S: DrawingSurface + ?Sized,
    {
        let mut digitizer = self.digitizer();
        for event in events {
            if event == ClickEvent::Finish {
                return self.finish(digitizer.finish());
            }
            if let Some(change) = digitizer.apply(event) {
                surface.apply(&change);
            }
        }
        Err(ProfileError::SessionAbandoned)
    }

    /// Converts finished canvas boundaries into the normalized geometry.
    pub fn finish(&self, boundaries: BoundarySet) -> Result<ProfileGeometry> {
        debug!("finishing with {} boundaries", boundaries.len());
        let scale = self.canvas_scale()?;
        let real = to_real_world(boundaries, &scale);
        Ok(normalize(
            real,
            &self.ground,
            self.line.length(),
            self.config.ground_level_index,
        ))
    }

    /// Profile image scene for `geometry`.
    pub fn profile_scene(&self, geometry: &ProfileGeometry) -> Result<ProfileScene> {
        let empty = MaterialTable::new();
        let materials = self.materials.as_ref().unwrap_or(&empty);
        profile_scene(
            &self.profiles,
            &self.ground,
            geometry,
            materials,
            self.config.profile_style(),
        )
    }

    /// Writes the geometry file and the profile images.
    ///
    /// Every layer must have a material; this is checked before anything is
    /// written.
    pub fn export(&self, geometry: &ProfileGeometry, label: &str) -> Result<ExportedFiles> {
        let empty = MaterialTable::new();
        let materials = self.materials.as_ref().unwrap_or(&empty);
        materials.validate_layers(geometry.layer_count() as u32)?;
        let scene = self.profile_scene(geometry)?;

        let path = &self.config.geometry_path;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = GeometryHeader::now(
            &self.config.company,
            &self.config.created_by,
            &self.config.title,
            &filename,
        );
        write_geometry_file(path, geometry, &header)?;
        let (svg, png) = render::write_profile_images(&self.config.image_dir, label, &scene)?;
        Ok(ExportedFiles {
            geometry: path.clone(),
            svg,
            png,
        })
    }
}
