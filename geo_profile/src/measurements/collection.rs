use std::path::Path;

use log::debug;

use super::{Borehole, Cpt, LocatedProfile};
use crate::error::Result;
use crate::io::read_to_string;

/// Which kind of record a batch of files contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Cpt,
    Borehole,
}

/// Source of parsed measurement records.
///
/// Implementations decide which file extensions they understand; everything
/// else is skipped by [`MeasurementCollection::load_multi`].
pub trait RecordReader {
    /// Whether files with this (lower-case) extension can be read.
    fn supports(&self, extension: &str) -> bool;

    fn read_cpt(&self, path: &Path) -> Result<Cpt>;

    fn read_borehole(&self, path: &Path) -> Result<Borehole>;
}

/// Reads records serialized as JSON, one record per `.json` file.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordReader;

impl RecordReader for JsonRecordReader {
    fn supports(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn read_cpt(&self, path: &Path) -> Result<Cpt> {
        let contents = read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn read_borehole(&self, path: &Path) -> Result<Borehole> {
        let contents = read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// All measurements of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementCollection {
    pub cpts: Vec<Cpt>,
    pub boreholes: Vec<Borehole>,
}

impl MeasurementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every supported file in `paths` as records of `kind`.
    ///
    /// Returns the number of records added.
    pub fn load_multi<P, R>(&mut self, paths: &[P], kind: RecordKind, reader: &R) -> Result<usize>
    where
        P: AsRef<Path>,
        R: RecordReader + ?Sized,
    {
        let mut added = 0;
        for path in paths {
            let path = path.as_ref();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if !reader.supports(&extension) {
                debug!("skipping unsupported file {}", path.display());
                continue;
            }
            match kind {
                RecordKind::Cpt => self.cpts.push(reader.read_cpt(path)?),
                RecordKind::Borehole => self.boreholes.push(reader.read_borehole(path)?),
            }
            added += 1;
        }
        Ok(added)
    }

    pub fn is_empty(&self) -> bool {
        self.cpts.is_empty() && self.boreholes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cpts.len() + self.boreholes.len()
    }

    /// All records as located profiles, boreholes first.
    pub fn profiles(&self) -> impl Iterator<Item = LocatedProfile> + '_ {
        self.boreholes
            .iter()
            .cloned()
            .map(LocatedProfile::Borehole)
            .chain(self.cpts.iter().cloned().map(LocatedProfile::Cpt))
    }
}
