//! In-memory measurement records: cone penetration tests and boreholes.
//!
//! Parsing the raw field formats happens elsewhere; records arrive through a
//! [`RecordReader`] and are exposed to the rest of the pipeline as
//! [`LocatedProfile`] values.

mod collection;

pub use collection::{JsonRecordReader, MeasurementCollection, RecordKind, RecordReader};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::materials::PlotColor;

/// One sample of a cone penetration test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CptSample {
    /// Depth below ground level in metres.
    pub depth: f64,
    /// Cone resistance in MPa.
    pub cone_resistance: f64,
    /// Friction ratio in percent.
    pub friction_ratio: f64,
}

/// Cone penetration test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cpt {
    pub id: String,
    pub easting: f64,
    pub northing: f64,
    pub ground_level: f64,
    pub final_depth: f64,
    pub samples: Vec<CptSample>,
}

/// Soil components distinguished in borehole descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilComponent {
    Gravel,
    Sand,
    Clay,
    Loam,
    Peat,
    Silt,
    /// Non-soil material such as debris or concrete.
    NonSoil,
}

impl SoilComponent {
    /// Maps the numeric component code used by the borehole readers.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Gravel),
            1 => Some(Self::Sand),
            2 => Some(Self::Clay),
            3 => Some(Self::Loam),
            4 => Some(Self::Peat),
            5 => Some(Self::Silt),
            999 => Some(Self::NonSoil),
            _ => None,
        }
    }

    /// Color of the borehole bar for a layer dominated by this component.
    pub fn plot_color(self) -> PlotColor {
        match self {
            Self::Gravel => PlotColor::Gray,
            Self::Sand => PlotColor::Yellow,
            Self::Clay => PlotColor::SteelBlue,
            Self::Loam => PlotColor::Purple,
            Self::Peat => PlotColor::Brown,
            Self::Silt => PlotColor::Lime,
            Self::NonSoil => PlotColor::Black,
        }
    }
}

/// Share of a soil component within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentFraction {
    pub component: SoilComponent,
    pub fraction: f64,
}

/// One described layer of a borehole, bounded by elevations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    pub upper: f64,
    pub lower: f64,
    pub components: Vec<ComponentFraction>,
}

impl SoilLayer {
    /// Component with the largest fraction; the first one wins on ties.
    pub fn dominant_component(&self) -> Option<SoilComponent> {
        let mut best: Option<ComponentFraction> = None;
        for c in &self.components {
            match best {
                Some(b) if c.fraction <= b.fraction => {}
                _ => best = Some(*c),
            }
        }
        best.map(|c| c.component)
    }
}

/// Borehole log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borehole {
    pub id: String,
    pub easting: f64,
    pub northing: f64,
    pub ground_level: f64,
    pub final_depth: f64,
    pub layers: Vec<SoilLayer>,
}

/// A measurement with a geographic position, either kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocatedProfile {
    Cpt(Cpt),
    Borehole(Borehole),
}

impl LocatedProfile {
    pub fn id(&self) -> &str {
        match self {
            Self::Cpt(c) => &c.id,
            Self::Borehole(b) => &b.id,
        }
    }

    /// Geographic position as `(easting, northing)`.
    pub fn position(&self) -> Point {
        match self {
            Self::Cpt(c) => Point::new(c.easting, c.northing),
            Self::Borehole(b) => Point::new(b.easting, b.northing),
        }
    }

    pub fn ground_level(&self) -> f64 {
        match self {
            Self::Cpt(c) => c.ground_level,
            Self::Borehole(b) => b.ground_level,
        }
    }

    /// Depth below ground level at which the measurement ended.
    pub fn final_depth(&self) -> f64 {
        match self {
            Self::Cpt(c) => c.final_depth,
            Self::Borehole(b) => b.final_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(component: SoilComponent, fraction: f64) -> ComponentFraction {
        ComponentFraction {
            component,
            fraction,
        }
    }

    #[test]
    fn dominant_component_is_largest_fraction() {
        let layer = SoilLayer {
            upper: 0.0,
            lower: -1.0,
            components: vec![
                fraction(SoilComponent::Sand, 0.3),
                fraction(SoilComponent::Clay, 0.6),
                fraction(SoilComponent::Silt, 0.1),
            ],
        };
        assert_eq!(layer.dominant_component(), Some(SoilComponent::Clay));
    }

    #[test]
    fn dominant_component_tie_keeps_first() {
        let layer = SoilLayer {
            upper: 0.0,
            lower: -1.0,
            components: vec![
                fraction(SoilComponent::Peat, 0.5),
                fraction(SoilComponent::Clay, 0.5),
            ],
        };
        assert_eq!(layer.dominant_component(), Some(SoilComponent::Peat));
        let empty = SoilLayer {
            upper: 0.0,
            lower: -1.0,
            components: Vec::new(),
        };
        assert_eq!(empty.dominant_component(), None);
    }

    #[test]
    fn component_codes() {
        assert_eq!(SoilComponent::from_code(4), Some(SoilComponent::Peat));
        assert_eq!(SoilComponent::from_code(999), Some(SoilComponent::NonSoil));
        assert_eq!(SoilComponent::from_code(7), None);
        assert_eq!(SoilComponent::Sand.plot_color(), PlotColor::Yellow);
    }
}
