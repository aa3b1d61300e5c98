//! Material and color lookup for the soil layers between boundaries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ProfileError, Result};
use crate::io::read_lines;

/// Fill and line colors understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotColor {
    Black,
    White,
    Gray,
    LightGray,
    Red,
    Green,
    DarkGreen,
    LightGreen,
    Lime,
    Olive,
    Blue,
    LightBlue,
    SkyBlue,
    SteelBlue,
    Navy,
    Cyan,
    Teal,
    Yellow,
    Gold,
    Khaki,
    Orange,
    Brown,
    SaddleBrown,
    Sienna,
    Tan,
    Wheat,
    Purple,
    Violet,
    Magenta,
    Pink,
    Salmon,
    Rgb(u8, u8, u8),
}

impl PlotColor {
    /// Red, green and blue components.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Black => [0, 0, 0],
            Self::White => [255, 255, 255],
            Self::Gray => [128, 128, 128],
            Self::LightGray => [211, 211, 211],
            Self::Red => [255, 0, 0],
            Self::Green => [0, 128, 0],
            Self::DarkGreen => [0, 100, 0],
            Self::LightGreen => [144, 238, 144],
            Self::Lime => [0, 255, 0],
            Self::Olive => [128, 128, 0],
            Self::Blue => [0, 0, 255],
            Self::LightBlue => [173, 216, 230],
            Self::SkyBlue => [135, 206, 235],
            Self::SteelBlue => [70, 130, 180],
            Self::Navy => [0, 0, 128],
            Self::Cyan => [0, 255, 255],
            Self::Teal => [0, 128, 128],
            Self::Yellow => [255, 255, 0],
            Self::Gold => [255, 215, 0],
            Self::Khaki => [240, 230, 140],
            Self::Orange => [255, 165, 0],
            Self::Brown => [165, 42, 42],
            Self::SaddleBrown => [139, 69, 19],
            Self::Sienna => [160, 82, 45],
            Self::Tan => [210, 180, 140],
            Self::Wheat => [245, 222, 179],
            Self::Purple => [128, 0, 128],
            Self::Violet => [238, 130, 238],
            Self::Magenta => [255, 0, 255],
            Self::Pink => [255, 192, 203],
            Self::Salmon => [250, 128, 114],
            Self::Rgb(r, g, b) => [r, g, b],
        }
    }

    /// Hex notation as used in SVG attributes.
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for PlotColor {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "");
        if let Some(hex) = name.strip_prefix('#') {
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
            };
            return match (hex.len(), channel(0), channel(2), channel(4)) {
                (6, Some(r), Some(g), Some(b)) => Ok(Self::Rgb(r, g, b)),
                _ => Err(ProfileError::UnknownColor(s.to_string())),
            };
        }
        let color = match name.as_str() {
            "black" | "k" => Self::Black,
            "white" | "w" => Self::White,
            "gray" | "grey" => Self::Gray,
            "lightgray" | "lightgrey" => Self::LightGray,
            "red" | "r" => Self::Red,
            "green" | "g" => Self::Green,
            "darkgreen" => Self::DarkGreen,
            "lightgreen" => Self::LightGreen,
            "lime" => Self::Lime,
            "olive" => Self::Olive,
            "blue" | "b" => Self::Blue,
            "lightblue" => Self::LightBlue,
            "skyblue" => Self::SkyBlue,
            "steelblue" => Self::SteelBlue,
            "navy" => Self::Navy,
            "cyan" | "c" => Self::Cyan,
            "teal" => Self::Teal,
            "yellow" | "y" => Self::Yellow,
            "gold" => Self::Gold,
            "khaki" => Self::Khaki,
            "orange" => Self::Orange,
            "brown" => Self::Brown,
            "saddlebrown" => Self::SaddleBrown,
            "sienna" => Self::Sienna,
            "tan" => Self::Tan,
            "wheat" => Self::Wheat,
            "purple" => Self::Purple,
            "violet" => Self::Violet,
            "magenta" | "m" => Self::Magenta,
            "pink" => Self::Pink,
            "salmon" => Self::Salmon,
            _ => return Err(ProfileError::UnknownColor(s.to_string())),
        };
        Ok(color)
    }
}

impl fmt::Display for PlotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Material assigned to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: PlotColor,
}

/// Layer number to material, numbered top-down in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: BTreeMap<u32, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer: u32, material: Material) {
        self.materials.insert(layer, material);
    }

    pub fn get(&self, layer: u32) -> Option<&Material> {
        self.materials.get(&layer)
    }

    /// Looks up a layer, failing when the table has no entry for it.
    pub fn material(&self, layer: u32) -> Result<&Material> {
        self.get(layer).ok_or(ProfileError::MissingMaterial(layer))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Checks that layers `1..=layer_count` all have a material.
    pub fn validate_layers(&self, layer_count: u32) -> Result<()> {
        (1..=layer_count).try_for_each(|layer| self.material(layer).map(|_| ()))
    }

    /// Parses `layer,material,color` rows; the first line is a header.
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (idx, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            let [layer, name, color] = parts.as_slice() else {
                return Err(ProfileError::MaterialTable {
                    line: idx + 1,
                    message: "expected layer,material,color".to_string(),
                });
            };
            table.insert(
                layer_number(layer, idx + 1)?,
                Material {
                    name: name.to_string(),
                    color: color.parse()?,
                },
            );
        }
        Ok(table)
    }
}

/// Layer number from a table cell. Spreadsheets store numbers as floats, so
/// `2.0` is accepted; fractions and negatives are not.
fn layer_number(value: &str, line: usize) -> Result<u32> {
    let invalid = |message: String| ProfileError::MaterialTable { line, message };
    let value = value.trim();
    let number = value.parse::<f64>().map_err(|e| invalid(format!("layer {value:?}: {e}")))?;
    if !number.is_finite() || number.fract() != 0.0 || number < 0.0 || number > u32::MAX as f64 {
        return Err(invalid(format!(
            "layer {value:?} is not a whole non-negative number"
        )));
    }
    Ok(number as u32)
}

/// Reads a material table from a CSV file.
pub fn read_material_table_csv<P: AsRef<Path>>(path: P) -> Result<MaterialTable> {
    let text = read_lines(path)?.join("\n");
    MaterialTable::parse_csv(&text)
}

/// Reads a material table from the first sheet of an xlsx workbook.
///
/// The header row must name the layer, material and color columns, either in
/// Dutch (`laag`, `materiaal`, `kleur`) or English (`layer`, `material`,
/// `color`).
#[cfg(feature = "xlsx")]
pub fn read_material_table_xlsx<P: AsRef<Path>>(path: P) -> Result<MaterialTable> {
    let book = umya_spreadsheet::reader::xlsx::read(path.as_ref())
        .map_err(|e| ProfileError::Spreadsheet(e.to_string()))?;
    let sheet = book
        .get_sheet(&0)
        .ok_or_else(|| ProfileError::Spreadsheet("workbook has no sheets".to_string()))?;
    let (max_col, max_row) = sheet.get_highest_column_and_row();
    let header: Vec<String> = (1..=max_col)
        .map(|c| sheet.get_value((c, 1)).trim().to_ascii_lowercase())
        .collect();
    let column = |names: &[&str]| {
        header
            .iter()
            .position(|h| names.contains(&h.as_str()))
            .map(|i| i as u32 + 1)
            .ok_or_else(|| ProfileError::MaterialTable {
                line: 1,
                message: format!("missing column {}", names.join("/")),
            })
    };
    let layer_col = column(&["laag", "layer"])?;
    let name_col = column(&["materiaal", "material"])?;
    let color_col = column(&["kleur", "color", "plotkleur"])?;

    let mut table = MaterialTable::new();
    for row in 2..=max_row {
        let layer = sheet.get_value((layer_col, row));
        if layer.trim().is_empty() {
            continue;
        }
        table.insert(
            layer_number(&layer, row as usize)?,
            Material {
                name: sheet.get_value((name_col, row)),
                color: sheet.get_value((color_col, row)).parse()?,
            },
        );
    }
    Ok(table)
}
