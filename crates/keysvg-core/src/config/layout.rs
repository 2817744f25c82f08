// Keysvg Layout Config - TOML with Serde
// Offset tables and drawing constants for the keyboard diagram

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use serde::Deserialize;

/// Horizontal spacing multipliers of the captured keyboard, one per key slot.
///
/// A multiplier of 0 places the key directly after its neighbour; larger
/// values leave a gap (1.5 = one and a half key widths).
pub const BUILTIN_OFFSETS: &[(u8, &[f64])] = &[
    (
        1,
        &[
            0.0, 1.5, 1.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0,
            0.5, 0.0, 0.0, 0.0,
        ],
    ),
    (
        2,
        &[
            0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.5,
            0.0, 0.0, 0.5, 0.0, 0.0, 0.0,
        ],
    ),
    (
        3,
        &[
            0.0, 0.0, 0.5, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.2,
            0.0, 0.0, 0.5, 0.0, 0.0, 0.0,
        ],
    ),
    (
        4,
        &[
            0.0, 0.0, 0.5, 0.7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.3, 0.0,
            0.0,
        ],
    ),
    (
        5,
        &[
            0.0, 0.0, 0.5, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.2, 1.5,
            0.0, 0.0, 0.0,
        ],
    ),
    (
        6,
        &[0.0, 0.0, 0.5, 0.7, 0.0, 3.0, 3.0, 0.5, 0.0, 1.3, 0.0, 0.0, 0.5, 1.0],
    ),
];

/// Layout errors
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Row {0} is defined more than once")]
    DuplicateRow(u8),

    #[error("Invalid row number: {0} (expected 1-255)")]
    InvalidRow(i64),

    #[error("Invalid offset {value} in row {row}, slot {slot}")]
    InvalidOffset { row: u8, slot: usize, value: f64 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Per-row offset table, iterated in ascending row order
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTable {
    rows: BTreeMap<u8, Vec<f64>>,
}

impl OffsetTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// The table of the captured keyboard
    pub fn builtin() -> Self {
        Self {
            rows: BUILTIN_OFFSETS
                .iter()
                .map(|(row, offsets)| (*row, offsets.to_vec()))
                .collect(),
        }
    }

    /// Add a row, rejecting duplicates and unusable offsets
    pub fn insert_row(&mut self, row: u8, offsets: Vec<f64>) -> Result<(), LayoutError> {
        if row == 0 {
            return Err(LayoutError::InvalidRow(0));
        }
        if self.rows.contains_key(&row) {
            return Err(LayoutError::DuplicateRow(row));
        }
        if let Some((slot, value)) = offsets
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(LayoutError::InvalidOffset {
                row,
                slot,
                value: *value,
            });
        }
        self.rows.insert(row, offsets);
        Ok(())
    }

    pub fn row(&self, row: u8) -> Option<&[f64]> {
        self.rows.get(&row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (u8, &[f64])> {
        self.rows.iter().map(|(row, offsets)| (*row, offsets.as_slice()))
    }

    /// Total number of key slots across all rows
    pub fn slot_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Numeric drawing constants
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Geometry {
    /// X cursor at the start of every row
    pub cursor_start: f64,
    /// Multiplier applied to each offset
    pub offset_scale: f64,
    /// Advance per key, added on top of the scaled offset
    pub key_pitch: f64,
    /// Vertical distance between rows; row N sits at `N * row_pitch`
    pub row_pitch: f64,
    /// viewBox width
    pub width: f64,
    /// viewBox height
    pub height: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cursor_start: 1.0,
            offset_scale: 10.0,
            key_pitch: 10.0,
            row_pitch: 10.0,
            width: 300.0,
            height: 100.0,
        }
    }
}

impl Geometry {
    fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("cursor_start", self.cursor_start),
            ("offset_scale", self.offset_scale),
            ("key_pitch", self.key_pitch),
            ("row_pitch", self.row_pitch),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LayoutError::InvalidGeometry(format!("{} must be finite", name)));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Attributes shared by every key label
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Verdana".to_string(),
            font_size: 2.0,
            fill: "black".to_string(),
        }
    }
}

/// Root TOML table of a layout file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutToml {
    #[serde(default)]
    geometry: Option<Geometry>,

    #[serde(default)]
    style: Option<TextStyle>,

    /// Row tables; when absent the built-in offsets are used
    #[serde(default)]
    row: Vec<RowToml>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RowToml {
    number: i64,
    offsets: Vec<f64>,
}

/// Everything the renderer needs to place key labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub offsets: OffsetTable,
    pub geometry: Geometry,
    pub style: TextStyle,
}

impl Layout {
    pub fn new(offsets: OffsetTable) -> Self {
        Self {
            offsets,
            ..Self::default()
        }
    }

    /// Parse a layout TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a layout from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, LayoutError> {
        let toml_layout: LayoutToml =
            toml::from_str(content).map_err(|e| LayoutError::TomlParse(e.to_string()))?;

        let offsets = if toml_layout.row.is_empty() {
            log::debug!("layout defines no rows, using built-in offsets");
            OffsetTable::builtin()
        } else {
            let mut table = OffsetTable::new();
            for entry in toml_layout.row {
                let row = u8::try_from(entry.number)
                    .map_err(|_| LayoutError::InvalidRow(entry.number))?;
                table.insert_row(row, entry.offsets)?;
            }
            table
        };

        let geometry = toml_layout.geometry.unwrap_or_default();
        geometry.validate()?;

        Ok(Self {
            offsets,
            geometry,
            style: toml_layout.style.unwrap_or_default(),
        })
    }

    /// Default layout path (~/.config/keysvg/layout.toml)
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keysvg").join("layout.toml"))
    }

    /// Load from the default location, falling back to the built-in layout
    #[cfg(feature = "cli")]
    pub fn load_default() -> Result<Self, LayoutError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::info!("loading layout from {}", path.display());
                return Self::from_toml_path(path);
            }
        }
        Ok(Self::default())
    }
}
