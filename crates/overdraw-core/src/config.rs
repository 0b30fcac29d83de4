//! Canvas configuration.

use crate::palette::{Palette, PaletteError, StrokeColor};
use crate::recorder::{DEFAULT_COLOR, DEFAULT_THICKNESS};
use crate::stroke::{MAX_THICKNESS, StrokeTool};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default spline tension for stroke paths.
pub const DEFAULT_TENSION: f64 = 1.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("Thickness {0} is out of range (max {max})", max = MAX_THICKNESS)]
    InvalidThickness(u8),
}

/// Settings a host passes when creating a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Color names offered by the control surface.
    pub palette: Palette,
    pub default_tool: StrokeTool,
    /// Must name a palette entry.
    pub default_color: String,
    pub default_thickness: u8,
    /// Editing surface size before zoom.
    pub editor_size: Size,
    pub preview_size: Size,
    /// Fill under the background image.
    pub background_color: StrokeColor,
    /// Spline tension used when strokes are turned into paths.
    pub tension: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            default_tool: StrokeTool::Pen,
            default_color: DEFAULT_COLOR.to_string(),
            default_thickness: DEFAULT_THICKNESS,
            editor_size: Size::new(800.0, 300.0),
            preview_size: Size::new(800.0, 300.0),
            background_color: StrokeColor::rgb(255, 255, 255),
            tension: DEFAULT_TENSION,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.palette.resolve(&self.default_color)?;
        if self.default_thickness > MAX_THICKNESS {
            return Err(ConfigError::InvalidThickness(self.default_thickness));
        }
        Ok(())
    }
}
