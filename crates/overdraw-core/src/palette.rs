//! Named pen colors and their resolved values.

use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Palette errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Unknown color name: {0}")]
    UnknownColor(String),
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

/// A resolved stroke color (RGBA8).
///
/// The canonical text form is the lowercase `#rrggbb` string; alpha is only
/// written when it is not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidHex(hex.to_string());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let r = byte(&digits[0..1])? * 17;
                let g = byte(&digits[1..2])? * 17;
                let b = byte(&digits[2..3])? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::new(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lowercase hex string, e.g. `#ff0100`.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for StrokeColor {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for StrokeColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StrokeColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Color> for StrokeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A named palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: StrokeColor,
}

/// Read-only lookup table from color names to resolved colors.
///
/// Entries keep their insertion order so a color picker can list them as given.
/// Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PaletteEntry>", into = "Vec<PaletteEntry>")]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_entries([
            ("red", StrokeColor::rgb(0xff, 0x01, 0x00)),
            ("blue", StrokeColor::rgb(0x06, 0x25, 0xf2)),
            ("yellow", StrokeColor::rgb(0xff, 0xea, 0x00)),
            ("green", StrokeColor::rgb(0x13, 0xff, 0x00)),
            ("black", StrokeColor::rgb(0x0e, 0x0e, 0x0e)),
            ("brown", StrokeColor::rgb(0xa9, 0x42, 0x2d)),
        ])
    }
}

impl From<Vec<PaletteEntry>> for Palette {
    fn from(entries: Vec<PaletteEntry>) -> Self {
        Self::from_entries(entries.into_iter().map(|e| (e.name, e.color)))
    }
}

impl From<Palette> for Vec<PaletteEntry> {
    fn from(palette: Palette) -> Self {
        palette.entries
    }
}

impl Palette {
    /// Build a palette. A repeated name keeps its first color.
    pub fn from_entries<N: Into<String>>(
        entries: impl IntoIterator<Item = (N, StrokeColor)>,
    ) -> Self {
        let mut palette = Self { entries: Vec::new() };
        for (name, color) in entries {
            let name = name.into();
            if !palette.contains(&name) {
                palette.entries.push(PaletteEntry { name, color });
            }
        }
        palette
    }

    /// Look up an entry by name (case-insensitive).
    pub fn entry(&self, name: &str) -> Result<&PaletteEntry, PaletteError> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PaletteError::UnknownColor(name.to_string()))
    }

    /// Resolve a color name (case-insensitive).
    pub fn resolve(&self, name: &str) -> Result<StrokeColor, PaletteError> {
        self.entry(name).map(|e| e.color)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Color names in palette order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
