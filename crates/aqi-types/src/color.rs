//! Display colors and the fixed accent palette.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// A 24-bit RGB display color.
///
/// # Example
///
/// ```
/// use aqi_types::Rgb;
///
/// let green: Rgb = "#00E400".parse().unwrap();
/// assert_eq!(green, Rgb::new(0x00, 0xE4, 0x00));
/// assert_eq!(green.to_string(), "#00E400");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color used for statuses that are not part of the severity table.
pub const FALLBACK_GRAY: Rgb = Rgb::new(0x88, 0x88, 0x88);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    /// Parse `#RRGGBB` or the CSS shorthand `#RGB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Rgb::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                    channel(4).map_err(|_| invalid())?,
                ))
            }
            3 => {
                // #888 expands to #888888
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Rgb::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(1).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of entries in the accent palette.
pub const PALETTE_SIZE: usize = 10;

const PALETTE: [(&str, Rgb); PALETTE_SIZE] = [
    ("Cyan", Rgb::new(0x00, 0xCE, 0xD1)),
    ("Green", Rgb::new(0x00, 0xE4, 0x00)),
    ("Blue", Rgb::new(0x4A, 0x90, 0xE2)),
    ("Purple", Rgb::new(0x9B, 0x59, 0xB6)),
    ("Red", Rgb::new(0xE7, 0x4C, 0x3C)),
    ("Orange", Rgb::new(0xF3, 0x9C, 0x12)),
    ("Turquoise", Rgb::new(0x1A, 0xBC, 0x9C)),
    ("Pink", Rgb::new(0xE9, 0x1E, 0x63)),
    ("Light Blue", Rgb::new(0x00, 0xBC, 0xD4)),
    ("Dark Purple", Rgb::new(0x8E, 0x44, 0xAD)),
];

/// One entry of the fixed 10-color accent palette.
///
/// Held as transient UI state; the default is the first entry (cyan).
///
/// ```
/// use aqi_types::PaletteColor;
///
/// assert_eq!(PaletteColor::default().to_string(), "#00CED1");
/// assert_eq!(PaletteColor::all().count(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PaletteColor(u8);

impl PaletteColor {
    /// Get the palette entry at `index`, if it exists.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < PALETTE_SIZE).then(|| Self(index as u8))
    }

    /// Iterate over the palette in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PALETTE_SIZE as u8).map(Self)
    }

    /// Position of this entry in the palette.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Human-readable color name.
    #[must_use]
    pub fn name(self) -> &'static str {
        PALETTE[self.index()].0
    }

    /// RGB value of this entry.
    #[must_use]
    pub fn rgb(self) -> Rgb {
        PALETTE[self.index()].1
    }

    /// Find the palette entry matching an RGB value.
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Option<Self> {
        Self::all().find(|c| c.rgb() == rgb)
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rgb().fmt(f)
    }
}

impl FromStr for PaletteColor {
    type Err = ParseError;

    /// Accepts a palette hex value (`#00CED1`) or a palette name (`cyan`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(found) = Self::all().find(|c| c.name().eq_ignore_ascii_case(s.trim())) {
            return Ok(found);
        }
        let rgb: Rgb = s.parse()?;
        Self::from_rgb(rgb).ok_or_else(|| ParseError::InvalidColor(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl Serialize for PaletteColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PaletteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!("#7E0023".parse::<Rgb>().unwrap(), Rgb::new(0x7E, 0x00, 0x23));
        assert_eq!("#ff7e00".parse::<Rgb>().unwrap(), Rgb::new(0xFF, 0x7E, 0x00));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!("#888".parse::<Rgb>().unwrap(), FALLBACK_GRAY);
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert!("00E400".parse::<Rgb>().is_err());
        assert!("#00E40".parse::<Rgb>().is_err());
        assert!("#GGGGGG".parse::<Rgb>().is_err());
        assert!("#+1+2+3".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_palette_order() {
        let hexes: Vec<String> = PaletteColor::all().map(|c| c.to_string()).collect();
        assert_eq!(
            hexes,
            [
                "#00CED1", "#00E400", "#4A90E2", "#9B59B6", "#E74C3C", "#F39C12", "#1ABC9C",
                "#E91E63", "#00BCD4", "#8E44AD"
            ]
        );
    }

    #[test]
    fn test_palette_from_index_bounds() {
        assert!(PaletteColor::from_index(9).is_some());
        assert!(PaletteColor::from_index(10).is_none());
    }

    #[test]
    fn test_palette_from_str() {
        assert_eq!(
            "light blue".parse::<PaletteColor>().unwrap(),
            PaletteColor::from_index(8).unwrap()
        );
        assert_eq!(
            "#e91e63".parse::<PaletteColor>().unwrap().name(),
            "Pink"
        );
        // Valid hex that is not in the palette
        assert!("#123456".parse::<PaletteColor>().is_err());
    }

    #[test]
    fn test_palette_serde() {
        let color = PaletteColor::from_index(3).unwrap();
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#9B59B6\"");
        let back: PaletteColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
