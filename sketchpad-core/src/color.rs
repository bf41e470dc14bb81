//! # Color
//!
//! Colors cross the engine boundary as `#rrggbb` strings and live internally
//! as straight (non-premultiplied) 8-bit RGBA. Premultiplication is a raster
//! backend concern and happens at the surface seam.

/// Straight-alpha 8-bit RGBA color.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::opaque(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }
    /// Parse a `#rrggbb` string, case-insensitive. Alpha is always opaque -
    /// stroke opacity is a separate input, never encoded in the color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(hex.to_owned()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::BadLength(hex.to_owned()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::BadDigit(hex.to_owned()))
        };
        Ok(Self::opaque(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        ))
    }
    /// Parse leniently. A malformed string is a caller contract violation -
    /// repaired to `fallback` with a warning rather than propagated.
    #[must_use]
    pub fn from_hex_or(hex: &str, fallback: Self) -> Self {
        match Self::from_hex(hex) {
            Ok(color) => color,
            Err(err) => {
                log::warn!("malformed color string: {err}; falling back to {fallback}");
                fallback
            }
        }
    }
    /// Format as `#rrggbb`, lowercase. Alpha does not round-trip.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 0xFF {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}@{:02x}", self.to_hex(), self.a)
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color {0:?} does not start with '#'")]
    MissingHash(String),
    #[error("color {0:?} is not six hex digits")]
    BadLength(String),
    #[error("color {0:?} contains a non-hex digit")]
    BadDigit(String),
}
