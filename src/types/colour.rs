//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::error::{XsError, Result};

/// Amount a key colour is nudged away from its stitch colour (20% of 255).
pub const KEY_SHIFT: i16 = (255.0 * 0.2) as i16;

/// An RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a six digit hex colour, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(XsError::invalid(format!("Invalid hex colour: {}", s)));
        }

        Ok(Self::rgb(
            parse_hex_byte(&hex[0..2])?,
            parse_hex_byte(&hex[2..4])?,
            parse_hex_byte(&hex[4..6])?,
        ))
    }

    /// Convert to an RGB array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance to another colour.
    pub fn distance_squared(self, other: Colour) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// The colour used to draw this colour's symbols in the real-colour key.
    ///
    /// Brightened by [`KEY_SHIFT`], or darkened by the same amount when any
    /// channel is already too bright to show a brighter symbol.
    pub fn key_shift(self) -> Self {
        let limit = 255 - KEY_SHIFT;
        let shift = if self.to_array().iter().any(|&c| c as i16 > limit) {
            -KEY_SHIFT
        } else {
            KEY_SHIFT
        };
        let nudge = |c: u8| (c as i16 + shift).clamp(0, 255) as u8;
        Self::rgb(nudge(self.r), nudge(self.g), nudge(self.b))
    }
}

impl From<Rgb<u8>> for Colour {
    fn from(px: Rgb<u8>) -> Self {
        let [r, g, b] = px.0;
        Self::rgb(r, g, b)
    }
}

impl From<Colour> for Rgb<u8> {
    fn from(c: Colour) -> Self {
        Rgb(c.to_array())
    }
}

impl FromStr for Colour {
    type Err = XsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| XsError::invalid(format!("Invalid hex byte: {}", s)))
}
