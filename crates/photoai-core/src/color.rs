//! RGBA colors and two-stop gradient definitions.
//!
//! Colors travel as typed values from the palette to the compositor. The
//! only string handling is the hex form used at the serialization boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}': expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from a `0xRRGGBB` literal.
    pub const fn from_hex_u32(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rrggbb`, `#rrggbbaa` or the `#rgb` shorthand. The leading `#`
    /// is optional.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(value.to_string());
        let digits = value.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16).ok_or_else(err)? as u8;
                    *slot = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(err()),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation in premultiplied sRGB, `t` in `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let a0 = self.a as f32 / 255.0;
        let a1 = other.a as f32 / 255.0;
        let a = a0 + (a1 - a0) * t;
        if a <= f32::EPSILON {
            return [0, 0, 0, 0];
        }
        let mix = |c0: u8, c1: u8| {
            let premul = c0 as f32 * a0 + (c1 as f32 * a1 - c0 as f32 * a0) * t;
            (premul / a).clamp(0.0, 255.0).round() as u8
        };
        [
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            (a * 255.0).round() as u8,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Color::from_hex(value)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The two stops of a linear gradient, start first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradientStops {
    pub start: Color,
    pub end: Color,
}

impl GradientStops {
    pub const fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }

    /// Parse both stops from hex strings.
    pub fn from_hex(start: &str, end: &str) -> Result<Self, ColorParseError> {
        Ok(Self::new(Color::from_hex(start)?, Color::from_hex(end)?))
    }
}
