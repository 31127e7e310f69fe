//! sRGB color values and hex parsing.
//!
//! Colors travel through settings and theme records as CSS hex strings. This
//! module decodes them into [`Rgb`] and encodes them back:
//!
//! - 6-digit hex: `"#ff6b35"` or `"ff6b35"`
//! - 3-digit shorthand: `"#f80"` (each digit doubled, so `#f80` is `#ff8800`)
//! - Empty input decodes to black
//!
//! Anything else fails with [`ColorError::InvalidColor`] rather than being
//! guessed at.
//!
//! # Example
//!
//! ```rust
//! use tintwheel_color::Rgb;
//!
//! let accent: Rgb = "#f80".parse().unwrap();
//! assert_eq!(accent, Rgb(255, 136, 0));
//! assert_eq!(accent.to_hex(), "#ff8800");
//! assert_eq!(accent.to_rgba(0.12), "rgba(255, 136, 0, 0.12)");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::error::ColorError;

/// A simple RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure black, `#000000`.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Pure white, `#ffffff`.
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Red channel.
    pub fn r(self) -> u8 {
        self.0
    }

    /// Green channel.
    pub fn g(self) -> u8 {
        self.1
    }

    /// Blue channel.
    pub fn b(self) -> u8 {
        self.2
    }

    /// Formats the color as a lowercase 6-digit hex string with a leading `#`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Formats the color as a CSS `rgba()` value with the given alpha.
    ///
    /// The alpha is written with the shortest representation that round-trips,
    /// so `1.0` becomes `1` and `0.12` stays `0.12`.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
    }
}

/// Decodes a hex color string.
///
/// A leading `#` is optional and surrounding whitespace is ignored. Empty
/// input is black.
///
/// # Errors
///
/// Returns [`ColorError::InvalidColor`] if the input is not 3 or 6 hex digits.
pub fn decode_hex(input: &str) -> Result<Rgb, ColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Rgb::BLACK);
    }

    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    // from_str_radix tolerates a leading '+', so check digits up front
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::invalid(input, "expected hex digits 0-9, a-f"));
    }

    match hex.len() {
        // #rgb -> #rrggbb
        3 => {
            let r = nibble(&hex[0..1], input)? * 17;
            let g = nibble(&hex[1..2], input)? * 17;
            let b = nibble(&hex[2..3], input)? * 17;
            Ok(Rgb(r, g, b))
        }
        6 => {
            let r = nibble(&hex[0..2], input)?;
            let g = nibble(&hex[2..4], input)?;
            let b = nibble(&hex[4..6], input)?;
            Ok(Rgb(r, g, b))
        }
        n => Err(ColorError::invalid(
            input,
            format!("must be 3 or 6 digits, got {}", n),
        )),
    }
}

fn nibble(digits: &str, input: &str) -> Result<u8, ColorError> {
    u8::from_str_radix(digits, 16).map_err(|_| ColorError::invalid(input, "invalid hex"))
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map_err(de::Error::custom)
    }
}
