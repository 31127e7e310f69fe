//! WCAG 2.x relative luminance and contrast ratio.
//!
//! These are the formulas from the WCAG 2.x definitions, reproduced exactly:
//!
//! - channels are linearized with the 0.03928 knee (the WCAG 2.0 constant,
//!   not the 0.04045 of IEC 61966-2-1), then weighted 0.2126 / 0.7152 / 0.0722
//! - contrast is `(L_lighter + 0.05) / (L_darker + 0.05)`, in `[1, 21]`
//!
//! [`pick_readable_text_color`] uses them to choose black or white text for a
//! page background.
//!
//! # Example
//!
//! ```rust
//! use tintwheel_color::{pick_readable_text_color, Rgb, TextColor};
//!
//! let readable = pick_readable_text_color(Rgb(15, 17, 19));
//! assert_eq!(readable.color, TextColor::White);
//! assert!(readable.ratio > 18.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::rgb::Rgb;

/// Contrast ratio recommended by WCAG AA for normal-size text.
pub const WCAG_AA_NORMAL: f64 = 4.5;

/// Linearize one sRGB channel (0–255) using the WCAG 2.x curve.
fn channel_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, in `[0, 1]`.
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * channel_to_linear(color.0)
        + 0.7152 * channel_to_linear(color.1)
        + 0.0722 * channel_to_linear(color.2)
}

/// Contrast ratio between two colors, in `[1, 21]`. Order does not matter.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Returns true when `ratio` reaches `threshold`.
pub fn meets_threshold(ratio: f64, threshold: f64) -> bool {
    ratio >= threshold
}

/// The two text colors a background can be paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    /// `#ffffff`
    White,
    /// `#000000`
    Black,
}

impl TextColor {
    /// The RGB value of this text color.
    pub fn rgb(self) -> Rgb {
        match self {
            TextColor::White => Rgb::WHITE,
            TextColor::Black => Rgb::BLACK,
        }
    }
}

/// The outcome of [`pick_readable_text_color`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadableText {
    /// Chosen text color.
    pub color: TextColor,
    /// Contrast of the chosen color against the background.
    pub ratio: f64,
}

impl ReadableText {
    /// Chooses between the two candidate ratios; ties go to white.
    pub(crate) fn choose(against_white: f64, against_black: f64) -> Self {
        if against_white >= against_black {
            ReadableText {
                color: TextColor::White,
                ratio: against_white,
            }
        } else {
            ReadableText {
                color: TextColor::Black,
                ratio: against_black,
            }
        }
    }
}

/// Picks black or white text, whichever contrasts more with `background`.
///
/// White wins ties.
pub fn pick_readable_text_color(background: Rgb) -> ReadableText {
    ReadableText::choose(
        contrast_ratio(background, Rgb::WHITE),
        contrast_ratio(background, Rgb::BLACK),
    )
}
