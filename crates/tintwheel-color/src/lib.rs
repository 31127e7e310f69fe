//! # Tintwheel Color - contrast math for page tinting
//!
//! `tintwheel-color` holds the pure color functions used when a dark or tinted
//! theme is laid over a web page:
//!
//! - [`decode_hex`] / [`Rgb`]: parse `#rgb` and `#rrggbb` strings, encode back
//!   to hex or CSS `rgba()`
//! - [`relative_luminance`] and [`contrast_ratio`]: the WCAG 2.x formulas
//! - [`pick_readable_text_color`]: black or white text for a background
//!
//! Nothing here performs I/O or holds state.
//!
//! ## Quick Start
//!
//! ```rust
//! use tintwheel_color::{contrast_ratio, decode_hex, pick_readable_text_color, TextColor};
//!
//! let bg = decode_hex("#0f1113").unwrap();
//! let text = decode_hex("#e6e6e6").unwrap();
//! assert!(contrast_ratio(bg, text) > 14.0);
//!
//! let picked = pick_readable_text_color(bg);
//! assert_eq!(picked.color, TextColor::White);
//! ```

mod contrast;
mod error;
mod rgb;

pub use contrast::{
    contrast_ratio, meets_threshold, pick_readable_text_color, relative_luminance, ReadableText,
    TextColor, WCAG_AA_NORMAL,
};
pub use error::ColorError;
pub use rgb::{decode_hex, Rgb};
