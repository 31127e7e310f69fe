//! # Tintwheel Theme - dark and tinted themes for web pages
//!
//! `tintwheel-theme` applies a color theme to a page and takes it off again.
//! A theme is a handful of visual overrides:
//!
//! - four CSS custom properties on the root (background, text, accent,
//!   overlay alpha) read by a bundled stylesheet
//! - a full-page overlay element tinted with the accent color
//! - an optional root class that re-inverts images and video
//!
//! The page itself is abstract. [`ThemeApplier`] writes through the
//! [`Document`] trait, which a browser binding implements over the live DOM
//! and [`MemoryDocument`] implements in memory.
//!
//! ## Modules
//!
//! - [`ThemeDescriptor`] / [`Theme`]: external records and validated themes
//! - [`ThemeApplier`]: apply, remove, and re-assert after page mutations
//! - [`Command`] / [`ApplyReport`]: the page-side message protocol
//! - [`Settings`]: presets, per-site overrides, block list
//! - [`with_recovery`]: retry an operation once after a recovery step
//!
//! ## Quick Start
//!
//! ```rust
//! use tintwheel_theme::{handle_message, MemoryDocument, Settings, Status, ThemeApplier};
//!
//! let settings = Settings::default();
//! let theme = settings.resolve("https://example.com/").unwrap().unwrap();
//!
//! let doc = MemoryDocument::new();
//! let mut applier = ThemeApplier::new();
//! applier.apply(&theme, &doc).unwrap();
//! assert_eq!(doc.variable("--tw-accent").as_deref(), Some("#82aaff"));
//!
//! let report = handle_message(r#"{"action":"disableColorScheme"}"#, &mut applier, &doc);
//! assert_eq!(report.status, Status::Removed);
//! ```

mod applier;
mod command;
mod document;
mod error;
mod memory;
mod recovery;
mod report;
mod settings;
mod theme;

pub use applier::{Applied, ApplierConfig, ThemeApplier, VariableNames};
pub use command::{handle_message, Command};
pub use document::{Document, MutationBatch, MutationListener, Subscription};
pub use error::{DocumentError, ThemeError};
pub use memory::{DocumentSnapshot, ElementKind, ElementSnapshot, MemoryDocument};
pub use recovery::with_recovery;
pub use report::{ApplyReport, Status};
pub use settings::{domain_of, Options, PreserveImages, Settings};
pub use theme::{
    Theme, ThemeDescriptor, ThemeMode, DEFAULT_ACCENT, DEFAULT_BACKGROUND, DEFAULT_OVERLAY_ALPHA,
};
