//! Theme records and validated themes.
//!
//! Themes arrive from outside the core (popup, options page, stored presets)
//! as [`ThemeDescriptor`]s: plain records whose fields are all optional.
//! Defaults are filled in exactly once, when a descriptor is validated into a
//! [`Theme`]:
//!
//! | field          | default      |
//! |----------------|--------------|
//! | `bg`           | `#0f1113`    |
//! | `text`         | derived from `bg` by contrast |
//! | `accent`       | `#000000`    |
//! | `overlayAlpha` | `0.12`       |
//! | `invertMedia`  | `false`      |
//! | `mode`         | `stylesheet` |
//!
//! A [`Theme`] always holds decoded colors and an alpha in `[0, 1]`; nothing
//! downstream re-checks them.
//!
//! # From YAML
//!
//! ```rust
//! use tintwheel_theme::{Theme, ThemeMode};
//!
//! let theme = Theme::from_yaml(r##"
//! bg: "#0b0a0a"
//! accent: "#f08c00"
//! overlayAlpha: 0.2
//! mode: tint
//! "##).unwrap();
//!
//! assert_eq!(theme.mode(), ThemeMode::Tint);
//! assert_eq!(theme.text(), None);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tintwheel_color::{decode_hex, Rgb};

use crate::error::ThemeError;

/// Background used when a record has none.
pub const DEFAULT_BACKGROUND: Rgb = Rgb(0x0f, 0x11, 0x13);
/// Overlay tint used when a record has no accent.
pub const DEFAULT_ACCENT: Rgb = Rgb::BLACK;
/// Overlay alpha used when a record has none.
pub const DEFAULT_OVERLAY_ALPHA: f64 = 0.12;

/// Which visual strategy a theme was authored for.
///
/// Stored and passed through; application does not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Injected stylesheet driven by CSS variables.
    #[default]
    Stylesheet,
    /// Translucent tint over the page.
    Tint,
    /// Inverted page colors.
    Invert,
}

/// An unvalidated theme record, as stored in settings or sent by the popup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeDescriptor {
    /// Background color (hex).
    #[serde(alias = "background", skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    /// Text color (hex); absent or empty means "derive from background".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Overlay tint (hex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    /// Overlay alpha in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_alpha: Option<f64>,
    /// Whether images and video get the inversion treatment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert_media: Option<bool>,
    /// Authoring mode tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ThemeMode>,
}

impl ThemeDescriptor {
    /// The stock global preset: neutral dark with a soft blue accent.
    pub fn global_default() -> Self {
        Self::preset("#0f1113", "#e6e6e6", "#82aaff", ThemeMode::Stylesheet)
    }

    pub(crate) fn preset(bg: &str, text: &str, accent: &str, mode: ThemeMode) -> Self {
        Self {
            bg: Some(bg.to_string()),
            text: Some(text.to_string()),
            accent: Some(accent.to_string()),
            overlay_alpha: Some(DEFAULT_OVERLAY_ALPHA),
            invert_media: None,
            mode: Some(mode),
        }
    }

    /// Validates the record and fills in defaults.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::InvalidColor`] for a malformed color
    /// - [`ThemeError::InvalidTheme`] for an alpha outside `[0, 1]`
    pub fn validate(&self) -> Result<Theme, ThemeError> {
        let background = match self.bg.as_deref() {
            Some(bg) => decode_hex(bg)?,
            None => DEFAULT_BACKGROUND,
        };
        let text = match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(decode_hex(text)?),
            _ => None,
        };
        let accent = match self.accent.as_deref() {
            Some(accent) => decode_hex(accent)?,
            None => DEFAULT_ACCENT,
        };

        let theme = Theme {
            background,
            text,
            accent,
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            invert_media: self.invert_media.unwrap_or(false),
            mode: self.mode.unwrap_or_default(),
        };
        match self.overlay_alpha {
            Some(alpha) => theme.with_overlay_alpha(alpha),
            None => Ok(theme),
        }
    }
}

/// A validated theme.
///
/// Immutable once built; the `with_*` methods return modified copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    background: Rgb,
    text: Option<Rgb>,
    accent: Rgb,
    overlay_alpha: f64,
    invert_media: bool,
    mode: ThemeMode,
}

impl Theme {
    /// Creates a theme over `background` with every other field defaulted.
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            text: None,
            accent: DEFAULT_ACCENT,
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            invert_media: false,
            mode: ThemeMode::default(),
        }
    }

    /// Parses and validates a YAML theme record.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Parse`] for malformed YAML, or any validation
    /// error from [`ThemeDescriptor::validate`].
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let descriptor: ThemeDescriptor =
            serde_yaml::from_str(yaml).map_err(|e| ThemeError::parse("theme", e.to_string()))?;
        descriptor.validate()
    }

    /// Parses and validates a JSON theme record.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let descriptor: ThemeDescriptor =
            serde_json::from_str(json).map_err(|e| ThemeError::parse("theme", e.to_string()))?;
        descriptor.validate()
    }

    /// Loads a theme file. `.json` files are read as JSON, anything else as
    /// YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Load`] if the file cannot be read, otherwise the
    /// same errors as [`from_yaml`](Theme::from_yaml).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let (content, is_json) = read_record_file(path.as_ref())?;
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Sets an explicit text color.
    pub fn with_text(mut self, text: Rgb) -> Self {
        self.text = Some(text);
        self
    }

    /// Clears the text color so it is derived at apply time.
    pub fn without_text(mut self) -> Self {
        self.text = None;
        self
    }

    /// Sets the overlay tint.
    pub fn with_accent(mut self, accent: Rgb) -> Self {
        self.accent = accent;
        self
    }

    /// Sets the overlay alpha.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidTheme`] unless `alpha` is finite and in
    /// `[0, 1]`.
    pub fn with_overlay_alpha(mut self, alpha: f64) -> Result<Self, ThemeError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ThemeError::invalid(
                "overlayAlpha",
                format!("{} is outside [0, 1]", alpha),
            ));
        }
        self.overlay_alpha = alpha;
        Ok(self)
    }

    /// Turns media inversion on or off.
    pub fn with_invert_media(mut self, invert: bool) -> Self {
        self.invert_media = invert;
        self
    }

    /// Sets the mode tag.
    pub fn with_mode(mut self, mode: ThemeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// The explicit text color, if one was given.
    pub fn text(&self) -> Option<Rgb> {
        self.text
    }

    pub fn accent(&self) -> Rgb {
        self.accent
    }

    pub fn overlay_alpha(&self) -> f64 {
        self.overlay_alpha
    }

    pub fn invert_media(&self) -> bool {
        self.invert_media
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Converts back into a record, with every field filled in.
    pub fn to_descriptor(&self) -> ThemeDescriptor {
        ThemeDescriptor {
            bg: Some(self.background.to_hex()),
            text: self.text.map(Rgb::to_hex),
            accent: Some(self.accent.to_hex()),
            overlay_alpha: Some(self.overlay_alpha),
            invert_media: Some(self.invert_media),
            mode: Some(self.mode),
        }
    }
}

/// Reads a record file, reporting whether it should be parsed as JSON.
pub(crate) fn read_record_file(path: &Path) -> Result<(String, bool), ThemeError> {
    let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    Ok((content, is_json))
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

impl TryFrom<&ThemeDescriptor> for Theme {
    type Error = ThemeError;

    fn try_from(descriptor: &ThemeDescriptor) -> Result<Self, Self::Error> {
        descriptor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Descriptor defaults
    // =========================================================================

    #[test]
    fn test_empty_descriptor_uses_defaults() {
        let theme = ThemeDescriptor::default().validate().unwrap();
        assert_eq!(theme.background(), DEFAULT_BACKGROUND);
        assert_eq!(theme.text(), None);
        assert_eq!(theme.accent(), Rgb::BLACK);
        assert_eq!(theme.overlay_alpha(), 0.12);
        assert!(!theme.invert_media());
        assert_eq!(theme.mode(), ThemeMode::Stylesheet);
    }

    #[test]
    fn test_empty_text_means_derived() {
        let descriptor = ThemeDescriptor {
            text: Some("".into()),
            ..Default::default()
        };
        assert_eq!(descriptor.validate().unwrap().text(), None);
    }

    #[test]
    fn test_explicit_text_kept() {
        let descriptor = ThemeDescriptor {
            text: Some("#123456".into()),
            ..Default::default()
        };
        assert_eq!(
            descriptor.validate().unwrap().text(),
            Some(Rgb(0x12, 0x34, 0x56))
        );
    }

    #[test]
    fn test_empty_accent_is_black() {
        let descriptor = ThemeDescriptor {
            accent: Some("".into()),
            ..Default::default()
        };
        assert_eq!(descriptor.validate().unwrap().accent(), Rgb::BLACK);
    }

    // =========================================================================
    // Validation failures
    // =========================================================================

    #[test]
    fn test_invalid_background_rejected() {
        let descriptor = ThemeDescriptor {
            bg: Some("#zzzzzz".into()),
            ..Default::default()
        };
        assert!(matches!(
            descriptor.validate(),
            Err(ThemeError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_invalid_text_rejected() {
        let descriptor = ThemeDescriptor {
            text: Some("#1234".into()),
            ..Default::default()
        };
        assert!(matches!(
            descriptor.validate(),
            Err(ThemeError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        for alpha in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let descriptor = ThemeDescriptor {
                overlay_alpha: Some(alpha),
                ..Default::default()
            };
            assert!(
                matches!(
                    descriptor.validate(),
                    Err(ThemeError::InvalidTheme {
                        field: "overlayAlpha",
                        ..
                    })
                ),
                "alpha {} should be rejected",
                alpha
            );
        }
    }

    #[test]
    fn test_alpha_bounds_accepted() {
        assert!(Theme::default().with_overlay_alpha(0.0).is_ok());
        assert!(Theme::default().with_overlay_alpha(1.0).is_ok());
    }

    // =========================================================================
    // Serde
    // =========================================================================

    #[test]
    fn test_descriptor_from_popup_json() {
        let descriptor: ThemeDescriptor = serde_json::from_str(
            r##"{"bg":"#0f1113","text":null,"accent":"#82aaff","overlayAlpha":0.2,"invertMedia":true}"##,
        )
        .unwrap();
        assert_eq!(descriptor.text, None);
        assert_eq!(descriptor.overlay_alpha, Some(0.2));
        assert_eq!(descriptor.invert_media, Some(true));
        assert_eq!(descriptor.mode, None);
    }

    #[test]
    fn test_descriptor_accepts_background_alias() {
        let descriptor: ThemeDescriptor =
            serde_json::from_str(r##"{"background":"#ffffff"}"##).unwrap();
        assert_eq!(descriptor.bg.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_descriptor_skips_absent_fields() {
        let descriptor = ThemeDescriptor {
            bg: Some("#000000".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&descriptor).unwrap(),
            r##"{"bg":"#000000"}"##
        );
    }

    #[test]
    fn test_to_descriptor_roundtrip() {
        let theme = Theme::new(Rgb(1, 2, 3))
            .with_text(Rgb(250, 250, 250))
            .with_accent(Rgb(240, 140, 0))
            .with_invert_media(true)
            .with_mode(ThemeMode::Invert)
            .with_overlay_alpha(0.3)
            .unwrap();
        assert_eq!(theme.to_descriptor().validate().unwrap(), theme);
    }

    // =========================================================================
    // YAML / JSON / file loading
    // =========================================================================

    #[test]
    fn test_from_yaml() {
        let theme = Theme::from_yaml(
            r##"
            bg: "#0b0a0a"
            text: "#f3efe6"
            accent: "#f08c00"
            mode: tint
            "##,
        )
        .unwrap();
        assert_eq!(theme.background(), Rgb(0x0b, 0x0a, 0x0a));
        assert_eq!(theme.text(), Some(Rgb(0xf3, 0xef, 0xe6)));
        assert_eq!(theme.mode(), ThemeMode::Tint);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = Theme::from_yaml("bg: [");
        assert!(matches!(result, Err(ThemeError::Parse { .. })));
    }

    #[test]
    fn test_from_yaml_unknown_mode() {
        assert!(Theme::from_yaml("mode: sepia").is_err());
    }

    #[test]
    fn test_from_json() {
        let theme = Theme::from_json(r##"{"bg":"#fff","invertMedia":true}"##).unwrap();
        assert_eq!(theme.background(), Rgb::WHITE);
        assert!(theme.invert_media());
    }

    #[test]
    fn test_from_file_yaml() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("warm.yaml");
        fs::write(&path, "bg: \"#0b0a0a\"\naccent: \"#f08c00\"\n").unwrap();

        let theme = Theme::from_file(&path).unwrap();
        assert_eq!(theme.accent(), Rgb(0xf0, 0x8c, 0x00));
    }

    #[test]
    fn test_from_file_json() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("neutral.json");
        fs::write(&path, r##"{"bg":"#0f1113","overlayAlpha":0.5}"##).unwrap();

        let theme = Theme::from_file(&path).unwrap();
        assert_eq!(theme.overlay_alpha(), 0.5);
    }

    #[test]
    fn test_from_file_not_found() {
        let result = Theme::from_file("/nonexistent/path/theme.yaml");
        assert!(matches!(result, Err(ThemeError::Load { .. })));
    }
}
