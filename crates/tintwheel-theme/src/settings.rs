//! User settings and per-site theme resolution.
//!
//! [`Settings`] is the in-memory model behind the options and popup pages:
//! a global preset, named presets, per-site overrides keyed by host name, a
//! block list and a couple of options. It derives serde so a storage layer
//! can read and write it as a camelCase record:
//!
//! ```yaml
//! globalPreset: { bg: "#0f1113", text: "#e6e6e6", accent: "#82aaff" }
//! presets:
//!   Warm Tint: { bg: "#0b0a0a", text: "#f3efe6", accent: "#f08c00", mode: tint }
//! perSite:
//!   example.com: { bg: "#000000" }
//! blockedSites: [bank.example]
//! options: { contrastThreshold: 4.5, preserveImages: auto }
//! ```
//!
//! Missing keys take their defaults.
//!
//! Resolution for a page URL: a blocked host gets no theme; otherwise the
//! host's per-site entry wins over the global preset.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tintwheel_color::{decode_hex, WCAG_AA_NORMAL};
use tracing::debug;
use url::Url;

use crate::error::ThemeError;
use crate::theme::{read_record_file, Theme, ThemeDescriptor, ThemeMode};

/// How images and video are treated when a theme inverts media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreserveImages {
    #[default]
    Auto,
    Always,
    Never,
}

/// Global options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Minimum acceptable contrast ratio.
    pub contrast_threshold: f64,
    pub preserve_images: PreserveImages,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            contrast_threshold: WCAG_AA_NORMAL,
            preserve_images: PreserveImages::Auto,
        }
    }
}

/// The complete settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub global_preset: ThemeDescriptor,
    pub presets: BTreeMap<String, ThemeDescriptor>,
    pub per_site: BTreeMap<String, ThemeDescriptor>,
    pub blocked_sites: Vec<String>,
    pub options: Options,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global_preset: ThemeDescriptor::global_default(),
            presets: default_presets(),
            per_site: BTreeMap::new(),
            blocked_sites: Vec::new(),
            options: Options::default(),
        }
    }
}

fn default_presets() -> BTreeMap<String, ThemeDescriptor> {
    let mut presets = BTreeMap::new();
    presets.insert(
        "Dark Neutral".to_string(),
        ThemeDescriptor::preset("#0f1113", "#e6e6e6", "#82aaff", ThemeMode::Stylesheet),
    );
    presets.insert(
        "Warm Tint".to_string(),
        ThemeDescriptor::preset("#0b0a0a", "#f3efe6", "#f08c00", ThemeMode::Tint),
    );
    presets
}

/// Host name of a URL, or `None` if it does not parse or has no host.
///
/// ```rust
/// use tintwheel_theme::domain_of;
///
/// assert_eq!(domain_of("https://Example.com/path").as_deref(), Some("example.com"));
/// assert_eq!(domain_of("not a url"), None);
/// ```
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().to_ascii_lowercase()
}

/// Compares a stored host with an already normalized one.
fn same_domain(stored: &str, normalized: &str) -> bool {
    stored.trim().eq_ignore_ascii_case(normalized)
}

impl Settings {
    /// Parses a settings record from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        serde_yaml::from_str(yaml).map_err(|e| ThemeError::parse("settings", e.to_string()))
    }

    /// Parses a settings record from JSON.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        serde_json::from_str(json).map_err(|e| ThemeError::parse("settings", e.to_string()))
    }

    /// Loads a settings file. `.json` files are read as JSON, anything else
    /// as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let (content, is_json) = read_record_file(path.as_ref())?;
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    // --- Resolution ---

    /// Whether a host is on the block list. Host names compare without
    /// regard to case, including entries read from a settings file.
    pub fn is_blocked(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        self.blocked_sites
            .iter()
            .any(|site| same_domain(site, &domain))
    }

    /// Theme record for a host, or `None` when the host is blocked.
    pub fn theme_for_domain(&self, domain: &str) -> Option<&ThemeDescriptor> {
        if self.is_blocked(domain) {
            return None;
        }
        let site = self
            .site_key(domain)
            .and_then(|key| self.per_site.get(key));
        Some(site.unwrap_or(&self.global_preset))
    }

    /// Theme record for a page URL.
    ///
    /// URLs without a host (`file:`, `about:`, garbage) get the global preset.
    pub fn theme_for_url(&self, url: &str) -> Option<&ThemeDescriptor> {
        match domain_of(url) {
            Some(domain) => self.theme_for_domain(&domain),
            None => Some(&self.global_preset),
        }
    }

    /// Validated theme for a page URL.
    pub fn resolve(&self, url: &str) -> Result<Option<Theme>, ThemeError> {
        let Some(descriptor) = self.theme_for_url(url) else {
            debug!(url, "site is blocked");
            return Ok(None);
        };
        descriptor.validate().map(Some)
    }

    /// The stored per-site key matching `domain`, whatever its case.
    fn site_key(&self, domain: &str) -> Option<&String> {
        let domain = normalize_domain(domain);
        self.per_site
            .keys()
            .find(|key| same_domain(key, &domain))
    }

    // --- Per-site ---

    pub fn set_site_theme(&mut self, domain: &str, descriptor: ThemeDescriptor) {
        if let Some(key) = self.site_key(domain).cloned() {
            self.per_site.remove(&key);
        }
        self.per_site.insert(normalize_domain(domain), descriptor);
    }

    pub fn remove_site_theme(&mut self, domain: &str) -> Option<ThemeDescriptor> {
        let key = self.site_key(domain)?.clone();
        self.per_site.remove(&key)
    }

    pub fn clear_site_themes(&mut self) {
        self.per_site.clear();
    }

    /// Adds a host to the block list. Returns false if it was already there.
    pub fn block_site(&mut self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        if domain.is_empty() || self.is_blocked(&domain) {
            return false;
        }
        self.blocked_sites.push(domain);
        true
    }

    pub fn unblock_site(&mut self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        let before = self.blocked_sites.len();
        self.blocked_sites.retain(|site| !same_domain(site, &domain));
        before != self.blocked_sites.len()
    }

    // --- Presets ---

    /// Stores a named preset built from two colors.
    ///
    /// Text, alpha and mode come from the stock global preset. Colors are
    /// stored normalized.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidTheme`] for a blank name, [`ThemeError::InvalidColor`]
    /// for a malformed color.
    pub fn add_preset(&mut self, name: &str, bg: &str, accent: &str) -> Result<(), ThemeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ThemeError::invalid("name", "preset name is empty"));
        }
        let descriptor = two_color_descriptor(bg, accent)?;
        self.presets.insert(name.to_string(), descriptor);
        Ok(())
    }

    pub fn remove_preset(&mut self, name: &str) -> Option<ThemeDescriptor> {
        self.presets.remove(name)
    }

    /// Makes a named preset the global preset.
    pub fn promote_preset(&mut self, name: &str) -> Result<(), ThemeError> {
        let preset = self
            .presets
            .get(name)
            .cloned()
            .ok_or_else(|| ThemeError::UnknownPreset(name.to_string()))?;
        self.global_preset = preset;
        Ok(())
    }

    /// Replaces the global preset's colors, resetting its other fields.
    pub fn save_global(&mut self, bg: &str, accent: &str) -> Result<(), ThemeError> {
        self.global_preset = two_color_descriptor(bg, accent)?;
        Ok(())
    }

    /// Re-adds stock presets that are missing. Existing names are kept.
    pub fn merge_default_presets(&mut self) {
        for (name, preset) in default_presets() {
            self.presets.entry(name).or_insert(preset);
        }
    }
}

fn two_color_descriptor(bg: &str, accent: &str) -> Result<ThemeDescriptor, ThemeError> {
    let stock = ThemeDescriptor::global_default();
    Ok(ThemeDescriptor {
        bg: Some(decode_hex(bg)?.to_hex()),
        accent: Some(decode_hex(accent)?.to_hex()),
        ..stock
    })
}
