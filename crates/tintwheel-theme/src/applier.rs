//! Applying and removing a theme on a document.
//!
//! A [`ThemeApplier`] owns the only mutable theme state there is: the last
//! theme it applied and, while a theme is active, a subscription to the
//! structural changes of the page it applied to. Each tab or frame gets its
//! own applier; instances never share state.
//!
//! ## What `apply` writes
//!
//! With the default [`ApplierConfig`]:
//!
//! | target                    | value                                   |
//! |---------------------------|-----------------------------------------|
//! | `<link id="tw-style">`    | themed stylesheet, inserted once        |
//! | `--tw-bg`, `--tw-text`, `--tw-accent` | hex colors                  |
//! | `--tw-overlay-alpha`      | overlay alpha                           |
//! | `data-tw-active`          | `"true"` on the root                    |
//! | `#tw-overlay`             | overlay layer, fill `rgba(accent, alpha)` |
//! | `.tw-fix-media`           | on the root only when `invertMedia`     |
//!
//! ## Re-assertion
//!
//! Pages rebuild their DOM (single-page-app navigation, hydration) and can
//! drop the overlay or the root class along the way. While a theme is active
//! the applier listens for batches that add nodes and puts the overlay and
//! the media class back. It never inserts a second overlay.
//!
//! ## Lifecycle
//!
//! ```rust
//! use tintwheel_color::Rgb;
//! use tintwheel_theme::{MemoryDocument, Theme, ThemeApplier};
//!
//! let doc = MemoryDocument::new();
//! let mut applier = ThemeApplier::new();
//!
//! let applied = applier.apply(&Theme::new(Rgb(15, 17, 19)), &doc).unwrap();
//! assert!(applied.contrast_ratio.is_some());
//! assert_eq!(doc.variable("--tw-text").as_deref(), Some("#ffffff"));
//!
//! applier.remove(&doc).unwrap();
//! assert_eq!(doc.variable("--tw-text"), None);
//! applier.dispose();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tintwheel_color::pick_readable_text_color;
use tracing::{debug, info, warn};

use crate::document::{Document, MutationBatch, MutationListener, Subscription};
use crate::error::{DocumentError, ThemeError};
use crate::theme::{Theme, ThemeDescriptor};

/// Names of the four root custom properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariableNames {
    pub background: String,
    pub text: String,
    pub accent: String,
    pub overlay_alpha: String,
}

impl VariableNames {
    fn all(&self) -> [&str; 4] {
        [
            &self.background,
            &self.text,
            &self.accent,
            &self.overlay_alpha,
        ]
    }
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            background: "--tw-bg".into(),
            text: "--tw-text".into(),
            accent: "--tw-accent".into(),
            overlay_alpha: "--tw-overlay-alpha".into(),
        }
    }
}

/// Identifiers the applier writes into the document.
///
/// The defaults match the bundled stylesheet; change them together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplierConfig {
    /// Id of the stylesheet link.
    pub stylesheet_id: String,
    /// Href of the stylesheet link.
    pub stylesheet_href: String,
    /// Id of the overlay element.
    pub overlay_id: String,
    /// Root attribute marking the theme as active.
    pub active_attribute: String,
    /// Root class that turns on media inversion.
    pub media_class: String,
    /// Root custom property names.
    pub variables: VariableNames,
}

impl Default for ApplierConfig {
    fn default() -> Self {
        Self {
            stylesheet_id: "tw-style".into(),
            stylesheet_href: "content/injected_styles.css".into(),
            overlay_id: "tw-overlay".into(),
            active_attribute: "data-tw-active".into(),
            media_class: "tw-fix-media".into(),
            variables: VariableNames::default(),
        }
    }
}

/// Result of a successful [`ThemeApplier::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    /// The theme as written, with the text color filled in.
    pub theme: Theme,
    /// Contrast of the derived text color; `None` when text was explicit.
    pub contrast_ratio: Option<f64>,
}

/// Applies themes to documents and keeps them applied.
///
/// An applier follows one page at a time: the page it last applied to. Its
/// recorded theme and its listener both belong to that page.
pub struct ThemeApplier {
    config: Rc<ApplierConfig>,
    last_applied: Rc<RefCell<Option<Theme>>>,
    observed: Option<Observation>,
}

struct Observation {
    page: usize,
    subscription: Subscription,
}

impl ThemeApplier {
    /// Creates an applier with the default identifiers.
    pub fn new() -> Self {
        Self::with_config(ApplierConfig::default())
    }

    /// Creates an applier with custom identifiers.
    pub fn with_config(config: ApplierConfig) -> Self {
        Self {
            config: Rc::new(config),
            last_applied: Rc::new(RefCell::new(None)),
            observed: None,
        }
    }

    pub fn config(&self) -> &ApplierConfig {
        &self.config
    }

    /// The theme currently applied, if any.
    pub fn last_applied(&self) -> Option<Theme> {
        *self.last_applied.borrow()
    }

    /// Whether a structural-change listener is registered.
    pub fn is_observing(&self) -> bool {
        self.observed.is_some()
    }

    /// Whether the listener, if any, is attached to `document`'s page.
    pub fn is_observing_page<D: Document>(&self, document: &D) -> bool {
        self.observed
            .as_ref()
            .is_some_and(|observed| observed.page == document.page_id())
    }

    /// Validates a theme record, then applies it.
    ///
    /// Nothing is written to the document if validation fails.
    pub fn apply_descriptor<D>(
        &mut self,
        descriptor: &ThemeDescriptor,
        document: &D,
    ) -> Result<Applied, ThemeError>
    where
        D: Document + Clone + 'static,
    {
        let theme = descriptor.validate()?;
        self.apply(&theme, document)
    }

    /// Applies `theme` to `document`, replacing whatever was applied before.
    ///
    /// When the theme has no text color, black or white is chosen by
    /// contrast against the background and the ratio is returned. Applying
    /// to a different page than last time moves the listener to the new
    /// page; the old page keeps its styles but is no longer re-asserted.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::DocumentUnavailable`] if the document refuses a
    /// write. What was already written is taken back off the page, nothing
    /// stays recorded and observation stops.
    pub fn apply<D>(&mut self, theme: &Theme, document: &D) -> Result<Applied, ThemeError>
    where
        D: Document + Clone + 'static,
    {
        let (effective, contrast_ratio) = match theme.text() {
            Some(_) => (*theme, None),
            None => {
                let readable = pick_readable_text_color(theme.background());
                debug!(
                    background = %theme.background(),
                    text = ?readable.color,
                    ratio = readable.ratio,
                    "derived text color"
                );
                (theme.with_text(readable.color.rgb()), Some(readable.ratio))
            }
        };

        if !self.is_observing_page(document) {
            self.stop_observing();
        }

        let written = write_theme(&self.config, &effective, document)
            .and_then(|()| self.observe(document));
        if let Err(err) = written {
            self.roll_back(document);
            return Err(err);
        }
        *self.last_applied.borrow_mut() = Some(effective);

        info!(
            background = %effective.background(),
            accent = %effective.accent(),
            mode = ?effective.mode(),
            "theme applied"
        );
        Ok(Applied {
            theme: effective,
            contrast_ratio,
        })
    }

    /// Removes everything `apply` wrote to `document`.
    ///
    /// If `document` is the page this applier follows, the recorded theme is
    /// cleared and observation stops. Removing from any other page leaves
    /// that state alone. Safe to call when nothing is applied.
    ///
    /// # Errors
    ///
    /// Every removal is attempted; the first refusal is returned.
    pub fn remove<D: Document>(&mut self, document: &D) -> Result<(), ThemeError> {
        if self.observed.is_none() || self.is_observing_page(document) {
            *self.last_applied.borrow_mut() = None;
            self.stop_observing();
        }

        clear_theme(&self.config, document)?;
        info!("theme removed");
        Ok(())
    }

    /// Ends the applier's lifecycle without touching the document.
    pub fn dispose(mut self) {
        *self.last_applied.borrow_mut() = None;
        self.stop_observing();
    }

    fn roll_back<D: Document>(&mut self, document: &D) {
        *self.last_applied.borrow_mut() = None;
        self.stop_observing();
        if let Err(err) = clear_theme(&self.config, document) {
            warn!(error = %err, "could not fully undo a failed apply");
        }
    }

    fn observe<D>(&mut self, document: &D) -> Result<(), ThemeError>
    where
        D: Document + Clone + 'static,
    {
        if self.is_observing_page(document) {
            return Ok(());
        }

        let slot = Rc::downgrade(&self.last_applied);
        let config = Rc::clone(&self.config);
        let doc = document.clone();
        let listener: MutationListener = Rc::new(move |batch: &MutationBatch| {
            if !batch.has_additions() {
                return;
            }
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let Some(theme) = *slot.borrow() else {
                return;
            };
            if let Err(err) = reassert(&config, &theme, &doc) {
                warn!(error = %err, "failed to re-assert theme after page mutation");
            }
        });

        let subscription = document.observe_structure(listener)?;
        self.observed = Some(Observation {
            page: document.page_id(),
            subscription,
        });
        debug!("observing structural changes");
        Ok(())
    }

    fn stop_observing(&mut self) {
        if let Some(observed) = self.observed.take() {
            observed.subscription.cancel();
            debug!("stopped observing structural changes");
        }
    }
}

impl Default for ThemeApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThemeApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeApplier")
            .field("config", &self.config)
            .field("last_applied", &self.last_applied.borrow())
            .field("observing", &self.is_observing())
            .finish()
    }
}

/// Writes every part of a resolved theme.
fn write_theme<D: Document>(
    config: &ApplierConfig,
    theme: &Theme,
    document: &D,
) -> Result<(), ThemeError> {
    if !document.contains(&config.stylesheet_id)? {
        document.insert_stylesheet(&config.stylesheet_id, &config.stylesheet_href)?;
    }

    let vars = &config.variables;
    let text = theme.text().unwrap_or_default();
    document.set_root_variable(&vars.background, &theme.background().to_hex())?;
    document.set_root_variable(&vars.text, &text.to_hex())?;
    document.set_root_variable(&vars.accent, &theme.accent().to_hex())?;
    document.set_root_variable(&vars.overlay_alpha, &theme.overlay_alpha().to_string())?;
    document.set_root_attribute(&config.active_attribute, "true")?;

    ensure_overlay(config, theme, document)?;

    if theme.invert_media() {
        document.add_root_class(&config.media_class)?;
    } else {
        document.remove_root_class(&config.media_class)?;
    }
    Ok(())
}

/// Takes every part of a theme off the page, attempting each step.
fn clear_theme<D: Document>(config: &ApplierConfig, document: &D) -> Result<(), ThemeError> {
    let mut results: Vec<Result<(), DocumentError>> = config
        .variables
        .all()
        .iter()
        .map(|name| document.remove_root_variable(name))
        .collect();
    results.push(document.remove_root_attribute(&config.active_attribute));
    results.push(document.remove_root_class(&config.media_class));
    results.push(document.remove_element(&config.overlay_id).map(|_| ()));
    results.push(document.remove_element(&config.stylesheet_id).map(|_| ()));

    match results.into_iter().find_map(Result::err) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Puts back what page scripts tend to remove.
fn reassert<D: Document>(
    config: &ApplierConfig,
    theme: &Theme,
    document: &D,
) -> Result<(), ThemeError> {
    ensure_overlay(config, theme, document)?;
    if theme.invert_media() {
        document.add_root_class(&config.media_class)?;
    }
    debug!("re-asserted overlay after page mutation");
    Ok(())
}

fn ensure_overlay<D: Document>(
    config: &ApplierConfig,
    theme: &Theme,
    document: &D,
) -> Result<(), ThemeError> {
    if !document.contains(&config.overlay_id)? {
        document.insert_overlay(&config.overlay_id)?;
    }
    let fill = theme.accent().to_rgba(theme.overlay_alpha());
    document.set_fill(&config.overlay_id, &fill)?;
    Ok(())
}
