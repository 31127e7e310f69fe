//! Property-based tests for theme validation, settings lookup and the
//! applier's re-assertion.

use proptest::prelude::*;
use tintwheel_color::Rgb;
use tintwheel_theme::{
    MemoryDocument, MutationBatch, Settings, Theme, ThemeApplier, ThemeDescriptor, ThemeError,
};

// ============================================================================
// Strategies
// ============================================================================

fn host_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}(\\.[a-z]{2,6}){1,2}"
}

/// Flips the case of letters picked by `mask`.
fn recase(host: &str, mask: &[bool]) -> String {
    host.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

#[derive(Debug, Clone)]
enum PageEvent {
    Append(usize),
    Shrink(usize),
    DropOverlay,
    DropMediaClass,
}

fn event_strategy() -> impl Strategy<Value = PageEvent> {
    prop_oneof![
        (1usize..20).prop_map(PageEvent::Append),
        (1usize..20).prop_map(PageEvent::Shrink),
        Just(PageEvent::DropOverlay),
        Just(PageEvent::DropMediaClass),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any alpha in [0, 1] validates and is kept as given.
    #[test]
    fn alpha_in_range_is_accepted(alpha in 0.0f64..=1.0) {
        let descriptor = ThemeDescriptor {
            overlay_alpha: Some(alpha),
            ..Default::default()
        };
        let theme = descriptor.validate().unwrap();
        prop_assert_eq!(theme.overlay_alpha(), alpha);
    }

    /// Alphas outside [0, 1] are rejected on the alpha field.
    #[test]
    fn alpha_out_of_range_is_rejected(
        alpha in prop_oneof![1.0f64 + f64::EPSILON..1e6, -1e6f64..-f64::MIN_POSITIVE]
    ) {
        let descriptor = ThemeDescriptor {
            overlay_alpha: Some(alpha),
            ..Default::default()
        };
        let is_alpha_error = matches!(
            descriptor.validate(),
            Err(ThemeError::InvalidTheme { field: "overlayAlpha", .. })
        );
        prop_assert!(is_alpha_error);
    }

    /// Block list entries match the page host whatever the case on either side.
    #[test]
    fn blocking_ignores_case(
        host in host_strategy(),
        stored_mask in prop::collection::vec(any::<bool>(), 1..8),
        query_mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let mut settings = Settings::default();
        settings.blocked_sites.push(recase(&host, &stored_mask));

        prop_assert!(settings.is_blocked(&recase(&host, &query_mask)));
        let url = format!("https://{}/", recase(&host, &query_mask));
        prop_assert!(settings.theme_for_url(&url).is_none());
    }

    /// Per-site entries win over the global preset for their host only.
    #[test]
    fn per_site_entry_applies_to_its_host(host in host_strategy(), other in host_strategy()) {
        prop_assume!(host != other);
        let mut settings = Settings::default();
        let site = ThemeDescriptor {
            bg: Some("#010203".into()),
            ..Default::default()
        };
        settings.set_site_theme(&host, site.clone());

        prop_assert_eq!(settings.theme_for_url(&format!("https://{}/a", host)), Some(&site));
        prop_assert_eq!(
            settings.theme_for_url(&format!("https://{}/a", other)),
            Some(&settings.global_preset)
        );
    }

    /// However the page churns, an active theme never ends up with more than
    /// one overlay, and any addition brings the overlay and media class back.
    #[test]
    fn reassertion_keeps_a_single_overlay(
        events in prop::collection::vec(event_strategy(), 0..30),
    ) {
        let doc = MemoryDocument::new();
        let mut applier = ThemeApplier::new();
        let theme = Theme::new(Rgb(0x0f, 0x11, 0x13)).with_invert_media(true);
        applier.apply(&theme, &doc).unwrap();

        for event in &events {
            match event {
                PageEvent::Append(n) => doc.append_content(*n),
                PageEvent::Shrink(n) => doc.notify(MutationBatch::removed(*n)),
                PageEvent::DropOverlay => {
                    doc.page_remove_element("tw-overlay");
                }
                PageEvent::DropMediaClass => {
                    doc.page_remove_class("tw-fix-media");
                }
            }
            prop_assert!(doc.element_count("tw-overlay") <= 1);
            if let PageEvent::Append(_) = event {
                prop_assert_eq!(doc.element_count("tw-overlay"), 1);
                prop_assert!(doc.has_class("tw-fix-media"));
            }
        }
    }
}
