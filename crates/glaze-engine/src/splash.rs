//! Loading splash overlay.
//!
//! Mounted at attach, fully visible for a fixed duration, then faded and
//! removed. Removal chains into the welcome overlay (the chrome owns that
//! handoff).

use tracing::debug;

use crate::config::Branding;
use crate::dom::Document;

/// Id of the splash overlay element.
pub const SPLASH_ID: &str = "loading-overlay";
/// Class applied while the splash fades out.
pub const FADING_CLASS: &str = "fading";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Visible,
    Fading,
    Closed,
}

/// One-shot splash state machine.
#[derive(Debug, Default)]
pub struct Splash {
    phase: Phase,
}

impl Splash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the splash is currently in the document.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Visible | Phase::Fading)
    }

    /// Build and attach the splash. Only the first call does anything.
    pub fn mount(&mut self, doc: &mut Document, branding: &Branding) {
        if self.phase != Phase::Idle {
            return;
        }

        let overlay = doc.create_element("div");
        doc.set_id(overlay, SPLASH_ID);

        let container = doc.create_element("div");
        doc.add_class(container, "loader-container");

        let logo_wrap = doc.create_element("div");
        doc.add_class(logo_wrap, "logo-wrapper");
        let logo = doc.create_element("div");
        doc.add_class(logo, "company-logo");
        doc.set_text(logo, &branding.app_name);
        let spinner = doc.create_element("div");
        doc.add_class(spinner, "spinner-circle");
        let spinner_secondary = doc.create_element("div");
        doc.add_class(spinner_secondary, "spinner-circle-secondary");

        let text = doc.create_element("div");
        doc.add_class(text, "loading-text");
        doc.set_text(text, &branding.loading_text);
        let subtext = doc.create_element("div");
        doc.add_class(subtext, "loading-subtext");
        doc.set_text(subtext, &branding.loading_subtext);

        let _ = doc.append_child(logo_wrap, logo);
        let _ = doc.append_child(logo_wrap, spinner);
        let _ = doc.append_child(logo_wrap, spinner_secondary);
        let _ = doc.append_child(container, logo_wrap);
        let _ = doc.append_child(container, text);
        let _ = doc.append_child(container, subtext);
        let _ = doc.append_child(overlay, container);
        let body = doc.body();
        let _ = doc.append_child(body, overlay);

        self.phase = Phase::Visible;
        debug!("splash mounted");
    }

    /// Start the fade-out.
    pub fn fade(&mut self, doc: &mut Document) {
        if self.phase != Phase::Visible {
            return;
        }
        if let Some(overlay) = doc.element_by_id(SPLASH_ID) {
            doc.add_class(overlay, FADING_CLASS);
        }
        self.phase = Phase::Fading;
    }

    /// Remove the splash. Returns true if this call closed it (so the
    /// caller can chain the welcome overlay exactly once).
    pub fn close(&mut self, doc: &mut Document) -> bool {
        if !self.is_open() {
            return false;
        }
        if let Some(overlay) = doc.element_by_id(SPLASH_ID) {
            doc.remove(overlay);
        }
        self.phase = Phase::Closed;
        debug!("splash closed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_once() {
        let mut doc = Document::new();
        let mut splash = Splash::new();
        let branding = Branding::default();

        splash.mount(&mut doc, &branding);
        splash.mount(&mut doc, &branding);

        let outline = doc.outline(doc.body());
        assert_eq!(outline.matches(SPLASH_ID).count(), 1);
        assert!(splash.is_open());
    }

    #[test]
    fn test_fade_then_close() {
        let mut doc = Document::new();
        let mut splash = Splash::new();
        splash.mount(&mut doc, &Branding::default());

        splash.fade(&mut doc);
        let overlay = doc.element_by_id(SPLASH_ID).unwrap();
        assert!(doc.has_class(overlay, FADING_CLASS));

        assert!(splash.close(&mut doc));
        assert_eq!(doc.element_by_id(SPLASH_ID), None);
        assert!(!splash.is_open());

        // A second close reports not-closed so the welcome chain cannot
        // run twice.
        assert!(!splash.close(&mut doc));
    }

    #[test]
    fn test_close_without_mount_is_noop() {
        let mut doc = Document::new();
        let mut splash = Splash::new();
        assert!(!splash.close(&mut doc));
    }
}
