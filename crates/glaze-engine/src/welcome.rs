//! Welcome overlay.
//!
//! Shown once per session after the splash closes: title, tagline, feature
//! cards, suggested prompts, and an enter button. Dismissed by the button or
//! by an auto-dismiss timer, whichever fires first.

use tracing::debug;

use crate::config::{Branding, WelcomeConfig};
use crate::dom::{Document, NodeId};

/// Id of the welcome overlay element.
pub const WELCOME_ID: &str = "welcome-screen";
/// Class applied shortly after mount (animate-in).
pub const ACTIVE_CLASS: &str = "active";
/// Class applied while the overlay fades out.
pub const CLOSING_CLASS: &str = "closing";
/// Class identifying the enter button.
pub const BUTTON_CLASS: &str = "welcome-button";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Showing,
    Fading,
    Closed,
}

/// One-shot welcome overlay state machine.
#[derive(Debug, Default)]
pub struct Welcome {
    phase: Phase,
}

impl Welcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the overlay is currently in the document.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Showing | Phase::Fading)
    }

    /// Build and attach the overlay. Only the first call does anything.
    pub fn mount(&mut self, doc: &mut Document, branding: &Branding, config: &WelcomeConfig) {
        if self.phase != Phase::Idle {
            return;
        }

        let overlay = doc.create_element("div");
        doc.set_id(overlay, WELCOME_ID);

        let container = doc.create_element("div");
        doc.add_class(container, "welcome-container");

        let logo = doc.create_element("div");
        doc.add_class(logo, "welcome-logo");
        doc.set_text(logo, &branding.app_name);

        let title = doc.create_element("h1");
        doc.add_class(title, "welcome-title");
        doc.set_text(title, &format!("Welcome to {}", branding.app_name));

        let subtitle = doc.create_element("p");
        doc.add_class(subtitle, "welcome-subtitle");
        doc.set_text(subtitle, &branding.tagline);

        let cards = doc.create_element("div");
        doc.add_class(cards, "welcome-cards");
        for card in &config.cards {
            let card_node = doc.create_element("div");
            doc.add_class(card_node, "welcome-card");
            let icon = doc.create_element("div");
            doc.add_class(icon, "card-icon");
            doc.set_text(icon, &card.icon);
            let text = doc.create_element("div");
            doc.add_class(text, "card-text");
            doc.set_text(text, &card.title);
            let small = doc.create_element("small");
            doc.set_text(small, &card.subtitle);
            let _ = doc.append_child(card_node, icon);
            let _ = doc.append_child(card_node, text);
            let _ = doc.append_child(card_node, small);
            let _ = doc.append_child(cards, card_node);
        }

        let features = doc.create_element("div");
        doc.add_class(features, "welcome-features");
        let lead = doc.create_element("p");
        doc.add_class(lead, "feature-text");
        doc.set_text(lead, "Start by asking:");
        let list = doc.create_element("ul");
        doc.add_class(list, "feature-list");
        for prompt in &config.prompts {
            let item = doc.create_element("li");
            doc.set_text(item, prompt);
            let _ = doc.append_child(list, item);
        }
        let _ = doc.append_child(features, lead);
        let _ = doc.append_child(features, list);

        let button = doc.create_element("button");
        doc.add_class(button, BUTTON_CLASS);
        doc.set_text(button, &config.button_label);

        let _ = doc.append_child(container, logo);
        let _ = doc.append_child(container, title);
        let _ = doc.append_child(container, subtitle);
        let _ = doc.append_child(container, cards);
        let _ = doc.append_child(container, features);
        let _ = doc.append_child(container, button);
        let _ = doc.append_child(overlay, container);
        let body = doc.body();
        let _ = doc.append_child(body, overlay);

        self.phase = Phase::Showing;
        debug!("welcome mounted");
    }

    /// Apply the animate-in class.
    pub fn activate(&mut self, doc: &mut Document) {
        if self.phase != Phase::Showing {
            return;
        }
        if let Some(overlay) = doc.element_by_id(WELCOME_ID) {
            doc.add_class(overlay, ACTIVE_CLASS);
        }
    }

    /// Start the fade-out. Returns true if this call started it, so the
    /// caller schedules the final removal exactly once even when the click
    /// and the auto-dismiss timer race.
    pub fn begin_dismiss(&mut self, doc: &mut Document) -> bool {
        if self.phase != Phase::Showing {
            return false;
        }
        if let Some(overlay) = doc.element_by_id(WELCOME_ID) {
            doc.add_class(overlay, CLOSING_CLASS);
        }
        self.phase = Phase::Fading;
        debug!("welcome dismissing");
        true
    }

    /// Remove the overlay after its fade.
    pub fn close(&mut self, doc: &mut Document) {
        if self.phase == Phase::Closed {
            return;
        }
        if let Some(overlay) = doc.element_by_id(WELCOME_ID) {
            doc.remove(overlay);
        }
        self.phase = Phase::Closed;
        debug!("welcome closed");
    }

    /// Whether a click on `target` dismisses the overlay.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        if doc.has_class(target, BUTTON_CLASS) {
            return self.begin_dismiss(doc);
        }
        false
    }
}
