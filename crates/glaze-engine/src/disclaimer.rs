//! Floating disclaimer button and modal.
//!
//! Mounted a couple of seconds after attach, alongside hiding the host
//! sidebar. The button toggles the modal open; the close button or a click
//! on the backdrop closes it.

use tracing::{debug, warn};

use crate::config::DisclaimerConfig;
use crate::dom::{Document, NodeId};
use crate::selector::Selector;

/// Id of the floating trigger button.
pub const BUTTON_ID: &str = "floating-disclaimer-btn";
/// Id of the modal backdrop element.
pub const MODAL_ID: &str = "disclaimer-modal";
/// Class identifying the modal's close button.
pub const CLOSE_CLASS: &str = "close-disclaimer";
/// Class on the modal while it is open.
pub const OPEN_CLASS: &str = "open";

fn default_sidebar_selectors() -> Vec<Selector> {
    vec![
        Selector::class("sidebar"),
        Selector::id("sidebar"),
        Selector::attr_contains("class", "sidebar"),
    ]
}

/// Parse configured sidebar selectors, falling back to the defaults.
pub(crate) fn sidebar_selectors(configured: &[String]) -> Vec<Selector> {
    let parsed: Vec<Selector> = configured
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(err) => {
                warn!(selector = %raw, %err, "ignoring configured sidebar selector");
                None
            }
        })
        .collect();
    if parsed.is_empty() {
        default_sidebar_selectors()
    } else {
        parsed
    }
}

/// One-shot disclaimer state machine.
#[derive(Debug, Default)]
pub struct Disclaimer {
    mounted: bool,
}

impl Disclaimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the sidebar and attach the button and modal. Only the first
    /// call does anything.
    pub fn mount(
        &mut self,
        doc: &mut Document,
        config: &DisclaimerConfig,
        sidebar: Option<NodeId>,
    ) {
        if self.mounted {
            return;
        }

        if let Some(sidebar) = sidebar {
            doc.set_attr(sidebar, "style", "display: none");
        }

        let button = doc.create_element("button");
        doc.set_id(button, BUTTON_ID);
        doc.set_text(button, &config.label);

        let modal = doc.create_element("div");
        doc.set_id(modal, MODAL_ID);
        let content = doc.create_element("div");
        doc.add_class(content, "disclaimer-content");
        let close = doc.create_element("button");
        doc.add_class(close, CLOSE_CLASS);
        doc.set_text(close, "×");
        let heading = doc.create_element("h2");
        doc.set_text(heading, &config.heading);
        let body_text = doc.create_element("div");
        doc.add_class(body_text, "disclaimer-body");
        for line in &config.lines {
            let para = doc.create_element("p");
            doc.set_text(para, line);
            let _ = doc.append_child(body_text, para);
        }

        let _ = doc.append_child(content, close);
        let _ = doc.append_child(content, heading);
        let _ = doc.append_child(content, body_text);
        let _ = doc.append_child(modal, content);
        let body = doc.body();
        let _ = doc.append_child(body, button);
        let _ = doc.append_child(body, modal);

        self.mounted = true;
        debug!("disclaimer mounted");
    }

    /// Whether the modal is currently open.
    pub fn is_open(&self, doc: &Document) -> bool {
        doc.element_by_id(MODAL_ID)
            .is_some_and(|modal| doc.has_class(modal, OPEN_CLASS))
    }

    fn open(&self, doc: &mut Document) {
        if let Some(modal) = doc.element_by_id(MODAL_ID) {
            doc.add_class(modal, OPEN_CLASS);
        }
    }

    fn close(&self, doc: &mut Document) {
        if let Some(modal) = doc.element_by_id(MODAL_ID) {
            doc.remove_class(modal, OPEN_CLASS);
        }
    }

    /// Route a click. Returns true if the click was ours.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        if doc.id(target) == Some(BUTTON_ID) {
            self.open(doc);
            return true;
        }
        if doc.has_class(target, CLOSE_CLASS) {
            self.close(doc);
            return true;
        }
        // A click on the backdrop itself (not the content box) closes.
        if doc.id(target) == Some(MODAL_ID) {
            self.close(doc);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> (Document, Disclaimer, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let sidebar = doc.create_element("div");
        doc.add_class(sidebar, "sidebar");
        doc.append_child(body, sidebar).unwrap();

        let mut disclaimer = Disclaimer::new();
        disclaimer.mount(&mut doc, &DisclaimerConfig::default(), Some(sidebar));
        (doc, disclaimer, sidebar)
    }

    #[test]
    fn test_mount_hides_sidebar_and_builds_modal() {
        let (doc, disclaimer, sidebar) = mounted();
        assert_eq!(doc.attr(sidebar, "style"), Some("display: none"));
        assert!(doc.element_by_id(BUTTON_ID).is_some());
        assert!(doc.element_by_id(MODAL_ID).is_some());
        assert!(!disclaimer.is_open(&doc));
    }

    #[test]
    fn test_mount_is_one_shot() {
        let (mut doc, mut disclaimer, _) = mounted();
        disclaimer.mount(&mut doc, &DisclaimerConfig::default(), None);
        let outline = doc.outline(doc.body());
        assert_eq!(outline.matches(BUTTON_ID).count(), 1);
    }

    #[test]
    fn test_button_opens_close_closes() {
        let (mut doc, mut disclaimer, _) = mounted();
        let button = doc.element_by_id(BUTTON_ID).unwrap();
        let close = doc.query(&Selector::class(CLOSE_CLASS)).unwrap();

        assert!(disclaimer.handle_click(&mut doc, button));
        assert!(disclaimer.is_open(&doc));

        assert!(disclaimer.handle_click(&mut doc, close));
        assert!(!disclaimer.is_open(&doc));
    }

    #[test]
    fn test_backdrop_closes_content_does_not() {
        let (mut doc, mut disclaimer, _) = mounted();
        let button = doc.element_by_id(BUTTON_ID).unwrap();
        let modal = doc.element_by_id(MODAL_ID).unwrap();
        let content = doc.query(&Selector::class("disclaimer-content")).unwrap();

        disclaimer.handle_click(&mut doc, button);
        assert!(disclaimer.is_open(&doc));

        // Clicking the content box keeps the modal open.
        assert!(!disclaimer.handle_click(&mut doc, content));
        assert!(disclaimer.is_open(&doc));

        assert!(disclaimer.handle_click(&mut doc, modal));
        assert!(!disclaimer.is_open(&doc));
    }

    #[test]
    fn test_sidebar_selector_fallback() {
        let selectors = sidebar_selectors(&["not a selector!!".to_string()]);
        assert_eq!(selectors.len(), 3);

        let selectors = sidebar_selectors(&["#custom-rail".to_string()]);
        assert_eq!(selectors, vec![Selector::id("custom-rail")]);
    }
}
