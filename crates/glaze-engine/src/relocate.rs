//! Composer relocation between its host position and the centered
//! placeholder.
//!
//! The relocator is a two-state machine: **Inline** (composer where the host
//! put it) and **Centered** (composer inside a synthetic full-page
//! placeholder). Both transitions are idempotent, which is what keeps the
//! mutation-driven reconciliation loop from amplifying its own writes.

use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::locate::Locator;

/// Id of the synthetic full-page placeholder element.
pub const EMPTY_OVERLAY_ID: &str = "glaze-empty-overlay";
/// Id of the inner box the composer is moved into.
pub const EMPTY_BOX_ID: &str = "glaze-empty-box";
/// Id of the placeholder's title element.
pub const EMPTY_TITLE_ID: &str = "glaze-empty-title";
/// Class applied to `body` while centered mode is active.
pub const CENTERED_CLASS: &str = "glaze-empty";

/// Where the composer currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// In its host-assigned position.
    Inline,
    /// Inside the centered placeholder box.
    Centered,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline => write!(f, "inline"),
            Self::Centered => write!(f, "centered"),
        }
    }
}

/// The composer's pre-relocation position: its parent and the sibling it sat
/// before. Captured on the first relocation and frozen for the page session.
#[derive(Debug, Clone, Copy)]
struct OriginalPlacement {
    parent: NodeId,
    next_sibling: Option<NodeId>,
}

/// Moves the composer in and out of the centered placeholder.
#[derive(Debug, Default)]
pub struct Relocator {
    original: Option<OriginalPlacement>,
    title: String,
}

impl Relocator {
    /// Create a relocator with the given placeholder title text.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            original: None,
            title: title.into(),
        }
    }

    /// Current placement, derived from the document.
    pub fn placement(&self, doc: &Document, locator: &Locator) -> Placement {
        let composer = locator.composer(doc);
        let bx = doc.element_by_id(EMPTY_BOX_ID);
        match (composer, bx) {
            (Some(composer), Some(bx)) if doc.parent(composer) == Some(bx) => Placement::Centered,
            _ => Placement::Inline,
        }
    }

    /// Move the composer into the centered placeholder.
    ///
    /// No-op when the composer cannot be located. The original position is
    /// captured exactly once, on the first call that finds a parented
    /// composer; later calls never recapture it, never create a second
    /// placeholder, and never move an already-centered composer.
    pub fn enter_empty(&mut self, doc: &mut Document, locator: &Locator) {
        let Some(composer) = locator.composer(doc) else {
            return;
        };

        if self.original.is_none() {
            if let Some(parent) = doc.parent(composer) {
                self.original = Some(OriginalPlacement {
                    parent,
                    next_sibling: doc.next_sibling(composer),
                });
                debug!("captured original composer placement");
            }
        }

        let bx = self.ensure_placeholder(doc);
        if doc.parent(composer) != Some(bx) {
            let _ = doc.append_child(bx, composer);
            debug!("composer centered");
        }
        let body = doc.body();
        doc.add_class(body, CENTERED_CLASS);
    }

    /// Restore the composer to its captured original position.
    ///
    /// No-op when the composer cannot be located or no relocation ever
    /// happened. When the recorded next sibling has left its parent, the
    /// composer is appended at the end of the original parent instead.
    pub fn exit_empty(&mut self, doc: &mut Document, locator: &Locator) {
        let Some(composer) = locator.composer(doc) else {
            return;
        };
        let Some(original) = self.original else {
            return;
        };

        let in_box = doc
            .element_by_id(EMPTY_BOX_ID)
            .is_some_and(|bx| doc.parent(composer) == Some(bx));
        if in_box {
            let anchor = original
                .next_sibling
                .filter(|&sibling| doc.parent(sibling) == Some(original.parent));
            let _ = doc.insert_before(original.parent, composer, anchor);
            debug!("composer restored");
        }

        let body = doc.body();
        doc.remove_class(body, CENTERED_CLASS);
        if let Some(overlay) = doc.element_by_id(EMPTY_OVERLAY_ID) {
            doc.remove(overlay);
        }
    }

    /// Find the placeholder box, creating the placeholder if absent.
    fn ensure_placeholder(&self, doc: &mut Document) -> NodeId {
        if let Some(bx) = doc.element_by_id(EMPTY_BOX_ID) {
            return bx;
        }

        let overlay = doc.create_element("div");
        doc.set_id(overlay, EMPTY_OVERLAY_ID);
        let bx = doc.create_element("div");
        doc.set_id(bx, EMPTY_BOX_ID);
        let title = doc.create_element("div");
        doc.set_id(title, EMPTY_TITLE_ID);
        doc.set_text(title, &self.title);

        let _ = doc.append_child(bx, title);
        let _ = doc.append_child(overlay, bx);
        let body = doc.body();
        let _ = doc.append_child(body, overlay);
        debug!("placeholder created");
        bx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

    /// body > main > [list, composer-wrapper > footer, aside]
    fn host_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let main = doc.create_element("main");
        let list = doc.create_element("div");
        doc.set_attr(list, "data-testid", "message-list");
        let wrap = doc.create_element("div");
        doc.set_attr(wrap, "data-testid", "composer-wrapper");
        let footer = doc.create_element("footer");
        let aside = doc.create_element("aside");
        doc.append_child(body, main).unwrap();
        doc.append_child(main, list).unwrap();
        doc.append_child(main, wrap).unwrap();
        doc.append_child(main, aside).unwrap();
        doc.append_child(wrap, footer).unwrap();
        (doc, wrap)
    }

    #[test]
    fn test_enter_centers_composer() {
        let (mut doc, wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("What are you working on?");

        relocator.enter_empty(&mut doc, &locator);

        let bx = doc.element_by_id(EMPTY_BOX_ID).unwrap();
        assert_eq!(doc.parent(wrap), Some(bx));
        assert!(doc.has_class(doc.body(), CENTERED_CLASS));
        assert_eq!(relocator.placement(&doc, &locator), Placement::Centered);

        let title = doc.element_by_id(EMPTY_TITLE_ID).unwrap();
        assert_eq!(doc.text(title), Some("What are you working on?"));
    }

    #[test]
    fn test_enter_is_idempotent() {
        let (mut doc, _wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        relocator.enter_empty(&mut doc, &locator);
        let once = doc.outline(doc.body());

        relocator.enter_empty(&mut doc, &locator);
        doc.take_mutations();
        relocator.enter_empty(&mut doc, &locator);

        assert_eq!(doc.outline(doc.body()), once);
        // The redundant call must not even journal a change.
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_enter_creates_single_placeholder() {
        let (mut doc, _wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        relocator.enter_empty(&mut doc, &locator);
        relocator.enter_empty(&mut doc, &locator);

        let outline = doc.outline(doc.body());
        let occurrences = outline.matches(EMPTY_OVERLAY_ID).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_round_trip_restores_position() {
        let (mut doc, wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        let before = doc.outline(doc.body());
        let original_parent = doc.parent(wrap).unwrap();
        let original_next = doc.next_sibling(wrap).unwrap();

        relocator.enter_empty(&mut doc, &locator);
        relocator.exit_empty(&mut doc, &locator);

        assert_eq!(doc.parent(wrap), Some(original_parent));
        assert_eq!(doc.next_sibling(wrap), Some(original_next));
        assert_eq!(doc.outline(doc.body()), before);
        assert!(!doc.has_class(doc.body(), CENTERED_CLASS));
        assert_eq!(doc.element_by_id(EMPTY_OVERLAY_ID), None);
    }

    #[test]
    fn test_exit_is_idempotent() {
        let (mut doc, _wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        relocator.enter_empty(&mut doc, &locator);
        relocator.exit_empty(&mut doc, &locator);
        let once = doc.outline(doc.body());

        doc.take_mutations();
        relocator.exit_empty(&mut doc, &locator);

        assert_eq!(doc.outline(doc.body()), once);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_exit_before_any_enter_is_noop() {
        let (mut doc, _wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        let before = doc.outline(doc.body());
        doc.take_mutations();
        relocator.exit_empty(&mut doc, &locator);

        assert_eq!(doc.outline(doc.body()), before);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_enter_without_composer_is_noop() {
        let mut doc = Document::new();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");

        relocator.enter_empty(&mut doc, &locator);

        assert_eq!(doc.element_by_id(EMPTY_OVERLAY_ID), None);
        assert!(!doc.has_class(doc.body(), CENTERED_CLASS));
    }

    #[test]
    fn test_original_placement_is_frozen() {
        let (mut doc, wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");
        let original_parent = doc.parent(wrap).unwrap();
        let original_next = doc.next_sibling(wrap).unwrap();

        relocator.enter_empty(&mut doc, &locator);
        relocator.exit_empty(&mut doc, &locator);

        // The host shuffles the composer somewhere else between cycles.
        let elsewhere = doc.create_element("section");
        let body = doc.body();
        doc.append_child(body, elsewhere).unwrap();
        doc.append_child(elsewhere, wrap).unwrap();

        relocator.enter_empty(&mut doc, &locator);
        relocator.exit_empty(&mut doc, &locator);

        // Restoration still targets the first-ever capture.
        assert_eq!(doc.parent(wrap), Some(original_parent));
        assert_eq!(doc.next_sibling(wrap), Some(original_next));
    }

    #[test]
    fn test_stale_sibling_falls_back_to_append() {
        let (mut doc, wrap) = host_doc();
        let locator = Locator::default();
        let mut relocator = Relocator::new("hi");
        let original_parent = doc.parent(wrap).unwrap();

        relocator.enter_empty(&mut doc, &locator);

        // The recorded next sibling (the aside) disappears while centered.
        let aside = doc.query(&Selector::tag("aside")).unwrap();
        doc.remove(aside);

        relocator.exit_empty(&mut doc, &locator);

        assert_eq!(doc.parent(wrap), Some(original_parent));
        assert_eq!(doc.next_sibling(wrap), None);
        assert_eq!(*doc.children(original_parent).last().unwrap(), wrap);
    }
}
