//! Deciding whether the conversation is empty.

use tracing::warn;

use crate::dom::{Document, NodeId};
use crate::selector::Selector;

/// Derives the "chat is empty" signal from the message-list region.
///
/// The signal is recomputed on every call, never cached. A missing region
/// counts as empty: a chat that has not rendered yet should get the centered
/// composer, not a crash.
#[derive(Debug, Clone)]
pub struct EmptinessOracle {
    markers: Vec<Selector>,
}

fn default_markers() -> Vec<Selector> {
    vec![
        Selector::attr("data-testid", "message"),
        Selector::class("cl__message"),
        Selector::tag("article"),
    ]
}

impl Default for EmptinessOracle {
    fn default() -> Self {
        Self {
            markers: default_markers(),
        }
    }
}

impl EmptinessOracle {
    /// Build an oracle from configured marker selector strings, discarding
    /// invalid entries and falling back to the built-in markers when none
    /// parse.
    pub fn from_markers(configured: &[String]) -> Self {
        let markers: Vec<Selector> = configured
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    warn!(selector = %raw, %err, "ignoring configured message marker");
                    None
                }
            })
            .collect();
        if markers.is_empty() {
            Self::default()
        } else {
            Self { markers }
        }
    }

    /// Whether the conversation should be treated as empty.
    ///
    /// Children that match none of the message markers (loading placeholders,
    /// spacers) do not count as messages.
    pub fn is_empty(&self, doc: &Document, list: Option<NodeId>) -> bool {
        let Some(list) = list else { return true };
        if doc.children(list).is_empty() {
            return true;
        }
        !self
            .markers
            .iter()
            .any(|marker| doc.query_from(list, marker).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_list() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.create_element("div");
        doc.set_attr(list, "data-testid", "message-list");
        doc.append_child(body, list).unwrap();
        (doc, list)
    }

    #[test]
    fn test_missing_region_is_empty() {
        let doc = Document::new();
        let oracle = EmptinessOracle::default();
        assert!(oracle.is_empty(&doc, None));
    }

    #[test]
    fn test_zero_children_is_empty() {
        let (doc, list) = doc_with_list();
        let oracle = EmptinessOracle::default();
        assert!(oracle.is_empty(&doc, Some(list)));
    }

    #[test]
    fn test_unrecognized_children_still_empty() {
        let (mut doc, list) = doc_with_list();
        let spinner = doc.create_element("div");
        doc.add_class(spinner, "loading-indicator");
        doc.append_child(list, spinner).unwrap();

        let oracle = EmptinessOracle::default();
        assert!(oracle.is_empty(&doc, Some(list)));
    }

    #[test]
    fn test_marker_match_is_not_empty() {
        let (mut doc, list) = doc_with_list();
        let message = doc.create_element("article");
        doc.append_child(list, message).unwrap();

        let oracle = EmptinessOracle::default();
        assert!(!oracle.is_empty(&doc, Some(list)));
    }

    #[test]
    fn test_nested_marker_is_found() {
        let (mut doc, list) = doc_with_list();
        let group = doc.create_element("div");
        let message = doc.create_element("div");
        doc.set_attr(message, "data-testid", "message");
        doc.append_child(list, group).unwrap();
        doc.append_child(group, message).unwrap();

        let oracle = EmptinessOracle::default();
        assert!(!oracle.is_empty(&doc, Some(list)));
    }

    #[test]
    fn test_configured_markers_replace_defaults() {
        let (mut doc, list) = doc_with_list();
        let message = doc.create_element("article");
        doc.append_child(list, message).unwrap();

        let oracle = EmptinessOracle::from_markers(&[".bubble".to_string()]);
        assert!(oracle.is_empty(&doc, Some(list)));

        doc.add_class(message, "bubble");
        assert!(!oracle.is_empty(&doc, Some(list)));
    }
}
