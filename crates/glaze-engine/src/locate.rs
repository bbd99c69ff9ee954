//! Region location over unstable host markup.
//!
//! The host application's markup varies across versions, so each region is
//! found through an ordered list of strategies, most specific first, and the
//! first strategy that resolves wins. A strategy pairs a selector with an
//! anchor: take the matching node itself, or its parent (for markers that sit
//! inside the region they identify).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{SelectorOverrides, StrategyConfig};
use crate::dom::{Document, NodeId};
use crate::selector::Selector;

/// Which node a matched selector stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// The matching node itself.
    #[default]
    Match,
    /// The matching node's parent.
    Parent,
}

/// One fallback step in a region search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub selector: Selector,
    pub anchor: Anchor,
}

impl Strategy {
    /// Strategy resolving to the matching node.
    pub fn matching(selector: Selector) -> Self {
        Self {
            selector,
            anchor: Anchor::Match,
        }
    }

    /// Strategy resolving to the matching node's parent.
    pub fn parent_of(selector: Selector) -> Self {
        Self {
            selector,
            anchor: Anchor::Parent,
        }
    }

    fn resolve(&self, doc: &Document) -> Option<NodeId> {
        let hit = doc.query(&self.selector)?;
        match self.anchor {
            Anchor::Match => Some(hit),
            Anchor::Parent => doc.parent(hit),
        }
    }
}

/// Resolves the composer and message-list regions of the host document.
///
/// Pure queries with no side effects; safe to call on every reconciliation
/// pass.
#[derive(Debug, Clone)]
pub struct Locator {
    composer: Vec<Strategy>,
    message_list: Vec<Strategy>,
}

fn default_composer_strategies() -> Vec<Strategy> {
    vec![
        Strategy::matching(Selector::attr("data-testid", "composer-wrapper")),
        Strategy::matching(Selector::class("cl__composer-wrap")),
        Strategy::parent_of(Selector::tag("footer")),
        Strategy::parent_of(Selector::attr_contains("class", "composer")),
    ]
}

fn default_message_list_strategies() -> Vec<Strategy> {
    vec![
        Strategy::matching(Selector::attr("data-testid", "message-list")),
        Strategy::matching(Selector::class("cl__messages")),
        Strategy::matching(Selector::attr_contains("class", "MessageList")),
        Strategy::matching(Selector::attr_contains("class", "messages")),
    ]
}

/// Parse configured strategies, discarding invalid selector strings. An
/// empty or fully-invalid list falls back to the built-in table.
pub(crate) fn strategies_from(
    configured: &[StrategyConfig],
    fallback: Vec<Strategy>,
) -> Vec<Strategy> {
    let parsed: Vec<Strategy> = configured
        .iter()
        .filter_map(|cfg| match Selector::parse(&cfg.selector) {
            Ok(selector) => Some(Strategy {
                selector,
                anchor: cfg.anchor,
            }),
            Err(err) => {
                warn!(selector = %cfg.selector, %err, "ignoring configured selector");
                None
            }
        })
        .collect();
    if parsed.is_empty() {
        fallback
    } else {
        parsed
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self {
            composer: default_composer_strategies(),
            message_list: default_message_list_strategies(),
        }
    }
}

impl Locator {
    /// Build a locator from config overrides, falling back to the built-in
    /// strategy tables where no valid override is given.
    pub fn from_config(overrides: &SelectorOverrides) -> Self {
        Self {
            composer: strategies_from(&overrides.composer, default_composer_strategies()),
            message_list: strategies_from(
                &overrides.message_list,
                default_message_list_strategies(),
            ),
        }
    }

    /// The composer (message-input) region, if any strategy matches.
    pub fn composer(&self, doc: &Document) -> Option<NodeId> {
        self.composer.iter().find_map(|s| s.resolve(doc))
    }

    /// The message-list region, if any strategy matches.
    pub fn message_list(&self, doc: &Document) -> Option<NodeId> {
        self.message_list.iter().find_map(|s| s.resolve(doc))
    }
}
