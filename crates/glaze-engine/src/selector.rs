//! Minimal selector language for locating host markup.
//!
//! Supports exactly the forms the locator strategy tables need: tag names,
//! `#id`, `.class`, exact attribute matches (`[data-testid="x"]`), and
//! attribute substring matches (`[class*="composer"]`). Anything richer in a
//! config override is rejected at parse time rather than silently ignored at
//! query time.

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Document, NodeId};

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Tag name, e.g. `footer`.
    Tag(String),
    /// Element id, e.g. `#loading-overlay`.
    Id(String),
    /// Class token, e.g. `.cl__messages`.
    Class(String),
    /// Exact attribute value, e.g. `[data-testid="message"]`.
    Attr { name: String, value: String },
    /// Attribute substring, e.g. `[class*="composer"]`.
    AttrSubstring { name: String, value: String },
}

/// Errors from parsing selector strings.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("unsupported selector: {0:?}")]
    Unsupported(String),
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\[([A-Za-z_][A-Za-z0-9_-]*)(\*)?="?([^"\]]*)"?\]$"#)
            .expect("attribute selector pattern")
    })
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("name pattern"))
}

impl Selector {
    /// Tag selector.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Id selector.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Class selector.
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Exact attribute selector.
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Attribute substring selector.
    pub fn attr_contains(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrSubstring {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix('#') {
            if name_pattern().is_match(rest) {
                return Ok(Self::id(rest));
            }
        } else if let Some(rest) = input.strip_prefix('.') {
            if name_pattern().is_match(rest) {
                return Ok(Self::class(rest));
            }
        } else if let Some(captures) = attr_pattern().captures(input) {
            let name = &captures[1];
            let value = &captures[3];
            return if captures.get(2).is_some() {
                Ok(Self::attr_contains(name, value))
            } else {
                Ok(Self::attr(name, value))
            };
        } else if name_pattern().is_match(input) {
            return Ok(Self::Tag(input.to_ascii_lowercase()));
        }

        Err(SelectorError::Unsupported(input.to_string()))
    }

    /// Whether `node` matches this selector.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Self::Tag(tag) => doc.tag(node) == tag,
            Self::Id(id) => doc.id(node) == Some(id.as_str()),
            Self::Class(class) => doc.has_class(node, class),
            Self::Attr { name, value } => {
                doc.attr_text(node, name).as_deref() == Some(value.as_str())
            }
            Self::AttrSubstring { name, value } => doc
                .attr_text(node, name)
                .is_some_and(|text| text.contains(value.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(Selector::parse("footer").unwrap(), Selector::tag("footer"));
        assert_eq!(Selector::parse("Article").unwrap(), Selector::tag("article"));
    }

    #[test]
    fn test_parse_id_and_class() {
        assert_eq!(
            Selector::parse("#loading-overlay").unwrap(),
            Selector::id("loading-overlay")
        );
        assert_eq!(
            Selector::parse(".cl__messages").unwrap(),
            Selector::class("cl__messages")
        );
    }

    #[test]
    fn test_parse_attr_forms() {
        assert_eq!(
            Selector::parse(r#"[data-testid="composer-wrapper"]"#).unwrap(),
            Selector::attr("data-testid", "composer-wrapper")
        );
        assert_eq!(
            Selector::parse(r#"[class*="composer"]"#).unwrap(),
            Selector::attr_contains("class", "composer")
        );
        // Unquoted values are accepted.
        assert_eq!(
            Selector::parse("[data-testid=message]").unwrap(),
            Selector::attr("data-testid", "message")
        );
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!(Selector::parse("div > span").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse(".a.b").is_err());
    }

    #[test]
    fn test_matching() {
        let mut doc = Document::new();
        let body = doc.body();
        let node = doc.create_element("footer");
        doc.set_id(node, "main-footer");
        doc.add_class(node, "cl__composer-wrap");
        doc.set_attr(node, "data-testid", "composer-wrapper");
        doc.append_child(body, node).unwrap();

        assert!(Selector::tag("footer").matches(&doc, node));
        assert!(Selector::id("main-footer").matches(&doc, node));
        assert!(Selector::class("cl__composer-wrap").matches(&doc, node));
        assert!(Selector::attr("data-testid", "composer-wrapper").matches(&doc, node));
        assert!(Selector::attr_contains("class", "composer").matches(&doc, node));
        assert!(!Selector::attr_contains("class", "sidebar").matches(&doc, node));
    }
}
