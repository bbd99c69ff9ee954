//! Retained document tree for the host page.
//!
//! The engine never sees a live browser; the host application's markup is
//! modeled as an arena-backed element tree. Structural changes (insertions
//! and removals) under the attached tree are appended to a mutation journal
//! that the chrome drains to decide when to reconcile. Attribute, class, and
//! text edits are not journaled, and neither are changes inside detached
//! subtrees, matching a child-list observer scoped to the body.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::selector::Selector;

/// Handle to a node in a [`Document`].
///
/// Handles stay valid for the whole page session: detaching a node keeps its
/// slot alive, so a stale handle compares unequal to everything attached
/// rather than aliasing a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A structural change recorded in the mutation journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// `node` was inserted under `parent`.
    Inserted { parent: NodeId, node: NodeId },
    /// `node` was detached from `parent`.
    Removed { parent: NodeId, node: NodeId },
}

/// Errors for document operations that cannot be expressed as no-ops.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// Inserting the node would make it its own ancestor.
    #[error("node would become its own ancestor")]
    Cycle,

    /// The reference node is not a child of the target parent.
    #[error("reference node is not a child of the target parent")]
    NotAChild,
}

/// An arena-backed element tree rooted at a `body` node.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the `body` root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            journal: Vec::new(),
        };
        let body = doc.alloc("body");
        debug_assert_eq!(body, NodeId(0));
        doc
    }

    /// The `body` root node.
    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(tag)
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    /// Tag name of a node.
    pub fn tag(&self, node: NodeId) -> &str {
        &self.data(node).tag
    }

    /// Element id, if set.
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.data(node).id.as_deref()
    }

    /// Set the element id.
    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.data_mut(node).id = Some(id.to_string());
    }

    /// Text content, if set.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node).text.as_deref()
    }

    /// Set the text content.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.data_mut(node).text = Some(text.to_string());
    }

    /// Look up an attribute by name.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node).attrs.get(name).map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.data_mut(node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    /// Class list of a node.
    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.data(node).classes
    }

    /// Whether the node carries the given class.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.data(node).classes.iter().any(|c| c == class)
    }

    /// Add a class. Idempotent.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.data_mut(node).classes.push(class.to_string());
        }
    }

    /// Remove a class. Idempotent.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.data_mut(node).classes.retain(|c| c != class);
    }

    /// Attribute view used by selector matching: `id` and `class` resolve to
    /// the element id and the space-joined class list, like their markup
    /// attributes would.
    pub fn attr_text(&self, node: NodeId, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => self.id(node).map(Cow::Borrowed),
            "class" => {
                let classes = self.classes(node);
                if classes.is_empty() {
                    None
                } else {
                    Some(Cow::Owned(classes.join(" ")))
                }
            }
            _ => self.attr(node, name).map(Cow::Borrowed),
        }
    }

    /// Parent node, if attached to one.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    /// Children of a node, in document order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.data(node).children
    }

    /// The sibling immediately after `node`, if any.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Whether the node is reachable from the `body` root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = node;
        loop {
            if cursor == self.body() {
                return true;
            }
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    fn is_ancestor_of(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Detach a node from its parent. No-op for already-detached nodes.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            let observed = self.is_attached(parent);
            self.data_mut(parent).children.retain(|&c| c != node);
            self.data_mut(node).parent = None;
            if observed {
                self.journal.push(Mutation::Removed { parent, node });
            }
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` immediately before `reference`, or at
    /// the end when `reference` is `None`. The child is detached from any
    /// current parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if self.is_ancestor_of(child, parent) {
            return Err(DomError::Cycle);
        }
        if reference == Some(child) {
            return Ok(());
        }
        if let Some(anchor) = reference {
            if self.parent(anchor) != Some(parent) {
                return Err(DomError::NotAChild);
            }
        }

        self.remove(child);

        let index = match reference {
            Some(anchor) => self
                .children(parent)
                .iter()
                .position(|&c| c == anchor)
                .ok_or(DomError::NotAChild)?,
            None => self.children(parent).len(),
        };
        self.data_mut(parent).children.insert(index, child);
        self.data_mut(child).parent = Some(parent);
        if self.is_attached(parent) {
            self.journal.push(Mutation::Inserted {
                parent,
                node: child,
            });
        }
        Ok(())
    }

    /// First attached descendant of `scope` (excluding `scope` itself)
    /// matching `selector`, in document order.
    pub fn query_from(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// First attached node matching `selector`, in document order.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        if selector.matches(self, self.body()) {
            return Some(self.body());
        }
        self.query_from(self.body(), selector)
    }

    /// Attached element with the given id, if any.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&Selector::id(id))
    }

    /// Drain the mutation journal.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Whether the journal holds undrained mutations.
    pub fn has_pending_mutations(&self) -> bool {
        !self.journal.is_empty()
    }

    /// A stable one-line-per-node structural summary of the subtree under
    /// `node`, used to compare trees in tests.
    pub fn outline(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.outline_into(node, 0, &mut out);
        out
    }

    fn outline_into(&self, node: NodeId, depth: usize, out: &mut String) {
        let data = self.data(node);
        out.push_str(&"  ".repeat(depth));
        out.push_str(&data.tag);
        if let Some(id) = &data.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &data.classes {
            out.push('.');
            out.push_str(class);
        }
        out.push('\n');
        for &child in &data.children {
            self.outline_into(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_child(tag: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let node = doc.create_element(tag);
        let body = doc.body();
        doc.append_child(body, node).unwrap();
        (doc, node)
    }

    #[test]
    fn test_append_sets_parent_and_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(body, a).unwrap();
        doc.append_child(body, b).unwrap();

        assert_eq!(doc.parent(a), Some(body));
        assert_eq!(doc.children(body), &[a, b]);
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), None);
    }

    #[test]
    fn test_insert_before_reference() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("div");
        doc.append_child(body, a).unwrap();
        doc.append_child(body, b).unwrap();
        doc.insert_before(body, c, Some(b)).unwrap();

        assert_eq!(doc.children(body), &[a, c, b]);
    }

    #[test]
    fn test_insert_moves_between_parents() {
        let mut doc = Document::new();
        let body = doc.body();
        let old_home = doc.create_element("div");
        let new_home = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(body, old_home).unwrap();
        doc.append_child(body, new_home).unwrap();
        doc.append_child(old_home, child).unwrap();

        doc.append_child(new_home, child).unwrap();

        assert!(doc.children(old_home).is_empty());
        assert_eq!(doc.parent(child), Some(new_home));
    }

    #[test]
    fn test_insert_rejects_cycle() {
        let mut doc = Document::new();
        let body = doc.body();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(body, outer).unwrap();
        doc.append_child(outer, inner).unwrap();

        assert!(matches!(
            doc.append_child(inner, outer),
            Err(DomError::Cycle)
        ));
    }

    #[test]
    fn test_insert_rejects_foreign_reference() {
        let mut doc = Document::new();
        let body = doc.body();
        let parent = doc.create_element("div");
        let stranger = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(body, parent).unwrap();
        doc.append_child(body, stranger).unwrap();

        assert!(matches!(
            doc.insert_before(parent, child, Some(stranger)),
            Err(DomError::NotAChild)
        ));
    }

    #[test]
    fn test_remove_detaches() {
        let (mut doc, node) = doc_with_child("div");
        assert!(doc.is_attached(node));

        doc.remove(node);
        assert!(!doc.is_attached(node));
        assert_eq!(doc.parent(node), None);

        // Removing again is a no-op.
        doc.take_mutations();
        doc.remove(node);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn test_query_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.create_element("article");
        let second = doc.create_element("article");
        doc.append_child(body, first).unwrap();
        doc.append_child(body, second).unwrap();

        assert_eq!(doc.query(&Selector::tag("article")), Some(first));
    }

    #[test]
    fn test_query_excludes_detached() {
        let (mut doc, node) = doc_with_child("article");
        assert_eq!(doc.query(&Selector::tag("article")), Some(node));

        doc.remove(node);
        assert_eq!(doc.query(&Selector::tag("article")), None);
    }

    #[test]
    fn test_query_from_excludes_scope() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.create_element("div");
        doc.add_class(list, "messages");
        doc.append_child(body, list).unwrap();

        assert_eq!(doc.query_from(list, &Selector::class("messages")), None);
        assert_eq!(doc.query(&Selector::class("messages")), Some(list));
    }

    #[test]
    fn test_journal_records_structural_changes_only() {
        let (mut doc, node) = doc_with_child("div");
        doc.take_mutations();

        doc.add_class(node, "highlight");
        doc.set_attr(node, "data-x", "1");
        doc.set_text(node, "hello");
        assert!(!doc.has_pending_mutations());

        doc.remove(node);
        let body = doc.body();
        let muts = doc.take_mutations();
        assert_eq!(muts, vec![Mutation::Removed { parent: body, node }]);
    }

    #[test]
    fn test_detached_subtree_changes_not_journaled() {
        let mut doc = Document::new();
        let body = doc.body();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");

        // Building a subtree offscreen is silent.
        doc.append_child(outer, inner).unwrap();
        assert!(!doc.has_pending_mutations());

        // Attaching it journals a single insertion.
        doc.append_child(body, outer).unwrap();
        let muts = doc.take_mutations();
        assert_eq!(
            muts,
            vec![Mutation::Inserted {
                parent: body,
                node: outer
            }]
        );
    }

    #[test]
    fn test_attr_text_maps_id_and_class() {
        let (mut doc, node) = doc_with_child("div");
        doc.set_id(node, "box");
        doc.add_class(node, "a");
        doc.add_class(node, "b");

        assert_eq!(doc.attr_text(node, "id").as_deref(), Some("box"));
        assert_eq!(doc.attr_text(node, "class").as_deref(), Some("a b"));
        assert_eq!(doc.attr_text(node, "data-x"), None);
    }

    #[test]
    fn test_outline_reflects_structure() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrap = doc.create_element("div");
        doc.set_id(wrap, "wrap");
        doc.add_class(wrap, "outer");
        let inner = doc.create_element("span");
        doc.append_child(body, wrap).unwrap();
        doc.append_child(wrap, inner).unwrap();

        assert_eq!(doc.outline(body), "body\n  div#wrap.outer\n    span\n");
    }
}
