//! The simulated host chat page.
//!
//! Builds a Chainlit-style document and mutates it the way the real chat
//! application would: messages appended as the conversation progresses,
//! everything removed on a chat reset. The chrome engine is never told about
//! these calls; it only sees the document's mutation journal.

use chrono::Local;
use glaze_engine::dom::{Document, NodeId};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One rendered message pulled back out of the document.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub role: Role,
    pub time: String,
    pub text: String,
}

/// Handles into the host page's own regions.
#[derive(Debug, Clone, Copy)]
pub struct HostPage {
    message_list: NodeId,
    pub sidebar: NodeId,
}

impl HostPage {
    /// Build the host markup under the document body.
    pub fn build(doc: &mut Document) -> Self {
        let body = doc.body();

        let sidebar = doc.create_element("div");
        doc.add_class(sidebar, "sidebar");
        doc.set_text(sidebar, "History");

        let main = doc.create_element("main");
        doc.set_id(main, "chat");

        let message_list = doc.create_element("div");
        doc.set_attr(message_list, "data-testid", "message-list");
        doc.add_class(message_list, "cl__messages");

        let composer = doc.create_element("div");
        doc.set_attr(composer, "data-testid", "composer-wrapper");
        doc.add_class(composer, "cl__composer-wrap");
        let footer = doc.create_element("footer");
        let input = doc.create_element("div");
        doc.add_class(input, "cl__input");

        let _ = doc.append_child(body, sidebar);
        let _ = doc.append_child(body, main);
        let _ = doc.append_child(main, message_list);
        let _ = doc.append_child(main, composer);
        let _ = doc.append_child(composer, footer);
        let _ = doc.append_child(footer, input);

        Self {
            message_list,
            sidebar,
        }
    }

    fn push_message(&self, doc: &mut Document, role: Role, text: &str) {
        let message = doc.create_element("article");
        doc.set_attr(message, "data-testid", "message");
        doc.add_class(message, "cl__message");
        doc.add_class(message, role.class());
        doc.set_attr(message, "data-message-id", &Uuid::new_v4().to_string());
        doc.set_attr(message, "data-time", &Local::now().format("%H:%M").to_string());
        doc.set_text(message, text);
        let _ = doc.append_child(self.message_list, message);
    }

    /// Append a user message to the conversation.
    pub fn push_user_message(&self, doc: &mut Document, text: &str) {
        self.push_message(doc, Role::User, text);
    }

    /// Append an assistant message to the conversation.
    pub fn push_assistant_message(&self, doc: &mut Document, text: &str) {
        self.push_message(doc, Role::Assistant, text);
    }

    /// Reset the conversation to zero messages.
    pub fn clear_chat(&self, doc: &mut Document) {
        let children: Vec<NodeId> = doc.children(self.message_list).to_vec();
        for child in children {
            doc.remove(child);
        }
    }

    /// Number of messages in the conversation.
    pub fn message_count(&self, doc: &Document) -> usize {
        doc.children(self.message_list)
            .iter()
            .filter(|&&child| doc.attr(child, "data-testid") == Some("message"))
            .count()
    }

    /// Read the conversation back out of the document.
    pub fn transcript(&self, doc: &Document) -> Vec<TranscriptEntry> {
        doc.children(self.message_list)
            .iter()
            .filter(|&&child| doc.attr(child, "data-testid") == Some("message"))
            .map(|&child| {
                let role = if doc.has_class(child, "user") {
                    Role::User
                } else {
                    Role::Assistant
                };
                TranscriptEntry {
                    role,
                    time: doc.attr(child, "data-time").unwrap_or_default().to_string(),
                    text: doc.text(child).unwrap_or_default().to_string(),
                }
            })
            .collect()
    }

    /// Whether the host sidebar is still visible.
    pub fn sidebar_visible(&self, doc: &Document) -> bool {
        doc.attr(self.sidebar, "style") != Some("display: none")
    }
}
