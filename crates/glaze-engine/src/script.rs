//! Scripted host sessions for headless replay.
//!
//! A script is a time-ordered list of host-side actions (messages arriving,
//! chat resets, navigation, clicks) that the replay command feeds into a
//! fresh host document with the chrome attached. Engine tests and the
//! `glaze replay` command share this format.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scripted host session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Steps, applied in order of `at_ms`.
    pub steps: Vec<ScriptStep>,
}

/// One timed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Virtual session time at which the step fires.
    pub at_ms: u64,

    #[serde(flatten)]
    pub action: ScriptAction,
}

/// What the host does at a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// A user message is appended to the conversation.
    UserMessage { text: String },
    /// An assistant message is appended to the conversation.
    AssistantMessage { text: String },
    /// The conversation is reset to zero messages.
    ClearChat,
    /// The location hash changes.
    HashChange,
    /// Back/forward navigation.
    PopState,
    /// A click lands on the first node matching `target`.
    Click { target: String },
}

impl ScriptAction {
    /// Short label for trace output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UserMessage { .. } => "user_message",
            Self::AssistantMessage { .. } => "assistant_message",
            Self::ClearChat => "clear_chat",
            Self::HashChange => "hash_change",
            Self::PopState => "pop_state",
            Self::Click { .. } => "click",
        }
    }
}

impl Script {
    /// Load a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(ScriptError::Io)?;
        let mut script: Self = serde_json::from_str(&content).map_err(ScriptError::Parse)?;
        script.steps.sort_by_key(|step| step.at_ms);
        Ok(script)
    }
}

/// Errors loading a script file.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// I/O error reading the script.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing script JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
}
