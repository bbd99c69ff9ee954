//! glaze-engine: Headless chrome engine for chat UIs
//!
//! This crate provides the core logic for glaze, including:
//! - A retained document tree with a structural-mutation journal
//! - Region location over unstable host markup
//! - The centered empty-chat composer relocation state machine
//! - Timed splash/welcome/disclaimer overlays
//! - Configuration and scripted-session formats

pub mod chrome;
pub mod config;
pub mod disclaimer;
pub mod dom;
pub mod emptiness;
pub mod locate;
pub mod relocate;
pub mod script;
pub mod selector;
pub mod splash;
pub mod timers;
pub mod welcome;

// Re-export commonly used types
pub use chrome::{Chrome, PageEvent};
pub use config::{
    Branding, ChromeConfig, ConfigError, DisclaimerConfig, EmptyStateConfig, SelectorOverrides,
    SplashConfig, StrategyConfig, WelcomeCard, WelcomeConfig, CONFIG_FILE,
};
pub use dom::{Document, DomError, Mutation, NodeId};
pub use emptiness::EmptinessOracle;
pub use locate::{Anchor, Locator, Strategy};
pub use relocate::{Placement, Relocator, CENTERED_CLASS};
pub use script::{Script, ScriptAction, ScriptError, ScriptStep};
pub use selector::{Selector, SelectorError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
