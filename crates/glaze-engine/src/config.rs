//! Configuration for the chrome layer.
//!
//! Everything user-facing is configurable: branding copy, overlay timings
//! and enable flags, the empty-state title, and the selector strategy tables
//! used against drifting host markup. Unset fields fall back to defaults
//! matching the stock Chainlit-style host.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::locate::Anchor;

/// Default config file name.
pub const CONFIG_FILE: &str = "glaze.json";

fn default_true() -> bool {
    true
}

/// Top-level chrome configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChromeConfig {
    /// Branding copy shared across overlays.
    #[serde(default)]
    pub branding: Branding,

    /// Loading splash settings.
    #[serde(default)]
    pub splash: SplashConfig,

    /// Welcome overlay settings.
    #[serde(default)]
    pub welcome: WelcomeConfig,

    /// Disclaimer button and modal settings.
    #[serde(default)]
    pub disclaimer: DisclaimerConfig,

    /// Centered empty-chat composer settings.
    #[serde(default)]
    pub empty_state: EmptyStateConfig,

    /// Selector strategy overrides for nonstandard host markup.
    #[serde(default)]
    pub selectors: SelectorOverrides,
}

/// Branding copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    #[serde(default = "default_loading_text")]
    pub loading_text: String,

    #[serde(default = "default_loading_subtext")]
    pub loading_subtext: String,
}

fn default_app_name() -> String {
    "Glaze".into()
}

fn default_tagline() -> String {
    "Market intelligence, conversationally".into()
}

fn default_loading_text() -> String {
    "Loading Glaze".into()
}

fn default_loading_subtext() -> String {
    "Preparing your workspace".into()
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            tagline: default_tagline(),
            loading_text: default_loading_text(),
            loading_subtext: default_loading_subtext(),
        }
    }
}

/// Loading splash: shown at attach, fades, then hands off to the welcome
/// overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplashConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long the splash stays fully visible.
    #[serde(default = "default_splash_duration_ms")]
    pub duration_ms: u64,

    /// Fade-out length before removal.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

fn default_splash_duration_ms() -> u64 {
    2000
}

fn default_fade_ms() -> u64 {
    500
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_splash_duration_ms(),
            fade_ms: default_fade_ms(),
        }
    }
}

/// One feature card on the welcome overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeCard {
    pub icon: String,
    pub title: String,
    pub subtitle: String,
}

/// Welcome overlay: shown once per session after the splash closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Delay before the animate-in class is applied.
    #[serde(default = "default_welcome_activate_ms")]
    pub activate_delay_ms: u64,

    /// Auto-dismiss deadline, measured from mount.
    #[serde(default = "default_welcome_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,

    /// Fade-out length before removal.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,

    #[serde(default = "default_welcome_button")]
    pub button_label: String,

    #[serde(default = "default_welcome_cards")]
    pub cards: Vec<WelcomeCard>,

    /// Suggested first prompts listed under the cards.
    #[serde(default = "default_welcome_prompts")]
    pub prompts: Vec<String>,
}

fn default_welcome_activate_ms() -> u64 {
    100
}

fn default_welcome_auto_dismiss_ms() -> u64 {
    6000
}

fn default_welcome_button() -> String {
    "Get started".into()
}

fn default_welcome_cards() -> Vec<WelcomeCard> {
    vec![
        WelcomeCard {
            icon: "⭐".into(),
            title: "Futures analysis".into(),
            subtitle: "Real-time derivative coverage".into(),
        },
        WelcomeCard {
            icon: "📊".into(),
            title: "Spot market data".into(),
            subtitle: "Day-ahead reference prices".into(),
        },
        WelcomeCard {
            icon: "🔍".into(),
            title: "Deep lookups".into(),
            subtitle: "Ask in plain language".into(),
        },
    ]
}

fn default_welcome_prompts() -> Vec<String> {
    vec![
        "Power futures for September".into(),
        "Day-ahead price for last Friday".into(),
        "Average clearing price this month".into(),
    ]
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activate_delay_ms: default_welcome_activate_ms(),
            auto_dismiss_ms: default_welcome_auto_dismiss_ms(),
            fade_ms: default_fade_ms(),
            button_label: default_welcome_button(),
            cards: default_welcome_cards(),
            prompts: default_welcome_prompts(),
        }
    }
}

/// Floating disclaimer button and modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclaimerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Delay after attach before the button mounts (and the sidebar is
    /// hidden).
    #[serde(default = "default_disclaimer_delay_ms")]
    pub mount_delay_ms: u64,

    #[serde(default = "default_disclaimer_label")]
    pub label: String,

    #[serde(default = "default_disclaimer_heading")]
    pub heading: String,

    /// Body paragraphs of the modal.
    #[serde(default = "default_disclaimer_lines")]
    pub lines: Vec<String>,
}

fn default_disclaimer_delay_ms() -> u64 {
    2000
}

fn default_disclaimer_label() -> String {
    "Disclaimer".into()
}

fn default_disclaimer_heading() -> String {
    "Important notice".into()
}

fn default_disclaimer_lines() -> Vec<String> {
    vec![
        "This assistant provides market intelligence for research and analysis purposes only.".into(),
        "Nothing here is financial advice. Consult licensed professionals before trading.".into(),
        "Data is provided as is, without warranties of any kind.".into(),
    ]
}

impl Default for DisclaimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mount_delay_ms: default_disclaimer_delay_ms(),
            label: default_disclaimer_label(),
            heading: default_disclaimer_heading(),
            lines: default_disclaimer_lines(),
        }
    }
}

/// Centered empty-chat composer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyStateConfig {
    /// Title shown above the centered composer.
    #[serde(default = "default_empty_title")]
    pub title: String,
}

fn default_empty_title() -> String {
    "What are you working on?".into()
}

impl Default for EmptyStateConfig {
    fn default() -> Self {
        Self {
            title: default_empty_title(),
        }
    }
}

/// One configured locator strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Selector string, e.g. `[data-testid="composer-wrapper"]` or `footer`.
    pub selector: String,

    /// Whether the match itself or its parent is the region.
    #[serde(default)]
    pub anchor: Anchor,
}

/// Selector overrides; empty lists fall back to the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorOverrides {
    #[serde(default)]
    pub composer: Vec<StrategyConfig>,

    #[serde(default)]
    pub message_list: Vec<StrategyConfig>,

    /// Selectors that identify a rendered message inside the list.
    #[serde(default)]
    pub message_markers: Vec<String>,

    /// Selectors for the host sidebar hidden at disclaimer mount.
    #[serde(default)]
    pub sidebar: Vec<String>,
}

impl ChromeConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
