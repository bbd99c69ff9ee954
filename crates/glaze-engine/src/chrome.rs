//! Chrome orchestration: reconciliation loop, timers, and click routing.
//!
//! `Chrome` owns the locator, the emptiness oracle, the relocator, and the
//! three cosmetic overlays. The host drives it with three entry points:
//! `tick` for elapsed time, `pump` after document changes, and
//! `handle_event`/`click` for discrete browser-style events. Everything else
//! is internal wiring.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ChromeConfig;
use crate::disclaimer::{sidebar_selectors, Disclaimer};
use crate::dom::{Document, NodeId};
use crate::emptiness::EmptinessOracle;
use crate::locate::Locator;
use crate::relocate::{Placement, Relocator};
use crate::selector::Selector;
use crate::splash::Splash;
use crate::timers::{TimerAction, Timers};
use crate::welcome::Welcome;

/// Session-history navigation events the chrome re-evaluates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The location hash changed.
    HashChange,
    /// Back/forward navigation.
    PopState,
}

/// Reconciliation settles after one extra pass when the relocator is
/// idempotent; anything past this bound means it is not.
const MAX_RECONCILE_PASSES: usize = 8;

/// The chrome layer attached to one host document for one page session.
#[derive(Debug)]
pub struct Chrome {
    config: ChromeConfig,
    locator: Locator,
    oracle: EmptinessOracle,
    relocator: Relocator,
    timers: Timers,
    splash: Splash,
    welcome: Welcome,
    disclaimer: Disclaimer,
    sidebar: Vec<Selector>,
    attached: bool,
    now: Duration,
}

impl Chrome {
    /// Build a chrome layer from configuration.
    pub fn new(config: ChromeConfig) -> Self {
        let locator = Locator::from_config(&config.selectors);
        let oracle = EmptinessOracle::from_markers(&config.selectors.message_markers);
        let relocator = Relocator::new(config.empty_state.title.clone());
        let sidebar = sidebar_selectors(&config.selectors.sidebar);
        Self {
            config,
            locator,
            oracle,
            relocator,
            timers: Timers::new(),
            splash: Splash::new(),
            welcome: Welcome::new(),
            disclaimer: Disclaimer::new(),
            sidebar,
            attached: false,
            now: Duration::ZERO,
        }
    }

    /// Attach to an interactively-ready document: mount the splash, arm the
    /// overlay timers, and run the initial placement evaluation.
    pub fn attach(&mut self, doc: &mut Document) {
        if self.attached {
            return;
        }
        self.attached = true;
        debug!("chrome attached");

        if self.config.splash.enabled {
            self.splash.mount(doc, &self.config.branding);
            let visible = Duration::from_millis(self.config.splash.duration_ms);
            let fade = Duration::from_millis(self.config.splash.fade_ms);
            self.timers.schedule(visible, TimerAction::SplashFade);
            self.timers.schedule(visible + fade, TimerAction::SplashClose);
        } else {
            self.open_welcome(doc);
        }

        if self.config.disclaimer.enabled {
            let delay = Duration::from_millis(self.config.disclaimer.mount_delay_ms);
            self.timers.schedule(delay, TimerAction::DisclaimerMount);
        }

        self.reconcile(doc);
        self.pump(doc);
    }

    /// Whether the conversation currently reads as empty.
    pub fn is_empty(&self, doc: &Document) -> bool {
        let list = self.locator.message_list(doc);
        self.oracle.is_empty(doc, list)
    }

    /// Current composer placement.
    pub fn placement(&self, doc: &Document) -> Placement {
        self.relocator.placement(doc, &self.locator)
    }

    /// One reconciliation pass: recompute emptiness, apply the matching
    /// placement.
    pub fn reconcile(&mut self, doc: &mut Document) {
        if self.is_empty(doc) {
            self.relocator.enter_empty(doc, &self.locator);
        } else {
            self.relocator.exit_empty(doc, &self.locator);
        }
    }

    /// Drain the mutation journal and reconcile until a pass journals no
    /// further change. Returns the number of passes run.
    pub fn pump(&mut self, doc: &mut Document) -> usize {
        let mut passes = 0;
        while doc.has_pending_mutations() {
            doc.take_mutations();
            if passes >= MAX_RECONCILE_PASSES {
                warn!("reconciliation did not settle after {MAX_RECONCILE_PASSES} passes");
                break;
            }
            self.reconcile(doc);
            passes += 1;
        }
        passes
    }

    /// Re-evaluate on a session-history navigation event.
    pub fn handle_event(&mut self, doc: &mut Document, event: PageEvent) {
        debug!(?event, "navigation event");
        self.reconcile(doc);
        self.pump(doc);
    }

    /// Advance the virtual clock, firing due overlay timers.
    pub fn tick(&mut self, doc: &mut Document, now: Duration) {
        self.now = now;
        let due = self.timers.take_due(now);
        for action in due {
            self.apply_timer(doc, action);
        }
        self.pump(doc);
    }

    /// Dispatch a click on `target` to the overlay subsystems.
    pub fn click(&mut self, doc: &mut Document, target: NodeId) {
        if self.welcome.handle_click(doc, target) {
            let fade = Duration::from_millis(self.config.welcome.fade_ms);
            self.timers.schedule(self.now + fade, TimerAction::WelcomeClose);
        } else {
            self.disclaimer.handle_click(doc, target);
        }
        self.pump(doc);
    }

    fn open_welcome(&mut self, doc: &mut Document) {
        if !self.config.welcome.enabled {
            return;
        }
        self.welcome
            .mount(doc, &self.config.branding, &self.config.welcome);
        let activate = Duration::from_millis(self.config.welcome.activate_delay_ms);
        let auto = Duration::from_millis(self.config.welcome.auto_dismiss_ms);
        self.timers
            .schedule(self.now + activate, TimerAction::WelcomeActivate);
        self.timers
            .schedule(self.now + auto, TimerAction::WelcomeAutoDismiss);
    }

    fn apply_timer(&mut self, doc: &mut Document, action: TimerAction) {
        match action {
            TimerAction::SplashFade => self.splash.fade(doc),
            TimerAction::SplashClose => {
                if self.splash.close(doc) {
                    self.open_welcome(doc);
                }
            }
            TimerAction::WelcomeActivate => self.welcome.activate(doc),
            TimerAction::WelcomeAutoDismiss => {
                if self.welcome.begin_dismiss(doc) {
                    let fade = Duration::from_millis(self.config.welcome.fade_ms);
                    self.timers.schedule(self.now + fade, TimerAction::WelcomeClose);
                }
            }
            TimerAction::WelcomeClose => self.welcome.close(doc),
            TimerAction::DisclaimerMount => {
                let sidebar = self.sidebar.iter().find_map(|s| doc.query(s));
                self.disclaimer.mount(doc, &self.config.disclaimer, sidebar);
            }
        }
    }
}
