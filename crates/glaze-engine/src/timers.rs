//! Virtual-time timer queue for overlay scheduling.
//!
//! Due times are offsets from chrome attach, not wall-clock instants, so
//! overlay timelines are driven identically by the TUI tick loop, the replay
//! command, and tests.

use std::time::Duration;

/// Scheduled overlay work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Begin fading the loading splash.
    SplashFade,
    /// Remove the splash and chain into the welcome overlay.
    SplashClose,
    /// Mark the welcome overlay active (animate-in).
    WelcomeActivate,
    /// Auto-dismiss the welcome overlay if still showing.
    WelcomeAutoDismiss,
    /// Remove the welcome overlay after its fade.
    WelcomeClose,
    /// Mount the disclaimer button and modal, hide the sidebar.
    DisclaimerMount,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Duration,
    seq: u64,
    action: TimerAction,
}

/// FIFO-stable timer queue keyed on virtual elapsed time.
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire once `now >= due`.
    pub fn schedule(&mut self, due: Duration, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, action });
    }

    /// Remove and return every action due at `now`, ordered by due time,
    /// then by scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<TimerAction> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.due <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.action).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
