//! Application state and update logic for the glaze demo shell.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glaze_engine::dom::Document;
use glaze_engine::selector::Selector;
use glaze_engine::{disclaimer, welcome, Chrome, ChromeConfig, PageEvent};

use crate::host::HostPage;
use crate::input::InputState;

/// Ticks between a user message and the canned assistant reply (4 Hz tick).
const REPLY_DELAY_TICKS: usize = 4;

/// Ticks a notification stays visible.
const NOTIFICATION_TICKS: usize = 12;

/// Application state.
pub struct App {
    /// The host page's document, shared with the chrome engine.
    pub doc: Document,

    /// The simulated host chat application.
    pub page: HostPage,

    /// The chrome engine attached to the document.
    pub chrome: Chrome,

    /// Composer input state.
    pub input: InputState,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message shown in the status bar.
    pub notification: Option<String>,

    /// Ticks remaining until the notification is cleared.
    notification_ttl: usize,

    /// Pending canned reply: (ticks remaining, user text).
    pending_reply: Option<(usize, String)>,

    /// When the session started, for the chrome's virtual clock.
    started: Instant,
}

impl App {
    /// Build the host page and attach the chrome.
    pub fn new(config: ChromeConfig) -> Self {
        let mut doc = Document::new();
        let page = HostPage::build(&mut doc);
        let mut chrome = Chrome::new(config);
        chrome.attach(&mut doc);

        Self {
            doc,
            page,
            chrome,
            input: InputState::new(),
            should_quit: false,
            tick: 0,
            notification: None,
            notification_ttl: 0,
            pending_reply: None,
            started: Instant::now(),
        }
    }

    /// Test app with all overlays disabled for deterministic rendering.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let mut config = ChromeConfig::default();
        config.splash.enabled = false;
        config.welcome.enabled = false;
        config.disclaimer.enabled = false;
        Self::new(config)
    }

    /// Advance one tick: drive the chrome clock, deliver pending replies,
    /// age the notification.
    pub fn tick(&mut self) {
        self.tick += 1;
        let now = self.started.elapsed();
        self.chrome.tick(&mut self.doc, now);

        if let Some((remaining, text)) = self.pending_reply.take() {
            if remaining == 0 {
                let reply = format!(
                    "Looking at \"{text}\" now. This demo shell answers with canned replies."
                );
                self.page.push_assistant_message(&mut self.doc, &reply);
                self.chrome.pump(&mut self.doc);
            } else {
                self.pending_reply = Some((remaining - 1, text));
            }
        }

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('n') => self.new_chat(),
                KeyCode::Char('d') => self.toggle_disclaimer(),
                KeyCode::Char('r') => {
                    self.chrome.handle_event(&mut self.doc, PageEvent::PopState);
                    self.notify("History navigation");
                }
                KeyCode::Char('y') => self.copy_transcript(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.escape(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(ch) => self.input.insert(ch),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    /// Esc closes whatever overlay is on top, or quits.
    fn escape(&mut self) {
        if let Some(modal) = self.doc.element_by_id(disclaimer::MODAL_ID) {
            if self.doc.has_class(modal, disclaimer::OPEN_CLASS) {
                self.chrome.click(&mut self.doc, modal);
                return;
            }
        }
        if self.doc.element_by_id(welcome::WELCOME_ID).is_some() {
            if let Some(button) = self.doc.query(&Selector::class(welcome::BUTTON_CLASS)) {
                self.chrome.click(&mut self.doc, button);
                return;
            }
        }
        self.should_quit = true;
    }

    fn submit(&mut self) {
        if self.input.is_empty() {
            return;
        }
        let text = self.input.submit();
        self.page.push_user_message(&mut self.doc, &text);
        self.pending_reply = Some((REPLY_DELAY_TICKS, text));
        self.chrome.pump(&mut self.doc);
    }

    fn new_chat(&mut self) {
        self.page.clear_chat(&mut self.doc);
        self.pending_reply = None;
        self.chrome.pump(&mut self.doc);
        self.notify("New chat");
    }

    fn toggle_disclaimer(&mut self) {
        let Some(modal) = self.doc.element_by_id(disclaimer::MODAL_ID) else {
            self.notify("Disclaimer not ready yet");
            return;
        };
        if self.doc.has_class(modal, disclaimer::OPEN_CLASS) {
            self.chrome.click(&mut self.doc, modal);
        } else if let Some(button) = self.doc.element_by_id(disclaimer::BUTTON_ID) {
            self.chrome.click(&mut self.doc, button);
        }
    }

    fn copy_transcript(&mut self) {
        let entries = self.page.transcript(&self.doc);
        if entries.is_empty() {
            self.notify("Nothing to copy");
            return;
        }
        let text = entries
            .iter()
            .map(|entry| format!("[{}] {}: {}", entry.time, entry.role.as_str(), entry.text))
            .collect::<Vec<_>>()
            .join("\n");
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.notify("Transcript copied"),
            Err(_) => self.notify("Clipboard unavailable"),
        }
    }
}
