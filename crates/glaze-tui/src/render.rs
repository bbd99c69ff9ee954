//! Rendering for the glaze demo shell.
//!
//! Everything drawn here is derived from the host document: the chrome
//! engine mutates the tree, and the renderer just reflects whatever the tree
//! says. No placement or overlay state is duplicated on the TUI side.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use glaze_engine::dom::{Document, NodeId};
use glaze_engine::relocate::{CENTERED_CLASS, EMPTY_TITLE_ID};
use glaze_engine::selector::Selector;
use glaze_engine::{disclaimer, splash, welcome, Placement};

use crate::app::App;
use crate::theme::{Styles, Symbols};
use crate::ui::{centered_fixed, centered_rect, chat_layout, main_layout};
use crate::widgets::{InputBar, KeyHint, StatusBar, Transcript};

fn class_text<'a>(doc: &'a Document, class: &str) -> Option<&'a str> {
    doc.query(&Selector::class(class)).and_then(|n| doc.text(n))
}

fn class_text_in<'a>(doc: &'a Document, scope: NodeId, class: &str) -> Option<&'a str> {
    doc.query_from(scope, &Selector::class(class))
        .and_then(|n| doc.text(n))
}

/// Render the whole app into the buffer.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    Block::default().style(Styles::default()).render(area, buf);
    let (content_area, status_area) = main_layout(area);

    if app.doc.has_class(app.doc.body(), CENTERED_CLASS) {
        render_centered(app, content_area, buf);
    } else {
        render_chat(app, content_area, buf);
    }

    render_status(app, status_area, buf);
    render_float_button(app, content_area, buf);

    // Popup layers, bottom to top.
    if app
        .doc
        .element_by_id(disclaimer::MODAL_ID)
        .is_some_and(|modal| app.doc.has_class(modal, disclaimer::OPEN_CLASS))
    {
        render_disclaimer(app, content_area, buf);
    }
    if app.doc.element_by_id(welcome::WELCOME_ID).is_some() {
        render_welcome(app, content_area, buf);
    }
    if app.doc.element_by_id(splash::SPLASH_ID).is_some() {
        render_splash(app, area, buf);
    }
}

/// Normal chat layout: sidebar (while the host still shows one), transcript,
/// bottom input bar.
fn render_chat(app: &App, area: Rect, buf: &mut Buffer) {
    let chat_area = if app.page.sidebar_visible(&app.doc) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(20)])
            .split(area);
        render_sidebar(app, chunks[0], buf);
        chunks[1]
    } else {
        area
    };

    let (transcript_area, input_area) = chat_layout(chat_area);
    let entries = app.page.transcript(&app.doc);
    Transcript::new(&entries).render(transcript_area, buf);
    InputBar::new(&app.input)
        .placeholder("Send a message...")
        .render(input_area, buf);
}

fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let title = class_text(&app.doc, "sidebar").unwrap_or("History");
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Styles::border());
    let inner = block.inner(area);
    block.render(area, buf);
    Paragraph::new(Line::from(Span::styled("No saved chats", Styles::dim()))).render(inner, buf);
}

/// Empty-chat layout: the composer sits centered under the placeholder
/// title.
fn render_centered(app: &App, area: Rect, buf: &mut Buffer) {
    let title = app
        .doc
        .element_by_id(EMPTY_TITLE_ID)
        .and_then(|n| app.doc.text(n))
        .unwrap_or("What are you working on?");

    let box_area = centered_fixed(64, 6, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(box_area);

    Paragraph::new(Line::from(Span::styled(title, Styles::title())))
        .centered()
        .render(chunks[0], buf);
    InputBar::new(&app.input)
        .placeholder("Ask anything...")
        .render(chunks[2], buf);
    Paragraph::new(Line::from(Span::styled("Enter to send", Styles::dim())))
        .centered()
        .render(chunks[3], buf);
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let mode = match app.chrome.placement(&app.doc) {
        Placement::Centered => "Empty",
        Placement::Inline => "Chat",
    };
    let hints = vec![
        KeyHint::new("Enter", "Send"),
        KeyHint::new("^N", "New chat"),
        KeyHint::new("^D", "Disclaimer"),
        KeyHint::new("^R", "Nav"),
        KeyHint::new("^Y", "Copy"),
        KeyHint::new("^C", "Quit"),
    ];
    let mut status_bar = StatusBar::new(mode).hints(hints);
    if let Some(notification) = &app.notification {
        status_bar = status_bar.right(notification);
    }
    status_bar.render(area, buf);
}

/// Floating disclaimer trigger, bottom-right, while the modal is closed.
fn render_float_button(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(modal) = app.doc.element_by_id(disclaimer::MODAL_ID) else {
        return;
    };
    if app.doc.has_class(modal, disclaimer::OPEN_CLASS) {
        return;
    }
    let label = app
        .doc
        .element_by_id(disclaimer::BUTTON_ID)
        .and_then(|n| app.doc.text(n))
        .unwrap_or("Disclaimer");
    let text = format!(" {} {} ", Symbols::INFO, label);
    let width = text.len() as u16;
    if area.width <= width + 2 || area.height < 2 {
        return;
    }
    let rect = Rect::new(
        area.x + area.width - width - 2,
        area.y + area.height - 2,
        width,
        1,
    );
    Paragraph::new(Line::from(Span::styled(text, Styles::key_hint()))).render(rect, buf);
}

fn render_disclaimer(app: &App, area: Rect, buf: &mut Buffer) {
    let doc = &app.doc;
    let Some(modal) = doc.element_by_id(disclaimer::MODAL_ID) else {
        return;
    };
    let heading = doc
        .query_from(modal, &Selector::tag("h2"))
        .and_then(|n| doc.text(n))
        .unwrap_or("Disclaimer");

    let popup = centered_rect(70, 70, area);
    Clear.render(popup, buf);
    let block = Block::default()
        .title(format!(" {heading} "))
        .title_style(Styles::warning())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());
    let inner = block.inner(popup);
    block.render(popup, buf);

    let wrap_width = (inner.width as usize).saturating_sub(4).max(16);
    let mut lines = vec![Line::from("")];
    if let Some(body) = doc.query_from(modal, &Selector::class("disclaimer-body")) {
        for &para in doc.children(body) {
            if let Some(text) = doc.text(para) {
                for wrapped in textwrap::wrap(text, wrap_width) {
                    lines.push(Line::from(format!("  {wrapped}")));
                }
                lines.push(Line::from(""));
            }
        }
    }
    lines.push(Line::from(Span::styled("  Esc to close", Styles::dim())));
    Paragraph::new(lines).style(Styles::default()).render(inner, buf);
}

fn render_welcome(app: &App, area: Rect, buf: &mut Buffer) {
    let doc = &app.doc;
    let Some(overlay) = doc.element_by_id(welcome::WELCOME_ID) else {
        return;
    };

    let border = if doc.has_class(overlay, welcome::CLOSING_CLASS) {
        Styles::border()
    } else if doc.has_class(overlay, welcome::ACTIVE_CLASS) {
        Styles::border_active()
    } else {
        Styles::border()
    };

    let popup = centered_rect(72, 80, area);
    Clear.render(popup, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());
    let inner = block.inner(popup);
    block.render(popup, buf);

    let mut lines = vec![Line::from("")];
    if let Some(title) = class_text_in(doc, overlay, "welcome-title") {
        lines.push(Line::from(Span::styled(format!("  {title}"), Styles::highlight())));
    }
    if let Some(subtitle) = class_text_in(doc, overlay, "welcome-subtitle") {
        lines.push(Line::from(Span::styled(format!("  {subtitle}"), Styles::dim())));
    }
    lines.push(Line::from(""));

    if let Some(cards) = doc.query_from(overlay, &Selector::class("welcome-cards")) {
        for &card in doc.children(cards) {
            let icon = class_text_in(doc, card, "card-icon").unwrap_or(" ");
            let title = class_text_in(doc, card, "card-text").unwrap_or("");
            let subtitle = doc
                .query_from(card, &Selector::tag("small"))
                .and_then(|n| doc.text(n))
                .unwrap_or("");
            lines.push(Line::from(vec![
                Span::styled(format!("  {icon} "), Styles::active()),
                Span::styled(title.to_string(), Styles::default()),
                Span::styled(format!("  {subtitle}"), Styles::dim()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(lead) = class_text_in(doc, overlay, "feature-text") {
        lines.push(Line::from(Span::styled(format!("  {lead}"), Styles::default())));
    }
    if let Some(list) = doc.query_from(overlay, &Selector::class("feature-list")) {
        for &item in doc.children(list) {
            if let Some(text) = doc.text(item) {
                lines.push(Line::from(Span::styled(
                    format!("    - {text}"),
                    Styles::dim(),
                )));
            }
        }
    }
    lines.push(Line::from(""));

    if let Some(button) = class_text_in(doc, overlay, welcome::BUTTON_CLASS) {
        lines.push(Line::from(Span::styled(
            format!("  [ {button} ]"),
            Styles::key_hint(),
        )));
        lines.push(Line::from(Span::styled(
            "  Esc dismisses",
            Styles::dim(),
        )));
    }

    Paragraph::new(lines).style(Styles::default()).render(inner, buf);
}

fn render_splash(app: &App, area: Rect, buf: &mut Buffer) {
    let doc = &app.doc;
    let Some(overlay) = doc.element_by_id(splash::SPLASH_ID) else {
        return;
    };
    let fading = doc.has_class(overlay, splash::FADING_CLASS);
    let text_style = if fading { Styles::dim() } else { Styles::default() };
    let name_style = if fading { Styles::dim() } else { Styles::highlight() };

    Clear.render(area, buf);
    Block::default().style(Styles::default()).render(area, buf);

    let box_area = centered_fixed(48, 7, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border());
    let inner = block.inner(box_area);
    block.render(box_area, buf);

    let name = class_text_in(doc, overlay, "company-logo").unwrap_or("");
    let loading = class_text_in(doc, overlay, "loading-text").unwrap_or("Loading");
    let subtext = class_text_in(doc, overlay, "loading-subtext").unwrap_or("");
    let spinner = Symbols::SPINNER[app.tick % Symbols::SPINNER.len()];

    let lines = vec![
        Line::from(Span::styled(name, name_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{spinner} "), Styles::active()),
            Span::styled(loading, text_style),
        ]),
        Line::from(Span::styled(subtext, Styles::dim())),
    ];
    Paragraph::new(lines)
        .centered()
        .style(Styles::default())
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::render_app_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use glaze_engine::ChromeConfig;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_empty_chat_renders_centered_placeholder() {
        let app = App::new_for_test();
        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("What are you working on?"));
        assert!(rendered.contains("Enter to send"));
        assert!(rendered.contains(" Empty "));
        assert!(!rendered.contains("Conversation"));
    }

    #[test]
    fn test_chat_renders_transcript_after_message() {
        let mut app = App::new_for_test();
        for ch in "power prices".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("Conversation"));
        assert!(rendered.contains("You"));
        assert!(rendered.contains("power prices"));
        assert!(rendered.contains(" Chat "));
        assert!(!rendered.contains("What are you working on?"));
    }

    #[test]
    fn test_typed_text_appears_in_input_bar() {
        let mut app = App::new_for_test();
        for ch in "hel".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("hel"));
    }

    #[test]
    fn test_sidebar_visible_until_hidden() {
        // Centered empty layout has no sidebar pane, so seed a message
        // first.
        let mut app = App::new_for_test();
        app.page.push_user_message(&mut app.doc, "hi");
        app.chrome.pump(&mut app.doc);

        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("History"));
    }

    #[test]
    fn test_splash_renders_over_everything() {
        let app = App::new(ChromeConfig::default());
        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("Loading Glaze"));
        assert!(rendered.contains("Preparing your workspace"));
        assert!(!rendered.contains("What are you working on?"));
    }

    #[test]
    fn test_welcome_renders_cards_and_button() {
        let mut config = ChromeConfig::default();
        config.splash.enabled = false;
        config.disclaimer.enabled = false;
        let app = App::new(config);

        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("Welcome to Glaze"));
        assert!(rendered.contains("Futures analysis"));
        assert!(rendered.contains("Start by asking:"));
        assert!(rendered.contains("[ Get started ]"));
    }

    #[test]
    fn test_disclaimer_modal_renders_when_opened() {
        let mut config = ChromeConfig::default();
        config.splash.enabled = false;
        config.welcome.enabled = false;
        config.disclaimer.mount_delay_ms = 0;
        let mut app = App::new(config);

        // First tick fires the mount timer.
        app.tick();
        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("Disclaimer"));
        assert!(!rendered.contains("Important notice"));

        app.handle_key(KeyEvent::new(
            KeyCode::Char('d'),
            KeyModifiers::CONTROL,
        ));
        let rendered = render_app_to_string(&app);
        assert!(rendered.contains("Important notice"));
        assert!(rendered.contains("Esc to close"));
    }

    #[test]
    fn test_render_fits_small_terminal() {
        let app = App::new_for_test();
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        render_app(&app, area, &mut buf);
    }
}
