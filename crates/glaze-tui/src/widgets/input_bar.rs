//! Composer input bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::input::InputState;
use crate::theme::Styles;

/// Bordered single-line input bar with a block cursor.
pub struct InputBar<'a> {
    input: &'a InputState,
    placeholder: Option<&'a str>,
    focused: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a InputState) -> Self {
        Self {
            input,
            placeholder: None,
            focused: true,
        }
    }

    /// Set placeholder text shown while the input is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 1 || inner.width < 4 {
            return;
        }

        let line = if self.input.is_empty() {
            let mut spans = vec![Span::styled("> ", Styles::active())];
            if self.focused {
                spans.push(Span::styled("█", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(format!(" {placeholder}"), Styles::dim()));
            }
            Line::from(spans)
        } else {
            // Trim the head of the pre-cursor text so the cursor stays
            // inside the visible width.
            let avail = (inner.width as usize).saturating_sub(4);
            let mut before = self.input.before_cursor();
            while before.width() > avail {
                let mut chars = before.chars();
                chars.next();
                before = chars.as_str();
            }
            let after = &self.input.content()[self.input.before_cursor().len()..];

            let mut spans = vec![
                Span::styled("> ", Styles::active()),
                Span::styled(before.to_string(), Styles::default()),
            ];
            if self.focused {
                spans.push(Span::styled("█", Styles::active()));
            }
            spans.push(Span::styled(after.to_string(), Styles::default()));
            Line::from(spans)
        };

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_bar_builder() {
        let input = InputState::new();
        let bar = InputBar::new(&input).placeholder("Type here").focused(false);
        assert!(!bar.focused);
        assert_eq!(bar.placeholder, Some("Type here"));
    }
}
