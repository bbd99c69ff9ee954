//! Conversation transcript widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::host::TranscriptEntry;
use crate::theme::Styles;

/// Renders the conversation, pinned to the most recent messages.
pub struct Transcript<'a> {
    entries: &'a [TranscriptEntry],
}

impl<'a> Transcript<'a> {
    /// Create a transcript widget over the given entries.
    pub fn new(entries: &'a [TranscriptEntry]) -> Self {
        Self { entries }
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 1 || inner.width < 8 {
            return;
        }

        let wrap_width = (inner.width as usize).saturating_sub(2).max(8);
        let mut lines: Vec<Line<'_>> = Vec::new();
        for entry in self.entries {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", entry.time), Styles::dim()),
                Span::styled(entry.role.as_str(), Styles::highlight()),
            ]));
            for wrapped in textwrap::wrap(&entry.text, wrap_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {wrapped}"),
                    Styles::default(),
                )));
            }
            lines.push(Line::from(""));
        }

        // Tail-follow: keep the newest lines in view.
        let visible = inner.height as usize;
        let skip = lines.len().saturating_sub(visible);
        let tail: Vec<Line<'_>> = lines.into_iter().skip(skip).collect();

        Paragraph::new(tail).render(inner, buf);
    }
}
