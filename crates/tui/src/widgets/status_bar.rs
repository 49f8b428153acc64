//! Status bar rendering widget.
//!
//! This module provides the footer that shows the outcome of the last action
//! (including why a layout change was rejected) next to keybinding hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Something happened as requested.
    Info,
    /// A request was rejected or failed.
    Error,
}

/// A message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity.
    pub level: StatusLevel,
    /// Text to display.
    pub text: String,
}

impl StatusMessage {
    /// Creates an informational message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    /// Creates an error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// Renders the status bar.
///
/// Without a message only the keybinding hints are shown.
///
/// # Layout
///
/// ```text
/// +----------------------------------------------------+
/// | cell 4 is occupied by widget at 0  |  q Quit  ? Help |
/// +----------------------------------------------------+
/// ```
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use gmscreen_tui::widgets::{StatusMessage, render_status_bar};
///
/// let area = Rect::new(0, 0, 80, 3);
/// let mut buf = Buffer::empty(area);
///
/// render_status_bar(Some(&StatusMessage::info("Saved")), false, area, &mut buf);
/// ```
pub fn render_status_bar(
    message: Option<&StatusMessage>,
    carrying: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let key_style = Style::default().fg(Color::Yellow);
    let text_style = Style::default().fg(Color::White);

    let mut spans = Vec::new();
    if let Some(message) = message {
        let color = match message.level {
            StatusLevel::Info => Color::Cyan,
            StatusLevel::Error => Color::LightRed,
        };
        spans.push(Span::styled(message.text.clone(), Style::default().fg(color)));
        spans.push(Span::styled("  |  ", text_style));
    }

    if carrying {
        spans.extend([
            Span::styled("m", key_style),
            Span::styled(" Drop  ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" Cancel  ", text_style),
        ]);
    } else {
        spans.extend([
            Span::styled("Enter", key_style),
            Span::styled(" Add  ", text_style),
            Span::styled("m", key_style),
            Span::styled(" Move  ", text_style),
        ]);
    }
    spans.extend([
        Span::styled("q", key_style),
        Span::styled(" Quit  ", text_style),
        Span::styled("?", key_style),
        Span::styled(" Help", text_style),
    ]);

    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
}
