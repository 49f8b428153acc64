//! Help overlay widget.
//!
//! This module provides the help overlay that displays all available keybindings
//! when the user presses `?`.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 44;

/// Key and description pairs, grouped under section headings.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("←→↑↓", "Move cursor"),
            ("Click", "Select cell"),
            ("Enter", "Add widget on empty cell"),
        ],
    ),
    (
        "Layout",
        &[
            ("Shift+←→↑↓", "Grow widget"),
            ("Alt+←→↑↓", "Shrink widget"),
            ("m", "Pick up / drop widget"),
            ("d", "Delete widget"),
            ("r / R", "Add / remove row"),
            ("c / C", "Add / remove column"),
        ],
    ),
    (
        "Timers",
        &[
            ("p", "Start / pause"),
            ("+", "Add one minute"),
            ("x", "Reset"),
        ],
    ),
    (
        "Screen",
        &[
            ("t", "Toggle titles"),
            ("s", "Save screen"),
            ("e", "Export screen"),
            ("Esc", "Cancel move / close"),
            ("q", "Quit"),
            ("?", "Toggle help"),
        ],
    ),
];

/// Renders a centered help overlay displaying all keybindings.
///
/// The overlay is rendered on top of the existing content, with a semi-transparent
/// background effect achieved by clearing the area first.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use gmscreen_tui::widgets::render_help_overlay;
///
/// let area = Rect::new(0, 0, 80, 30);
/// let mut buf = Buffer::empty(area);
///
/// render_help_overlay(area, &mut buf);
/// ```
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let lines = build_help_lines();
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let popup_area = centered_rect(HELP_WIDTH, height, area);

    // Clear the area behind the popup for a clean look
    Clear.render(popup_area, buf);

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    let help_text = Paragraph::new(lines)
        .block(help_block)
        .alignment(Alignment::Left);

    help_text.render(popup_area, buf);
}

/// Builds the lines of help content.
fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let mut lines = Vec::new();
    for (heading, bindings) in SECTIONS {
        lines.push(Line::from(Span::styled(format!("  {heading}"), header_style)));
        for (key, description) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<13}"), key_style),
                Span::styled(*description, text_style),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled("  Press any key to close", hint_style)));
    lines
}

/// Creates a centered rectangle within a given area.
///
/// If the requested dimensions exceed the available area, the rectangle
/// will be clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to available area
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}
