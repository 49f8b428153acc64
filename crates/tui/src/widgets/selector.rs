//! Widget selector popup.
//!
//! Lists every widget kind grouped by category so the user can pick one to
//! place on the selected empty cell.

use gmscreen_protocol::WidgetCategory;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::help::centered_rect;
use crate::state::SelectorState;

/// The width of the selector popup.
const SELECTOR_WIDTH: u16 = 38;

/// Renders the selector popup centered in `area`.
///
/// # Layout
///
/// ```text
/// +-- Add Widget ----------------------+
/// |  Combat & Initiative               |
/// |  > 🎯 Initiative Tracker           |
/// |    🎲 Dice Roller                  |
/// |  Time Tracking                     |
/// |    ⏱ Countdown Timer               |
/// |  ...                               |
/// |  ↑↓ choose  Enter place  Esc close |
/// +------------------------------------+
/// ```
pub fn render_selector(selector: &SelectorState, area: Rect, buf: &mut Buffer) {
    let lines = build_selector_lines(selector);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let popup_area = centered_rect(SELECTOR_WIDTH, height, area);

    Clear.render(popup_area, buf);

    let block = Block::default()
        .title(Span::styled(
            " Add Widget ",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightCyan));

    Paragraph::new(lines).block(block).render(popup_area, buf);
}

fn build_selector_lines(selector: &SelectorState) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let item_style = Style::default().fg(Color::White);
    let selected_style = Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let selected = selector.selected_kind();
    let mut lines = Vec::new();
    for category in WidgetCategory::all() {
        lines.push(Line::from(Span::styled(
            format!("  {}", category.title()),
            header_style,
        )));
        for kind in category.kinds() {
            let (marker, style) = if Some(kind) == selected {
                ("> ", selected_style)
            } else {
                ("  ", item_style)
            };
            lines.push(Line::from(Span::styled(
                format!("  {marker}{} {}", kind.icon(), kind.display_name()),
                style,
            )));
        }
    }
    lines.push(Line::from(Span::styled(
        "  ↑↓ choose  Enter place  Esc close",
        hint_style,
    )));
    lines
}
