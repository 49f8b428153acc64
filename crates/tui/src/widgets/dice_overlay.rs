//! Dice result overlay.
//!
//! Shows the most recently published dice result in a banner near the top
//! of the screen until the notifier clears it.

use gmscreen_protocol::DiceResult;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// Height of the overlay banner including its border.
const OVERLAY_HEIGHT: u16 = 4;

/// Renders `result` as a banner centered horizontally near the top of `area`.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::DiceResult;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use gmscreen_tui::widgets::render_dice_overlay;
///
/// let area = Rect::new(0, 0, 80, 24);
/// let mut buf = Buffer::empty(area);
/// render_dice_overlay(&DiceResult::new("1d20+5", vec![14], 5), area, &mut buf);
/// ```
pub fn render_dice_overlay(result: &DiceResult, area: Rect, buf: &mut Buffer) {
    let summary = result.summary();
    let wanted = u16::try_from(summary.chars().count() + 6).unwrap_or(u16::MAX);
    let width = wanted.max(20).min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.min(1);
    let height = OVERLAY_HEIGHT.min(area.bottom().saturating_sub(y));
    let banner = Rect::new(x, y, width, height);

    Clear.render(banner, buf);

    let block = Block::default()
        .title(Span::styled(
            " 🎲 Roll ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::LightYellow));

    let lines = vec![
        Line::from(Span::styled(
            result.total.to_string(),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(summary, Style::default().fg(Color::White))),
    ];

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .render(banner, buf);
}
