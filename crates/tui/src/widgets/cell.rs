//! Cell and widget frame rendering.
//!
//! Empty cells are drawn as dim slots. Placed widgets get a bordered frame
//! whose color reflects selection; the body inside comes from the
//! [`WidgetRegistry`].

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::registry::{WidgetContext, WidgetRegistry};

/// How a widget frame is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameHighlight {
    /// Not under the cursor.
    #[default]
    None,
    /// The cursor is on one of the widget's cells.
    Selected,
    /// The widget is picked up for a move.
    Carried,
}

impl FrameHighlight {
    /// Border color for this highlight.
    #[must_use]
    pub const fn border_color(self) -> Color {
        match self {
            Self::None => Color::DarkGray,
            Self::Selected => Color::LightYellow,
            Self::Carried => Color::LightMagenta,
        }
    }
}

/// Renders an empty cell.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use gmscreen_tui::widgets::render_empty_cell;
///
/// let area = Rect::new(0, 0, 12, 5);
/// let mut buf = Buffer::empty(area);
/// render_empty_cell(true, area, &mut buf);
/// ```
pub fn render_empty_cell(is_selected: bool, area: Rect, buf: &mut Buffer) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let (border_color, label_style) = if is_selected {
        (
            Color::LightYellow,
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (Color::Rgb(60, 60, 60), Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    block.render(area, buf);

    let label = if is_selected { "+ Add widget" } else { "+" };
    let top = inner.y + inner.height.saturating_sub(1) / 2;
    Paragraph::new(Line::from(Span::styled(label, label_style)))
        .alignment(Alignment::Center)
        .render(Rect::new(inner.x, top, inner.width, inner.height.min(1)), buf);
}

/// Renders a placed widget: its frame, title and body.
///
/// Widgets whose tag has no renderer are drawn as a placeholder that names
/// the tag.
pub fn render_widget_frame(
    ctx: &WidgetContext<'_>,
    registry: &WidgetRegistry,
    highlight: FrameHighlight,
    hide_titles: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let border_color = highlight.border_color();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    if !hide_titles {
        let icon = ctx.instance.kind().map_or("?", |kind| kind.icon());
        let title_style = if highlight == FrameHighlight::None {
            Style::default().fg(Color::White)
        } else {
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD)
        };
        block = block.title(Span::styled(
            format!(" {icon} {} ", ctx.instance.title()),
            title_style,
        ));
    }

    let inner = block.inner(area);
    block.render(area, buf);

    match registry.resolve(&ctx.instance.component_type) {
        Some(body) => body.render(ctx, inner, buf),
        None => render_placeholder(&ctx.instance.component_type, inner, buf),
    }
}

fn render_placeholder(tag: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            "Unknown widget",
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            format!("\"{tag}\""),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use gmscreen_protocol::{WidgetInstance, WidgetKind};

    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn selected_empty_cell_invites_placement() {
        let area = Rect::new(0, 0, 16, 5);
        let mut buf = Buffer::empty(area);
        render_empty_cell(true, area, &mut buf);
        assert!(buffer_to_string(&buf).contains("+ Add widget"));
    }

    #[test]
    fn frame_shows_icon_and_title() {
        let registry = WidgetRegistry::with_builtin();
        let instance = WidgetInstance::new(WidgetKind::Notes);
        let area = Rect::new(0, 0, 24, 5);
        let mut buf = Buffer::empty(area);

        render_widget_frame(
            &WidgetContext::new(&instance),
            &registry,
            FrameHighlight::Selected,
            false,
            area,
            &mut buf,
        );

        let content = buffer_to_string(&buf);
        assert!(content.contains("Notes"));
        assert!(content.contains("Empty note"));
    }

    #[test]
    fn hidden_titles_keep_the_body() {
        let registry = WidgetRegistry::with_builtin();
        let instance = WidgetInstance::new(WidgetKind::Checklist);
        let area = Rect::new(0, 0, 24, 5);
        let mut buf = Buffer::empty(area);

        render_widget_frame(
            &WidgetContext::new(&instance),
            &registry,
            FrameHighlight::None,
            true,
            area,
            &mut buf,
        );

        let content = buffer_to_string(&buf);
        assert!(!content.contains("Checklist"));
        assert!(content.contains("No items"));
    }

    #[test]
    fn unknown_tag_renders_placeholder() {
        let registry = WidgetRegistry::with_builtin();
        let instance = WidgetInstance::from_tag("hex-map");
        let area = Rect::new(0, 0, 24, 6);
        let mut buf = Buffer::empty(area);

        render_widget_frame(
            &WidgetContext::new(&instance),
            &registry,
            FrameHighlight::None,
            false,
            area,
            &mut buf,
        );

        let content = buffer_to_string(&buf);
        assert!(content.contains("Unknown widget"));
        assert!(content.contains("\"hex-map\""));
    }

    #[test]
    fn tiny_area_is_skipped() {
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        render_empty_cell(false, area, &mut buf);
        assert_eq!(buffer_to_string(&buf).trim(), "");
    }
}
