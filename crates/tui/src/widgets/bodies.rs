//! Built-in widget bodies.
//!
//! Each body reads the widget's saved state (the same JSON the instance
//! store persists) and draws a compact summary of it.

use gmscreen_protocol::WidgetKind;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use serde_json::Value;

use crate::registry::{ClockReading, RenderableWidget, WidgetContext};
use crate::timers::{format_countdown, format_elapsed};

/// Returns the built-in renderer for `kind`.
#[must_use]
pub fn builtin(kind: WidgetKind) -> Box<dyn RenderableWidget> {
    match kind {
        WidgetKind::InitiativeTracker => Box::new(InitiativeBody),
        WidgetKind::DiceRoller => Box::new(DiceBody),
        WidgetKind::Timer => Box::new(CountdownBody),
        WidgetKind::Clock => Box::new(ClockBody),
        WidgetKind::Notes => Box::new(NotesBody),
        WidgetKind::Checklist => Box::new(ChecklistBody),
        WidgetKind::Monsters
        | WidgetKind::Spells
        | WidgetKind::Equipment
        | WidgetKind::MagicItems
        | WidgetKind::Conditions => Box::new(ReferenceBody { kind }),
        WidgetKind::WebpageEmbed => Box::new(WebpageBody),
    }
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

fn render_lines(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_hint(text: &str, area: Rect, buf: &mut Buffer) {
    render_lines(vec![Line::from(Span::styled(text, hint_style()))], area, buf);
}

/// Reads a display string from a value that is either a string or an
/// object with a `name` field.
fn display_name(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("name").and_then(Value::as_str))
}

struct InitiativeBody;

impl RenderableWidget for InitiativeBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let entries = ctx
            .field("entries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if entries.is_empty() {
            render_hint("No combatants", area, buf);
            return;
        }

        let current = ctx
            .field("currentTurn")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let round = ctx
            .field("roundNumber")
            .and_then(Value::as_u64)
            .unwrap_or(1);

        let mut lines = vec![Line::from(Span::styled(
            format!("Round {round}"),
            Style::default().fg(Color::Yellow),
        ))];
        for (i, entry) in entries.iter().enumerate() {
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("?");
            let initiative = entry.get("initiative").and_then(Value::as_i64).unwrap_or(0);
            let is_current = u64::try_from(i).is_ok_and(|i| i == current);
            let (marker, style) = if is_current {
                ("▶ ", Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            let mut spans = vec![Span::styled(format!("{marker}{initiative:>2} {name}"), style)];
            if let Some(hp) = entry.get("hp").and_then(Value::as_i64) {
                spans.push(Span::styled(format!("  {hp} hp"), Style::default().fg(Color::Red)));
            }
            lines.push(Line::from(spans));
        }
        render_lines(lines, area, buf);
    }
}

struct DiceBody;

impl RenderableWidget for DiceBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        match ctx.last_roll {
            Some(result) => {
                let lines = vec![
                    Line::from(Span::styled(
                        result.total.to_string(),
                        Style::default()
                            .fg(Color::LightYellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(result.summary(), Style::default().fg(Color::White))),
                ];
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(area, buf);
            }
            None => render_hint("No rolls yet", area, buf),
        }
    }
}

struct CountdownBody;

impl RenderableWidget for CountdownBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let Some(ClockReading::Countdown(state)) = ctx.clock else {
            render_hint("Timer unavailable", area, buf);
            return;
        };

        let (status, color) = if state.complete {
            ("Time's up!", Color::LightRed)
        } else if state.running {
            ("Running", Color::LightGreen)
        } else {
            ("Paused", Color::DarkGray)
        };
        let lines = vec![
            Line::from(Span::styled(
                format_countdown(state.remaining_secs),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(status, Style::default().fg(color))),
            Line::from(Span::styled("p start/pause  + 1m  x reset", hint_style())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

struct ClockBody;

impl RenderableWidget for ClockBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let Some(ClockReading::Elapsed(state)) = ctx.clock else {
            render_hint("Clock unavailable", area, buf);
            return;
        };

        let color = if state.running {
            Color::LightCyan
        } else {
            Color::White
        };
        let lines = vec![
            Line::from(Span::styled(
                format_elapsed(state.elapsed_secs),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("p start/stop  x reset", hint_style())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

struct NotesBody;

impl RenderableWidget for NotesBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        match ctx.field("content").and_then(Value::as_str) {
            Some(content) if !content.trim().is_empty() => {
                let lines = content.lines().map(Line::from).collect();
                render_lines(lines, area, buf);
            }
            _ => render_hint("Empty note", area, buf),
        }
    }
}

struct ChecklistBody;

impl RenderableWidget for ChecklistBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let items = ctx
            .field("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if items.is_empty() {
            render_hint("No items", area, buf);
            return;
        }

        let done = items
            .iter()
            .filter(|item| item.get("completed").and_then(Value::as_bool) == Some(true))
            .count();
        let mut lines = vec![Line::from(Span::styled(
            format!("{done}/{} done", items.len()),
            Style::default().fg(Color::Yellow),
        ))];
        lines.extend(items.iter().map(|item| {
            let text = item.get("text").and_then(Value::as_str).unwrap_or_default();
            if item.get("completed").and_then(Value::as_bool) == Some(true) {
                Line::from(Span::styled(
                    format!("[x] {text}"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                ))
            } else {
                Line::from(format!("[ ] {text}"))
            }
        }));
        render_lines(lines, area, buf);
    }
}

struct ReferenceBody {
    kind: WidgetKind,
}

impl ReferenceBody {
    fn selection_key(&self) -> Option<&'static str> {
        match self.kind {
            WidgetKind::Monsters => Some("selectedMonster"),
            WidgetKind::MagicItems => Some("selectedItem"),
            WidgetKind::Conditions => Some("selectedCondition"),
            _ => None,
        }
    }
}

impl RenderableWidget for ReferenceBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();
        if let Some(selected) = self
            .selection_key()
            .and_then(|key| ctx.field(key))
            .and_then(display_name)
        {
            lines.push(Line::from(Span::styled(
                selected.to_string(),
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if let Some(term) = ctx
            .field("searchTerm")
            .and_then(Value::as_str)
            .filter(|term| !term.is_empty())
        {
            lines.push(Line::from(format!("Search: {term}")));
        }

        if lines.is_empty() {
            render_hint(&format!("{} reference", self.kind.display_name()), area, buf);
        } else {
            render_lines(lines, area, buf);
        }
    }
}

struct WebpageBody;

impl RenderableWidget for WebpageBody {
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer) {
        let url = ctx
            .field("currentUrl")
            .or_else(|| ctx.field("url"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
        match url {
            Some(url) => render_lines(
                vec![Line::from(Span::styled(
                    url.to_string(),
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::UNDERLINED),
                ))],
                area,
                buf,
            ),
            None => render_hint("No page loaded", area, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use gmscreen_protocol::{DiceResult, WidgetInstance};
    use serde_json::json;

    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::timers::{ClockState, CountdownState};

    fn render(kind: WidgetKind, ctx: &WidgetContext<'_>) -> String {
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        builtin(kind).render(ctx, area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn initiative_marks_current_turn() {
        let instance = WidgetInstance::new(WidgetKind::InitiativeTracker);
        let state = json!({
            "entries": [
                { "name": "Goblin", "initiative": 15, "hp": 7 },
                { "name": "Mira", "initiative": 12 },
            ],
            "currentTurn": 1,
            "roundNumber": 3,
        });
        let ctx = WidgetContext {
            state: Some(&state),
            ..WidgetContext::new(&instance)
        };
        let content = render(WidgetKind::InitiativeTracker, &ctx);
        assert!(content.contains("Round 3"));
        assert!(content.contains("15 Goblin  7 hp"));
        assert!(content.contains("▶ 12 Mira"));
    }

    #[test]
    fn dice_shows_last_roll() {
        let instance = WidgetInstance::new(WidgetKind::DiceRoller);
        let roll = DiceResult::new("2d6", vec![3, 4], 0);
        let ctx = WidgetContext {
            last_roll: Some(&roll),
            ..WidgetContext::new(&instance)
        };
        let content = render(WidgetKind::DiceRoller, &ctx);
        assert!(content.contains("2d6: 3 4 = 7"));

        let idle = WidgetContext::new(&instance);
        assert!(render(WidgetKind::DiceRoller, &idle).contains("No rolls yet"));
    }

    #[test]
    fn countdown_shows_completion() {
        let instance = WidgetInstance::new(WidgetKind::Timer);
        let ctx = WidgetContext {
            clock: Some(ClockReading::Countdown(CountdownState {
                remaining_secs: 0,
                running: false,
                complete: true,
            })),
            ..WidgetContext::new(&instance)
        };
        let content = render(WidgetKind::Timer, &ctx);
        assert!(content.contains("00:00"));
        assert!(content.contains("Time's up!"));
    }

    #[test]
    fn clock_shows_elapsed_time() {
        let instance = WidgetInstance::new(WidgetKind::Clock);
        let ctx = WidgetContext {
            clock: Some(ClockReading::Elapsed(ClockState {
                elapsed_secs: 3725,
                running: true,
            })),
            ..WidgetContext::new(&instance)
        };
        assert!(render(WidgetKind::Clock, &ctx).contains("01:02:05"));
    }

    #[test]
    fn checklist_counts_completed_items() {
        let instance = WidgetInstance::new(WidgetKind::Checklist);
        let state = json!({
            "items": [
                { "id": 1, "text": "Buy rope", "completed": true },
                { "id": 2, "text": "Find map", "completed": false },
            ],
        });
        let ctx = WidgetContext {
            state: Some(&state),
            ..WidgetContext::new(&instance)
        };
        let content = render(WidgetKind::Checklist, &ctx);
        assert!(content.contains("1/2 done"));
        assert!(content.contains("[x] Buy rope"));
        assert!(content.contains("[ ] Find map"));
    }

    #[test]
    fn reference_shows_selection_object_name() {
        let instance = WidgetInstance::new(WidgetKind::Monsters);
        let state = json!({
            "searchTerm": "owl",
            "selectedMonster": { "name": "Owlbear", "hit_points": 59 },
        });
        let ctx = WidgetContext {
            state: Some(&state),
            ..WidgetContext::new(&instance)
        };
        let content = render(WidgetKind::Monsters, &ctx);
        assert!(content.contains("Owlbear"));
        assert!(content.contains("Search: owl"));
    }

    #[test]
    fn empty_state_renders_hints() {
        let notes = WidgetInstance::new(WidgetKind::Notes);
        assert!(render(WidgetKind::Notes, &WidgetContext::new(&notes)).contains("Empty note"));

        let spells = WidgetInstance::new(WidgetKind::Spells);
        assert!(render(WidgetKind::Spells, &WidgetContext::new(&spells)).contains("Spells reference"));

        let page = WidgetInstance::new(WidgetKind::WebpageEmbed);
        assert!(render(WidgetKind::WebpageEmbed, &WidgetContext::new(&page)).contains("No page loaded"));
    }
}
