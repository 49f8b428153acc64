//! Grid rendering widget.
//!
//! Draws every cell of the screen: empty slots first, then each placed
//! widget over the cells it covers, then the drop-target preview when a
//! widget is being carried.

use std::collections::HashMap;

use gmscreen_grid::GridState;
use gmscreen_protocol::{CellIndex, CellPosition, DiceResult, InstanceId};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};
use serde_json::Value;

use super::cell::{FrameHighlight, render_empty_cell, render_widget_frame};
use crate::layout::{cell_rect, widget_rect};
use crate::registry::{ClockReading, WidgetContext, WidgetRegistry};

/// Everything needed to draw the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    /// The layout to draw.
    pub grid: &'a GridState,
    /// Renderers for widget bodies.
    pub registry: &'a WidgetRegistry,
    /// Saved state per instance.
    pub states: &'a HashMap<InstanceId, Value>,
    /// Live timer readings per instance.
    pub clocks: &'a HashMap<InstanceId, ClockReading>,
    /// The dice result on the overlay, if any.
    pub last_roll: Option<&'a DiceResult>,
    /// The cell under the cursor.
    pub cursor: CellIndex,
    /// Anchor of the widget being moved, if any.
    pub carrying: Option<CellIndex>,
    /// Whether widget titles are hidden.
    pub hide_titles: bool,
}

/// Returns the style applied to cells of the drop-target preview.
#[must_use]
pub const fn drop_preview_style(valid: bool) -> Style {
    if valid {
        Style::new().bg(Color::Rgb(20, 70, 30))
    } else {
        Style::new().bg(Color::Rgb(90, 20, 20))
    }
}

/// Renders the grid into `area`.
///
/// # Layout
///
/// ```text
/// +--------------+-----------------------------+
/// | 🎯 Initiative |             +               |
/// |  ▶ 15 Goblin  |                             |
/// +--------------+--------------+--------------+
/// |      +       | ⏱ Countdown Timer           |
/// |              |            04:30            |
/// +--------------+-----------------------------+
/// ```
pub fn render_grid(view: &GridView<'_>, area: Rect, buf: &mut Buffer) {
    let grid = view.grid;
    let (rows, cols) = (grid.rows(), grid.cols());
    let cursor_anchor = grid.anchor_covering(view.cursor);

    for index in 0..rows * cols {
        if grid.is_covered(index) {
            continue;
        }
        let pos = CellPosition::from_index(index, cols);
        let is_selected = view.carrying.is_none() && index == view.cursor;
        render_empty_cell(is_selected, cell_rect(area, rows, cols, pos), buf);
    }

    for (anchor, instance, _) in grid.widgets() {
        let Some(region) = grid.region_of(anchor) else {
            continue;
        };
        let highlight = if view.carrying == Some(anchor) {
            FrameHighlight::Carried
        } else if cursor_anchor == Some(anchor) && view.carrying.is_none() {
            FrameHighlight::Selected
        } else {
            FrameHighlight::None
        };
        let ctx = WidgetContext {
            instance,
            state: view.states.get(&instance.id),
            clock: view.clocks.get(&instance.id).copied(),
            last_roll: view.last_roll,
        };
        render_widget_frame(
            &ctx,
            view.registry,
            highlight,
            view.hide_titles,
            widget_rect(area, rows, cols, region),
            buf,
        );
    }

    if let Some(from) = view.carrying {
        let valid = grid.can_move(from, view.cursor);
        let style = drop_preview_style(valid);
        for cell in grid.drop_target_cells(from, view.cursor) {
            let pos = CellPosition::from_index(cell, cols);
            buf.set_style(cell_rect(area, rows, cols, pos), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use gmscreen_protocol::{Direction, WidgetKind};
    use serde_json::json;

    use super::*;
    use crate::test_utils::buffer_to_string;

    struct Fixture {
        grid: GridState,
        registry: WidgetRegistry,
        states: HashMap<InstanceId, Value>,
        clocks: HashMap<InstanceId, ClockReading>,
    }

    impl Fixture {
        fn new(rows: usize, cols: usize) -> Self {
            Self {
                grid: GridState::new(rows, cols).expect("grid"),
                registry: WidgetRegistry::with_builtin(),
                states: HashMap::new(),
                clocks: HashMap::new(),
            }
        }

        fn view(&self, cursor: CellIndex, carrying: Option<CellIndex>) -> GridView<'_> {
            GridView {
                grid: &self.grid,
                registry: &self.registry,
                states: &self.states,
                clocks: &self.clocks,
                last_roll: None,
                cursor,
                carrying,
                hide_titles: false,
            }
        }
    }

    #[test]
    fn empty_grid_draws_every_slot() {
        let fixture = Fixture::new(2, 2);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);

        render_grid(&fixture.view(0, None), area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("+ Add widget"));
        assert_eq!(content.matches('+').count(), 4);
    }

    #[test]
    fn spanning_widget_replaces_covered_slots() {
        let mut fixture = Fixture::new(2, 2);
        let notes = fixture.grid.place(0, WidgetKind::Notes).expect("place");
        fixture.grid.expand(0, Direction::Right, 1).expect("expand");
        fixture
            .states
            .insert(notes.id, json!({ "content": "Ambush at the bridge" }));

        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        render_grid(&fixture.view(3, None), area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("Notes"));
        assert!(content.contains("Ambush at the bridge"));
        // Bottom row still shows two empty slots, one of them selected
        assert!(content.contains("+ Add widget"));
    }

    #[test]
    fn drop_preview_marks_target_cells() {
        let mut fixture = Fixture::new(2, 4);
        fixture.grid.place(0, WidgetKind::Clock).expect("place");
        fixture.grid.place(2, WidgetKind::Timer).expect("place");

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        render_grid(&fixture.view(5, Some(0)), area, &mut buf);

        let target = cell_rect(area, 2, 4, CellPosition::new(1, 1));
        let cell = buf
            .cell((target.x + 1, target.y + 1))
            .expect("cell in buffer");
        assert_eq!(cell.bg, drop_preview_style(true).bg.expect("bg"));

        let mut buf = Buffer::empty(area);
        render_grid(&fixture.view(2, Some(0)), area, &mut buf);
        let blocked = cell_rect(area, 2, 4, CellPosition::new(0, 2));
        let cell = buf
            .cell((blocked.x + 1, blocked.y + 1))
            .expect("cell in buffer");
        assert_eq!(cell.bg, drop_preview_style(false).bg.expect("bg"));
    }
}
