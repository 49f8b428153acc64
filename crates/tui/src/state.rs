//! Application state management.
//!
//! This module defines the core state structures for the TUI application:
//! focus, the cell cursor, the widget being carried, and the selector.

use gmscreen_grid::GridState;
use gmscreen_protocol::{CellIndex, CellPosition, Direction, WidgetCategory, WidgetKind};

/// The current focus area in the UI.
///
/// Determines which UI component receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Focus is on the grid.
    #[default]
    Grid,
    /// Focus is on the widget selector.
    Selector,
}

/// State of the widget selector opened on an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    /// The cell the chosen widget will be placed at.
    pub target: CellIndex,
    /// Index into [`SelectorState::entries`].
    pub selected: usize,
}

impl SelectorState {
    /// Opens the selector for `target` with the first entry highlighted.
    #[must_use]
    pub fn new(target: CellIndex) -> Self {
        Self {
            target,
            selected: 0,
        }
    }

    /// Every selectable kind, grouped by category in display order.
    #[must_use]
    pub fn entries() -> Vec<WidgetKind> {
        WidgetCategory::all()
            .into_iter()
            .flat_map(WidgetCategory::kinds)
            .collect()
    }

    /// Moves the highlight by `delta`, wrapping at both ends.
    pub fn navigate(&mut self, delta: i32) {
        let len = Self::entries().len();
        if len == 0 {
            return;
        }
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let current = i64::try_from(self.selected).unwrap_or(0);
        let next = (current + i64::from(delta)).rem_euclid(len);
        self.selected = usize::try_from(next).unwrap_or(0);
    }

    /// The highlighted kind.
    #[must_use]
    pub fn selected_kind(&self) -> Option<WidgetKind> {
        Self::entries().get(self.selected).copied()
    }
}

/// The application state.
///
/// Contains the UI-only state of the TUI. The layout itself lives in the
/// grid controller.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current focus area.
    pub focus: Focus,
    /// The cell under the cursor.
    pub cursor: CellIndex,
    /// Anchor of the widget picked up for a move, if any.
    pub carrying: Option<CellIndex>,
    /// The open selector, if any.
    pub selector: Option<SelectorState>,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
}

impl AppState {
    /// Creates a new application state with the cursor on the first cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_tui::{AppState, Focus};
    ///
    /// let state = AppState::new();
    /// assert_eq!(state.cursor, 0);
    /// assert_eq!(state.focus, Focus::Grid);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the help overlay visibility.
    ///
    /// When help is shown, other interactions are blocked until
    /// help is dismissed.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed,
    /// `false` if help was not visible.
    #[must_use]
    pub fn dismiss_help(&mut self) -> bool {
        if self.help_visible {
            self.help_visible = false;
            true
        } else {
            false
        }
    }

    /// Opens the selector for the cell under the cursor.
    pub fn open_selector(&mut self) {
        self.selector = Some(SelectorState::new(self.cursor));
        self.focus = Focus::Selector;
    }

    /// Closes the selector, returning its final state.
    pub fn close_selector(&mut self) -> Option<SelectorState> {
        self.focus = Focus::Grid;
        self.selector.take()
    }

    /// Moves the cursor one step in `direction`, stopping at the grid edge.
    ///
    /// When the cursor sits on a widget (and nothing is being carried) it
    /// leaves the widget from the matching edge, so a large widget takes a
    /// single key press to cross.
    pub fn navigate(&mut self, grid: &GridState, direction: Direction) {
        let region = if self.carrying.is_none() {
            grid.anchor_covering(self.cursor)
                .and_then(|anchor| grid.region_of(anchor))
        } else {
            None
        };
        let here = grid.position(self.cursor);
        let (top, left, bottom, right) = match region {
            Some(region) => (
                region.origin.row,
                region.origin.col,
                region.end_row() - 1,
                region.end_col() - 1,
            ),
            None => (here.row, here.col, here.row, here.col),
        };

        let next = match direction {
            Direction::Left => left.checked_sub(1).map(|col| CellPosition::new(here.row, col)),
            Direction::Right => Some(CellPosition::new(here.row, right + 1)),
            Direction::Up => top.checked_sub(1).map(|row| CellPosition::new(row, here.col)),
            Direction::Down => Some(CellPosition::new(bottom + 1, here.col)),
        };
        if let Some(cell) = next.and_then(|pos| grid.index_of(pos)) {
            self.cursor = cell;
        }
    }

    /// Re-addresses the cursor after the grid changed size.
    ///
    /// `old_cols` is the column count the cursor index was computed with.
    /// The cursor keeps its row and column where they still exist and moves
    /// to the nearest edge otherwise. A carried widget that no longer exists
    /// is dropped.
    pub fn readdress_cursor(&mut self, grid: &GridState, old_cols: usize) {
        let pos = CellPosition::from_index(self.cursor, old_cols.max(1));
        let clamped = CellPosition::new(
            pos.row.min(grid.rows().saturating_sub(1)),
            pos.col.min(grid.cols().saturating_sub(1)),
        );
        self.cursor = clamped.to_index(grid.cols());
        if let Some(anchor) = self.carrying
            && !grid.is_anchor(anchor)
        {
            self.carrying = None;
        }
    }
}
