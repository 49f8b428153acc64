//! Snapshot-based layout controller.
//!
//! [`GridController`] owns the current [`GridState`] behind an [`Arc`].
//! Every transition clones the state, applies one operation to the copy,
//! and swaps the copy in only when the operation succeeds. Readers holding
//! a snapshot from [`GridController::snapshot`] keep seeing the layout as it
//! was when they took it, and a rejected operation is never observable.

use std::sync::Arc;

use gmscreen_protocol::{CellIndex, Direction, Span, WidgetInstance, WidgetKind};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::state::GridState;

/// Drives layout changes for a single screen.
///
/// # Examples
///
/// ```
/// use gmscreen_grid::GridController;
/// use gmscreen_protocol::{Direction, WidgetKind};
///
/// let mut grid = GridController::new(2, 4).unwrap();
/// grid.place(0, WidgetKind::Notes).unwrap();
/// let before = grid.snapshot();
///
/// grid.expand(0, Direction::Right, 1).unwrap();
///
/// assert_eq!(before.covered_cells(0), vec![0]);
/// assert_eq!(grid.state().covered_cells(0), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct GridController {
    state: Arc<GridState>,
}

impl GridController {
    /// Creates a controller over an empty `rows` x `cols` grid.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::from_state(GridState::new(rows, cols)?))
    }

    /// Creates a controller over an existing state.
    #[must_use]
    pub fn from_state(state: GridState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Returns a shared handle to the current state.
    ///
    /// The handle is unaffected by later transitions.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GridState> {
        Arc::clone(&self.state)
    }

    /// Applies `op` to a copy of the state and commits the copy on success.
    fn commit<T>(&mut self, op: impl FnOnce(&mut GridState) -> Result<T>) -> Result<T> {
        let mut next = GridState::clone(&self.state);
        match op(&mut next) {
            Ok(value) => {
                self.state = Arc::new(next);
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "layout change rejected");
                Err(err)
            }
        }
    }

    /// Places a new 1x1 widget of `kind` at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidPlacement`] if the cell is outside the
    /// grid or not free.
    #[instrument(skip(self))]
    pub fn place(&mut self, anchor: CellIndex, kind: WidgetKind) -> Result<WidgetInstance> {
        let instance = self.commit(|state| state.place(anchor, kind))?;
        info!(anchor, id = %instance.id, "widget added");
        Ok(instance)
    }

    /// Places an existing instance with an explicit span.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidPlacement`] if the region does not fit
    /// or overlaps another widget.
    pub fn place_instance(
        &mut self,
        anchor: CellIndex,
        instance: WidgetInstance,
        span: Span,
    ) -> Result<()> {
        self.commit(|state| state.place_instance(anchor, instance, span))
    }

    /// Removes the widget anchored at `anchor`, returning it.
    ///
    /// Removing from a cell that holds no anchor is a no-op.
    #[instrument(skip(self))]
    pub fn remove(&mut self, anchor: CellIndex) -> Option<WidgetInstance> {
        if !self.state.is_anchor(anchor) {
            debug!("nothing to remove");
            return None;
        }
        let mut next = GridState::clone(&self.state);
        let removed = next.remove(anchor);
        self.state = Arc::new(next);
        if let Some(instance) = &removed {
            info!(id = %instance.id, "widget removed");
        }
        removed
    }

    /// Sets the span of the widget at `anchor`, optionally re-anchoring it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidResize`] if the result would be invalid.
    #[instrument(skip(self))]
    pub fn resize(
        &mut self,
        anchor: CellIndex,
        col_span: usize,
        row_span: usize,
        new_anchor: Option<CellIndex>,
    ) -> Result<CellIndex> {
        self.commit(|state| state.resize(anchor, col_span, row_span, new_anchor))
    }

    /// Grows the widget at `anchor` by `amount` cells along `direction`.
    ///
    /// Returns the anchor after the change.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidResize`] if the widget cannot grow.
    #[instrument(skip(self))]
    pub fn expand(
        &mut self,
        anchor: CellIndex,
        direction: Direction,
        amount: usize,
    ) -> Result<CellIndex> {
        self.commit(|state| state.expand(anchor, direction, amount))
    }

    /// Shrinks the widget at `anchor` by one cell along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidResize`] if the widget is already at
    /// its minimum span in that dimension.
    #[instrument(skip(self))]
    pub fn shrink(&mut self, anchor: CellIndex, direction: Direction) -> Result<CellIndex> {
        self.commit(|state| state.shrink(anchor, direction))
    }

    /// Moves the widget at `from` to be anchored at `to`.
    ///
    /// Returns `false` and leaves the layout unchanged if the move is not
    /// allowed.
    #[instrument(skip(self))]
    pub fn move_widget(&mut self, from: CellIndex, to: CellIndex) -> bool {
        if !self.state.can_move(from, to) {
            debug!("move rejected");
            return false;
        }
        let mut next = GridState::clone(&self.state);
        let moved = next.move_widget(from, to);
        if moved {
            self.state = Arc::new(next);
        }
        moved
    }

    /// See [`GridState::can_expand`].
    #[must_use]
    pub fn can_expand(&self, anchor: CellIndex, direction: Direction, amount: usize) -> bool {
        self.state.can_expand(anchor, direction, amount)
    }

    /// See [`GridState::can_shrink`].
    #[must_use]
    pub fn can_shrink(&self, anchor: CellIndex, direction: Direction) -> bool {
        self.state.can_shrink(anchor, direction)
    }

    /// See [`GridState::can_shrink_rows`].
    #[must_use]
    pub fn can_shrink_rows(&self, new_rows: usize) -> bool {
        self.state.can_shrink_rows(new_rows)
    }

    /// See [`GridState::can_shrink_cols`].
    #[must_use]
    pub fn can_shrink_cols(&self, new_cols: usize) -> bool {
        self.state.can_shrink_cols(new_cols)
    }

    /// Changes the number of rows.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidGridResize`] if a widget would be cut
    /// off or `rows` is zero or too large.
    #[instrument(skip(self))]
    pub fn set_rows(&mut self, rows: usize) -> Result<()> {
        self.commit(|state| state.apply_row_resize(rows))
    }

    /// Changes the number of columns, keeping every widget at its row and
    /// column.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::InvalidGridResize`] if a widget would be cut
    /// off or `cols` is zero or too large.
    #[instrument(skip(self))]
    pub fn set_cols(&mut self, cols: usize) -> Result<()> {
        self.commit(|state| state.apply_col_resize(cols))
    }
}

impl From<GridState> for GridController {
    fn from(state: GridState) -> Self {
        Self::from_state(state)
    }
}
