//! Mutating layout operations.
//!
//! Each operation validates first and only then writes, so a rejected
//! operation never leaves a partial change behind. Callers that need
//! snapshot semantics go through [`crate::GridController`], which applies
//! these operations to a copy and swaps it in on success.

use std::collections::BTreeMap;

use gmscreen_protocol::{CellIndex, Direction, Span, WidgetInstance, WidgetKind};
use tracing::{debug, warn};

use crate::error::{LayoutError, RejectReason, Result};
use crate::region::Region;
use crate::state::{GridState, check_dimension};

impl GridState {
    /// Places a new widget of `kind` at `anchor` with a 1x1 span.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPlacement`] if `anchor` is outside the
    /// grid, already an anchor, or covered by another widget's span.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::{Span, WidgetKind};
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// let instance = grid.place(0, WidgetKind::DiceRoller).unwrap();
    ///
    /// assert_eq!(grid.instance_at(0), Some(&instance));
    /// assert_eq!(grid.span_at(0), Some(Span::UNIT));
    /// assert!(grid.place(0, WidgetKind::Notes).is_err());
    /// ```
    pub fn place(&mut self, anchor: CellIndex, kind: WidgetKind) -> Result<WidgetInstance> {
        let instance = WidgetInstance::new(kind);
        self.place_instance(anchor, instance.clone(), Span::UNIT)?;
        Ok(instance)
    }

    /// Places an existing instance at `anchor` with the given span.
    ///
    /// Used when rebuilding a grid from a saved document, where the whole
    /// region must be free.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPlacement`] if the span is empty, the
    /// region leaves the grid, or it overlaps another widget.
    pub fn place_instance(
        &mut self,
        anchor: CellIndex,
        instance: WidgetInstance,
        span: Span,
    ) -> Result<()> {
        self.check_placement(anchor, span)
            .map_err(|reason| LayoutError::InvalidPlacement { anchor, reason })?;
        debug!(anchor, component_type = %instance.component_type, ?span, "placing widget");
        self.occupancy.insert(anchor, instance);
        self.spans.insert(anchor, span);
        Ok(())
    }

    /// Removes the widget anchored at `anchor`.
    ///
    /// Returns the removed instance so the caller can release its persisted
    /// state, or `None` (and does nothing) if no widget is anchored there.
    pub fn remove(&mut self, anchor: CellIndex) -> Option<WidgetInstance> {
        let instance = self.occupancy.remove(&anchor)?;
        self.spans.remove(&anchor);
        debug!(anchor, id = %instance.id, "removed widget");
        Some(instance)
    }

    /// Sets the span of the widget at `anchor`, optionally re-anchoring it.
    ///
    /// This is the low-level resize: the caller supplies the final anchor
    /// (needed when growing or shrinking from the left or top edge). The
    /// resulting region must fit the grid and must not overlap any other
    /// widget. Returns the widget's anchor after the resize.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidResize`] if no widget is anchored at
    /// `anchor`, the span is empty, or the new region leaves the grid or
    /// overlaps another widget.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::{Span, WidgetKind};
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// grid.place(1, WidgetKind::Notes).unwrap();
    ///
    /// // Grow left: the anchor moves from 1 to 0
    /// let anchor = grid.resize(1, 2, 1, Some(0)).unwrap();
    /// assert_eq!(anchor, 0);
    /// assert_eq!(grid.span_at(0), Some(Span::new(2, 1)));
    /// assert!(!grid.is_anchor(1));
    /// ```
    pub fn resize(
        &mut self,
        anchor: CellIndex,
        col_span: usize,
        row_span: usize,
        new_anchor: Option<CellIndex>,
    ) -> Result<CellIndex> {
        let reject = |reason| LayoutError::InvalidResize { anchor, reason };
        if !self.is_anchor(anchor) {
            return Err(reject(RejectReason::NotAnAnchor));
        }
        let span = Span::new(col_span, row_span);
        if !span.is_valid() {
            return Err(reject(RejectReason::MinimumSpan));
        }
        let target = new_anchor.unwrap_or(anchor);
        if !self.contains(target) {
            return Err(reject(RejectReason::OutOfBounds));
        }
        let region = Region::at(target, self.cols, span);
        if !region.fits(self.rows, self.cols) {
            return Err(reject(RejectReason::OutOfBounds));
        }
        if let Some(other) = self.first_conflict(&region, Some(anchor)) {
            return Err(reject(RejectReason::Occupied { anchor: other }));
        }
        Ok(self.commit_region(anchor, region))
    }

    /// Grows the widget at `anchor` by `amount` cells along `direction`.
    ///
    /// Returns the widget's anchor afterwards, which differs from `anchor`
    /// when growing left or up.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidResize`] under the same conditions that
    /// make [`GridState::can_expand`] return `false`.
    pub fn expand(
        &mut self,
        anchor: CellIndex,
        direction: Direction,
        amount: usize,
    ) -> Result<CellIndex> {
        let region = self
            .expansion_region(anchor, direction, amount)
            .map_err(|reason| LayoutError::InvalidResize { anchor, reason })?;
        Ok(self.commit_region(anchor, region))
    }

    /// Shrinks the widget at `anchor` by one cell along `direction`.
    ///
    /// Shrinking from the left or top edge moves the anchor forward by one
    /// cell. Returns the widget's anchor afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidResize`] if no widget is anchored at
    /// `anchor` or its span in that dimension is already 1.
    pub fn shrink(&mut self, anchor: CellIndex, direction: Direction) -> Result<CellIndex> {
        let reject = |reason| LayoutError::InvalidResize { anchor, reason };
        let current = self
            .region_of(anchor)
            .ok_or_else(|| reject(RejectReason::NotAnAnchor))?;
        let region = current
            .shrunk(direction)
            .ok_or_else(|| reject(RejectReason::MinimumSpan))?;
        Ok(self.commit_region(anchor, region))
    }

    /// Moves the widget anchored at `from` so it is anchored at `to`.
    ///
    /// Returns `false` without changing anything if `from` holds no widget,
    /// `to` is another widget's anchor, the widget would leave the grid at
    /// `to`, or any target cell is covered by a different widget. Moving a
    /// widget onto its own anchor succeeds without change.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::WidgetKind;
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// let a = grid.place(0, WidgetKind::Notes).unwrap();
    /// grid.place(1, WidgetKind::Timer).unwrap();
    ///
    /// assert!(grid.move_widget(0, 2));
    /// assert_eq!(grid.instance_at(2), Some(&a));
    /// assert!(!grid.move_widget(2, 1));
    /// ```
    pub fn move_widget(&mut self, from: CellIndex, to: CellIndex) -> bool {
        let Some(region) = self.move_region(from, to) else {
            debug!(from, to, "move rejected");
            return false;
        };
        self.commit_region(from, region);
        true
    }

    /// Changes the row count.
    ///
    /// Growing always succeeds. Shrinking is rejected if a widget would be
    /// cut off; otherwise entries beyond the new last row are pruned (which
    /// the check already rules out) and the dimension is updated.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGridResize`] if `new_rows` is zero or
    /// above [`MAX_GRID_DIMENSION`](gmscreen_protocol::MAX_GRID_DIMENSION),
    /// or if a widget would be cut off.
    pub fn apply_row_resize(&mut self, new_rows: usize) -> Result<()> {
        let reject = |reason| LayoutError::InvalidGridResize {
            rows: new_rows,
            cols: self.cols,
            reason,
        };
        check_dimension(new_rows).map_err(reject)?;
        if new_rows < self.rows
            && let Some(anchor) = self.row_cutoff(new_rows)
        {
            return Err(reject(RejectReason::WidgetCutOff { anchor }));
        }

        let limit = new_rows * self.cols;
        let before = self.occupancy.len();
        self.occupancy.retain(|&anchor, _| anchor < limit);
        self.spans.retain(|&anchor, _| anchor < limit);
        if self.occupancy.len() != before {
            warn!(
                pruned = before - self.occupancy.len(),
                "pruned widgets beyond the last row"
            );
        }
        debug!(from = self.rows, to = new_rows, "resized grid rows");
        self.rows = new_rows;
        Ok(())
    }

    /// Changes the column count.
    ///
    /// Growing always succeeds. Shrinking is rejected if a widget would be
    /// cut off. Every widget keeps its `(row, col)` position, so anchors are
    /// re-addressed for the new row width.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGridResize`] if `new_cols` is zero or
    /// above [`MAX_GRID_DIMENSION`](gmscreen_protocol::MAX_GRID_DIMENSION),
    /// or if a widget would be cut off.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::WidgetKind;
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// grid.place(5, WidgetKind::Notes).unwrap(); // row 1, col 1
    ///
    /// grid.apply_col_resize(6).unwrap();
    /// assert!(grid.is_anchor(7)); // still row 1, col 1
    /// ```
    pub fn apply_col_resize(&mut self, new_cols: usize) -> Result<()> {
        let reject = |reason| LayoutError::InvalidGridResize {
            rows: self.rows,
            cols: new_cols,
            reason,
        };
        check_dimension(new_cols).map_err(reject)?;
        if new_cols < self.cols
            && let Some(anchor) = self.col_cutoff(new_cols)
        {
            return Err(reject(RejectReason::WidgetCutOff { anchor }));
        }

        let old_cols = self.cols;
        let mut occupancy = BTreeMap::new();
        let mut spans = BTreeMap::new();
        for (anchor, instance) in std::mem::take(&mut self.occupancy) {
            let span = self.spans.get(&anchor).copied().unwrap_or_default();
            let region = Region::at(anchor, old_cols, span);
            if region.end_col() > new_cols {
                warn!(anchor, "pruned widget beyond the last column");
                continue;
            }
            let moved = region.origin.to_index(new_cols);
            occupancy.insert(moved, instance);
            spans.insert(moved, span);
        }
        self.occupancy = occupancy;
        self.spans = spans;
        debug!(from = old_cols, to = new_cols, "resized grid columns");
        self.cols = new_cols;
        Ok(())
    }

    /// Re-anchors the widget at `anchor` to cover exactly `region`.
    ///
    /// The region must already have been validated.
    fn commit_region(&mut self, anchor: CellIndex, region: Region) -> CellIndex {
        let target = region.origin.to_index(self.cols);
        if target != anchor
            && let Some(instance) = self.occupancy.remove(&anchor)
        {
            self.spans.remove(&anchor);
            self.occupancy.insert(target, instance);
        }
        self.spans.insert(target, region.span);
        debug!(from = anchor, to = target, span = ?region.span, "updated widget region");
        target
    }
}
