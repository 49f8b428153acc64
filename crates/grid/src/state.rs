//! Grid state and read-only layout queries.
//!
//! [`GridState`] holds the grid dimensions, the occupancy map (anchor cell to
//! widget instance), and the span map (anchor cell to span). Everything in
//! this module is a pure query: the checks here decide whether an operation
//! would be accepted without touching the state. The mutating operations
//! live in [`crate::ops`] and always run these checks first.
//!
//! Overlap checks scan every anchor. That is O(anchors x area) per query,
//! which is fine for a single screen of a few dozen cells.

use std::collections::BTreeMap;

use gmscreen_protocol::{
    CellIndex, CellPosition, Direction, MAX_GRID_DIMENSION, Span, WidgetInstance,
};

use crate::error::{LayoutError, RejectReason, Result};
use crate::region::Region;

/// The complete layout of a screen.
///
/// # Invariants
///
/// - `1 <= rows <= MAX_GRID_DIMENSION` and likewise for `cols`.
/// - Every key of `spans` is a key of `occupancy`.
/// - The regions of distinct anchors never intersect and all lie within
///   the grid.
///
/// # Examples
///
/// ```
/// use gmscreen_grid::GridState;
/// use gmscreen_protocol::WidgetKind;
///
/// let mut grid = GridState::new(2, 4).unwrap();
/// grid.place(0, WidgetKind::Notes).unwrap();
///
/// assert!(grid.is_anchor(0));
/// assert_eq!(grid.widget_count(), 1);
/// assert!(grid.can_expand(0, gmscreen_protocol::Direction::Right, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) occupancy: BTreeMap<CellIndex, WidgetInstance>,
    pub(crate) spans: BTreeMap<CellIndex, Span>,
}

/// Checks one grid dimension against `1..=MAX_GRID_DIMENSION`.
pub(crate) const fn check_dimension(value: usize) -> std::result::Result<(), RejectReason> {
    if value == 0 {
        Err(RejectReason::ZeroDimension)
    } else if value > MAX_GRID_DIMENSION {
        Err(RejectReason::TooLarge {
            limit: MAX_GRID_DIMENSION,
        })
    } else {
        Ok(())
    }
}

impl GridState {
    /// Creates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGridResize`] if either dimension is zero
    /// or above [`MAX_GRID_DIMENSION`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        check_dimension(rows)
            .and(check_dimension(cols))
            .map_err(|reason| LayoutError::InvalidGridResize { rows, cols, reason })?;
        Ok(Self {
            rows,
            cols,
            occupancy: BTreeMap::new(),
            spans: BTreeMap::new(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        // Both dimensions are bounded by MAX_GRID_DIMENSION
        self.rows * self.cols
    }

    /// Returns `true` if `cell` addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell < self.cell_count()
    }

    /// Converts a cell index to its `(row, col)` position.
    #[must_use]
    pub const fn position(&self, cell: CellIndex) -> CellPosition {
        CellPosition::from_index(cell, self.cols)
    }

    /// Converts a position to a cell index, if it lies within the grid.
    #[must_use]
    pub const fn index_of(&self, pos: CellPosition) -> Option<CellIndex> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(pos.to_index(self.cols))
        } else {
            None
        }
    }

    /// Number of placed widgets.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Returns `true` if no widget is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Returns `true` if a widget is anchored at `cell`.
    #[must_use]
    pub fn is_anchor(&self, cell: CellIndex) -> bool {
        self.occupancy.contains_key(&cell)
    }

    /// Returns the widget anchored at `cell`, if any.
    #[must_use]
    pub fn instance_at(&self, cell: CellIndex) -> Option<&WidgetInstance> {
        self.occupancy.get(&cell)
    }

    /// Returns the span of the widget anchored at `cell`.
    ///
    /// Occupied anchors without a span entry count as 1x1. Returns `None`
    /// when nothing is anchored at `cell`.
    #[must_use]
    pub fn span_at(&self, cell: CellIndex) -> Option<Span> {
        self.is_anchor(cell)
            .then(|| self.spans.get(&cell).copied().unwrap_or_default())
    }

    /// Returns the region of the widget anchored at `cell`.
    #[must_use]
    pub fn region_of(&self, anchor: CellIndex) -> Option<Region> {
        self.span_at(anchor)
            .map(|span| Region::at(anchor, self.cols, span))
    }

    /// Iterates over `(anchor, instance, span)` for every placed widget, in
    /// anchor order.
    pub fn widgets(&self) -> impl Iterator<Item = (CellIndex, &WidgetInstance, Span)> {
        self.occupancy.iter().map(|(&anchor, instance)| {
            let span = self.spans.get(&anchor).copied().unwrap_or_default();
            (anchor, instance, span)
        })
    }

    /// Returns the anchor whose region contains `cell`, if any.
    ///
    /// A cell that is itself an anchor returns its own index.
    #[must_use]
    pub fn anchor_covering(&self, cell: CellIndex) -> Option<CellIndex> {
        if !self.contains(cell) {
            return None;
        }
        let pos = self.position(cell);
        self.widgets()
            .find(|&(anchor, _, span)| Region::at(anchor, self.cols, span).contains(pos))
            .map(|(anchor, _, _)| anchor)
    }

    /// Returns `true` if `cell` lies inside the span of a widget anchored
    /// elsewhere.
    ///
    /// Covered cells are visually consumed by their spanning neighbor and are
    /// skipped when rendering or placing.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::WidgetKind;
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// grid.place(0, WidgetKind::Notes).unwrap();
    /// grid.resize(0, 2, 2, None).unwrap();
    ///
    /// assert!(!grid.is_covered(0)); // the anchor itself
    /// assert!(grid.is_covered(1));
    /// assert!(grid.is_covered(5));
    /// assert!(!grid.is_covered(2));
    /// ```
    #[must_use]
    pub fn is_covered(&self, cell: CellIndex) -> bool {
        self.anchor_covering(cell)
            .is_some_and(|anchor| anchor != cell)
    }

    /// Returns `true` if no widget covers `cell`.
    #[must_use]
    pub fn is_free(&self, cell: CellIndex) -> bool {
        self.contains(cell) && self.anchor_covering(cell).is_none()
    }

    /// Returns every cell covered by the widget anchored at `anchor`.
    ///
    /// Empty when nothing is anchored there.
    #[must_use]
    pub fn covered_cells(&self, anchor: CellIndex) -> Vec<CellIndex> {
        self.region_of(anchor)
            .map(|region| region.cell_indices(self.cols))
            .unwrap_or_default()
    }

    /// Returns the first anchor, other than `ignore`, whose region
    /// intersects `region`.
    pub(crate) fn first_conflict(
        &self,
        region: &Region,
        ignore: Option<CellIndex>,
    ) -> Option<CellIndex> {
        self.widgets()
            .filter(|&(anchor, _, _)| Some(anchor) != ignore)
            .find(|&(anchor, _, span)| Region::at(anchor, self.cols, span).intersects(region))
            .map(|(anchor, _, _)| anchor)
    }

    /// Checks that a widget can be anchored at `anchor` with `span`.
    pub(crate) fn check_placement(
        &self,
        anchor: CellIndex,
        span: Span,
    ) -> std::result::Result<Region, RejectReason> {
        if !span.is_valid() {
            return Err(RejectReason::MinimumSpan);
        }
        if !self.contains(anchor) {
            return Err(RejectReason::OutOfBounds);
        }
        let region = Region::at(anchor, self.cols, span);
        if !region.fits(self.rows, self.cols) {
            return Err(RejectReason::OutOfBounds);
        }
        match self.first_conflict(&region, None) {
            Some(other) => Err(RejectReason::Occupied { anchor: other }),
            None => Ok(region),
        }
    }

    /// Returns `true` if a new 1x1 widget could be placed at `anchor`.
    #[must_use]
    pub fn can_place(&self, anchor: CellIndex) -> bool {
        self.check_placement(anchor, Span::UNIT).is_ok()
    }

    /// Computes the region the widget at `anchor` would occupy after growing
    /// by `amount` along `direction`.
    ///
    /// Only cells not already covered by the widget itself are checked
    /// against other widgets.
    pub(crate) fn expansion_region(
        &self,
        anchor: CellIndex,
        direction: Direction,
        amount: usize,
    ) -> std::result::Result<Region, RejectReason> {
        let current = self.region_of(anchor).ok_or(RejectReason::NotAnAnchor)?;
        let candidate = current
            .grown(direction, amount)
            .ok_or(RejectReason::OutOfBounds)?;
        if !candidate.fits(self.rows, self.cols) {
            return Err(RejectReason::OutOfBounds);
        }
        for pos in candidate.positions().filter(|pos| !current.contains(*pos)) {
            let cell = pos.to_index(self.cols);
            if let Some(other) = self.anchor_covering(cell) {
                return Err(RejectReason::Occupied { anchor: other });
            }
        }
        Ok(candidate)
    }

    /// Returns `true` if the widget at `anchor` can grow by `amount` cells
    /// along `direction`.
    ///
    /// Growing left or up moves the anchor backwards by `amount`. The check
    /// fails when the grown region leaves the grid or any newly covered cell
    /// belongs to another widget.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::{Direction, WidgetKind};
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// grid.place(0, WidgetKind::Notes).unwrap();
    /// grid.place(2, WidgetKind::Timer).unwrap();
    ///
    /// assert!(grid.can_expand(0, Direction::Right, 1));
    /// assert!(!grid.can_expand(0, Direction::Right, 2)); // cell 2 is taken
    /// assert!(!grid.can_expand(0, Direction::Left, 1)); // off the grid
    /// ```
    #[must_use]
    pub fn can_expand(&self, anchor: CellIndex, direction: Direction, amount: usize) -> bool {
        self.expansion_region(anchor, direction, amount).is_ok()
    }

    /// Returns `true` if the widget at `anchor` can shrink by one cell along
    /// `direction` (its span in that dimension is above 1).
    #[must_use]
    pub fn can_shrink(&self, anchor: CellIndex, direction: Direction) -> bool {
        self.region_of(anchor)
            .and_then(|region| region.shrunk(direction))
            .is_some()
    }

    /// Computes the target region for moving the widget at `from` to `to`.
    pub(crate) fn move_region(&self, from: CellIndex, to: CellIndex) -> Option<Region> {
        let span = self.span_at(from)?;
        if !self.contains(to) || (to != from && self.is_anchor(to)) {
            return None;
        }
        let region = Region::at(to, self.cols, span);
        if !region.fits(self.rows, self.cols) {
            return None;
        }
        match self.first_conflict(&region, Some(from)) {
            Some(_) => None,
            None => Some(region),
        }
    }

    /// Returns `true` if the widget at `from` could be moved so that it is
    /// anchored at `to`.
    ///
    /// The widget's own current footprint does not block the move, so a
    /// widget can slide into cells it already covers.
    #[must_use]
    pub fn can_move(&self, from: CellIndex, to: CellIndex) -> bool {
        self.move_region(from, to).is_some()
    }

    /// Returns the cells the widget at `from` would cover if dropped at `to`,
    /// clipped to the grid.
    ///
    /// Used to highlight a drop target while a widget is being carried.
    #[must_use]
    pub fn drop_target_cells(&self, from: CellIndex, to: CellIndex) -> Vec<CellIndex> {
        let Some(span) = self.span_at(from) else {
            return Vec::new();
        };
        if !self.contains(to) {
            return Vec::new();
        }
        Region::at(to, self.cols, span)
            .positions()
            .filter_map(|pos| self.index_of(pos))
            .collect()
    }

    /// Returns the first widget that would not fit in `new_rows` rows.
    pub(crate) fn row_cutoff(&self, new_rows: usize) -> Option<CellIndex> {
        self.widgets()
            .find(|&(anchor, _, span)| {
                let row = self.position(anchor).row;
                row >= new_rows || row + span.row_span > new_rows
            })
            .map(|(anchor, _, _)| anchor)
    }

    /// Returns the first widget that would not fit in `new_cols` columns.
    pub(crate) fn col_cutoff(&self, new_cols: usize) -> Option<CellIndex> {
        self.widgets()
            .find(|&(anchor, _, span)| {
                let col = self.position(anchor).col;
                col >= new_cols || col + span.col_span > new_cols
            })
            .map(|(anchor, _, _)| anchor)
    }

    /// Returns `true` if the grid can change to `new_rows` rows.
    ///
    /// Growing is always allowed. Shrinking is rejected if any widget's
    /// anchor or span would fall outside the new bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridState;
    /// use gmscreen_protocol::WidgetKind;
    ///
    /// let mut grid = GridState::new(2, 4).unwrap();
    /// grid.place(4, WidgetKind::Clock).unwrap(); // row 1
    ///
    /// assert!(grid.can_shrink_rows(3));
    /// assert!(!grid.can_shrink_rows(1));
    /// ```
    #[must_use]
    pub fn can_shrink_rows(&self, new_rows: usize) -> bool {
        new_rows >= 1 && (new_rows >= self.rows || self.row_cutoff(new_rows).is_none())
    }

    /// Returns `true` if the grid can change to `new_cols` columns.
    ///
    /// Growing is always allowed. Shrinking is rejected if any widget's
    /// anchor or span would fall outside the new bound.
    #[must_use]
    pub fn can_shrink_cols(&self, new_cols: usize) -> bool {
        new_cols >= 1 && (new_cols >= self.cols || self.col_cutoff(new_cols).is_none())
    }

    /// Checks every structural invariant, returning the first violation.
    ///
    /// Used by tests and by document loading as a final sanity check.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<String> {
        if check_dimension(self.rows).and(check_dimension(self.cols)).is_err() {
            return Some(format!("grid size {}x{} out of range", self.rows, self.cols));
        }
        if let Some(orphan) = self.spans.keys().find(|k| !self.occupancy.contains_key(k)) {
            return Some(format!("span without widget at cell {orphan}"));
        }
        let regions: Vec<(CellIndex, Region)> = self
            .widgets()
            .map(|(anchor, _, span)| (anchor, Region::at(anchor, self.cols, span)))
            .collect();
        for (i, (anchor, region)) in regions.iter().enumerate() {
            if !self.contains(*anchor) || !region.fits(self.rows, self.cols) {
                return Some(format!("widget at cell {anchor} leaves the grid"));
            }
            if let Some((other, _)) = regions[i + 1..]
                .iter()
                .find(|(_, other)| region.intersects(other))
            {
                return Some(format!("widgets at cells {anchor} and {other} overlap"));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmscreen_protocol::WidgetKind;

    fn grid_2x4() -> GridState {
        GridState::new(2, 4).expect("valid grid")
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(GridState::new(0, 4).is_err());
        assert!(GridState::new(2, 0).is_err());
    }

    #[test]
    fn empty_grid_has_no_coverage() {
        let grid = grid_2x4();
        for cell in 0..grid.cell_count() {
            assert!(!grid.is_covered(cell));
            assert!(grid.is_free(cell));
        }
        assert!(!grid.is_free(8));
    }

    #[test]
    fn span_defaults_to_unit_for_occupied_anchor() {
        let mut grid = grid_2x4();
        grid.place(3, WidgetKind::Notes).expect("place");
        grid.spans.remove(&3);
        assert_eq!(grid.span_at(3), Some(Span::UNIT));
        assert_eq!(grid.span_at(2), None);
    }

    #[test]
    fn coverage_does_not_depend_on_anchor_order() {
        // A later anchor spanning back over an earlier index is impossible
        // in a valid grid, but coverage must still come from geometry.
        let mut grid = grid_2x4();
        grid.place(1, WidgetKind::Notes).expect("place");
        grid.resize(1, 1, 2, None).expect("resize");
        assert!(grid.is_covered(5));
        assert_eq!(grid.anchor_covering(5), Some(1));
        assert!(!grid.is_covered(4));
    }

    #[test]
    fn can_expand_requires_anchor() {
        let grid = grid_2x4();
        assert!(!grid.can_expand(0, Direction::Right, 1));
    }

    #[test]
    fn can_expand_rejects_cells_covered_by_other_spans() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.place(2, WidgetKind::Timer).expect("place");
        grid.resize(2, 1, 2, None).expect("resize"); // covers 2 and 6
        grid.resize(0, 1, 2, None).expect("resize"); // covers 0 and 4
        grid.place(5, WidgetKind::Clock).expect("place");

        // Growing 0 right over 1 and 5: 5 is an anchor
        assert!(!grid.can_expand(0, Direction::Right, 1));
        grid.remove(5);
        assert!(grid.can_expand(0, Direction::Right, 1));
        // Growing further right reaches 2 and 6, covered by anchor 2
        assert!(!grid.can_expand(0, Direction::Right, 2));
    }

    #[test]
    fn can_expand_up_and_left_check_bounds() {
        let mut grid = grid_2x4();
        grid.place(5, WidgetKind::Notes).expect("place");
        assert!(grid.can_expand(5, Direction::Up, 1));
        assert!(!grid.can_expand(5, Direction::Up, 2));
        assert!(grid.can_expand(5, Direction::Left, 1));
        assert!(!grid.can_expand(5, Direction::Left, 2));
        assert!(!grid.can_expand(5, Direction::Down, 1));
    }

    #[test]
    fn can_shrink_only_above_unit_span() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        for direction in Direction::all() {
            assert!(!grid.can_shrink(0, direction));
        }
        grid.resize(0, 2, 1, None).expect("resize");
        assert!(grid.can_shrink(0, Direction::Left));
        assert!(grid.can_shrink(0, Direction::Right));
        assert!(!grid.can_shrink(0, Direction::Up));
    }

    #[test]
    fn can_move_into_own_footprint() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.resize(0, 2, 1, None).expect("resize");
        assert!(grid.can_move(0, 1));
        assert!(grid.can_move(0, 2));
        assert!(!grid.can_move(0, 3)); // would leave the grid
    }

    #[test]
    fn can_move_rejects_covered_target_cells() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.place(2, WidgetKind::Timer).expect("place");
        grid.resize(2, 1, 2, None).expect("resize"); // covers 6
        // Target 6 is not an anchor but is covered by anchor 2
        assert!(!grid.can_move(0, 6));
        assert!(grid.can_move(0, 5));
    }

    #[test]
    fn drop_target_cells_are_clipped() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.resize(0, 2, 2, None).expect("resize");
        assert_eq!(grid.drop_target_cells(0, 1), vec![1, 2, 5, 6]);
        assert_eq!(grid.drop_target_cells(0, 7), vec![7]);
        assert!(grid.drop_target_cells(3, 1).is_empty());
    }

    #[test]
    fn shrink_checks_use_anchor_and_span() {
        let mut grid = GridState::new(3, 3).expect("grid");
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.resize(0, 1, 2, None).expect("resize");
        assert!(grid.can_shrink_rows(2));
        assert!(!grid.can_shrink_rows(1));
        assert!(grid.can_shrink_cols(1));
        assert!(!grid.can_shrink_cols(0));
    }

    #[test]
    fn fresh_grid_has_no_invariant_violation() {
        let mut grid = grid_2x4();
        assert_eq!(grid.invariant_violation(), None);
        grid.place(1, WidgetKind::Notes).expect("place");
        grid.resize(1, 3, 2, None).expect("resize");
        assert_eq!(grid.invariant_violation(), None);
    }

    #[test]
    fn invariant_violation_reports_overlap() {
        let mut grid = grid_2x4();
        grid.place(0, WidgetKind::Notes).expect("place");
        grid.place(1, WidgetKind::Notes).expect("place");
        grid.spans.insert(0, Span::new(2, 1));
        assert!(grid.invariant_violation().is_some());
    }
}
