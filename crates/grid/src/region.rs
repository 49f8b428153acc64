//! Rectangular cell regions.
//!
//! A [`Region`] is the geometric footprint of a widget: its anchor position
//! plus its span. All overlap and bounds checks in the engine are expressed
//! in terms of regions so they depend only on geometry, never on the order
//! anchors happen to be stored in.

use gmscreen_protocol::{CellIndex, CellPosition, Direction, Span};

/// A rectangle of cells anchored at its top-left corner.
///
/// # Examples
///
/// ```
/// use gmscreen_grid::Region;
/// use gmscreen_protocol::{CellPosition, Direction, Span};
///
/// let region = Region::new(CellPosition::new(1, 1), Span::new(2, 1));
/// assert!(region.contains(CellPosition::new(1, 2)));
/// assert!(!region.contains(CellPosition::new(0, 1)));
///
/// let grown = region.grown(Direction::Left, 1).unwrap();
/// assert_eq!(grown.origin, CellPosition::new(1, 0));
/// assert_eq!(grown.span, Span::new(3, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Top-left cell.
    pub origin: CellPosition,
    /// Extent from the origin.
    pub span: Span,
}

impl Region {
    /// Creates a region from its origin and span.
    #[must_use]
    pub const fn new(origin: CellPosition, span: Span) -> Self {
        Self { origin, span }
    }

    /// Creates the region of a widget anchored at `anchor` in a grid with
    /// `cols` columns.
    #[must_use]
    pub const fn at(anchor: CellIndex, cols: usize, span: Span) -> Self {
        Self::new(CellPosition::from_index(anchor, cols), span)
    }

    /// One past the last covered row, saturating at `usize::MAX`.
    #[must_use]
    pub const fn end_row(&self) -> usize {
        self.origin.row.saturating_add(self.span.row_span)
    }

    /// One past the last covered column, saturating at `usize::MAX`.
    #[must_use]
    pub const fn end_col(&self) -> usize {
        self.origin.col.saturating_add(self.span.col_span)
    }

    /// Returns `true` if the region lies entirely within a `rows` x `cols` grid.
    ///
    /// A region whose far edge overflows `usize` never fits.
    #[must_use]
    pub const fn fits(&self, rows: usize, cols: usize) -> bool {
        self.span.is_valid()
            && matches!(self.origin.row.checked_add(self.span.row_span), Some(end) if end <= rows)
            && matches!(self.origin.col.checked_add(self.span.col_span), Some(end) if end <= cols)
    }

    /// Returns `true` if `pos` is covered by this region.
    #[must_use]
    pub const fn contains(&self, pos: CellPosition) -> bool {
        pos.row >= self.origin.row
            && pos.row < self.end_row()
            && pos.col >= self.origin.col
            && pos.col < self.end_col()
    }

    /// Returns `true` if the two regions share at least one cell.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.origin.row < other.end_row()
            && other.origin.row < self.end_row()
            && self.origin.col < other.end_col()
            && other.origin.col < self.end_col()
    }

    /// Iterates over every covered position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = CellPosition> + use<> {
        let origin = self.origin;
        let end_col = self.end_col();
        (origin.row..self.end_row())
            .flat_map(move |row| (origin.col..end_col).map(move |col| CellPosition::new(row, col)))
    }

    /// Returns the linear indices of every covered cell.
    #[must_use]
    pub fn cell_indices(&self, cols: usize) -> Vec<CellIndex> {
        self.positions().map(|pos| pos.to_index(cols)).collect()
    }

    /// Returns the region grown by `amount` cells along `direction`.
    ///
    /// Growing left or up moves the origin backwards. Returns `None` when
    /// the origin would move before the first row or column, or when the
    /// span would overflow.
    #[must_use]
    pub fn grown(&self, direction: Direction, amount: usize) -> Option<Self> {
        let Self { mut origin, mut span } = *self;
        match direction {
            Direction::Right => span.col_span = span.col_span.checked_add(amount)?,
            Direction::Down => span.row_span = span.row_span.checked_add(amount)?,
            Direction::Left => {
                origin.col = origin.col.checked_sub(amount)?;
                span.col_span = span.col_span.checked_add(amount)?;
            }
            Direction::Up => {
                origin.row = origin.row.checked_sub(amount)?;
                span.row_span = span.row_span.checked_add(amount)?;
            }
        }
        Some(Self { origin, span })
    }

    /// Returns the region shrunk by one cell along `direction`.
    ///
    /// Shrinking left or up moves the origin forwards. Returns `None` if the
    /// span in that dimension is already 1.
    #[must_use]
    pub fn shrunk(&self, direction: Direction) -> Option<Self> {
        let Self { mut origin, mut span } = *self;
        if direction.is_horizontal() {
            if span.col_span <= 1 {
                return None;
            }
            span.col_span -= 1;
        } else {
            if span.row_span <= 1 {
                return None;
            }
            span.row_span -= 1;
        }
        match direction {
            Direction::Left => origin.col += 1,
            Direction::Up => origin.row += 1,
            Direction::Right | Direction::Down => {}
        }
        Some(Self { origin, span })
    }
}
