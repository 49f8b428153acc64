//! Cell addressing and span types for the screen grid.
//!
//! Cells are addressed by a single linear index `row * cols + col`. A widget
//! occupies a rectangular region described by its anchor (top-left) cell and
//! its [`Span`].

use serde::{Deserialize, Serialize};

/// Linear index of a cell in the grid (`row * cols + col`).
pub type CellIndex = usize;

/// A `(row, col)` coordinate in the grid.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::CellPosition;
///
/// let pos = CellPosition::from_index(6, 4);
/// assert_eq!(pos, CellPosition::new(1, 2));
/// assert_eq!(pos.to_index(4), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl CellPosition {
    /// Creates a position from its row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts a linear index into a position for a grid with `cols` columns.
    ///
    /// `cols` must be non-zero.
    #[must_use]
    pub const fn from_index(index: CellIndex, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }

    /// Converts this position back into a linear index.
    #[must_use]
    pub const fn to_index(self, cols: usize) -> CellIndex {
        self.row * cols + self.col
    }
}

/// The extent of a widget from its anchor cell.
///
/// Both dimensions are at least 1. The JSON form uses the screen document
/// field names (`colSpan`, `rowSpan`).
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::Span;
///
/// let span = Span::default();
/// assert_eq!(span, Span::UNIT);
/// assert_eq!(span.area(), 1);
///
/// assert_eq!(Span::new(3, 2).area(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Number of columns covered.
    pub col_span: usize,
    /// Number of rows covered.
    pub row_span: usize,
}

impl Span {
    /// A single-cell span.
    pub const UNIT: Self = Self {
        col_span: 1,
        row_span: 1,
    };

    /// Creates a span from its column and row extents.
    #[must_use]
    pub const fn new(col_span: usize, row_span: usize) -> Self {
        Self { col_span, row_span }
    }

    /// Returns `true` if both extents are at least 1.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.col_span >= 1 && self.row_span >= 1
    }

    /// Number of cells covered by this span.
    #[must_use]
    pub const fn area(self) -> usize {
        self.col_span * self.row_span
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// One of the four edges a widget can grow or shrink from.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::Direction;
///
/// assert!(Direction::Left.moves_anchor());
/// assert!(!Direction::Down.moves_anchor());
/// assert_eq!(Direction::Up.opposite(), Direction::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The left edge.
    Left,
    /// The right edge.
    Right,
    /// The top edge.
    Up,
    /// The bottom edge.
    Down,
}

impl Direction {
    /// Returns all four directions.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Left, Self::Right, Self::Up, Self::Down]
    }

    /// Returns `true` when growing or shrinking along this edge relocates
    /// the anchor (the top-left cell).
    #[must_use]
    pub const fn moves_anchor(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }

    /// Returns `true` for the horizontal edges.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns the opposite edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns a short label for status messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_index_roundtrip() {
        let cols = 5;
        for index in 0..20 {
            let pos = CellPosition::from_index(index, cols);
            assert_eq!(pos.to_index(cols), index);
        }
    }

    #[test]
    fn position_from_index_splits_row_and_col() {
        assert_eq!(CellPosition::from_index(0, 4), CellPosition::new(0, 0));
        assert_eq!(CellPosition::from_index(3, 4), CellPosition::new(0, 3));
        assert_eq!(CellPosition::from_index(4, 4), CellPosition::new(1, 0));
    }

    #[test]
    fn span_validity() {
        assert!(Span::UNIT.is_valid());
        assert!(!Span::new(0, 1).is_valid());
        assert!(!Span::new(2, 0).is_valid());
    }

    #[test]
    fn span_json_uses_document_field_names() {
        let json = serde_json::to_string(&Span::new(2, 3)).expect("serialize");
        assert_eq!(json, r#"{"colSpan":2,"rowSpan":3}"#);
    }

    #[test]
    fn direction_anchor_movement() {
        assert!(Direction::Left.moves_anchor());
        assert!(Direction::Up.moves_anchor());
        assert!(!Direction::Right.moves_anchor());
        assert!(!Direction::Down.moves_anchor());
    }

    #[test]
    fn direction_opposites() {
        for direction in Direction::all() {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.opposite().is_horizontal(), direction.is_horizontal());
        }
    }
}
