//! Centralized layout measurements for the TUI.
//!
//! This module defines shared constants for layout dimensions and the
//! arithmetic that maps grid cells to terminal rectangles and back. The
//! renderer and the mouse handler both go through these functions, so a
//! click always lands on the cell that was drawn under it.

use gmscreen_grid::Region;
use gmscreen_protocol::{CellIndex, CellPosition};
use ratatui::layout::{Position, Rect};

/// Height of the header bar in rows.
///
/// The header displays the screen name and help cue.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_BAR_HEIGHT: u16 = 3;

/// Minimum terminal height for useful rendering (content area).
///
/// Below this height, we display a "terminal too small" message.
pub const MIN_HEIGHT: u16 = 10;

/// Minimum terminal height for rendering with header.
///
/// When terminal height is between `MIN_HEIGHT` and `MIN_HEIGHT_WITH_HEADER`,
/// we hide the header to reclaim 3 rows of content space.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT;

/// Minimum terminal width for useful rendering.
pub const MIN_WIDTH: u16 = 40;

/// Offset of track `index` when `length` is split into `count` equal tracks.
fn track_start(start: u16, length: u16, count: usize, index: usize) -> u16 {
    if count == 0 {
        return start;
    }
    let offset = usize::from(length) * index / count;
    start.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
}

/// Returns the rectangle of the cell at `pos` in a `rows` x `cols` grid
/// drawn over `area`.
///
/// Cells split the area as evenly as possible; leftover columns and rows go
/// to the later cells.
#[must_use]
pub fn cell_rect(area: Rect, rows: usize, cols: usize, pos: CellPosition) -> Rect {
    region_rect(area, rows, cols, pos.row, pos.col, pos.row + 1, pos.col + 1)
}

/// Returns the rectangle covered by a widget's region.
#[must_use]
pub fn widget_rect(area: Rect, rows: usize, cols: usize, region: Region) -> Rect {
    region_rect(
        area,
        rows,
        cols,
        region.origin.row,
        region.origin.col,
        region.end_row(),
        region.end_col(),
    )
}

fn region_rect(
    area: Rect,
    rows: usize,
    cols: usize,
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
) -> Rect {
    let x = track_start(area.x, area.width, cols, left);
    let y = track_start(area.y, area.height, rows, top);
    let x_end = track_start(area.x, area.width, cols, right);
    let y_end = track_start(area.y, area.height, rows, bottom);
    Rect::new(x, y, x_end.saturating_sub(x), y_end.saturating_sub(y))
}

/// Returns the cell under terminal coordinates (`x`, `y`), if any.
///
/// # Examples
///
/// ```
/// use gmscreen_tui::layout::cell_at;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 0, 40, 20);
/// // 2 rows x 4 columns: each cell is 10 wide and 10 high
/// assert_eq!(cell_at(area, 2, 4, 15, 3), Some(1));
/// assert_eq!(cell_at(area, 2, 4, 39, 19), Some(7));
/// assert_eq!(cell_at(area, 2, 4, 40, 0), None);
/// ```
#[must_use]
pub fn cell_at(area: Rect, rows: usize, cols: usize, x: u16, y: u16) -> Option<CellIndex> {
    if rows == 0 || cols == 0 || !area.contains(Position::new(x, y)) {
        return None;
    }
    let col = (0..cols).rfind(|&c| track_start(area.x, area.width, cols, c) <= x)?;
    let row = (0..rows).rfind(|&r| track_start(area.y, area.height, rows, r) <= y)?;
    Some(CellPosition::new(row, col).to_index(cols))
}
