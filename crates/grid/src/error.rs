//! Error types for layout operations.
//!
//! Every rejected operation leaves the grid untouched; the error only says
//! which operation failed and why.

use gmscreen_protocol::CellIndex;

/// Why an operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// The region would leave the grid.
    #[error("region exceeds the grid bounds")]
    OutOfBounds,

    /// The region overlaps another widget.
    #[error("overlaps the widget anchored at cell {anchor}")]
    Occupied {
        /// Anchor of the widget in the way.
        anchor: CellIndex,
    },

    /// No widget is anchored at the given cell.
    #[error("no widget is anchored there")]
    NotAnAnchor,

    /// A span would drop below one cell.
    #[error("span cannot be smaller than 1x1")]
    MinimumSpan,

    /// A grid shrink would cut off a widget.
    #[error("would cut off the widget anchored at cell {anchor}")]
    WidgetCutOff {
        /// Anchor of the widget that would be cut off.
        anchor: CellIndex,
    },

    /// A grid dimension would become zero.
    #[error("grid needs at least one row and one column")]
    ZeroDimension,

    /// A grid dimension would exceed the supported maximum.
    #[error("grid is limited to {limit} rows and columns")]
    TooLarge {
        /// The largest accepted dimension.
        limit: usize,
    },
}

/// Errors returned by layout operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A widget cannot be placed at the target cell.
    #[error("cannot place widget at cell {anchor}: {reason}")]
    InvalidPlacement {
        /// The requested anchor.
        anchor: CellIndex,
        /// Why the placement was rejected.
        reason: RejectReason,
    },

    /// A widget cannot take the requested span or position.
    #[error("cannot resize widget at cell {anchor}: {reason}")]
    InvalidResize {
        /// The widget's anchor before the resize.
        anchor: CellIndex,
        /// Why the resize was rejected.
        reason: RejectReason,
    },

    /// The grid cannot change to the requested dimensions.
    #[error("cannot resize grid to {rows}x{cols}: {reason}")]
    InvalidGridResize {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
        /// Why the resize was rejected.
        reason: RejectReason,
    },
}

impl LayoutError {
    /// Returns the underlying rejection reason.
    #[must_use]
    pub const fn reason(&self) -> RejectReason {
        match self {
            Self::InvalidPlacement { reason, .. }
            | Self::InvalidResize { reason, .. }
            | Self::InvalidGridResize { reason, .. } => *reason,
        }
    }
}

/// A specialized Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = LayoutError::InvalidPlacement {
            anchor: 3,
            reason: RejectReason::Occupied { anchor: 2 },
        };
        assert_eq!(
            err.to_string(),
            "cannot place widget at cell 3: overlaps the widget anchored at cell 2"
        );

        let err = LayoutError::InvalidGridResize {
            rows: 1,
            cols: 4,
            reason: RejectReason::WidgetCutOff { anchor: 4 },
        };
        assert_eq!(
            err.to_string(),
            "cannot resize grid to 1x4: would cut off the widget anchored at cell 4"
        );
    }

    #[test]
    fn too_large_names_the_limit() {
        let err = LayoutError::InvalidGridResize {
            rows: 40,
            cols: 4,
            reason: RejectReason::TooLarge { limit: 12 },
        };
        assert_eq!(
            err.to_string(),
            "cannot resize grid to 40x4: grid is limited to 12 rows and columns"
        );
    }

    #[test]
    fn reason_accessor() {
        let err = LayoutError::InvalidResize {
            anchor: 0,
            reason: RejectReason::MinimumSpan,
        };
        assert_eq!(err.reason(), RejectReason::MinimumSpan);
    }
}
