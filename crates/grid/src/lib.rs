//! Grid layout engine for the gmscreen application.
//!
//! The engine decides where widgets may sit on a screen of `rows` x `cols`
//! cells. Each widget is anchored at its top-left cell and covers a
//! rectangular span from there. Cells are addressed by a linear index
//! `row * cols + col`.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`state`]: The layout state and every read-only check
//! - [`ops`]: Mutating operations on the layout state
//! - [`controller`]: Snapshot-swapping controller used by the UI
//! - [`region`]: Rectangle geometry behind all overlap and bounds checks
//! - [`document`]: Conversion to and from saved screen documents
//! - [`error`]: Error types for rejected layout changes
//!
//! # Invariants
//!
//! Every accepted operation preserves these:
//!
//! 1. Widget regions never overlap.
//! 2. Every widget lies entirely within the grid.
//! 3. Every span is at least 1x1.
//! 4. A span is only recorded for a cell that holds a widget.
//!
//! A rejected operation leaves the layout unchanged.
//!
//! # Examples
//!
//! ```
//! use gmscreen_grid::GridController;
//! use gmscreen_protocol::{Direction, WidgetKind};
//!
//! let mut grid = GridController::new(2, 4).unwrap();
//! grid.place(0, WidgetKind::InitiativeTracker).unwrap();
//! grid.expand(0, Direction::Right, 1).unwrap();
//!
//! // Cell 1 is now covered by the tracker
//! assert!(grid.state().is_covered(1));
//! assert!(grid.place(1, WidgetKind::Notes).is_err());
//!
//! // Moving the tracker frees cell 0 and 1
//! assert!(grid.move_widget(0, 6));
//! assert!(grid.state().is_free(1));
//! ```

pub mod controller;
pub mod document;
pub mod error;
pub mod ops;
pub mod region;
pub mod state;

// Re-export primary types at crate root for convenience
pub use controller::GridController;
pub use document::RestoredWidget;
pub use error::{LayoutError, RejectReason, Result};
pub use region::Region;
pub use state::GridState;
