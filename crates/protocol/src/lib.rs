//! Shared protocol types for the gmscreen application.
//!
//! This crate defines the types used across all gmscreen components: cell
//! addressing, widget kinds and instances, the saved screen document, dice
//! results, UI messages, and error types.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`cell`]: Cell indices, positions, spans, and edge directions
//! - [`widget`]: Widget kinds, selector categories, and placed instances
//! - [`document`]: The saved screen document format
//! - [`dice`]: Dice results broadcast to the overlay
//! - [`message`]: TUI event messages
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! ```
//! use gmscreen_protocol::{CellPosition, Span, WidgetInstance, WidgetKind};
//!
//! // A dice roller anchored at row 1, column 2 of a 4-column grid
//! let anchor = CellPosition::new(1, 2).to_index(4);
//! let instance = WidgetInstance::new(WidgetKind::DiceRoller);
//! let span = Span::new(2, 1);
//!
//! assert_eq!(anchor, 6);
//! assert_eq!(instance.kind(), Some(WidgetKind::DiceRoller));
//! assert_eq!(span.area(), 2);
//! ```

pub mod cell;
pub mod dice;
pub mod document;
pub mod error;
pub mod message;
pub mod widget;

// Re-export primary types at crate root for convenience
pub use cell::{CellIndex, CellPosition, Direction, Span};
pub use dice::DiceResult;
pub use document::{
    ComponentEntry, DEFAULT_OVERLAY_DURATION, DOCUMENT_VERSION, MAX_GRID_DIMENSION, ScreenDocument,
    ScreenSettings, ScreenSummary, Theme,
};
pub use error::{ProtocolError, Result};
pub use message::Message;
pub use widget::{InstanceId, WidgetCategory, WidgetInstance, WidgetKind};
