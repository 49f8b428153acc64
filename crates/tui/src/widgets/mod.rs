//! Widget components for the gmscreen TUI.
//!
//! This module provides reusable rendering functions for the screen,
//! organized into focused submodules for each visual component.
//!
//! # Overview
//!
//! The widget system follows a functional rendering approach where each widget
//! is a pure function that renders state to a buffer. This enables easy testing
//! and composition.
//!
//! # Modules
//!
//! - [`grid`]: Renders every cell and placed widget of the screen
//! - [`cell`]: Renders empty slots and widget frames
//! - [`bodies`]: Built-in bodies for each widget kind
//! - [`selector`]: Renders the widget selector popup
//! - [`dice_overlay`]: Renders the dice result banner
//! - [`status_bar`]: Renders the footer with the last message and hints
//! - [`help`]: Renders the keybinding overlay
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use gmscreen_grid::GridState;
//! use gmscreen_protocol::WidgetKind;
//! use gmscreen_tui::registry::WidgetRegistry;
//! use gmscreen_tui::widgets::{GridView, render_grid};
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//!
//! let mut grid = GridState::new(2, 4).unwrap();
//! grid.place(0, WidgetKind::Timer).unwrap();
//!
//! let registry = WidgetRegistry::with_builtin();
//! let (states, clocks) = (HashMap::new(), HashMap::new());
//! let view = GridView {
//!     grid: &grid,
//!     registry: &registry,
//!     states: &states,
//!     clocks: &clocks,
//!     last_roll: None,
//!     cursor: 0,
//!     carrying: None,
//!     hide_titles: false,
//! };
//!
//! let area = Rect::new(0, 0, 80, 20);
//! let mut buf = Buffer::empty(area);
//! render_grid(&view, area, &mut buf);
//! ```

pub mod bodies;
pub mod cell;
pub mod dice_overlay;
pub mod grid;
pub mod help;
pub mod selector;
pub mod status_bar;

// Re-export primary rendering functions for convenience
pub use cell::{FrameHighlight, render_empty_cell, render_widget_frame};
pub use dice_overlay::render_dice_overlay;
pub use grid::{GridView, render_grid};
pub use help::render_help_overlay;
pub use selector::render_selector;
pub use status_bar::{StatusLevel, StatusMessage, render_status_bar};
