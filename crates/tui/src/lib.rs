//! Terminal UI for the gmscreen application.
//!
//! This crate provides a Ratatui-based gamemaster screen: a grid of cells
//! holding tabletop widgets that can be added, grown, shrunk, moved and
//! removed from the keyboard or mouse.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct and run loop
//! - [`state`]: Cursor, selector and overlay state
//! - [`registry`]: Maps widget type tags to body renderers
//! - [`timers`]: Countdown timers and elapsed clocks
//! - [`notify`]: The dice result overlay channel
//! - [`layout`]: Terminal geometry of cells and widgets
//! - [`widgets`]: Rendering functions
//! - [`terminal`]: Terminal setup, teardown, and panic handling
//! - [`event`]: Event handling and key mappings
//!
//! # Example
//!
//! ```no_run
//! use gmscreen_protocol::ScreenSettings;
//! use gmscreen_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!
//!     let mut app = App::new(ScreenSettings::default())?;
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod layout;
pub mod notify;
pub mod registry;
pub mod state;
pub mod terminal;
pub mod timers;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::App;
pub use notify::DiceNotifier;
pub use registry::{RenderableWidget, WidgetContext, WidgetRegistry};
pub use state::{AppState, Focus, SelectorState};
