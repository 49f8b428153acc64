//! Configuration and storage for the gmscreen application.
//!
//! This crate handles loading and validating configuration, and persisting
//! saved screens and per-widget state to disk.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`overlay`]: Dice overlay settings with input clamping
//! - [`store`]: Saved screens, widget state, and export/import
//! - [`persistence`]: File reading and writing
//! - [`error`]: Error types for configuration and storage
//!
//! # Configuration Sources (Priority)
//!
//! Configuration is loaded from multiple sources with the following priority
//! (highest to lowest):
//!
//! 1. Environment variables (`GMSCREEN_DATA_DIR`, `GMSCREEN_ROWS`, `GMSCREEN_COLUMNS`)
//! 2. Local config (`./gmscreen.json5` or `./gmscreen.json`)
//! 3. User config (`~/.config/gmscreen/config.json5` or `~/.config/gmscreen/config.json`)
//! 4. Built-in defaults
//!
//! ```json5
//! {
//!   grid: { rows: 3, columns: 6 },
//!   // Show dice results for 10 seconds
//!   overlay: { enabled: true, duration_secs: 10 },
//!   theme: "dark",
//!   hide_titles: false,
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use gmscreen_config::{Config, ScreenStore};
//!
//! # async fn example() -> gmscreen_config::Result<()> {
//! let config = Config::load().await?;
//! let store = ScreenStore::open(config.resolve_data_dir()?)?;
//!
//! for screen in store.list_screens()? {
//!     println!("{}: last saved {}", screen.name, screen.modified);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod overlay;
pub mod persistence;
pub mod store;

// Re-export primary types at crate root for convenience
pub use config::{Config, GridConfig};
pub use error::{ConfigError, Result};
pub use overlay::OverlayConfig;
pub use store::ScreenStore;
