//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the gmscreen application.

use std::path::PathBuf;

use gmscreen_protocol::{ScreenSettings, Theme};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::overlay::OverlayConfig;
use crate::persistence::{find_config_file, read_config_file, user_data_dir, write_config_file};

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "GMSCREEN_DATA_DIR";

/// Environment variable overriding the initial row count.
pub const ENV_ROWS: &str = "GMSCREEN_ROWS";

/// Environment variable overriding the initial column count.
pub const ENV_COLUMNS: &str = "GMSCREEN_COLUMNS";

pub use gmscreen_protocol::MAX_GRID_DIMENSION;

/// Initial grid dimensions for a new screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Number of columns.
    #[serde(default = "default_columns")]
    pub columns: usize,
}

fn default_rows() -> usize {
    2
}

fn default_columns() -> usize {
    5
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
        }
    }
}

impl GridConfig {
    /// Validates the grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or above
    /// [`MAX_GRID_DIMENSION`].
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("rows", self.rows), ("columns", self.columns)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(ConfigError::InvalidGridSize {
                    reason: format!("{label} must be between 1 and {MAX_GRID_DIMENSION}, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// The main configuration struct for the gmscreen application.
///
/// # Examples
///
/// ```
/// use gmscreen_config::{Config, OverlayConfig};
///
/// let config = Config::default();
/// assert_eq!(config.grid.rows, 2);
/// assert_eq!(config.grid.columns, 5);
///
/// let config = Config {
///     overlay: OverlayConfig::with_duration(15),
///     hide_titles: true,
///     ..Default::default()
/// };
/// assert_eq!(config.screen_settings().dice_overlay_duration, 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Grid size used for a new screen.
    #[serde(default)]
    pub grid: GridConfig,

    /// Dice overlay behavior.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Color theme.
    #[serde(default)]
    pub theme: Theme,

    /// Whether widget titles are hidden.
    #[serde(default)]
    pub hide_titles: bool,

    /// Where saved screens and widget state are stored.
    ///
    /// Defaults to the user data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations, then applies
    /// environment overrides.
    ///
    /// Searches for configuration files in the following order:
    ///
    /// 1. Local: `./gmscreen.json5` or `./gmscreen.json`
    /// 2. User: `~/.config/gmscreen/config.json5` or `~/.config/gmscreen/config.json`
    ///
    /// If no configuration file is found, the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read or parsed, an override is malformed, or validation fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gmscreen_config::Config;
    ///
    /// # async fn example() -> gmscreen_config::Result<()> {
    /// let config = Config::load().await?;
    /// println!("Starting with a {}x{} grid", config.grid.rows, config.grid.columns);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                read_config_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Applies `GMSCREEN_*` overrides read through `lookup`.
    ///
    /// `lookup` returns the value of an environment variable, if set. Empty
    /// values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a numeric override does not
    /// parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_config::Config;
    ///
    /// let mut config = Config::default();
    /// config
    ///     .apply_env_overrides(|name| (name == "GMSCREEN_ROWS").then(|| "4".to_string()))
    ///     .unwrap();
    /// assert_eq!(config.grid.rows, 4);
    /// ```
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = get(ENV_ROWS) {
            self.grid.rows = parse_dimension(ENV_ROWS, value)?;
        }
        if let Some(value) = get(ENV_COLUMNS) {
            self.grid.columns = parse_dimension(ENV_COLUMNS, value)?;
        }
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid size or overlay duration is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_config::{Config, OverlayConfig};
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.overlay = OverlayConfig::with_duration(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.overlay.validate()?;
        Ok(())
    }

    /// Returns the configured data directory, or the user data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => user_data_dir(),
        }
    }

    /// Returns the settings a new screen starts with.
    #[must_use]
    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            rows: self.grid.rows,
            columns: self.grid.columns,
            theme: self.theme,
            dice_overlay: self.overlay.enabled,
            dice_overlay_duration: self.overlay.duration_secs,
            hide_titles: self.hide_titles,
        }
    }
}

fn parse_dimension(name: &'static str, value: String) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvVar { name, value })
}
