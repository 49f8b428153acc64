//! File reading and writing for configuration and stored data.
//!
//! # File Formats
//!
//! Configuration files may be JSON5 (`.json5`, with comments and trailing
//! commas) or plain JSON. Data files written by the screen store are always
//! plain JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Local: `./gmscreen.json5` or `./gmscreen.json`
//! 2. User: `~/.config/gmscreen/config.json5` or `~/.config/gmscreen/config.json`
//!
//! Saved screens and widget state live under the user data directory
//! (`~/.local/share/gmscreen` on Linux) unless configured otherwise.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Configuration file names to search for, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["gmscreen.json5", "gmscreen.json"];

/// Application directory name under the user config and data directories.
const APP_DIR: &str = "gmscreen";

/// User config file names to search for, in priority order.
const USER_CONFIG_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the configuration file path.
///
/// Searches in the following order:
///
/// 1. Local directory: `./gmscreen.json5`, `./gmscreen.json`
/// 2. User config directory: `~/.config/gmscreen/config.json5`, `~/.config/gmscreen/config.json`
///
/// # Returns
///
/// Returns `Some(path)` if a config file is found, `None` otherwise.
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::persistence::find_config_file;
///
/// if let Some(path) = find_config_file() {
///     println!("Found config at: {}", path.display());
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    // Try local directory first
    for name in CONFIG_FILE_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }

    // Try user config directory
    if let Some(config_dir) = dirs::config_dir() {
        let app_config_dir = config_dir.join(APP_DIR);
        for name in USER_CONFIG_FILE_NAMES {
            let path = app_config_dir.join(name);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Returns the default user configuration directory.
///
/// This is typically `~/.config/gmscreen/` on Unix systems.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::persistence::user_config_dir;
///
/// let dir = user_config_dir().unwrap();
/// println!("User config dir: {}", dir.display());
/// ```
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the default user configuration file path.
///
/// This is typically `~/.config/gmscreen/config.json5`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::persistence::default_user_config_path;
///
/// let path = default_user_config_path().unwrap();
/// println!("Default config path: {}", path.display());
/// ```
pub fn default_user_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?.join("config.json5"))
}

/// Returns the default directory for saved screens and widget state.
///
/// This is typically `~/.local/share/gmscreen/` on Linux.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a configuration file.
///
/// Supports both JSON5 and JSON formats.
///
/// # Arguments
///
/// * `path` - The path to the configuration file
///
/// # Type Parameters
///
/// * `T` - The type to deserialize into (must implement `serde::Deserialize`)
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content cannot be parsed
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::persistence::read_config_file;
/// use gmscreen_config::Config;
///
/// # fn main() -> gmscreen_config::Result<()> {
/// let config: Config = read_config_file("gmscreen.json5")?;
/// # Ok(())
/// # }
/// ```
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    // JSON5 parser handles both JSON5 and JSON
    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file.
///
/// The configuration is written as pretty-printed JSON (not JSON5, as
/// serde_json5 doesn't support serialization to JSON5 format).
///
/// # Arguments
///
/// * `path` - The path to write to
/// * `config` - The configuration to write
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The file cannot be written
/// - The configuration cannot be serialized
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::persistence::write_config_file;
/// use gmscreen_config::Config;
///
/// # fn main() -> gmscreen_config::Result<()> {
/// let config = Config::default();
/// write_config_file("gmscreen.json", &config)?;
/// # Ok(())
/// # }
/// ```
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();

    // Create parent directories if needed
    if let Some(parent) = path.parent().filter(|p| !p.exists()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    // Serialize to pretty JSON
    let content = serde_json::to_string_pretty(config)?;

    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads a plain JSON data file.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(Some(serde_json::from_str(&content)?))
}

/// Removes a data file, treating a missing file as already removed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::RemoveFile {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
