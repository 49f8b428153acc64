//! On-disk storage for saved screens and widget state.
//!
//! The store keeps everything under one data directory:
//!
//! ```text
//! <data_dir>/
//!   screens/
//!     index.json            list of saved screens
//!     <screen-id>.json      one screen document per saved screen
//!   state/
//!     <instance-id>.json    private state of one widget instance
//! ```
//!
//! Widget state is keyed by instance id so that each widget can persist
//! itself independently of the screen it sits on.

use std::path::{Path, PathBuf};

use chrono::Utc;
use gmscreen_protocol::{InstanceId, ScreenDocument, ScreenSummary};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{ConfigError, Result};
use crate::persistence::{read_json_file, remove_file_if_exists, write_config_file};

const SCREENS_DIR: &str = "screens";
const STATE_DIR: &str = "state";
const INDEX_FILE: &str = "index.json";

/// Number of random characters in a generated screen id.
const SCREEN_ID_SUFFIX_LEN: usize = 9;

/// File-backed store for screens and widget instance state.
///
/// # Examples
///
/// ```no_run
/// use gmscreen_config::ScreenStore;
///
/// # fn example() -> gmscreen_config::Result<()> {
/// let store = ScreenStore::open("/tmp/gmscreen")?;
/// for screen in store.list_screens()? {
///     println!("{} ({})", screen.name, screen.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScreenStore {
    root: PathBuf,
}

impl ScreenStore {
    /// Opens a store rooted at `root`, creating its directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { root: root.into() };
        for dir in [store.screens_dir(), store.state_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| ConfigError::WriteFile {
                path: dir.clone(),
                source: e,
            })?;
        }
        debug!(root = %store.root.display(), "opened screen store");
        Ok(store)
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn screens_dir(&self) -> PathBuf {
        self.root.join(SCREENS_DIR)
    }

    fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    fn index_path(&self) -> PathBuf {
        self.screens_dir().join(INDEX_FILE)
    }

    fn screen_path(&self, id: &str) -> PathBuf {
        self.screens_dir().join(format!("{}.json", sanitize_file_stem(id)))
    }

    fn state_path(&self, id: InstanceId) -> PathBuf {
        self.state_dir().join(format!("{id}.json"))
    }

    // --- Widget instance state ---

    /// Loads the persisted state of a widget instance.
    ///
    /// Returns `Ok(None)` if the instance has never saved any state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists but cannot be read.
    pub fn load_instance_state(&self, id: InstanceId) -> Result<Option<Value>> {
        read_json_file(self.state_path(id))
    }

    /// Persists the state of a widget instance, replacing any previous state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn save_instance_state(&self, id: InstanceId, state: &Value) -> Result<()> {
        write_config_file(self.state_path(id), state)
    }

    /// Deletes the persisted state of a widget instance.
    ///
    /// Deleting state that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists but cannot be removed.
    pub fn delete_instance_state(&self, id: InstanceId) -> Result<()> {
        remove_file_if_exists(self.state_path(id))
    }

    // --- Saved screens ---

    /// Lists saved screens, most recently modified first.
    ///
    /// # Errors
    ///
    /// Returns an error if the index exists but cannot be read.
    pub fn list_screens(&self) -> Result<Vec<ScreenSummary>> {
        let mut screens = self.read_index()?;
        screens.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(screens)
    }

    /// Saves a screen under `id`, returning its index entry.
    ///
    /// Saving over an existing id keeps that screen's original `created`
    /// time. `modified` is always set to now.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateScreenName`] if another screen already
    /// uses the same name (compared case-insensitively), or an I/O error.
    #[instrument(skip(self, document), fields(name = %document.name))]
    pub fn save_screen(&self, id: &str, document: &ScreenDocument) -> Result<ScreenSummary> {
        let mut index = self.read_index()?;
        let name = document.name.trim();
        if index
            .iter()
            .any(|s| s.id != id && s.name.trim().eq_ignore_ascii_case(name))
        {
            warn!("rejected duplicate screen name");
            return Err(ConfigError::DuplicateScreenName {
                name: name.to_string(),
            });
        }

        let mut stored = document.clone();
        if let Some(existing) = index.iter().find(|s| s.id == id) {
            stored.created = existing.created;
        }
        stored.touch();
        write_config_file(self.screen_path(id), &stored)?;

        let summary = ScreenSummary::of(id, &stored);
        match index.iter_mut().find(|s| s.id == id) {
            Some(entry) => *entry = summary.clone(),
            None => index.push(summary.clone()),
        }
        write_config_file(self.index_path(), &index)?;
        info!(id, "saved screen");
        Ok(summary)
    }

    /// Loads a saved screen.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScreenNotFound`] if no screen has this id,
    /// [`ConfigError::InvalidScreenFile`] if the stored document fails
    /// validation, or an error if the document cannot be read.
    pub fn load_screen(&self, id: &str) -> Result<ScreenDocument> {
        let document: ScreenDocument =
            read_json_file(self.screen_path(id))?.ok_or_else(|| ConfigError::ScreenNotFound {
                id: id.to_string(),
            })?;
        document.validate()?;
        Ok(document)
    }

    /// Deletes a saved screen and its index entry.
    ///
    /// Returns `false` if no screen had this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be updated.
    #[instrument(skip(self))]
    pub fn delete_screen(&self, id: &str) -> Result<bool> {
        let mut index = self.read_index()?;
        let before = index.len();
        index.retain(|s| s.id != id);
        remove_file_if_exists(self.screen_path(id))?;
        if index.len() == before {
            return Ok(false);
        }
        write_config_file(self.index_path(), &index)?;
        info!("deleted screen");
        Ok(true)
    }

    fn read_index(&self) -> Result<Vec<ScreenSummary>> {
        Ok(read_json_file(self.index_path())?.unwrap_or_default())
    }
}

/// Generates a new screen id of the form `screen_<millis>_<suffix>`.
///
/// # Examples
///
/// ```
/// use gmscreen_config::store::generate_screen_id;
///
/// let id = generate_screen_id();
/// assert!(id.starts_with("screen_"));
/// assert_ne!(id, generate_screen_id());
/// ```
#[must_use]
pub fn generate_screen_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "screen_{}_{}",
        Utc::now().timestamp_millis(),
        &suffix[..SCREEN_ID_SUFFIX_LEN]
    )
}

// --- Export and import ---

/// Writes a screen document to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_screen(document: &ScreenDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_config_file(path, document)?;
    info!(path = %path.display(), "exported screen");
    Ok(())
}

/// Reads a screen document exported by [`export_screen`].
///
/// The file must carry `version`, `settings` and `components`. The returned
/// document's `modified` time is set to now.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidScreenFile`] if a required field is
/// missing or the document is malformed, or an error if the file cannot be
/// read.
pub fn import_screen(path: impl AsRef<Path>) -> Result<ScreenDocument> {
    let path = path.as_ref();
    let raw: Value = read_json_file(path)?.ok_or_else(|| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;

    for field in ["version", "settings", "components"] {
        if raw.get(field).is_none_or(Value::is_null) {
            return Err(ConfigError::InvalidScreenFile {
                reason: format!("missing {field}"),
            });
        }
    }

    let mut document: ScreenDocument =
        serde_json::from_value(raw).map_err(|e| ConfigError::InvalidScreenFile {
            reason: e.to_string(),
        })?;
    document.validate()?;
    document.touch();
    info!(name = %document.name, "imported screen");
    Ok(document)
}

/// Suggests a file name for exporting a screen called `name`.
///
/// Every character other than an ASCII letter or digit becomes `_`, and a
/// millisecond timestamp keeps repeated exports apart.
///
/// # Examples
///
/// ```
/// use gmscreen_config::store::suggested_export_filename;
///
/// let file = suggested_export_filename("Dragon's Lair");
/// assert!(file.starts_with("Dragon_s_Lair_"));
/// assert!(file.ends_with(".json"));
/// ```
#[must_use]
pub fn suggested_export_filename(name: &str) -> String {
    format!(
        "{}_{}.json",
        sanitize_file_stem(name),
        Utc::now().timestamp_millis()
    )
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
