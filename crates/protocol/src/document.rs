//! The saved screen document format.
//!
//! A screen document captures the grid dimensions, display settings, and
//! every placed component with its span and private state. The JSON layout
//! uses camelCase field names so documents exported by older builds load
//! unchanged:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "name": "Dragon's Lair",
//!   "created": "2025-01-15T10:30:00Z",
//!   "modified": "2025-01-15T10:30:00Z",
//!   "settings": { "rows": 2, "columns": 5, "theme": "dark",
//!                 "diceOverlay": true, "diceOverlayDuration": 8, "hideTitles": false },
//!   "components": [
//!     { "cellId": 0, "componentType": "dice-roller", "colSpan": 2, "rowSpan": 1, "state": {} }
//!   ]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cell::{CellIndex, Span};
use crate::error::{ProtocolError, Result};

/// Version written into new documents.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Largest accepted value for either grid dimension.
pub const MAX_GRID_DIMENSION: usize = 12;

/// Default dice overlay duration in seconds.
pub const DEFAULT_OVERLAY_DURATION: u32 = 8;

/// Color theme of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background.
    #[default]
    Dark,
    /// Light background.
    Light,
}

impl Theme {
    /// Returns the other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Display settings stored alongside a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSettings {
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub columns: usize,
    /// Color theme.
    #[serde(default)]
    pub theme: Theme,
    /// Whether dice results are shown in the overlay.
    #[serde(default = "default_true")]
    pub dice_overlay: bool,
    /// How long the overlay stays visible, in seconds.
    #[serde(default = "default_overlay_duration")]
    pub dice_overlay_duration: u32,
    /// Whether widget titles are hidden.
    #[serde(default)]
    pub hide_titles: bool,
}

fn default_true() -> bool {
    true
}

fn default_overlay_duration() -> u32 {
    DEFAULT_OVERLAY_DURATION
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 5,
            theme: Theme::default(),
            dice_overlay: true,
            dice_overlay_duration: DEFAULT_OVERLAY_DURATION,
            hide_titles: false,
        }
    }
}

/// One placed component in a screen document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    /// Anchor cell of the component.
    pub cell_id: CellIndex,
    /// Widget type tag.
    pub component_type: String,
    /// Columns covered.
    #[serde(default = "default_span")]
    pub col_span: usize,
    /// Rows covered.
    #[serde(default = "default_span")]
    pub row_span: usize,
    /// The component's private state, an empty object when it has none.
    #[serde(default = "empty_state")]
    pub state: serde_json::Value,
}

fn default_span() -> usize {
    1
}

fn empty_state() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl ComponentEntry {
    /// Creates an entry with an empty state.
    #[must_use]
    pub fn new(cell_id: CellIndex, component_type: impl Into<String>, span: Span) -> Self {
        Self {
            cell_id,
            component_type: component_type.into(),
            col_span: span.col_span,
            row_span: span.row_span,
            state: empty_state(),
        }
    }

    /// Returns the entry's span.
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.col_span, self.row_span)
    }
}

/// A complete saved screen.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::{ComponentEntry, ScreenDocument, ScreenSettings, Span};
///
/// let doc = ScreenDocument::new(
///     "Session 12",
///     ScreenSettings::default(),
///     vec![ComponentEntry::new(0, "notes", Span::UNIT)],
/// );
/// assert_eq!(doc.version, "1.0");
/// assert!(doc.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDocument {
    /// Format version.
    pub version: String,
    /// User-facing name.
    pub name: String,
    /// When the screen was first saved.
    pub created: DateTime<Utc>,
    /// When the screen was last saved or imported.
    pub modified: DateTime<Utc>,
    /// Grid and display settings.
    pub settings: ScreenSettings,
    /// Placed components, in any order.
    pub components: Vec<ComponentEntry>,
}

impl ScreenDocument {
    /// Creates a document stamped with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        settings: ScreenSettings,
        components: Vec<ComponentEntry>,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: DOCUMENT_VERSION.to_string(),
            name: name.into(),
            created: now,
            modified: now,
            settings,
            components,
        }
    }

    /// Refreshes the `modified` timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Checks the structural requirements of a document.
    ///
    /// This does not check component overlap; that is the grid engine's job
    /// when the components are placed.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidDocument`] if the version is empty,
    /// a grid dimension is outside `1..=MAX_GRID_DIMENSION`, or a component
    /// has a zero span or a span larger than the grid.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ProtocolError::InvalidDocument(
                "missing version".to_string(),
            ));
        }
        let (rows, columns) = (self.settings.rows, self.settings.columns);
        if !(1..=MAX_GRID_DIMENSION).contains(&rows) || !(1..=MAX_GRID_DIMENSION).contains(&columns)
        {
            return Err(ProtocolError::InvalidDocument(format!(
                "grid must be between 1x1 and {MAX_GRID_DIMENSION}x{MAX_GRID_DIMENSION}, got {rows}x{columns}"
            )));
        }
        for entry in &self.components {
            if !entry.span().is_valid() {
                return Err(ProtocolError::InvalidDocument(format!(
                    "component at cell {} has an empty span",
                    entry.cell_id
                )));
            }
            if entry.col_span > columns || entry.row_span > rows {
                return Err(ProtocolError::InvalidDocument(format!(
                    "component at cell {} spans {}x{} on a {rows}x{columns} grid",
                    entry.cell_id, entry.col_span, entry.row_span
                )));
            }
        }
        Ok(())
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ProtocolError::SerializationFailed)
    }

    /// Parses a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a screen document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProtocolError::DeserializationFailed)
    }
}

/// An entry in the list of saved screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSummary {
    /// Storage identifier.
    pub id: String,
    /// User-facing name.
    pub name: String,
    /// When the screen was last saved.
    pub modified: DateTime<Utc>,
    /// When the screen was first saved.
    pub created: DateTime<Utc>,
}

impl ScreenSummary {
    /// Builds the summary for a stored document.
    #[must_use]
    pub fn of(id: impl Into<String>, document: &ScreenDocument) -> Self {
        Self {
            id: id.into(),
            name: document.name.clone(),
            modified: document.modified,
            created: document.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_DOCUMENT: &str = r#"{
        "version": "1.0",
        "name": "Goblin Ambush",
        "created": "2025-01-15T10:30:00.000Z",
        "modified": "2025-01-16T08:00:00.000Z",
        "settings": {
            "rows": 3,
            "columns": 4,
            "theme": "light",
            "diceOverlay": false,
            "diceOverlayDuration": 12,
            "hideTitles": true
        },
        "components": [
            { "cellId": 0, "componentType": "dice-roller", "colSpan": 2, "rowSpan": 1, "state": {} },
            { "cellId": 5, "componentType": "notes", "colSpan": 1, "rowSpan": 2,
              "state": { "text": "Ambush at the bridge" } }
        ]
    }"#;

    #[test]
    fn parses_document_in_screen_format() {
        let doc = ScreenDocument::from_json(LEGACY_DOCUMENT).expect("parse");
        assert_eq!(doc.name, "Goblin Ambush");
        assert_eq!(doc.settings.rows, 3);
        assert_eq!(doc.settings.columns, 4);
        assert_eq!(doc.settings.theme, Theme::Light);
        assert!(!doc.settings.dice_overlay);
        assert_eq!(doc.settings.dice_overlay_duration, 12);
        assert!(doc.settings.hide_titles);
        assert_eq!(doc.components.len(), 2);
        assert_eq!(doc.components[0].span(), Span::new(2, 1));
        assert_eq!(doc.components[1].state["text"], "Ambush at the bridge");
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = r#"{
            "version": "1.0", "name": "Bare",
            "created": "2025-01-15T10:30:00Z", "modified": "2025-01-15T10:30:00Z",
            "settings": { "rows": 2, "columns": 2 },
            "components": [ { "cellId": 1, "componentType": "timer" } ]
        }"#;
        let doc = ScreenDocument::from_json(json).expect("parse");
        assert!(doc.settings.dice_overlay);
        assert_eq!(doc.settings.dice_overlay_duration, DEFAULT_OVERLAY_DURATION);
        assert_eq!(doc.components[0].span(), Span::UNIT);
        assert!(doc.components[0].state.is_object());
    }

    #[test]
    fn serialized_field_names_are_camel_case() {
        let doc = ScreenDocument::new(
            "Test",
            ScreenSettings::default(),
            vec![ComponentEntry::new(3, "clock", Span::new(1, 2))],
        );
        let json = doc.to_json_pretty().expect("serialize");
        assert!(json.contains("\"cellId\": 3"));
        assert!(json.contains("\"componentType\": \"clock\""));
        assert!(json.contains("\"diceOverlayDuration\": 8"));
        assert!(json.contains("\"hideTitles\": false"));
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let mut doc = ScreenDocument::new("Test", ScreenSettings::default(), vec![]);
        doc.settings.columns = 0;
        assert!(matches!(
            doc.validate(),
            Err(ProtocolError::InvalidDocument(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_span() {
        let mut entry = ComponentEntry::new(0, "notes", Span::UNIT);
        entry.row_span = 0;
        let doc = ScreenDocument::new("Test", ScreenSettings::default(), vec![entry]);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_grid() {
        let mut doc = ScreenDocument::new("Test", ScreenSettings::default(), vec![]);
        doc.settings.rows = usize::MAX;
        assert!(doc.validate().is_err());

        doc.settings.rows = MAX_GRID_DIMENSION + 1;
        assert!(doc.validate().is_err());

        doc.settings.rows = MAX_GRID_DIMENSION;
        doc.settings.columns = MAX_GRID_DIMENSION;
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn validate_rejects_span_larger_than_grid() {
        let settings = ScreenSettings {
            rows: 2,
            columns: 4,
            ..ScreenSettings::default()
        };

        let wide = ComponentEntry::new(1, "notes", Span::new(usize::MAX, 1));
        let doc = ScreenDocument::new("Test", settings.clone(), vec![wide]);
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("component at cell 1"));

        let tall = ComponentEntry::new(0, "notes", Span::new(1, 3));
        let doc = ScreenDocument::new("Test", settings.clone(), vec![tall]);
        assert!(doc.validate().is_err());

        let full = ComponentEntry::new(0, "notes", Span::new(4, 2));
        let doc = ScreenDocument::new("Test", settings, vec![full]);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn touch_advances_modified() {
        let mut doc = ScreenDocument::from_json(LEGACY_DOCUMENT).expect("parse");
        let before = doc.modified;
        doc.touch();
        assert!(doc.modified > before);
        assert_eq!(doc.created.to_rfc3339(), "2025-01-15T10:30:00+00:00");
    }
}
