//! Conversion between a live grid and a saved [`ScreenDocument`].

use gmscreen_protocol::{ComponentEntry, ScreenDocument, ScreenSettings, WidgetInstance};
use serde_json::Value;
use tracing::{debug, info};

use crate::controller::GridController;
use crate::error::Result;
use crate::state::GridState;

/// State key that carries an instance's display name through a document.
const DEFAULT_NAME_KEY: &str = "defaultName";

/// A widget recreated from a document, paired with the state it was saved
/// with.
pub type RestoredWidget = (WidgetInstance, Value);

impl GridController {
    /// Rebuilds a grid from a saved document.
    ///
    /// Every component gets a fresh instance id. The returned list pairs each
    /// new instance with the state stored in the document, so the caller can
    /// seed its instance store. Components may appear in any order; if any of
    /// them is out of bounds or overlaps another, the whole load fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the document's grid has a zero dimension or a
    /// component cannot be placed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_grid::GridController;
    /// use gmscreen_protocol::{ComponentEntry, ScreenDocument, ScreenSettings, Span};
    ///
    /// let doc = ScreenDocument::new(
    ///     "Tavern",
    ///     ScreenSettings::default(),
    ///     vec![ComponentEntry::new(1, "notes", Span::new(2, 2))],
    /// );
    /// let (grid, restored) = GridController::from_document(&doc).unwrap();
    ///
    /// assert_eq!(grid.state().covered_cells(1), vec![1, 2, 6, 7]);
    /// assert_eq!(restored.len(), 1);
    /// ```
    pub fn from_document(document: &ScreenDocument) -> Result<(Self, Vec<RestoredWidget>)> {
        let settings = &document.settings;
        let mut state = GridState::new(settings.rows, settings.columns)?;
        let mut restored = Vec::with_capacity(document.components.len());

        for entry in &document.components {
            let mut instance = WidgetInstance::from_tag(entry.component_type.as_str());
            if instance.kind().is_none() {
                debug!(tag = %entry.component_type, "unknown component type kept as placeholder");
            }
            if let Some(name) = entry.state.get(DEFAULT_NAME_KEY).and_then(Value::as_str) {
                instance = instance.with_default_name(name);
            }
            state.place_instance(entry.cell_id, instance.clone(), entry.span())?;
            restored.push((instance, entry.state.clone()));
        }

        info!(
            name = %document.name,
            rows = settings.rows,
            columns = settings.columns,
            widgets = restored.len(),
            "loaded screen"
        );
        Ok((Self::from_state(state), restored))
    }

    /// Lists the placed widgets as document entries, anchors in ascending
    /// order.
    ///
    /// `state_of` supplies each instance's private state; `None` is stored
    /// as an empty object. An instance's default name is kept in its state
    /// under `defaultName` unless the state already sets one.
    pub fn components<F>(&self, mut state_of: F) -> Vec<ComponentEntry>
    where
        F: FnMut(&WidgetInstance) -> Option<Value>,
    {
        self.state()
            .widgets()
            .map(|(anchor, instance, span)| {
                let mut entry = ComponentEntry::new(anchor, instance.component_type.as_str(), span);
                if let Some(state) = state_of(instance) {
                    entry.state = state;
                }
                if let (Some(name), Some(map)) = (&instance.default_name, entry.state.as_object_mut()) {
                    map.entry(DEFAULT_NAME_KEY)
                        .or_insert_with(|| Value::String(name.clone()));
                }
                entry
            })
            .collect()
    }

    /// Builds a document from the current layout.
    ///
    /// The grid dimensions in `settings` are replaced by the live ones.
    pub fn capture_document<F>(
        &self,
        name: impl Into<String>,
        mut settings: ScreenSettings,
        state_of: F,
    ) -> ScreenDocument
    where
        F: FnMut(&WidgetInstance) -> Option<Value>,
    {
        settings.rows = self.state().rows();
        settings.columns = self.state().cols();
        ScreenDocument::new(name, settings, self.components(state_of))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gmscreen_protocol::{Direction, Span, WidgetKind};
    use serde_json::json;

    use super::*;
    use crate::error::{LayoutError, RejectReason};

    fn settings(rows: usize, columns: usize) -> ScreenSettings {
        ScreenSettings {
            rows,
            columns,
            ..ScreenSettings::default()
        }
    }

    #[test]
    fn load_places_components_in_any_order() {
        let doc = ScreenDocument::new(
            "Order",
            settings(2, 4),
            vec![
                ComponentEntry::new(6, "timer", Span::UNIT),
                ComponentEntry::new(0, "notes", Span::new(2, 2)),
            ],
        );
        let (grid, restored) = GridController::from_document(&doc).expect("load");
        assert_eq!(grid.state().widget_count(), 2);
        assert_eq!(grid.state().covered_cells(0), vec![0, 1, 4, 5]);
        assert_eq!(restored[0].0.kind(), Some(WidgetKind::Timer));
    }

    #[test]
    fn load_rejects_overlap_as_a_whole() {
        let doc = ScreenDocument::new(
            "Broken",
            settings(2, 4),
            vec![
                ComponentEntry::new(0, "notes", Span::new(2, 1)),
                ComponentEntry::new(1, "clock", Span::UNIT),
            ],
        );
        let err = GridController::from_document(&doc).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidPlacement {
                anchor: 1,
                reason: RejectReason::Occupied { anchor: 0 },
            }
        );
    }

    #[test]
    fn load_rejects_component_outside_grid() {
        let doc = ScreenDocument::new(
            "Small",
            settings(1, 2),
            vec![ComponentEntry::new(1, "notes", Span::new(2, 1))],
        );
        let err = GridController::from_document(&doc).unwrap_err();
        assert_eq!(err.reason(), RejectReason::OutOfBounds);
    }

    #[test]
    fn load_keeps_unknown_component_types() {
        let doc = ScreenDocument::new(
            "Future",
            settings(1, 3),
            vec![ComponentEntry::new(2, "hex-map", Span::UNIT)],
        );
        let (grid, _) = GridController::from_document(&doc).expect("load");
        let instance = grid.state().instance_at(2).expect("placed");
        assert_eq!(instance.component_type, "hex-map");
        assert_eq!(instance.kind(), None);
        assert!(!grid.state().can_place(2));
    }

    #[test]
    fn capture_then_load_preserves_layout_and_state() {
        let mut grid = GridController::new(2, 4).expect("grid");
        let notes = grid.place(0, WidgetKind::Notes).expect("place");
        grid.place(3, WidgetKind::Clock).expect("place");
        grid.expand(0, Direction::Down, 1).expect("expand");

        let mut store = HashMap::new();
        store.insert(notes.id, json!({ "text": "Bandits at dawn" }));

        let doc = grid.capture_document("Camp", settings(9, 9), |i| store.get(&i.id).cloned());
        assert_eq!(doc.settings.rows, 2);
        assert_eq!(doc.settings.columns, 4);
        assert_eq!(doc.components[1].state, json!({}));

        let (loaded, restored) = GridController::from_document(&doc).expect("load");
        assert_eq!(loaded.state().covered_cells(0), vec![0, 4]);
        assert!(loaded.state().is_anchor(3));
        assert_eq!(restored[0].1["text"], "Bandits at dawn");
        assert_ne!(restored[0].0.id, notes.id);
    }

    #[test]
    fn default_name_survives_capture() {
        let mut grid = GridController::new(1, 2).expect("grid");
        let tracker = WidgetInstance::new(WidgetKind::InitiativeTracker).with_default_name("Initiative 2");
        grid.place_instance(1, tracker, Span::UNIT).expect("place");

        let doc = grid.capture_document("Fight", ScreenSettings::default(), |_| None);
        assert_eq!(doc.components[0].state["defaultName"], "Initiative 2");

        let (loaded, _) = GridController::from_document(&doc).expect("load");
        let instance = loaded.state().instance_at(1).expect("placed");
        assert_eq!(instance.title(), "Initiative 2");
    }
}
