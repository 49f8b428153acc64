//! Widget registry mapping component tags to renderers.
//!
//! Every placed widget stores only its tag. At draw time the registry turns
//! that tag into a [`RenderableWidget`]. Tags without a renderer resolve to
//! `None`; the widget keeps its cells and is drawn as a placeholder.

use std::collections::HashMap;
use std::fmt;

use gmscreen_protocol::{DiceResult, WidgetInstance, WidgetKind};
use ratatui::{buffer::Buffer, layout::Rect};
use serde_json::Value;

use crate::timers::{ClockState, CountdownState};
use crate::widgets::bodies;

/// Live reading of a widget's timer, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockReading {
    /// A countdown timer.
    Countdown(CountdownState),
    /// An elapsed-time clock.
    Elapsed(ClockState),
}

/// Everything a widget body may draw from.
#[derive(Debug, Clone, Copy)]
pub struct WidgetContext<'a> {
    /// The placed instance.
    pub instance: &'a WidgetInstance,
    /// The instance's saved state, if it has any.
    pub state: Option<&'a Value>,
    /// Timer reading for timer and clock widgets.
    pub clock: Option<ClockReading>,
    /// The dice result currently on the overlay.
    pub last_roll: Option<&'a DiceResult>,
}

impl<'a> WidgetContext<'a> {
    /// Creates a context with no state, timer or dice result.
    #[must_use]
    pub fn new(instance: &'a WidgetInstance) -> Self {
        Self {
            instance,
            state: None,
            clock: None,
            last_roll: None,
        }
    }

    /// Looks up a top-level field of the saved state.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.state.and_then(|state| state.get(key))
    }
}

/// Draws the body of one kind of widget.
///
/// The frame, title and selection highlight are drawn by the grid; a body
/// only fills the inner area.
pub trait RenderableWidget: Send + Sync {
    /// Renders the widget body into `area`.
    fn render(&self, ctx: &WidgetContext<'_>, area: Rect, buf: &mut Buffer);
}

type Factory = Box<dyn Fn() -> Box<dyn RenderableWidget> + Send + Sync>;

/// Maps component tags to renderer factories.
///
/// # Examples
///
/// ```
/// use gmscreen_tui::registry::WidgetRegistry;
///
/// let registry = WidgetRegistry::with_builtin();
/// assert!(registry.resolve("dice-roller").is_some());
/// assert!(registry.resolve("hex-map").is_none());
/// ```
#[derive(Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, Factory>,
}

impl WidgetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with a renderer for every [`WidgetKind`].
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for kind in WidgetKind::all() {
            registry.register(kind.tag(), move || bodies::builtin(kind));
        }
        registry
    }

    /// Registers a factory for `tag`, replacing any previous one.
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn RenderableWidget> + Send + Sync + 'static,
    {
        self.factories.insert(tag.into(), Box::new(factory));
    }

    /// Creates a renderer for `tag`, or `None` if the tag is unknown.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> Option<Box<dyn RenderableWidget>> {
        self.factories.get(tag).map(|factory| factory())
    }

    /// Returns `true` if `tag` has a renderer.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("WidgetRegistry").field("tags", &tags).finish()
    }
}
