//! Widget kinds and placed widget instances.
//!
//! A [`WidgetKind`] identifies what a widget is (dice roller, notes, ...),
//! while a [`WidgetInstance`] is one placed copy of it on the grid. Screen
//! documents refer to kinds by their string tag, so instances keep the raw
//! tag and only resolve it to a kind on demand: a tag written by a newer
//! version stays on the grid even if this build cannot render it.

use serde::{Deserialize, Serialize};

/// Unique identifier for a placed widget instance.
///
/// Uses UUID v4 for globally unique identification.
pub type InstanceId = uuid::Uuid;

/// The known widget kinds.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::WidgetKind;
///
/// assert_eq!(WidgetKind::DiceRoller.tag(), "dice-roller");
/// assert_eq!(WidgetKind::from_tag("magic-items"), Some(WidgetKind::MagicItems));
/// assert_eq!(WidgetKind::from_tag("name-generator"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Turn order tracker for combat.
    InitiativeTracker,
    /// Dice roller publishing results to the overlay.
    DiceRoller,
    /// Countdown timer.
    Timer,
    /// Elapsed-time clock.
    Clock,
    /// Free-form notes.
    Notes,
    /// Checklist of items.
    Checklist,
    /// Monster reference lookup.
    Monsters,
    /// Spell reference lookup.
    Spells,
    /// Equipment reference lookup.
    Equipment,
    /// Magic item reference lookup.
    MagicItems,
    /// Condition reference lookup.
    Conditions,
    /// Embedded web page.
    WebpageEmbed,
}

impl WidgetKind {
    /// Returns every known widget kind in selector order.
    #[must_use]
    pub const fn all() -> [Self; 12] {
        [
            Self::InitiativeTracker,
            Self::DiceRoller,
            Self::Timer,
            Self::Clock,
            Self::Notes,
            Self::Checklist,
            Self::Monsters,
            Self::Spells,
            Self::Equipment,
            Self::MagicItems,
            Self::Conditions,
            Self::WebpageEmbed,
        ]
    }

    /// Returns the string tag used in screen documents.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::InitiativeTracker => "initiative-tracker",
            Self::DiceRoller => "dice-roller",
            Self::Timer => "timer",
            Self::Clock => "clock",
            Self::Notes => "notes",
            Self::Checklist => "checklist",
            Self::Monsters => "monsters",
            Self::Spells => "spells",
            Self::Equipment => "equipment",
            Self::MagicItems => "magic-items",
            Self::Conditions => "conditions",
            Self::WebpageEmbed => "webpage-embed",
        }
    }

    /// Looks up a kind by its document tag.
    ///
    /// Returns `None` for tags this build does not know about.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::InitiativeTracker => "Initiative Tracker",
            Self::DiceRoller => "Dice Roller",
            Self::Timer => "Countdown Timer",
            Self::Clock => "Elapsed Time",
            Self::Notes => "Notes",
            Self::Checklist => "Checklist",
            Self::Monsters => "Monsters",
            Self::Spells => "Spells",
            Self::Equipment => "Equipment",
            Self::MagicItems => "Magic Items",
            Self::Conditions => "Conditions",
            Self::WebpageEmbed => "Web Page",
        }
    }

    /// Returns a single-glyph icon for compact rendering.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::InitiativeTracker => "🎯",
            Self::DiceRoller => "🎲",
            Self::Timer => "⏱",
            Self::Clock => "🕐",
            Self::Notes => "📝",
            Self::Checklist => "✓",
            Self::Monsters => "🐉",
            Self::Spells => "✨",
            Self::Equipment => "⚔",
            Self::MagicItems => "💎",
            Self::Conditions => "💀",
            Self::WebpageEmbed => "🌐",
        }
    }

    /// Returns the selector group this kind belongs to.
    #[must_use]
    pub const fn category(self) -> WidgetCategory {
        match self {
            Self::InitiativeTracker | Self::DiceRoller => WidgetCategory::Combat,
            Self::Timer | Self::Clock => WidgetCategory::TimeTracking,
            Self::Notes | Self::Checklist => WidgetCategory::Planning,
            Self::Monsters
            | Self::Spells
            | Self::Equipment
            | Self::MagicItems
            | Self::Conditions => WidgetCategory::RulesReference,
            Self::WebpageEmbed => WidgetCategory::Other,
        }
    }
}

/// Groups shown in the widget selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetCategory {
    /// Combat & Initiative.
    Combat,
    /// Time Tracking.
    TimeTracking,
    /// Notes & Planning.
    Planning,
    /// Rules reference lookups.
    RulesReference,
    /// Everything else.
    Other,
}

impl WidgetCategory {
    /// Returns all categories in selector order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Combat,
            Self::TimeTracking,
            Self::Planning,
            Self::RulesReference,
            Self::Other,
        ]
    }

    /// Returns the group heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Combat => "Combat & Initiative",
            Self::TimeTracking => "Time Tracking",
            Self::Planning => "Notes & Planning",
            Self::RulesReference => "Rules Reference",
            Self::Other => "Other Tools",
        }
    }

    /// Returns the kinds in this group, in selector order.
    #[must_use]
    pub fn kinds(self) -> Vec<WidgetKind> {
        WidgetKind::all()
            .into_iter()
            .filter(|kind| kind.category() == self)
            .collect()
    }
}

/// One placed widget on the grid.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::{WidgetInstance, WidgetKind};
///
/// let instance = WidgetInstance::new(WidgetKind::Notes);
/// assert_eq!(instance.component_type, "notes");
/// assert_eq!(instance.kind(), Some(WidgetKind::Notes));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Unique identifier, also the key of the instance's persisted state.
    pub id: InstanceId,
    /// The widget type tag as written in screen documents.
    pub component_type: String,
    /// A caller-provided display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
}

impl WidgetInstance {
    /// Creates a new instance of a known kind with a fresh identifier.
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self::from_tag(kind.tag())
    }

    /// Creates a new instance from a raw type tag with a fresh identifier.
    ///
    /// The tag is kept even when it does not name a known kind.
    #[must_use]
    pub fn from_tag(tag: impl Into<String>) -> Self {
        Self {
            id: InstanceId::new_v4(),
            component_type: tag.into(),
            default_name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    /// Resolves the type tag to a known kind.
    #[must_use]
    pub fn kind(&self) -> Option<WidgetKind> {
        WidgetKind::from_tag(&self.component_type)
    }

    /// Returns the name to show in the cell title.
    #[must_use]
    pub fn title(&self) -> &str {
        match (&self.default_name, self.kind()) {
            (Some(name), _) => name,
            (None, Some(kind)) => kind.display_name(),
            (None, None) => &self.component_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_resolves_from_its_tag() {
        for kind in WidgetKind::all() {
            assert_eq!(WidgetKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn serde_tag_matches_document_tag() {
        for kind in WidgetKind::all() {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.tag()));
        }
    }

    #[test]
    fn every_kind_belongs_to_exactly_one_category() {
        let total: usize = WidgetCategory::all()
            .into_iter()
            .map(|category| category.kinds().len())
            .sum();
        assert_eq!(total, WidgetKind::all().len());
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let instance = WidgetInstance::from_tag("coin-converter");
        assert_eq!(instance.kind(), None);
        assert_eq!(instance.component_type, "coin-converter");
        assert_eq!(instance.title(), "coin-converter");
    }

    #[test]
    fn default_name_overrides_title() {
        let instance =
            WidgetInstance::new(WidgetKind::InitiativeTracker).with_default_name("Initiative 2");
        assert_eq!(instance.title(), "Initiative 2");
    }

    #[test]
    fn new_instances_get_distinct_ids() {
        let a = WidgetInstance::new(WidgetKind::Timer);
        let b = WidgetInstance::new(WidgetKind::Timer);
        assert_ne!(a.id, b.id);
    }
}
