//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the application state.

use serde::{Deserialize, Serialize};

use crate::cell::Direction;

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application to update the screen.
///
/// # Examples
///
/// ```
/// use gmscreen_protocol::{Direction, Message};
///
/// let msg = Message::Expand { direction: Direction::Right };
/// assert!(msg.is_layout_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Move the cell cursor left.
    NavigateLeft,
    /// Move the cell cursor right.
    NavigateRight,
    /// Move the cell cursor up.
    NavigateUp,
    /// Move the cell cursor down.
    NavigateDown,
    /// Activate the cell under the cursor (opens the selector on empty cells).
    Select,
    /// Close the topmost panel or cancel a pending move.
    Escape,
    /// Quit the application.
    Quit,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Toggle widget title visibility.
    ToggleTitles,
    /// Remove the widget under the cursor.
    Delete,
    /// Grow the widget under the cursor by one cell along an edge.
    Expand {
        /// The edge to grow from.
        direction: Direction,
    },
    /// Shrink the widget under the cursor by one cell along an edge.
    Shrink {
        /// The edge to shrink from.
        direction: Direction,
    },
    /// Pick up the widget under the cursor, or drop the carried widget.
    ToggleMove,
    /// Add a grid row.
    AddRow,
    /// Remove the last grid row.
    RemoveRow,
    /// Add a grid column.
    AddColumn,
    /// Remove the last grid column.
    RemoveColumn,
    /// Save the current screen.
    Save,
    /// Write the current screen to an export file.
    Export,
    /// Start or pause the timer or clock under the cursor.
    ToggleTimer,
    /// Reset the timer or clock under the cursor.
    ResetTimer,
    /// Add time to the countdown under the cursor and start it.
    AddTime {
        /// Seconds to add.
        seconds: u64,
    },
    /// Mouse click at coordinates (column, row).
    ClickAt {
        /// Column (x coordinate) of the click.
        column: u16,
        /// Row (y coordinate) of the click.
        row: u16,
    },

    // --- Selector messages ---
    /// Move the selector highlight.
    SelectorNavigate {
        /// Direction to navigate (positive = down, negative = up).
        delta: i32,
    },
    /// Place the highlighted widget kind.
    SelectorConfirm,
    /// Close the selector without placing anything.
    SelectorCancel,
}

impl Message {
    /// Returns `true` if this message moves the cell cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_protocol::Message;
    ///
    /// assert!(Message::NavigateLeft.is_navigation());
    /// assert!(!Message::Select.is_navigation());
    /// ```
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft | Self::NavigateRight | Self::NavigateUp | Self::NavigateDown
        )
    }

    /// Returns `true` if this message should terminate the application.
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Returns `true` if this message asks the grid engine for a change.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_protocol::Message;
    ///
    /// assert!(Message::AddRow.is_layout_change());
    /// assert!(Message::Delete.is_layout_change());
    /// assert!(!Message::ToggleHelp.is_layout_change());
    /// ```
    #[must_use]
    pub fn is_layout_change(&self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::Expand { .. }
                | Self::Shrink { .. }
                | Self::ToggleMove
                | Self::AddRow
                | Self::RemoveRow
                | Self::AddColumn
                | Self::RemoveColumn
                | Self::SelectorConfirm
        )
    }

    /// Returns `true` if this message controls a running timer or clock.
    #[must_use]
    pub fn is_timer_control(&self) -> bool {
        matches!(
            self,
            Self::ToggleTimer | Self::ResetTimer | Self::AddTime { .. }
        )
    }

    /// Returns `true` if this message belongs to the widget selector.
    #[must_use]
    pub fn is_selector(&self) -> bool {
        matches!(
            self,
            Self::SelectorNavigate { .. } | Self::SelectorConfirm | Self::SelectorCancel
        )
    }
}
