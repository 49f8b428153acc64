//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to application messages.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use gmscreen_protocol::{Direction, Message};

/// Default poll timeout for events.
///
/// Also bounds how stale a running timer can look on screen.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Seconds added to a countdown by the `+` key.
pub const ADD_TIME_STEP: u64 = 60;

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts an event (keyboard or mouse) to an application message.
///
/// Returns `Some(Message)` if the event maps to an action,
/// or `None` if the event is not handled.
#[must_use]
pub fn event_to_message(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) => key_to_message(*key),
        Event::Mouse(mouse) => mouse_to_message(mouse),
        _ => None,
    }
}

/// Converts a mouse event to an application message.
///
/// Only left-click press events are handled, producing a `ClickAt` message
/// with the click coordinates.
#[must_use]
fn mouse_to_message(mouse: &crossterm::event::MouseEvent) -> Option<Message> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Message::ClickAt {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

fn arrow_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        _ => None,
    }
}

/// Converts a terminal key event to an application message.
///
/// Returns `Some(Message)` if the key event maps to an action,
/// or `None` if the key is not bound.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` or `q` | Quit |
/// | `Esc` | Escape (close panel or cancel a move) |
/// | Arrows | Move the cursor |
/// | `Shift`+arrow | Grow the widget along that edge |
/// | `Alt`+arrow | Shrink the widget from that edge |
/// | `Enter` or `Space` | Select |
/// | `m` | Pick up or drop a widget |
/// | `d` or `Delete` | Delete the widget |
/// | `r` / `R` | Add / remove a row |
/// | `c` / `C` | Add / remove a column |
/// | `p` | Start or pause a timer |
/// | `+` | Add a minute to a timer |
/// | `x` | Reset a timer |
/// | `t` | Toggle titles |
/// | `s` or `Ctrl+S` | Save |
/// | `e` | Export to a file |
/// | `?` | Toggle help |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    // Check for Ctrl combinations first
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Message::Quit),
            KeyCode::Char('s') => Some(Message::Save),
            _ => None,
        };
    }

    if let Some(direction) = arrow_direction(key.code) {
        return Some(if key.modifiers.contains(KeyModifiers::SHIFT) {
            Message::Expand { direction }
        } else if key.modifiers.contains(KeyModifiers::ALT) {
            Message::Shrink { direction }
        } else {
            match direction {
                Direction::Left => Message::NavigateLeft,
                Direction::Right => Message::NavigateRight,
                Direction::Up => Message::NavigateUp,
                Direction::Down => Message::NavigateDown,
            }
        });
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),
        KeyCode::Char('q') => Some(Message::Quit),

        // Selection
        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::Select),

        // Layout
        KeyCode::Char('m') => Some(Message::ToggleMove),
        KeyCode::Char('d') | KeyCode::Delete => Some(Message::Delete),
        KeyCode::Char('r') => Some(Message::AddRow),
        KeyCode::Char('R') => Some(Message::RemoveRow),
        KeyCode::Char('c') => Some(Message::AddColumn),
        KeyCode::Char('C') => Some(Message::RemoveColumn),

        // Timers
        KeyCode::Char('p') => Some(Message::ToggleTimer),
        KeyCode::Char('+') => Some(Message::AddTime {
            seconds: ADD_TIME_STEP,
        }),
        KeyCode::Char('x') => Some(Message::ResetTimer),

        // Other actions
        KeyCode::Char('t') => Some(Message::ToggleTitles),
        KeyCode::Char('s') => Some(Message::Save),
        KeyCode::Char('e') => Some(Message::Export),
        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

/// Converts a key event to a selector-specific message.
///
/// This function is used while the widget selector is open.
///
/// # Key Bindings (Selector Mode)
///
/// | Key | Action |
/// |-----|--------|
/// | `Up` | Highlight previous kind |
/// | `Down` | Highlight next kind |
/// | `Enter` or `Space` | Place the highlighted kind |
/// | `Esc` | Close without placing |
#[must_use]
pub fn key_to_selector_message(key: KeyEvent) -> Option<Message> {
    // Check for Ctrl+C first (always works)
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Up => Some(Message::SelectorNavigate { delta: -1 }),
        KeyCode::Down => Some(Message::SelectorNavigate { delta: 1 }),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::SelectorConfirm),
        KeyCode::Esc => Some(Message::SelectorCancel),
        _ => None,
    }
}
