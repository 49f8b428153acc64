//! Entering and leaving the full-screen mode the gamemaster screen runs in.
//!
//! While the screen is up the terminal is in raw mode, shows the alternate
//! buffer and reports mouse events, which is how a click on a cell or a
//! drag of a widget reaches [`crate::App`]. All three modes are dropped
//! together when the app exits, and also from the panic hook.

use std::io::{self, Stdout, Write};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

/// The terminal the screen draws on.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// A terminal mode could not be switched.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Raw mode, the alternate screen or mouse capture could not be enabled.
    #[error("cannot open the screen: {0}")]
    Setup(#[source] io::Error),

    /// The terminal could not be handed back to the shell.
    #[error("cannot restore the shell terminal: {0}")]
    Restore(#[source] io::Error),
}

/// Leaves the alternate screen and stops mouse reporting on `out`.
///
/// Raw mode is process state rather than output, so callers switch it off
/// separately.
fn leave_screen_modes(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)
}

/// Switches stdout into the screen's modes and wraps it for ratatui.
///
/// # Errors
///
/// Returns [`TerminalError::Setup`] if a mode cannot be enabled.
///
/// # Examples
///
/// ```no_run
/// use gmscreen_tui::terminal;
///
/// let mut terminal = terminal::setup_terminal().expect("terminal");
/// terminal::restore_terminal(&mut terminal).expect("restore");
/// ```
pub fn setup_terminal() -> Result<AppTerminal, TerminalError> {
    enable_raw_mode().map_err(TerminalError::Setup)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(TerminalError::Setup)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(TerminalError::Setup)?;
    debug!("screen modes enabled");
    Ok(terminal)
}

/// Hands the terminal back to the shell with the cursor visible.
///
/// # Errors
///
/// Returns [`TerminalError::Restore`] if a mode cannot be disabled.
pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<(), TerminalError> {
    disable_raw_mode().map_err(TerminalError::Restore)?;
    leave_screen_modes(terminal.backend_mut()).map_err(TerminalError::Restore)?;
    terminal.show_cursor().map_err(TerminalError::Restore)?;
    debug!("screen modes disabled");
    Ok(())
}

/// Makes a panic leave the screen modes before the panic message prints.
///
/// The hook that was installed before this call still runs afterwards.
/// Install it once, ahead of [`setup_terminal`].
///
/// ```no_run
/// use gmscreen_tui::terminal;
///
/// fn main() -> Result<(), terminal::TerminalError> {
///     terminal::install_panic_hook();
///     let mut terminal = terminal::setup_terminal()?;
///     terminal::restore_terminal(&mut terminal)
/// }
/// ```
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let raw = disable_raw_mode();
        let modes = leave_screen_modes(&mut io::stdout());
        if let Err(err) = raw.and(modes) {
            warn!(%err, "terminal left in screen mode after panic");
        }
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_stops_mouse_reporting_and_alternate_screen() {
        let mut out = Vec::new();
        leave_screen_modes(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1000l"));
        assert!(written.contains("\x1b[?1049l"));
    }

    #[test]
    fn errors_name_the_direction() {
        let err = TerminalError::Setup(io::Error::other("not a tty"));
        assert_eq!(err.to_string(), "cannot open the screen: not a tty");
        let err = TerminalError::Restore(io::Error::other("gone"));
        assert_eq!(err.to_string(), "cannot restore the shell terminal: gone");
    }
}
