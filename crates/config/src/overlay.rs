//! Dice overlay configuration.
//!
//! When a dice roller publishes a result, the screen shows it in an overlay
//! for a fixed number of seconds. The duration is user-editable, so input is
//! clamped rather than rejected: anything unparseable falls back to the
//! default and numbers are held to the allowed range.

use gmscreen_protocol::DEFAULT_OVERLAY_DURATION;
use serde::{Deserialize, Serialize};

/// Shortest allowed overlay duration in seconds.
pub const MIN_OVERLAY_DURATION: u32 = 1;

/// Longest allowed overlay duration in seconds.
pub const MAX_OVERLAY_DURATION: u32 = 30;

/// Configuration for the dice result overlay.
///
/// # Examples
///
/// ```
/// use gmscreen_config::OverlayConfig;
///
/// let config = OverlayConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.duration_secs, 8);
///
/// let config = OverlayConfig::with_duration(12);
/// assert_eq!(config.duration_secs, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Whether dice results are shown in the overlay at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How long a result stays visible, in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_duration() -> u32 {
    DEFAULT_OVERLAY_DURATION
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: DEFAULT_OVERLAY_DURATION,
        }
    }
}

impl OverlayConfig {
    /// Creates an enabled overlay with the given duration.
    #[must_use]
    pub fn with_duration(duration_secs: u32) -> Self {
        Self {
            enabled: true,
            duration_secs,
        }
    }

    /// Creates a disabled overlay.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Sets the duration from free-form user input.
    ///
    /// See [`clamp_duration_input`].
    pub fn set_duration_input(&mut self, input: &str) {
        self.duration_secs = clamp_duration_input(input);
    }

    /// Validates the overlay configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is outside
    /// [`MIN_OVERLAY_DURATION`]..=[`MAX_OVERLAY_DURATION`].
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_OVERLAY_DURATION..=MAX_OVERLAY_DURATION).contains(&self.duration_secs) {
            return Err(crate::ConfigError::InvalidOverlayDuration {
                reason: format!(
                    "{} seconds is outside {MIN_OVERLAY_DURATION}..={MAX_OVERLAY_DURATION}",
                    self.duration_secs
                ),
            });
        }
        Ok(())
    }
}

/// Converts free-form input to an overlay duration.
///
/// Integers are clamped to
/// [`MIN_OVERLAY_DURATION`]..=[`MAX_OVERLAY_DURATION`]; anything else yields
/// the default of 8 seconds.
///
/// # Examples
///
/// ```
/// use gmscreen_config::overlay::clamp_duration_input;
///
/// assert_eq!(clamp_duration_input("15"), 15);
/// assert_eq!(clamp_duration_input("0"), 1);
/// assert_eq!(clamp_duration_input("120"), 30);
/// assert_eq!(clamp_duration_input("soon"), 8);
/// ```
#[must_use]
pub fn clamp_duration_input(input: &str) -> u32 {
    match input.trim().parse::<i64>() {
        Ok(secs) => {
            let clamped = secs.clamp(
                i64::from(MIN_OVERLAY_DURATION),
                i64::from(MAX_OVERLAY_DURATION),
            );
            u32::try_from(clamped).unwrap_or(DEFAULT_OVERLAY_DURATION)
        }
        Err(_) => DEFAULT_OVERLAY_DURATION,
    }
}
