//! Single-slot notification channel for dice results.
//!
//! Any widget can publish a [`DiceResult`]; the newest one replaces whatever
//! is showing and restarts the auto-clear timeout.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use gmscreen_protocol::{DiceResult, ScreenSettings};
use tokio::time::sleep;
use tracing::debug;

use crate::timers::ScheduledTask;

#[derive(Debug, Default)]
struct Slot {
    result: Option<DiceResult>,
    generation: u64,
}

/// Holds the dice result currently shown in the overlay.
#[derive(Debug)]
pub struct DiceNotifier {
    slot: Arc<Mutex<Slot>>,
    clear_task: Option<ScheduledTask>,
    enabled: bool,
    duration: Duration,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DiceNotifier {
    /// Creates an enabled notifier that clears results after `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::default(),
            clear_task: None,
            enabled: true,
            duration,
        }
    }

    /// Creates a notifier from a screen's overlay settings.
    #[must_use]
    pub fn from_settings(settings: &ScreenSettings) -> Self {
        let mut notifier = Self::new(Duration::from_secs(u64::from(
            settings.dice_overlay_duration,
        )));
        notifier.enabled = settings.dice_overlay;
        notifier
    }

    /// Returns `true` if published results are shown.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// How long a result stays visible.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Enables or disables the overlay. Disabling clears the current result.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Changes the timeout used for subsequent results.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Shows `result`, replacing any current one, and schedules it to clear.
    ///
    /// Returns `false` if the overlay is disabled and the result was dropped.
    /// Must be called from within a Tokio runtime.
    pub fn publish(&mut self, result: DiceResult) -> bool {
        if !self.enabled {
            debug!(formula = %result.formula, "dice overlay disabled, result dropped");
            return false;
        }

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.result = Some(result);
            slot.generation
        };

        let shared = Arc::clone(&self.slot);
        let duration = self.duration;
        self.clear_task = Some(ScheduledTask::spawn(async move {
            sleep(duration).await;
            let mut slot = lock(&shared);
            if slot.generation == generation {
                slot.result = None;
            }
        }));
        true
    }

    /// Removes the current result and cancels its timeout.
    pub fn clear(&mut self) {
        self.clear_task = None;
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.result = None;
    }

    /// Returns the result currently on display.
    #[must_use]
    pub fn current(&self) -> Option<DiceResult> {
        lock(&self.slot).result.clone()
    }
}

impl Default for DiceNotifier {
    fn default() -> Self {
        Self::from_settings(&ScreenSettings::default())
    }
}
