//! Countdown timers and elapsed clocks.
//!
//! Each running timer owns a [`ScheduledTask`] that ticks once per second.
//! Pausing, resetting or dropping the timer aborts its task. Saved state
//! never records a timer as running, so a restored timer always starts
//! paused.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};

/// Interval between timer ticks.
pub const TICK: Duration = Duration::from_secs(1);

/// How long a finished countdown keeps its completion flag.
pub const COMPLETE_FLASH: Duration = Duration::from_secs(5);

/// A spawned task that is aborted when dropped.
///
/// Replacing the `Option<ScheduledTask>` that holds it is enough to cancel
/// the previous task.
#[derive(Debug)]
pub struct ScheduledTask(JoinHandle<()>);

impl ScheduledTask {
    /// Spawns `future` on the current Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }

    /// Returns `true` once the task has run to completion.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads a non-negative integer field from saved widget state.
fn seconds_field(state: &Value, key: &str) -> u64 {
    state.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// Formats seconds as `mm:ss`. Minutes are not wrapped into hours.
#[must_use]
pub fn format_countdown(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Formats seconds as `mm:ss`, or `hh:mm:ss` from one hour on.
#[must_use]
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Observable state of a [`Countdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    /// Seconds left on the timer.
    pub remaining_secs: u64,
    /// Whether the timer is counting down.
    pub running: bool,
    /// Set when the timer reaches zero; cleared [`COMPLETE_FLASH`] later.
    pub complete: bool,
}

/// A timer that counts down to zero.
#[derive(Debug, Default)]
pub struct Countdown {
    shared: Arc<Mutex<CountdownState>>,
    task: Option<ScheduledTask>,
}

impl Countdown {
    /// Creates a paused timer with no time on it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a timer from saved state (`timeRemaining`).
    #[must_use]
    pub fn from_state(state: &Value) -> Self {
        let countdown = Self::new();
        lock(&countdown.shared).remaining_secs = seconds_field(state, "timeRemaining");
        countdown
    }

    /// Serializes the timer for saving. `isRunning` is always `false`.
    #[must_use]
    pub fn to_state(&self) -> Value {
        json!({
            "timeRemaining": self.snapshot().remaining_secs,
            "isRunning": false,
        })
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CountdownState {
        *lock(&self.shared)
    }

    /// Starts counting down. Does nothing and returns `false` if no time
    /// remains.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> bool {
        {
            let mut state = lock(&self.shared);
            if state.remaining_secs == 0 {
                return false;
            }
            if state.running {
                return true;
            }
            state.running = true;
            state.complete = false;
        }
        self.task = Some(ScheduledTask::spawn(run_countdown(Arc::clone(
            &self.shared,
        ))));
        true
    }

    /// Stops counting down, keeping the remaining time.
    pub fn pause(&mut self) {
        let mut state = lock(&self.shared);
        if state.running {
            state.running = false;
            self.task = None;
        }
    }

    /// Starts a paused timer or pauses a running one. Returns whether the
    /// timer is now running.
    pub fn toggle(&mut self) -> bool {
        if self.snapshot().running {
            self.pause();
            false
        } else {
            self.start()
        }
    }

    /// Stops the timer and clears it to zero.
    pub fn reset(&mut self) {
        self.task = None;
        *lock(&self.shared) = CountdownState::default();
    }

    /// Adds time and starts the timer if it was paused.
    pub fn add_time(&mut self, seconds: u64) {
        {
            let mut state = lock(&self.shared);
            state.remaining_secs = state.remaining_secs.saturating_add(seconds);
            state.complete = false;
        }
        if seconds > 0 {
            self.start();
        }
    }
}

async fn run_countdown(shared: Arc<Mutex<CountdownState>>) {
    let mut ticks = interval_at(Instant::now() + TICK, TICK);
    loop {
        ticks.tick().await;
        let mut state = lock(&shared);
        if state.remaining_secs <= 1 {
            state.remaining_secs = 0;
            state.running = false;
            state.complete = true;
            break;
        }
        state.remaining_secs -= 1;
    }
    sleep(COMPLETE_FLASH).await;
    lock(&shared).complete = false;
}

/// Observable state of an [`ElapsedClock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockState {
    /// Seconds counted so far.
    pub elapsed_secs: u64,
    /// Whether the clock is counting.
    pub running: bool,
}

/// A stopwatch that counts up from zero.
#[derive(Debug, Default)]
pub struct ElapsedClock {
    shared: Arc<Mutex<ClockState>>,
    task: Option<ScheduledTask>,
}

impl ElapsedClock {
    /// Creates a stopped clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a clock from saved state (`elapsedTime`).
    #[must_use]
    pub fn from_state(state: &Value) -> Self {
        let clock = Self::new();
        lock(&clock.shared).elapsed_secs = seconds_field(state, "elapsedTime");
        clock
    }

    /// Serializes the clock for saving. `isRunning` is always `false`.
    #[must_use]
    pub fn to_state(&self) -> Value {
        json!({
            "elapsedTime": self.snapshot().elapsed_secs,
            "isRunning": false,
        })
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ClockState {
        *lock(&self.shared)
    }

    /// Starts or stops the clock. Returns whether it is now running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn toggle(&mut self) -> bool {
        let mut state = lock(&self.shared);
        state.running = !state.running;
        if state.running {
            self.task = Some(ScheduledTask::spawn(run_clock(Arc::clone(&self.shared))));
        } else {
            self.task = None;
        }
        state.running
    }

    /// Stops the clock and sets it back to zero.
    pub fn reset(&mut self) {
        self.task = None;
        *lock(&self.shared) = ClockState::default();
    }
}

async fn run_clock(shared: Arc<Mutex<ClockState>>) {
    let mut ticks = interval_at(Instant::now() + TICK, TICK);
    loop {
        ticks.tick().await;
        let mut state = lock(&shared);
        state.elapsed_secs = state.elapsed_secs.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(75), "01:15");
        assert_eq!(format_countdown(3600), "60:00");
    }

    #[test]
    fn elapsed_format_adds_hours() {
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(3725), "01:02:05");
    }

    #[test]
    fn restored_timer_is_paused() {
        let countdown = Countdown::from_state(&json!({ "timeRemaining": 90, "isRunning": true }));
        let state = countdown.snapshot();
        assert_eq!(state.remaining_secs, 90);
        assert!(!state.running);
        assert_eq!(countdown.to_state(), json!({ "timeRemaining": 90, "isRunning": false }));
    }

    #[test]
    fn restored_clock_ignores_malformed_state() {
        let clock = ElapsedClock::from_state(&json!({ "elapsedTime": "soon" }));
        assert_eq!(clock.snapshot(), ClockState::default());
    }

    #[test]
    fn empty_timer_does_not_start() {
        let mut countdown = Countdown::new();
        assert!(!countdown.start());
        assert!(!countdown.snapshot().running);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_once_per_second() {
        let mut countdown = Countdown::new();
        countdown.add_time(10);
        assert!(countdown.snapshot().running);

        sleep(Duration::from_millis(3500)).await;
        assert_eq!(countdown.snapshot().remaining_secs, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_completes_then_clears_flag() {
        let mut countdown = Countdown::new();
        countdown.add_time(2);

        sleep(Duration::from_millis(2500)).await;
        let state = countdown.snapshot();
        assert_eq!(state.remaining_secs, 0);
        assert!(!state.running);
        assert!(state.complete);

        sleep(COMPLETE_FLASH).await;
        assert!(!countdown.snapshot().complete);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let mut countdown = Countdown::new();
        countdown.add_time(30);
        sleep(Duration::from_millis(2500)).await;
        countdown.pause();

        sleep(secs(10)).await;
        let state = countdown.snapshot();
        assert_eq!(state.remaining_secs, 28);
        assert!(!state.running);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_and_zeroes() {
        let mut countdown = Countdown::new();
        countdown.add_time(30);
        sleep(Duration::from_millis(1500)).await;
        countdown.reset();

        sleep(secs(5)).await;
        assert_eq!(countdown.snapshot(), CountdownState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn adding_time_clears_completion() {
        let mut countdown = Countdown::new();
        countdown.add_time(1);
        sleep(Duration::from_millis(1500)).await;
        assert!(countdown.snapshot().complete);

        countdown.add_time(60);
        let state = countdown.snapshot();
        assert!(!state.complete);
        assert!(state.running);
        assert_eq!(state.remaining_secs, 60);

        sleep(Duration::from_millis(5500)).await;
        assert_eq!(countdown.snapshot().remaining_secs, 55);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_counts_up_until_stopped() {
        let mut clock = ElapsedClock::new();
        assert!(clock.toggle());
        sleep(Duration::from_millis(4500)).await;
        assert!(!clock.toggle());

        sleep(secs(10)).await;
        let state = clock.snapshot();
        assert_eq!(state.elapsed_secs, 4);
        assert!(!state.running);
        assert_eq!(clock.to_state(), json!({ "elapsedTime": 4, "isRunning": false }));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timer_aborts_task() {
        let mut countdown = Countdown::new();
        countdown.add_time(5);
        let shared = Arc::clone(&countdown.shared);
        drop(countdown);

        sleep(secs(3)).await;
        assert_eq!(lock(&shared).remaining_secs, 5);
    }
}
