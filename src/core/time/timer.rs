//=========================================================================
// Timer
//=========================================================================
//
// Lightweight wall-clock timer for scene logic.
//
// A timer records the moment it was started and compares the current time
// against it whenever it is queried. There are no callbacks and no
// threads: scenes poll it from `update()` and react once it is over.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== Timer ===============================================================

/// Polled countdown timer.
///
/// A timer is either stopped or active. An active timer stays active after
/// its duration has passed, until [`Timer::stop`] or [`Timer::reset`] is
/// called. A stopped timer always reports [`Timer::is_over`] as `true`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tsc_engine::core::Timer;
///
/// let mut fade = Timer::new();
/// assert!(!fade.is_active());
///
/// fade.reset(Duration::from_secs(5));
/// assert!(fade.is_active());
/// assert!(!fade.is_over());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    duration: Duration,
    started: Instant,
    active: bool,
}

impl Timer {
    //--- Construction -----------------------------------------------------

    /// Creates a stopped timer. Call [`Timer::reset`] to start it.
    pub fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            started: Instant::now(),
            active: false,
        }
    }

    /// Creates a timer and starts it immediately.
    pub fn started(duration: Duration) -> Self {
        let mut timer = Self::new();
        timer.reset(duration);
        timer
    }

    //--- Control ----------------------------------------------------------

    /// Restarts the timer with a new duration.
    pub fn reset(&mut self, duration: Duration) {
        self.reset_at(duration, Instant::now());
    }

    /// Restarts the timer as if the current time were `now`.
    pub fn reset_at(&mut self, duration: Duration, now: Instant) {
        self.duration = duration;
        self.started = now;
        self.active = true;
    }

    /// Stops the timer and discards its progress. There is no pause.
    pub fn stop(&mut self) {
        self.duration = Duration::ZERO;
        self.active = false;
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true while the timer is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true once the configured duration has passed.
    pub fn is_over(&self) -> bool {
        self.is_over_at(Instant::now())
    }

    /// [`Timer::is_over`] evaluated at `now`.
    pub fn is_over_at(&self, now: Instant) -> bool {
        if !self.active {
            return true;
        }
        now.saturating_duration_since(self.started) > self.duration
    }

    /// Percentage of the duration that has passed, in `0.0..=100.0`.
    pub fn percent_over(&self) -> f32 {
        self.percent_over_at(Instant::now())
    }

    /// [`Timer::percent_over`] evaluated at `now`.
    pub fn percent_over_at(&self, now: Instant) -> f32 {
        if !self.active || self.duration.is_zero() {
            return 100.0;
        }

        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let ratio = elapsed / self.duration.as_secs_f32();
        (ratio * 100.0).min(100.0)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
