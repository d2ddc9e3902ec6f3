//=========================================================================
// Frame Clock
//=========================================================================
//
// Produces the per-frame timing snapshot handed to scenes.
//
// Delta time is clamped so a debugger pause or a minimized window does
// not produce a huge step in the next update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== FrameTime ===========================================================

/// Timing snapshot for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame, clamped.
    pub dt: Duration,

    /// Monotonic timestamp taken when the frame started.
    pub now: Instant,

    /// Index of the frame, starting at 0.
    pub frame_index: u64,
}

impl FrameTime {
    /// Delta time in seconds.
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}

//=== FrameClock ==========================================================

/// Frame clock producing [`FrameTime`] snapshots.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Default lower clamp for delta time.
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);

    /// Default upper clamp for delta time.
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    /// Creates a clock with the default clamps.
    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    /// Creates a clock with custom delta-time clamps.
    ///
    /// # Panics
    ///
    /// Panics if `dt_min > dt_max`.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        assert!(dt_min <= dt_max, "dt_min must not exceed dt_max");
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline without touching the frame index.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Number of frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock and returns the snapshot for the new frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock as if the current time were `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let frame = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_increments_frame_index() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn tick_clamps_long_stalls() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(100));
        let start = Instant::now();
        clock.tick_at(start);

        let frame = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(frame.dt, Duration::from_millis(100), "Stall should be clamped to dt_max");
    }

    #[test]
    fn tick_clamps_zero_delta() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let frame = clock.tick_at(start);
        assert_eq!(frame.dt, FrameClock::DEFAULT_DT_MIN);
    }

    #[test]
    fn tick_reports_elapsed_time() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let frame = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(frame.dt, Duration::from_millis(16));
        assert!((frame.dt_secs() - 0.016).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "dt_min must not exceed dt_max")]
    fn with_clamps_rejects_inverted_range() {
        FrameClock::with_clamps(Duration::from_secs(1), Duration::from_millis(1));
    }
}
