//=========================================================================
// FPS Counter
//=========================================================================
//
// Counts presented frames over a sliding one-second window. The result
// feeds the frame overlay drawn after the active scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::FrameTime;

//=== FrameStats ==========================================================

/// Per-frame statistics handed to the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames per second measured over the last full window.
    pub fps: f32,

    /// Index of the current frame.
    pub frame_index: u64,

    /// Delta time of the current frame.
    pub dt: Duration,
}

//=== FpsCounter ==========================================================

/// Frame rate counter.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    accumulated: Duration,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    /// Creates a counter that refreshes once per second.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// Creates a counter with a custom sampling window.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn with_window(window: Duration) -> Self {
        assert!(!window.is_zero(), "FPS window must be positive");
        Self {
            window,
            accumulated: Duration::ZERO,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Records one frame and returns the stats to display for it.
    pub fn record(&mut self, frame: &FrameTime) -> FrameStats {
        self.accumulated += frame.dt;
        self.frames += 1;

        if self.accumulated >= self.window {
            self.fps = self.frames as f32 / self.accumulated.as_secs_f32();
            self.accumulated = Duration::ZERO;
            self.frames = 0;
        }

        FrameStats {
            fps: self.fps,
            frame_index: frame.frame_index,
            dt: frame.dt,
        }
    }

    /// Last measured frame rate (0 until the first window completes).
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
