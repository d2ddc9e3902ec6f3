//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the frame scheduler and whatever backend delivers
// events and displays frames.
//
// - `EventSource`: per-frame batch of platform events
// - `RenderSurface`: opaque drawing target, presented once per frame
// - `Overlay`: drawn over the active scene (FPS counter)
//
// The scheduler only moves these around. It never inspects a surface.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use crate::core::input::Event;
use crate::core::time::FrameStats;

//=== EventSource =========================================================

/// Non-blocking supplier of the events for one frame.
pub trait EventSource {
    /// Moves every event available for this frame into `out`.
    ///
    /// Must not block. Events arriving while the batch is processed belong
    /// to the next frame.
    fn drain_into(&mut self, out: &mut Vec<Event>);
}

/// Scripted source: each frame drains whatever is queued.
impl EventSource for VecDeque<Event> {
    fn drain_into(&mut self, out: &mut Vec<Event>) {
        out.extend(self.drain(..));
    }
}

//=== RenderSurface =======================================================

/// Target the active scene draws into.
pub trait RenderSurface {
    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Displays the finished frame.
    fn present(&mut self);

    /// Backend-specific access for scenes and overlays that know which
    /// surface they run on.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== Overlay =============================================================

/// Drawn over the active scene, right before the frame is presented.
pub trait Overlay {
    fn draw(&mut self, surface: &mut dyn RenderSurface, stats: &FrameStats);
}

//=== HeadlessSurface =====================================================

/// Surface without a window. Counts presented frames.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    presented: u64,
}

impl HeadlessSurface {
    /// Creates a surface reporting the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            presented: 0,
        }
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
