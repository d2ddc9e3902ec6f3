//=========================================================================
// Window Surface
//=========================================================================
//
// RenderSurface backed by a Winit window, plus the overlay that shows the
// frame rate in the window title.
//
// Rendering backends attach to the window through `WindowSurface::window`
// (scenes reach it with `RenderSurface::as_any_mut` and a downcast). The
// surface itself only tells the compositor a frame is about to be shown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::trace;
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{Overlay, RenderSurface};
use crate::core::time::FrameStats;

//=== WindowSurface =======================================================

/// Surface for the game window.
pub struct WindowSurface {
    window: Window,
    title: String,
}

impl WindowSurface {
    pub(crate) fn new(window: Window, title: impl Into<String>) -> Self {
        Self {
            window,
            title: title.into(),
        }
    }

    /// The underlying window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Title the window was created with.
    pub fn base_title(&self) -> &str {
        &self.title
    }

    /// Shows `suffix` after the base title, or the base title alone.
    pub fn set_title_suffix(&mut self, suffix: Option<&str>) {
        match suffix {
            Some(suffix) => self.window.set_title(&format!("{} - {}", self.title, suffix)),
            None => self.window.set_title(&self.title),
        }
    }
}

impl RenderSurface for WindowSurface {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn present(&mut self) {
        self.window.pre_present_notify();
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== TitleFpsOverlay =====================================================

/// Writes the measured frame rate into the window title.
///
/// The title only changes when the rounded value changes. On surfaces
/// other than [`WindowSurface`] the overlay does nothing.
#[derive(Debug, Default)]
pub(crate) struct TitleFpsOverlay {
    shown: Option<u32>,
}

impl TitleFpsOverlay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the value to display if it differs from the one shown.
    fn next_label(&mut self, stats: &FrameStats) -> Option<String> {
        let fps = stats.fps.round() as u32;
        if fps == 0 || self.shown == Some(fps) {
            return None;
        }

        self.shown = Some(fps);
        Some(format!("{} FPS", fps))
    }
}

impl Overlay for TitleFpsOverlay {
    fn draw(&mut self, surface: &mut dyn RenderSurface, stats: &FrameStats) {
        let Some(window_surface) = surface.as_any_mut().downcast_mut::<WindowSurface>() else {
            return;
        };

        if let Some(label) = self.next_label(stats) {
            trace!(target: "platform", "Frame {}: {}", stats.frame_index, label);
            window_surface.set_title_suffix(Some(&label));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
