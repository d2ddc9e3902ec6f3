//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the frame scheduler.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputProcessor                              │
//  │   ├─ Converts Winit → Event                  │
//  │   └─ Tracks modifiers                        │
//  │   ↓                                          │
//  │  Bounded channel (Sender<Event>)             │
//  │   ↓                                          │
//  │  RedrawRequested                             │
//  │   ↓                                          │
//  │  FrameScheduler::run_frame(                  │
//  │      ChannelEventSource, WindowSurface)      │
//  │   ↓                                          │
//  │  Stopped? → exit event loop                  │
//  │  else     → request next redraw              │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: exactly one scheduler frame per
//   redraw; events queued before it form that frame's batch
// - **Sticky modifiers**: modifier state persists across events until
//   explicitly changed (matches platform behavior)
// - **Close is never lost**: if the queue is full, a close request raises
//   the termination flag directly
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;
mod surface;

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::Event;
use crate::core::platform_bridge::ChannelEventSource;
use crate::core::scheduler::{FrameScheduler, SchedulerState};
use crate::engine::EngineConfig;
use input_processor::InputProcessor;
use surface::TitleFpsOverlay;

//=== Public API ==========================================================

pub use surface::WindowSurface;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop or a window the game cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),

    /// The game window could not be created.
    WindowCreation(winit::error::OsError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
            Self::WindowCreation(e) => write!(f, "Window creation failed: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
            Self::WindowCreation(e) => Some(e),
        }
    }
}

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(scheduler, config)`
/// 2. **Execution**: `platform.run()` blocks in the Winit event loop
/// 3. **Frames**: every `RedrawRequested` runs one scheduler frame
/// 4. **Shutdown**: the scheduler stops → event loop exits → `run()` returns
///
/// This type is NOT Send/Sync: it must remain on the main thread.
pub(crate) struct Platform {
    /// Created lazily in `resumed()` (mobile compatibility).
    surface: Option<WindowSurface>,

    scheduler: FrameScheduler,

    /// Producer side of the per-frame event queue.
    event_sender: Sender<Event>,

    /// Consumer side, handed to the scheduler each frame.
    events: ChannelEventSource,

    input_processor: InputProcessor,
    config: EngineConfig,

    /// First fatal error raised inside the event loop.
    fatal: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the platform around a ready-to-run scheduler.
    ///
    /// Does not create the window yet: that happens in `resumed()`.
    pub fn new(mut scheduler: FrameScheduler, config: EngineConfig) -> Self {
        let (event_sender, receiver) = bounded(config.channel_capacity);

        if config.fps_overlay {
            scheduler.set_overlay(Box::new(TitleFpsOverlay::new()));
        }

        info!(
            target: "platform",
            "Platform subsystem initialized (event queue capacity: {})",
            config.channel_capacity
        );

        Self {
            surface: None,
            scheduler,
            event_sender,
            events: ChannelEventSource::new(receiver),
            input_processor: InputProcessor::new(),
            config,
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the scheduler stops.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        let result = event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution);

        self.scheduler.shutdown();

        match self.fatal.take() {
            Some(error) => Err(error),
            None => result,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Queues an event for the next frame.
    ///
    /// Input that does not fit into the queue is dropped with a warning. A
    /// close request that does not fit raises the termination flag directly.
    fn forward(&mut self, event: Event) {
        match self.event_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                if event.is_close_request() {
                    warn!(target: "platform::input", "Event queue full, requesting termination directly");
                    self.scheduler.request_termination();
                } else {
                    warn!(target: "platform::input", "Event queue full, dropping {:?}", event);
                }
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(target: "platform::input", "Event queue disconnected, dropping {:?}", event);
            }
        }
    }

    /// Runs one scheduler frame. Returns false once the scheduler stopped.
    fn run_frame(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return true;
        };

        let state = self.scheduler.run_frame(&mut self.events, surface);
        if state == SchedulerState::Stopped {
            return false;
        }

        surface.window().request_redraw();
        true
    }

    fn request_redraw(&self) {
        if let Some(surface) = &self.surface {
            surface.window().request_redraw();
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        let fullscreen = self.config.fullscreen.then_some(Fullscreen::Borderless(None));

        WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window_width, self.config.window_height))
            .with_fullscreen(fullscreen)
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.surface = Some(WindowSurface::new(window, self.config.title.clone()));
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.fatal = Some(PlatformError::WindowCreation(e));
                self.scheduler.shutdown();
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::RedrawRequested => {
                if !self.run_frame() {
                    info!(target: "platform", "Scheduler stopped, leaving event loop");
                    event_loop.exit();
                }
            }

            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.forward(Event::Closed);
                // The next frame observes the request and stops.
                self.request_redraw();
            }

            _ => {
                if let Some(translated) = self.input_processor.translate(&event) {
                    self.forward(translated);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Event loop exiting");
        self.scheduler.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
