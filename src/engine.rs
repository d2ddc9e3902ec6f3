//=========================================================================
// TSC Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run(entry)──>  [Runtime]
//         │                          │                                              │
//         ├─ with_title()            └─ Resources                                   ├─ builds entry scene
//         ├─ with_window_size()                                                     ├─ FrameScheduler
//         ├─ with_fullscreen()                                                      └─ Platform (event loop,
//         ├─ with_channel_capacity()                                                   blocks until exit)
//         ├─ with_max_frame_delta()
//         └─ with_fps_overlay()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::Resources;
use crate::core::scene::Scene;
use crate::core::scheduler::FrameScheduler;
use crate::core::time::FrameClock;
use crate::platform::{Platform, PlatformError};

//=== EngineConfig ========================================================

/// Engine settings fixed before the window opens.
///
/// # Default Values
///
/// - **Title**: "Secret Chronicles"
/// - **Window size**: 640x480 (logical pixels)
/// - **Fullscreen**: off
/// - **Channel capacity**: 128 events
/// - **Max frame delta**: 250 ms
/// - **FPS overlay**: off
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,

    /// Events buffered between two frames before input is dropped.
    pub channel_capacity: usize,

    /// Upper clamp of the frame delta handed to scenes.
    pub max_frame_delta: Duration,

    /// Show the measured frame rate in the window title.
    pub fps_overlay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Secret Chronicles".to_string(),
            window_width: 640,
            window_height: 480,
            fullscreen: false,
            channel_capacity: 128,
            max_frame_delta: FrameClock::DEFAULT_DT_MAX,
            fps_overlay: false,
        }
    }
}

impl EngineConfig {
    /// Frame clock honoring `max_frame_delta`.
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::with_clamps(FrameClock::DEFAULT_DT_MIN, self.max_frame_delta)
    }
}

//=== EngineError =========================================================

/// Fatal errors that end [`Engine::run`].
#[derive(Debug)]
pub enum EngineError {
    /// The entry scene could not be constructed.
    Scene(SceneError),

    /// The window or event loop failed.
    Platform(PlatformError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scene(e) => write!(f, "Failed to start entry scene: {}", e),
            Self::Platform(e) => write!(f, "Platform failure: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scene(e) => Some(e),
            Self::Platform(e) => Some(e),
        }
    }
}

impl From<SceneError> for EngineError {
    fn from(error: SceneError) -> Self {
        Self::Scene(error)
    }
}

impl From<PlatformError> for EngineError {
    fn from(error: PlatformError) -> Self {
        Self::Platform(error)
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Examples
///
/// ```no_run
/// use tsc_engine::prelude::*;
///
/// # struct Title;
/// # impl Scene for Title {
/// #     fn update(&mut self, _: &dyn RenderSurface, _: &mut EngineContext<'_>) {}
/// #     fn draw(&self, _: &mut dyn RenderSurface, _: &EngineContext<'_>) {}
/// # }
/// EngineBuilder::new()
///     .with_title("Secret Chronicles")
///     .with_window_size(800, 600)
///     .with_fps_overlay(true)
///     .build()
///     .run(|_resources| Ok(Title))?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.config.window_width = width;
        self.config.window_height = height;
        self
    }

    /// Opens the window in borderless fullscreen.
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.fullscreen = fullscreen;
        self
    }

    /// Sets the capacity of the platform → scheduler event queue.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Sets the largest frame delta scenes will see after a stall.
    ///
    /// Default: 250 ms
    ///
    /// # Panics
    ///
    /// Panics if `max` is below the minimum frame delta (100 µs).
    pub fn with_max_frame_delta(mut self, max: Duration) -> Self {
        assert!(
            max >= FrameClock::DEFAULT_DT_MIN,
            "Max frame delta must be at least {:?}, got {:?}",
            FrameClock::DEFAULT_DT_MIN,
            max
        );
        self.config.max_frame_delta = max;
        self
    }

    /// Shows the frame rate in the window title.
    pub fn with_fps_overlay(mut self, enabled: bool) -> Self {
        self.config.fps_overlay = enabled;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine ({}x{}{}, channel: {}, max dt: {:?})",
            self.config.window_width,
            self.config.window_height,
            if self.config.fullscreen { ", fullscreen" } else { "" },
            self.config.channel_capacity,
            self.config.max_frame_delta
        );

        Engine {
            config: self.config,
            resources: Resources::new(),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Engine runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit event loop)
///         ├─► Window → WindowSurface
///         ├─► InputProcessor → event queue
///         └─► FrameScheduler (one frame per redraw)
///               └─► SceneStack → active scene
/// ```
pub struct Engine {
    config: EngineConfig,
    resources: Resources,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Registers engine collaborators (texture cache, font store, audio,
    /// settings...) before the entry scene is built.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Resources),
    {
        info!("Initializing engine resources");

        init_fn(&mut self.resources);

        info!("Engine initialization complete ({} resources)", self.resources.len());
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Builds the entry scene and runs until the scheduler stops.
    ///
    /// # Lifecycle
    ///
    /// 1. Builds the entry scene with `entry` (may fetch resources)
    /// 2. Creates the frame scheduler around it
    /// 3. Runs the platform event loop (blocks here)
    /// 4. Returns once the scene stack is empty or termination was requested
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Scene`] if the entry scene cannot be built and
    /// [`EngineError::Platform`] if the window or event loop fails.
    pub fn run<S, F>(self, entry: F) -> Result<(), EngineError>
    where
        S: Scene + 'static,
        F: FnOnce(&mut Resources) -> Result<S, SceneError>,
    {
        info!("Starting engine runtime");

        //--- 1. Build the entry scene -------------------------------------
        let scheduler = FrameScheduler::launch(entry, self.resources)
            .map_err(|e| {
                error!("Entry scene failed: {}", e);
                e
            })?
            .with_frame_clock(self.config.frame_clock());

        //--- 2. Launch the platform subsystem -----------------------------
        let platform = Platform::new(scheduler, self.config);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
            return Err(e.into());
        }

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
