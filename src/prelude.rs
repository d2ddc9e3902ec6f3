//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tsc_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder, EngineConfig, EngineError};
pub use crate::platform::WindowSurface;

// Scenes and scheduling
pub use crate::core::globals::{EngineContext, Resources, Tick};
pub use crate::core::scene::{PoppedScene, Scene, SceneId, SceneStack};
pub use crate::core::scheduler::{FrameScheduler, SchedulerState};
pub use crate::core::SceneError;

// Platform bridge
pub use crate::core::platform_bridge::{EventSource, HeadlessSurface, Overlay, RenderSurface};

// Input
pub use crate::core::input::{Event, KeyCode, Modifiers, MouseButton};

// Time
pub use crate::core::time::{FrameStats, FrameTime, Timer};
