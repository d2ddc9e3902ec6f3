//=========================================================================
// Core
//=========================================================================
//
// Platform-independent engine systems.
//
// Architecture:
//   FrameScheduler
//     ├─ SceneStack ──→ Box<dyn Scene> (top = active)
//     ├─ Resources  ──→ engine collaborators, ticked once per frame
//     └─ EventSource / RenderSurface ──→ provided by the platform layer
//
// Everything here runs on a single thread, one frame at a time.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod globals;
pub mod input;
pub mod platform_bridge;
pub mod scene;
pub mod scheduler;
pub mod time;

//=== Public API ==========================================================

pub use error::SceneError;
pub use globals::{EngineContext, Resources, TerminationFlag, Tick};
pub use input::{Event, KeyCode, Modifiers, MouseButton};
pub use platform_bridge::{ChannelEventSource, EventSource, HeadlessSurface, Overlay, RenderSurface};
pub use scene::{PoppedScene, Scene, SceneId, SceneStack};
pub use scheduler::{FrameScheduler, SchedulerState};
pub use time::{FpsCounter, FrameClock, FrameStats, FrameTime, Timer};
