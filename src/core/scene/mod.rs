//=========================================================================
// Scene System
//=========================================================================
//
// Scenes and the stack that owns them.
//
// Architecture:
//   SceneStack
//     └─ slots: Vec<Slot { id, finished, scene: Box<dyn Scene> }>
//
// Flow (driven once per frame by the FrameScheduler, top scene only):
//   process_event()* → do_gui() → update() → draw() → late_update()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::EngineContext;
use crate::core::input::Event;
use crate::core::platform_bridge::RenderSurface;

//=== Module Declarations =================================================

mod scene_stack;

//=== Public API ==========================================================

pub use scene_stack::{PoppedScene, SceneId, SceneStack};

//=== Scene Trait =========================================================

/// One screen of the game (title menu, level, editor, credits...).
///
/// Only the top scene of the stack runs. Scenes below it are suspended:
/// they keep their state but receive no calls until they become the top
/// again.
///
/// # Minimal Implementation
///
/// Only `update()` and `draw()` are required:
///
/// ```rust
/// # use tsc_engine::prelude::*;
/// struct Credits {
///     scroll: f32,
/// }
///
/// impl Scene for Credits {
///     fn update(&mut self, _surface: &dyn RenderSurface, ctx: &mut EngineContext<'_>) {
///         self.scroll += 30.0 * ctx.dt();
///     }
///
///     fn draw(&self, _surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {}
/// }
/// ```
///
/// # Leaving a Scene
///
/// A scene ends itself with [`EngineContext::finish`]; the scheduler pops
/// it at the start of the next frame. A scene may also pop itself directly
/// through [`EngineContext::pop_scene`] (typically from `late_update()` to
/// replace itself with a fresh instance). Either way the scene's memory
/// stays valid until the method that popped it returns.
pub trait Scene {
    /// Name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Receives one platform event.
    ///
    /// Close requests are recorded by the scheduler before this is called,
    /// so a scene cannot swallow them.
    fn process_event(&mut self, _event: &Event, _ctx: &mut EngineContext<'_>) {}

    /// Builds immediate-mode GUI for this frame.
    fn do_gui(&mut self, _surface: &mut dyn RenderSurface, _ctx: &mut EngineContext<'_>) {}

    /// Advances game logic by one frame.
    fn update(&mut self, surface: &dyn RenderSurface, ctx: &mut EngineContext<'_>);

    /// Renders the scene. Drawing must not change scene state.
    fn draw(&self, surface: &mut dyn RenderSurface, ctx: &EngineContext<'_>);

    /// Runs after the frame has been presented. The safe place for a scene
    /// to pop or replace itself.
    fn late_update(&mut self, _ctx: &mut EngineContext<'_>) {}
}
