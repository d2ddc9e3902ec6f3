//=========================================================================
// Engine Context
//=========================================================================
//
// What a scene can reach while one of its methods runs.
//
// Contains:
// - scenes: the stack that owns every scene (push / pop / finish)
// - resources: engine collaborators (textures, fonts, audio, settings)
// - the termination flag shared with the scheduler
// - the timing snapshot of the current frame
//
// A context is built fresh by the scheduler for each scene call and
// borrows the scheduler's state for that call only.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::globals::Resources;
use crate::core::scene::{PoppedScene, Scene, SceneId, SceneStack};
use crate::core::time::FrameTime;

//=== TerminationFlag =====================================================

/// Process-wide "please stop" request.
///
/// Once requested it stays requested. The scheduler observes it at the
/// start of the next frame, never in the middle of one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TerminationFlag {
    requested: bool,
}

impl TerminationFlag {
    /// Creates a flag in the "keep running" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests termination. Idempotent.
    pub fn request(&mut self) {
        if !self.requested {
            info!(target: "scheduler", "Termination requested");
            self.requested = true;
        }
    }

    /// Returns true once termination was requested.
    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

//=== EngineContext =======================================================

/// Per-call view of the engine handed to scene methods.
pub struct EngineContext<'a> {
    /// The scene stack. The calling scene is on it but checked out, so
    /// [`SceneStack::get`] does not resolve it.
    pub scenes: &'a mut SceneStack,

    /// Engine collaborators.
    pub resources: &'a mut Resources,

    termination: &'a mut TerminationFlag,
    current: SceneId,
    frame: FrameTime,
}

impl<'a> EngineContext<'a> {
    /// Builds a context for a call into `current`.
    pub(crate) fn new(
        scenes: &'a mut SceneStack,
        resources: &'a mut Resources,
        termination: &'a mut TerminationFlag,
        current: SceneId,
        frame: FrameTime,
    ) -> Self {
        Self {
            scenes,
            resources,
            termination,
            current,
            frame,
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Handle of the scene whose method is running.
    pub fn current_scene(&self) -> SceneId {
        self.current
    }

    /// Timing snapshot of the current frame.
    pub fn frame(&self) -> &FrameTime {
        &self.frame
    }

    /// Delta time of the current frame, in seconds.
    pub fn dt(&self) -> f32 {
        self.frame.dt_secs()
    }

    /// Delta time of the current frame.
    pub fn dt_duration(&self) -> Duration {
        self.frame.dt
    }

    //--- Scene Lifecycle --------------------------------------------------

    /// Marks the calling scene as finished. It is popped at the start of
    /// the next frame; the rest of this frame still runs.
    pub fn finish(&mut self) {
        self.scenes.finish(self.current);
    }

    /// Returns true once the calling scene has finished.
    pub fn has_finished(&self) -> bool {
        self.scenes.has_finished(self.current)
    }

    /// Pushes a scene on top of the stack. It becomes the active scene
    /// from the next frame on.
    pub fn push_scene<S: Scene + 'static>(&mut self, scene: S) -> SceneId {
        self.scenes.push_scene(scene)
    }

    /// Pushes an already boxed scene.
    pub fn push(&mut self, scene: Box<dyn Scene>) -> SceneId {
        self.scenes.push(scene)
    }

    /// Constructs and pushes a scene, leaving the stack untouched if the
    /// factory fails.
    pub fn try_push_with<S, E, F>(&mut self, factory: F) -> Result<SceneId, E>
    where
        S: Scene + 'static,
        F: FnOnce() -> Result<S, E>,
    {
        self.scenes.try_push_with(factory)
    }

    /// Pops the top scene.
    ///
    /// When the top is the calling scene, the result is
    /// [`PoppedScene::Executing`] and the scene is destroyed after the
    /// running method returns.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop_scene(&mut self) -> PoppedScene {
        self.scenes.pop()
    }

    //--- Termination ------------------------------------------------------

    /// Asks the scheduler to stop after the current frame.
    pub fn request_termination(&mut self) {
        self.termination.request();
    }

    /// Returns true once termination was requested.
    pub fn termination_requested(&self) -> bool {
        self.termination.is_requested()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
