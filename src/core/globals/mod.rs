//=========================================================================
// Global Engine State
//=========================================================================
//
// State shared between the scheduler and the scenes it runs.
//
// Architecture:
//   FrameScheduler owns: SceneStack + Resources + TerminationFlag
//   EngineContext borrows all three for the duration of one scene call
//
//=========================================================================

//=== Module Declarations =================================================

mod engine_context;
mod resources;

//=== Public API ==========================================================

pub use engine_context::{EngineContext, TerminationFlag};
pub use resources::{Resources, Tick};
