//=========================================================================
// Time
//=========================================================================
//
// Frame timing utilities, independent of the windowing backend.
//
// - `FrameClock`: one per scheduler, ticked once per frame
// - `Timer`: polled countdowns for scene logic
// - `FpsCounter`: frame statistics for the overlay
//
//=========================================================================

//=== Module Declarations =================================================

mod fps;
mod frame_clock;
mod timer;

//=== Public API ==========================================================

pub use fps::{FpsCounter, FrameStats};
pub use frame_clock::{FrameClock, FrameTime};
pub use timer::Timer;
