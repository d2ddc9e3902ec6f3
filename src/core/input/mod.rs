//=========================================================================
// Input Events
//
// Backend-free event vocabulary consumed by scenes.
//
// The platform layer converts windowing events into these types; the
// frame scheduler drains them once per frame and dispatches them to the
// active scene. There is no input state tracking here: scenes react to
// the events themselves.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{Event, KeyCode, Modifiers, MouseButton};
