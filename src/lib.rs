//=========================================================================
// TSC Engine — Library Root
//
// Scene stack and frame scheduler of a 2D platform game.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder` → `Engine`)
// - Expose the core systems (scenes, scheduler, resources, time) for
//   games and for headless testing
// - Keep the windowing backend (`platform`) hidden behind the facade
//
// Typical usage:
// ```no_run
// use tsc_engine::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new().build().run(|_resources| Ok(TitleScene::new()))
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-independent systems: scene stack, frame
// scheduler, resources, timing and the event vocabulary.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration (window, event loop, event
// translation). Only its error type and surface are public.
//
// `engine` defines the main engine entry point and configuration.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineConfig, EngineError};
pub use platform::{PlatformError, WindowSurface};
