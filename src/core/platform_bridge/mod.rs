//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit, or a headless test harness) with the
// frame scheduler.
//
// This module defines the contract between platform implementations and
// core logic, so backends can be swapped without changing core code.
//
// Components:
// - `interface`: event source, render surface and overlay traits
// - `event_collector`: channel-backed event source used by the platform
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod interface;

//=== Public API ==========================================================

pub use event_collector::ChannelEventSource;
pub use interface::{EventSource, HeadlessSurface, Overlay, RenderSurface};
