//=========================================================================
// Resources
//=========================================================================
//
// Type-keyed registry of the collaborators scenes reach through the
// engine context (texture cache, font store, audio, settings, ...).
//
// Architecture:
//   insert<T>() / insert_ticking<T>() → HashMap<TypeId, Entry>
//                                            ↓
//   Scenes ← get<T>() / get_mut<T>() / fetch<T>()
//                                            ↓
//   FrameScheduler ──→ tick_all() once per frame (insertion order)
//
// The core never constructs or tears down these collaborators. The only
// lifecycle it drives is the per-frame tick of time-driven ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::time::FrameTime;

//=== Tick Trait ==========================================================

/// A collaborator that advances with the frame clock.
///
/// Ticked once per frame by the scheduler, after the active scene's
/// `update()` and before its `draw()` (e.g. audio crossfades).
pub trait Tick {
    fn tick(&mut self, frame: &FrameTime);
}

//=== Entry ===============================================================

type TickFn = fn(&mut dyn Any, &FrameTime);

struct Entry {
    value: Box<dyn Any>,
    type_name: &'static str,
    tick: Option<TickFn>,
}

fn tick_erased<T: Tick + 'static>(value: &mut dyn Any, frame: &FrameTime) {
    if let Some(value) = value.downcast_mut::<T>() {
        value.tick(frame);
    }
}

//=== Resources ===========================================================

/// Registry of engine collaborators, one value per type.
///
/// # Example
///
/// ```
/// use tsc_engine::core::Resources;
///
/// struct Settings { music_volume: u8 }
///
/// let mut resources = Resources::new();
/// resources.insert(Settings { music_volume: 100 });
///
/// assert_eq!(resources.get::<Settings>().map(|s| s.music_volume), Some(100));
/// ```
#[derive(Default)]
pub struct Resources {
    entries: HashMap<TypeId, Entry>,
    tick_order: Vec<TypeId>,
}

impl Resources {
    //--- Construction -----------------------------------------------------

    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a collaborator, replacing any previous value of the same
    /// type. Returns the replaced value.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.insert_entry(value, None)
    }

    /// Registers a time-driven collaborator that is ticked every frame.
    pub fn insert_ticking<T: Tick + 'static>(&mut self, value: T) -> Option<T> {
        self.insert_entry(value, Some(tick_erased::<T> as TickFn))
    }

    /// Removes and returns the collaborator of type `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let type_id = TypeId::of::<T>();
        self.tick_order.retain(|id| *id != type_id);

        self.entries
            .remove(&type_id)
            .and_then(|entry| entry.value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    //--- Access -----------------------------------------------------------

    /// Returns the collaborator of type `T`, if registered.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// Returns the collaborator of type `T` mutably, if registered.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_mut::<T>())
    }

    /// Like [`Resources::get`] but reports absence as a construction error,
    /// so scene constructors can use `?`.
    pub fn fetch<T: 'static>(&self) -> Result<&T, SceneError> {
        self.get::<T>()
            .ok_or(SceneError::MissingResource(std::any::type_name::<T>()))
    }

    /// Mutable counterpart of [`Resources::fetch`].
    pub fn fetch_mut<T: 'static>(&mut self) -> Result<&mut T, SceneError> {
        self.get_mut::<T>()
            .ok_or(SceneError::MissingResource(std::any::type_name::<T>()))
    }

    /// Returns true if a collaborator of type `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered collaborators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Frame Hook -------------------------------------------------------

    /// Ticks every time-driven collaborator, in registration order.
    pub fn tick_all(&mut self, frame: &FrameTime) {
        for type_id in &self.tick_order {
            if let Some(entry) = self.entries.get_mut(type_id) {
                if let Some(tick) = entry.tick {
                    tick(entry.value.as_mut(), frame);
                }
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert_entry<T: 'static>(&mut self, value: T, tick: Option<TickFn>) -> Option<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        self.tick_order.retain(|id| *id != type_id);
        if tick.is_some() {
            self.tick_order.push(type_id);
        }

        let entry = Entry {
            value: Box::new(value),
            type_name,
            tick,
        };

        let previous = self.entries.insert(type_id, entry)?;
        warn!("Resource {} was already registered and has been replaced", previous.type_name);
        previous.value.downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.values().map(|entry| entry.type_name))
            .finish()
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            debug!("Releasing {} engine resources", self.entries.len());
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
