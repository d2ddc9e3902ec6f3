//=========================================================================
// Scene Stack
//=========================================================================
//
// LIFO container that exclusively owns every live scene.
//
// Architecture:
//   SceneStack
//     ├─ next_id: u64
//     └─ slots: Vec<Slot>        (bottom .. top, top = active scene)
//          └─ Slot { id, finished, scene: Option<Box<dyn Scene>> }
//
// Scenes are addressed through stable `SceneId` handles. While the
// scheduler runs one of a scene's methods, that scene is *checked out* of
// its slot (the slot's box is `None`). Popping a checked-out slot removes
// it from the stack immediately, but the box itself is only dropped when
// the scheduler checks it back in, after the method has returned. A scene
// can therefore pop itself from inside its own callback without ever
// freeing memory that is still executing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::Scene;

//=== SceneId =============================================================

/// Stable handle to a scene owned by a [`SceneStack`].
///
/// Handles are never reused within one stack, so a stale handle simply
/// stops resolving once its scene has been popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    /// Raw numeric value of the handle.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

//=== PoppedScene =========================================================

/// Ownership handle returned by [`SceneStack::pop`].
///
/// Dropping an `Idle` handle destroys the scene. An `Executing` handle owns
/// nothing: the popped scene is the one whose method is running right now,
/// and it is destroyed by the scheduler as soon as that method returns.
#[must_use = "dropping an idle popped scene destroys it"]
pub enum PoppedScene {
    /// The scene was not running; ownership moves to the caller.
    Idle {
        id: SceneId,
        scene: Box<dyn Scene>,
    },

    /// The scene is running one of its methods; its release is deferred.
    Executing(SceneId),
}

impl PoppedScene {
    /// Handle of the popped scene.
    pub fn id(&self) -> SceneId {
        match self {
            Self::Idle { id, .. } => *id,
            Self::Executing(id) => *id,
        }
    }

    /// Returns true if the popped scene was the one currently executing.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Executing(_))
    }

    /// Takes the scene out of an `Idle` handle.
    pub fn into_scene(self) -> Option<Box<dyn Scene>> {
        match self {
            Self::Idle { scene, .. } => Some(scene),
            Self::Executing(_) => None,
        }
    }
}

impl fmt::Debug for PoppedScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle { id, scene } => f
                .debug_struct("Idle")
                .field("id", id)
                .field("scene", &scene.name())
                .finish(),
            Self::Executing(id) => f.debug_tuple("Executing").field(id).finish(),
        }
    }
}

//=== Slot ================================================================

struct Slot {
    id: SceneId,
    finished: bool,
    name: &'static str,

    /// `None` while the scheduler is running one of the scene's methods.
    scene: Option<Box<dyn Scene>>,
}

//=== SceneStack ==========================================================

/// Ordered, exclusively-owning stack of scenes.
///
/// The last pushed scene is the *top* and is the one the frame scheduler
/// runs. [`SceneStack::push`] and [`SceneStack::pop`] are the only ways to
/// change membership.
///
/// # Preconditions
///
/// [`SceneStack::pop`] and [`SceneStack::top`] on an empty stack are
/// programming errors and panic.
///
/// # Example
///
/// ```
/// # use tsc_engine::core::{EngineContext, RenderSurface, Scene, SceneStack};
/// struct Title;
/// impl Scene for Title {
///     fn update(&mut self, _: &dyn RenderSurface, _: &mut EngineContext<'_>) {}
///     fn draw(&self, _: &mut dyn RenderSurface, _: &EngineContext<'_>) {}
/// }
///
/// let mut stack = SceneStack::new();
/// let title = stack.push_scene(Title);
/// assert_eq!(stack.top(), title);
///
/// let popped = stack.pop();
/// assert_eq!(popped.id(), title);
/// assert!(stack.is_empty());
/// ```
pub struct SceneStack {
    slots: Vec<Slot>,
    next_id: u64,
}

impl SceneStack {
    //--- Construction -----------------------------------------------------

    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    //--- Membership -------------------------------------------------------

    /// Takes ownership of `scene` and makes it the new top.
    ///
    /// Never fails. There is no upper bound on the stack size.
    pub fn push(&mut self, scene: Box<dyn Scene>) -> SceneId {
        let id = SceneId(self.next_id);
        self.next_id += 1;

        let name = scene.name();
        debug!(target: "scene", "Pushing {} ({}) at depth {}", id, name, self.slots.len());

        self.slots.push(Slot {
            id,
            finished: false,
            name,
            scene: Some(scene),
        });
        id
    }

    /// Boxes and pushes a concrete scene.
    pub fn push_scene<S: Scene + 'static>(&mut self, scene: S) -> SceneId {
        self.push(Box::new(scene))
    }

    /// Constructs a scene with `factory` and pushes it on success.
    ///
    /// Construction happens before the stack is touched, so a failing
    /// factory leaves the stack exactly as it was.
    pub fn try_push_with<S, E, F>(&mut self, factory: F) -> Result<SceneId, E>
    where
        S: Scene + 'static,
        F: FnOnce() -> Result<S, E>,
    {
        let scene = factory()?;
        Ok(self.push_scene(scene))
    }

    /// Removes the top scene and returns its ownership handle.
    ///
    /// If the top scene is executing (it popped itself), the returned handle
    /// is [`PoppedScene::Executing`] and the scene is destroyed once its
    /// running method returns.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop(&mut self) -> PoppedScene {
        let slot = self
            .slots
            .pop()
            .expect("pop() called on an empty scene stack");

        match slot.scene {
            Some(scene) => {
                debug!(target: "scene", "Popped {} ({})", slot.id, slot.name);
                PoppedScene::Idle { id: slot.id, scene }
            }
            None => {
                debug!(
                    target: "scene",
                    "Popped executing {} ({}), release deferred until its callback returns",
                    slot.id,
                    slot.name
                );
                PoppedScene::Executing(slot.id)
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Handle of the top scene.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn top(&self) -> SceneId {
        self.slots
            .last()
            .map(|slot| slot.id)
            .expect("top() called on an empty scene stack")
    }

    /// Returns true if no scene is on the stack.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of scenes on the stack.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if `id` is still on the stack.
    pub fn contains(&self, id: SceneId) -> bool {
        self.slot(id).is_some()
    }

    /// Handles from bottom to top.
    pub fn ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    /// Name of the scene behind `id`, if still on the stack.
    pub fn name(&self, id: SceneId) -> Option<&'static str> {
        self.slot(id).map(|slot| slot.name)
    }

    /// Borrows a scene that is on the stack and not executing.
    pub fn get(&self, id: SceneId) -> Option<&dyn Scene> {
        self.slot(id).and_then(|slot| slot.scene.as_deref())
    }

    /// Mutably borrows a scene that is on the stack and not executing.
    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut (dyn Scene + 'static)> {
        self.slot_mut(id).and_then(|slot| slot.scene.as_deref_mut())
    }

    /// Returns true if one of the scene's methods is running right now.
    pub fn is_executing(&self, id: SceneId) -> bool {
        self.slot(id).is_some_and(|slot| slot.scene.is_none())
    }

    //--- Finish Flag ------------------------------------------------------

    /// Marks a scene as finished. The scheduler pops finished scenes at the
    /// start of the next frame, before any of their phases run.
    ///
    /// Idempotent. Returns false if `id` is no longer on the stack.
    pub fn finish(&mut self, id: SceneId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                if !slot.finished {
                    debug!(target: "scene", "{} ({}) finished", slot.id, slot.name);
                    slot.finished = true;
                }
                true
            }
            None => false,
        }
    }

    /// Returns true once [`SceneStack::finish`] was called for `id`.
    ///
    /// The flag never resets while the scene stays on the stack.
    pub fn has_finished(&self, id: SceneId) -> bool {
        self.slot(id).is_some_and(|slot| slot.finished)
    }

    //--- Scheduler Hooks --------------------------------------------------

    /// Moves a scene out of its slot for the duration of one callback.
    pub(crate) fn check_out(&mut self, id: SceneId) -> Option<Box<dyn Scene>> {
        let scene = self.slot_mut(id)?.scene.take();
        if scene.is_some() {
            trace!(target: "scene", "Checked out {}", id);
        }
        scene
    }

    /// Returns a checked-out scene to its slot, or destroys it if the scene
    /// was popped while its callback was running.
    pub(crate) fn check_in(&mut self, id: SceneId, scene: Box<dyn Scene>) {
        if let Some(slot) = self.slot_mut(id) {
            debug_assert!(slot.scene.is_none(), "{} checked in twice", id);
            slot.scene = Some(scene);
            trace!(target: "scene", "Checked in {}", id);
            return;
        }

        debug!(target: "scene", "Releasing {} ({}) after its callback returned", id, scene.name());
        drop(scene);
    }

    /// Drops every scene, top first, without any lifecycle callbacks.
    ///
    /// Returns the number of scenes released.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut released = 0;
        while let Some(slot) = self.slots.pop() {
            debug!(target: "scene", "Releasing {} ({}) on shutdown", slot.id, slot.name);
            drop(slot);
            released += 1;
        }
        released
    }

    //--- Internal Helpers -------------------------------------------------

    fn slot(&self, id: SceneId) -> Option<&Slot> {
        self.slots.iter().rev().find(|slot| slot.id == id)
    }

    fn slot_mut(&mut self, id: SceneId) -> Option<&mut Slot> {
        self.slots.iter_mut().rev().find(|slot| slot.id == id)
    }
}

impl Default for SceneStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| (slot.id, slot.name, slot.finished)))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
