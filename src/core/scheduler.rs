//=========================================================================
// Frame Scheduler
//=========================================================================
//
// Drives the game one frame at a time.
//
// Architecture:
//   FrameScheduler
//     ├─ scenes: SceneStack          (top = active scene)
//     ├─ resources: Resources        (ticked once per frame)
//     ├─ termination: TerminationFlag
//     └─ clock / fps / overlay
//
// Frame:
//   1. termination requested or stack empty → release scenes, stop
//   2. top finished → pop, back to 1
//   3. drain events → close requests set the flag → process_event()
//   4. do_gui()   5. update()   6. tick resources
//   7. draw() + overlay   8. present   9. late_update()
//
// The active scene is captured after step 2 and every phase of the frame
// targets it. Scenes pushed during the frame run from the next frame on.
// A scene popped during the frame receives no further calls and is
// destroyed once the method that popped it has returned.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::{EngineContext, Resources, TerminationFlag};
use crate::core::input::Event;
use crate::core::platform_bridge::{EventSource, Overlay, RenderSurface};
use crate::core::scene::{Scene, SceneId, SceneStack};
use crate::core::time::{FpsCounter, FrameClock, FrameTime};

//=== SchedulerState ======================================================

/// Lifecycle of a [`FrameScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Frames are being run.
    Running,

    /// Termination was observed; scenes are being released.
    ///
    /// Transient: the release pass runs to completion inside the call that
    /// observed termination, so [`FrameScheduler::state`] reports
    /// [`SchedulerState::Stopped`] once that call returns.
    Terminating,

    /// No scene is left. No further frame will run.
    Stopped,
}

//=== FrameScheduler ======================================================

/// Owns the scene stack and runs its top scene once per frame.
///
/// # Example
///
/// ```
/// # use std::collections::VecDeque;
/// # use tsc_engine::prelude::*;
/// struct Splash {
///     frames_left: u32,
/// }
///
/// impl Scene for Splash {
///     fn update(&mut self, _surface: &dyn RenderSurface, ctx: &mut EngineContext<'_>) {
///         self.frames_left -= 1;
///         if self.frames_left == 0 {
///             ctx.finish();
///         }
///     }
///
///     fn draw(&self, _surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {}
/// }
///
/// let mut scheduler = FrameScheduler::new(Box::new(Splash { frames_left: 3 }), Resources::new());
/// let mut events: VecDeque<Event> = VecDeque::new();
/// let mut surface = HeadlessSurface::new(640, 480);
///
/// scheduler.run(&mut events, &mut surface);
///
/// assert_eq!(scheduler.state(), SchedulerState::Stopped);
/// assert_eq!(surface.presented(), 3);
/// ```
pub struct FrameScheduler {
    scenes: SceneStack,
    resources: Resources,
    termination: TerminationFlag,
    state: SchedulerState,
    clock: FrameClock,
    fps: FpsCounter,
    overlay: Option<Box<dyn Overlay>>,

    /// Reused between frames to avoid reallocating the event batch.
    events: Vec<Event>,
}

impl FrameScheduler {
    //--- Construction -----------------------------------------------------

    /// Creates a running scheduler with `entry` as its only scene.
    pub fn new(entry: Box<dyn Scene>, resources: Resources) -> Self {
        let mut scenes = SceneStack::new();
        let id = scenes.push(entry);
        info!(target: "scheduler", "Scheduler started with entry scene {}", id);

        Self {
            scenes,
            resources,
            termination: TerminationFlag::new(),
            state: SchedulerState::Running,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            overlay: None,
            events: Vec::with_capacity(32),
        }
    }

    /// Builds the entry scene with `factory` and starts a scheduler on it.
    ///
    /// The factory may fetch what it needs from `resources`. If it fails,
    /// no scheduler is created and the error is returned.
    pub fn launch<S, F>(factory: F, mut resources: Resources) -> Result<Self, SceneError>
    where
        S: Scene + 'static,
        F: FnOnce(&mut Resources) -> Result<S, SceneError>,
    {
        let entry = factory(&mut resources)?;
        Ok(Self::new(Box::new(entry), resources))
    }

    /// Replaces the frame clock (e.g. to change the delta-time clamps).
    pub fn with_frame_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Installs an overlay drawn over the active scene every frame.
    pub fn set_overlay(&mut self, overlay: Box<dyn Overlay>) {
        self.overlay = Some(overlay);
    }

    //--- Accessors --------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of frames that ran their phases.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// The scene stack, between frames.
    pub fn scenes(&self) -> &SceneStack {
        &self.scenes
    }

    /// Mutable access to the scene stack, between frames.
    pub fn scenes_mut(&mut self) -> &mut SceneStack {
        &mut self.scenes
    }

    /// Engine collaborators.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Mutable access to engine collaborators.
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    //--- Termination ------------------------------------------------------

    /// Requests termination from outside the scenes (e.g. the platform).
    /// Takes effect at the start of the next frame.
    pub fn request_termination(&mut self) {
        self.termination.request();
    }

    /// Returns true once termination was requested.
    pub fn termination_requested(&self) -> bool {
        self.termination.is_requested()
    }

    /// Releases every remaining scene, top first, and stops.
    ///
    /// No scene method is called during the release. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }

        self.state = SchedulerState::Terminating;
        let released = self.scenes.release_all();
        self.state = SchedulerState::Stopped;

        info!(
            target: "scheduler",
            "Scheduler stopped after {} frames ({} scenes released)",
            self.clock.frames(),
            released
        );
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs frames until the scheduler stops.
    pub fn run(&mut self, events: &mut dyn EventSource, surface: &mut dyn RenderSurface) {
        while self.run_frame(events, surface) != SchedulerState::Stopped {}
    }

    /// Runs one frame and returns the state afterwards.
    ///
    /// Returns [`SchedulerState::Stopped`] without running any phase if
    /// termination was requested during the previous frame or no scene is
    /// left.
    pub fn run_frame(
        &mut self,
        events: &mut dyn EventSource,
        surface: &mut dyn RenderSurface,
    ) -> SchedulerState {
        let Some(active) = self.begin_frame() else {
            return self.state;
        };

        let frame = self.clock.tick();
        trace!(target: "scheduler", "Frame {} on {}", frame.frame_index, active);

        //--- Events -------------------------------------------------------
        let mut batch = std::mem::take(&mut self.events);
        batch.clear();
        events.drain_into(&mut batch);

        // Close requests are honored for the whole batch, even after the
        // active scene has left the stack.
        let mut scene_gone = false;
        for event in &batch {
            if event.is_close_request() {
                debug!(target: "scheduler", "Close request received");
                self.termination.request();
            }
            if scene_gone {
                continue;
            }
            scene_gone = self
                .with_scene(active, frame, |scene, ctx| scene.process_event(event, ctx))
                .is_none();
        }

        batch.clear();
        self.events = batch;

        //--- GUI / Update ---------------------------------------------------
        self.with_scene(active, frame, |scene, ctx| scene.do_gui(&mut *surface, ctx));
        self.with_scene(active, frame, |scene, ctx| scene.update(&*surface, ctx));

        self.resources.tick_all(&frame);

        //--- Draw / Present -------------------------------------------------
        self.with_scene(active, frame, |scene, ctx| scene.draw(&mut *surface, ctx));

        let stats = self.fps.record(&frame);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.draw(&mut *surface, &stats);
        }

        surface.present();

        //--- Late Update ----------------------------------------------------
        self.with_scene(active, frame, |scene, ctx| scene.late_update(ctx));

        self.state
    }

    //--- Internal Helpers -------------------------------------------------

    /// Steps 1 and 2 of the frame. Returns the active scene, or `None` if
    /// the scheduler stopped.
    fn begin_frame(&mut self) -> Option<SceneId> {
        if self.state == SchedulerState::Stopped {
            return None;
        }

        loop {
            if self.termination.is_requested() {
                info!(target: "scheduler", "Terminating with {} scenes on the stack", self.scenes.len());
                self.shutdown();
                return None;
            }

            if self.scenes.is_empty() {
                info!(target: "scheduler", "Scene stack is empty");
                self.shutdown();
                return None;
            }

            let top = self.scenes.top();
            if !self.scenes.has_finished(top) {
                return Some(top);
            }

            debug!(target: "scheduler", "Reaping finished {}", top);
            drop(self.scenes.pop());
        }
    }

    /// Checks `id` out of the stack, runs `f` on it with a fresh context and
    /// checks it back in. Returns `None` if the scene is no longer on the
    /// stack.
    fn with_scene<R>(
        &mut self,
        id: SceneId,
        frame: FrameTime,
        f: impl FnOnce(&mut dyn Scene, &mut EngineContext<'_>) -> R,
    ) -> Option<R> {
        let mut scene = self.scenes.check_out(id)?;

        let result = {
            let mut ctx = EngineContext::new(
                &mut self.scenes,
                &mut self.resources,
                &mut self.termination,
                id,
                frame,
            );
            f(scene.as_mut(), &mut ctx)
        };

        self.scenes.check_in(id, scene);
        Some(result)
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("state", &self.state)
            .field("scenes", &self.scenes)
            .field("resources", &self.resources)
            .field("termination", &self.termination)
            .field("frames", &self.clock.frames())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::globals::Tick;
    use crate::core::input::KeyCode;
    use crate::core::platform_bridge::HeadlessSurface;
    use crate::core::time::FrameStats;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;
    type Hook = Box<dyn FnMut(&mut EngineContext<'_>)>;
    type EventHook = Box<dyn FnMut(&Event, &mut EngineContext<'_>)>;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    fn push(log: &Log, entry: impl Into<String>) {
        log.borrow_mut().push(entry.into());
    }

    /// Scene that logs every call and runs optional hooks.
    struct Recorder {
        label: &'static str,
        log: Log,
        on_event: Option<EventHook>,
        on_update: Option<Hook>,
        on_late: Option<Hook>,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Log) -> Self {
            Self {
                label,
                log: log.clone(),
                on_event: None,
                on_update: None,
                on_late: None,
            }
        }

        fn on_event(mut self, hook: impl FnMut(&Event, &mut EngineContext<'_>) + 'static) -> Self {
            self.on_event = Some(Box::new(hook));
            self
        }

        fn on_update(mut self, hook: impl FnMut(&mut EngineContext<'_>) + 'static) -> Self {
            self.on_update = Some(Box::new(hook));
            self
        }

        fn on_late(mut self, hook: impl FnMut(&mut EngineContext<'_>) + 'static) -> Self {
            self.on_late = Some(Box::new(hook));
            self
        }

        fn boxed(self) -> Box<dyn Scene> {
            Box::new(self)
        }

        fn record(&self, phase: &str) {
            push(&self.log, format!("{}:{}", self.label, phase));
        }
    }

    impl Scene for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn process_event(&mut self, event: &Event, ctx: &mut EngineContext<'_>) {
            self.record("event");
            if let Some(hook) = self.on_event.as_mut() {
                hook(event, ctx);
            }
        }

        fn do_gui(&mut self, _surface: &mut dyn RenderSurface, _ctx: &mut EngineContext<'_>) {
            self.record("gui");
        }

        fn update(&mut self, _surface: &dyn RenderSurface, ctx: &mut EngineContext<'_>) {
            self.record("update");
            if let Some(hook) = self.on_update.as_mut() {
                hook(ctx);
            }
        }

        fn draw(&self, _surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {
            self.record("draw");
        }

        fn late_update(&mut self, ctx: &mut EngineContext<'_>) {
            self.record("late");
            if let Some(hook) = self.on_late.as_mut() {
                hook(ctx);
            }
        }
    }

    impl Drop for Recorder {
        fn drop(&mut self) {
            self.record("drop");
        }
    }

    /// Scene relying on every default method.
    struct Minimal;

    impl Scene for Minimal {
        fn update(&mut self, _surface: &dyn RenderSurface, _ctx: &mut EngineContext<'_>) {}
        fn draw(&self, _surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {}
    }

    struct LoggingTicker {
        log: Log,
    }

    impl Tick for LoggingTicker {
        fn tick(&mut self, _frame: &FrameTime) {
            push(&self.log, "tick");
        }
    }

    struct LoggingOverlay {
        log: Log,
        last: Rc<RefCell<Option<FrameStats>>>,
    }

    impl Overlay for LoggingOverlay {
        fn draw(&mut self, _surface: &mut dyn RenderSurface, stats: &FrameStats) {
            push(&self.log, "overlay");
            *self.last.borrow_mut() = Some(*stats);
        }
    }

    /// Surface that logs presents into the shared log.
    struct LoggingSurface {
        log: Log,
    }

    impl RenderSurface for LoggingSurface {
        fn size(&self) -> (u32, u32) {
            (640, 480)
        }

        fn present(&mut self) {
            push(&self.log, "present");
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    fn no_events() -> VecDeque<Event> {
        VecDeque::new()
    }

    //=====================================================================
    // Phase Order Tests
    //=====================================================================

    #[test]
    fn frame_runs_phases_in_order() {
        let log = new_log();
        let mut resources = Resources::new();
        resources.insert_ticking(LoggingTicker { log: log.clone() });

        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), resources);
        scheduler.set_overlay(Box::new(LoggingOverlay {
            log: log.clone(),
            last: Rc::new(RefCell::new(None)),
        }));

        let mut events: VecDeque<Event> = VecDeque::from(vec![Event::key_down(KeyCode::Space)]);
        let mut surface = LoggingSurface { log: log.clone() };

        let state = scheduler.run_frame(&mut events, &mut surface);

        assert_eq!(state, SchedulerState::Running);
        assert_eq!(
            entries(&log),
            vec![
                "a:event", "a:gui", "a:update", "tick", "a:draw", "overlay", "present", "a:late"
            ]
        );
    }

    #[test]
    fn every_queued_event_is_dispatched_in_one_frame() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        let mut events: VecDeque<Event> = VecDeque::from(vec![
            Event::key_down(KeyCode::KeyA),
            Event::key_up(KeyCode::KeyA),
            Event::MouseMoved { x: 1.0, y: 2.0 },
        ]);
        let mut surface = HeadlessSurface::new(640, 480);

        scheduler.run_frame(&mut events, &mut surface);
        let first = entries(&log).iter().filter(|e| *e == "a:event").count();
        assert_eq!(first, 3);
        assert!(events.is_empty(), "Source must be drained completely");

        log.borrow_mut().clear();
        scheduler.run_frame(&mut events, &mut surface);
        assert!(!entries(&log).contains(&"a:event".to_string()));
    }

    #[test]
    fn only_the_top_scene_runs() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler.scenes_mut().push(Recorder::new("b", &log).boxed());

        scheduler.run_frame(&mut no_events(), &mut HeadlessSurface::new(1, 1));

        assert!(entries(&log).iter().all(|e| e.starts_with("b:")), "Got {:?}", entries(&log));
    }

    #[test]
    fn overlay_receives_frame_stats() {
        let log = new_log();
        let last = Rc::new(RefCell::new(None));
        let mut scheduler = FrameScheduler::new(Box::new(Minimal), Resources::new());
        scheduler.set_overlay(Box::new(LoggingOverlay {
            log: log.clone(),
            last: last.clone(),
        }));
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);
        scheduler.run_frame(&mut no_events(), &mut surface);

        let stats = last.borrow().expect("overlay drawn");
        assert_eq!(stats.frame_index, 1);
        assert_eq!(surface.presented(), 2);
        assert_eq!(scheduler.frames(), 2);
    }

    //=====================================================================
    // Finish / Reap Tests
    //=====================================================================

    #[test]
    fn finish_during_update_stops_next_frame() {
        let log = new_log();
        let entry = Recorder::new("a", &log).on_update(|ctx| ctx.finish());
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        assert_eq!(scheduler.run_frame(&mut no_events(), &mut surface), SchedulerState::Running);
        assert_eq!(
            entries(&log),
            vec!["a:gui", "a:update", "a:draw", "a:late"],
            "Finishing does not cut the current frame short"
        );

        log.borrow_mut().clear();
        assert_eq!(scheduler.run_frame(&mut no_events(), &mut surface), SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["a:drop"]);
        assert!(scheduler.scenes().is_empty());
        assert_eq!(surface.presented(), 1);
    }

    #[test]
    fn reap_reevaluates_new_top_in_same_frame() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler
            .scenes_mut()
            .push(Recorder::new("b", &log).on_update(|ctx| ctx.finish()).boxed());
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);
        log.borrow_mut().clear();

        scheduler.run_frame(&mut no_events(), &mut surface);

        assert_eq!(entries(&log), vec!["b:drop", "a:gui", "a:update", "a:draw", "a:late"]);
        assert_eq!(scheduler.scenes().len(), 1);
    }

    #[test]
    fn consecutive_finished_scenes_are_reaped_together() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        let bottom = scheduler.scenes().top();
        scheduler.scenes_mut().push(
            Recorder::new("b", &log)
                .on_update(move |ctx| {
                    ctx.scenes.finish(bottom);
                    ctx.finish();
                })
                .boxed(),
        );
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);
        log.borrow_mut().clear();

        let state = scheduler.run_frame(&mut no_events(), &mut surface);

        assert_eq!(state, SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["b:drop", "a:drop"]);
    }

    //=====================================================================
    // Push / Pop During a Frame
    //=====================================================================

    #[test]
    fn scene_pushed_from_event_becomes_active_next_frame() {
        let log = new_log();
        let inner_log = log.clone();
        let entry = Recorder::new("a", &log).on_event(move |event, ctx| {
            if event.is_key_pressed(KeyCode::Enter) {
                ctx.push_scene(Recorder::new("b", &inner_log).on_update(|ctx| ctx.finish()));
            }
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let a = scheduler.scenes().top();
        let mut surface = HeadlessSurface::new(1, 1);

        let mut events: VecDeque<Event> = VecDeque::from(vec![Event::key_down(KeyCode::Enter)]);
        scheduler.run_frame(&mut events, &mut surface);
        assert_eq!(
            entries(&log),
            vec!["a:event", "a:gui", "a:update", "a:draw", "a:late"],
            "A keeps the rest of its frame"
        );
        assert_eq!(scheduler.scenes().len(), 2);

        log.borrow_mut().clear();
        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(entries(&log), vec!["b:gui", "b:update", "b:draw", "b:late"]);

        log.borrow_mut().clear();
        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(entries(&log), vec!["b:drop", "a:gui", "a:update", "a:draw", "a:late"]);
        assert_eq!(scheduler.scenes().top(), a);
        assert!(!scheduler.scenes().has_finished(a), "A resumes unfinished");
    }

    #[test]
    fn scene_popped_mid_frame_skips_remaining_phases() {
        let log = new_log();
        let entry = Recorder::new("a", &log).on_update(|ctx| {
            let popped = ctx.pop_scene();
            assert!(popped.is_deferred(), "Popping itself must be deferred");
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);

        assert_eq!(entries(&log), vec!["a:gui", "a:update", "a:drop"]);
        assert_eq!(surface.presented(), 1, "The frame itself still completes");
        assert_eq!(scheduler.run_frame(&mut no_events(), &mut surface), SchedulerState::Stopped);
    }

    #[test]
    fn popping_self_from_event_stops_event_dispatch() {
        let log = new_log();
        let entry = Recorder::new("a", &log).on_event(|_, ctx| {
            let _ = ctx.pop_scene();
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut events: VecDeque<Event> =
            VecDeque::from(vec![Event::key_down(KeyCode::KeyA), Event::key_down(KeyCode::KeyB)]);

        scheduler.run_frame(&mut events, &mut HeadlessSurface::new(1, 1));

        assert_eq!(entries(&log), vec!["a:event", "a:drop"]);
    }

    #[test]
    fn close_after_self_pop_in_same_batch_still_terminates() {
        let log = new_log();
        let successor_log = log.clone();
        let entry = Recorder::new("a", &log).on_event(move |event, ctx| {
            if event.is_key_pressed(KeyCode::KeyR) {
                let _ = ctx.pop_scene();
                ctx.push_scene(Recorder::new("b", &successor_log));
            }
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut events: VecDeque<Event> = VecDeque::from(vec![
            Event::key_down(KeyCode::KeyR),
            Event::FocusLost,
            Event::Closed,
        ]);
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut events, &mut surface);

        assert_eq!(entries(&log), vec!["a:event", "a:drop"], "Popped scene gets no further events");
        assert!(scheduler.termination_requested(), "Close later in the batch was lost");

        log.borrow_mut().clear();
        assert_eq!(scheduler.run_frame(&mut events, &mut surface), SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["b:drop"], "Successor never runs");
    }

    #[test]
    fn scene_pushed_from_late_update_becomes_active_next_frame() {
        let log = new_log();
        let successor_log = log.clone();
        let mut pushed = false;
        let entry = Recorder::new("a", &log).on_late(move |ctx| {
            if !pushed {
                ctx.push_scene(Recorder::new("b", &successor_log));
                pushed = true;
            }
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(entries(&log), vec!["a:gui", "a:update", "a:draw", "a:late"]);
        assert_eq!(scheduler.scenes().len(), 2);

        log.borrow_mut().clear();
        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(entries(&log), vec!["b:gui", "b:update", "b:draw", "b:late"]);
    }

    //=====================================================================
    // Self-Replacement Tests
    //=====================================================================

    /// Pops itself in `late_update`, pushes its successor and keeps using
    /// its own fields afterwards.
    struct Replacer {
        generation: u32,
        touched_after_pop: u32,
        log: Log,
    }

    impl Scene for Replacer {
        fn update(&mut self, _surface: &dyn RenderSurface, _ctx: &mut EngineContext<'_>) {
            push(&self.log, format!("gen{}:update", self.generation));
        }

        fn draw(&self, _surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {}

        fn late_update(&mut self, ctx: &mut EngineContext<'_>) {
            if self.generation > 0 {
                return;
            }

            let handle = ctx.pop_scene();
            assert!(handle.is_deferred());

            ctx.push_scene(Replacer {
                generation: self.generation + 1,
                touched_after_pop: 0,
                log: self.log.clone(),
            });

            self.touched_after_pop += 1;
            drop(handle);

            push(&self.log, format!("gen{}:late-done:{}", self.generation, self.touched_after_pop));
        }
    }

    impl Drop for Replacer {
        fn drop(&mut self) {
            push(&self.log, format!("gen{}:drop:{}", self.generation, self.touched_after_pop));
        }
    }

    #[test]
    fn self_replacement_in_late_update_is_safe() {
        let log = new_log();
        let entry = Replacer {
            generation: 0,
            touched_after_pop: 0,
            log: log.clone(),
        };
        let mut scheduler = FrameScheduler::new(Box::new(entry), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(
            entries(&log),
            vec!["gen0:update", "gen0:late-done:1", "gen0:drop:1"],
            "Old instance outlives its late_update and keeps its writes"
        );
        assert_eq!(scheduler.scenes().len(), 1);

        log.borrow_mut().clear();
        scheduler.run_frame(&mut no_events(), &mut surface);
        assert_eq!(entries(&log), vec!["gen1:update"], "Replacement is active next frame");
    }

    //=====================================================================
    // Termination Tests
    //=====================================================================

    #[test]
    fn close_event_lets_frame_finish_then_stops() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler.scenes_mut().push(Recorder::new("b", &log).boxed());
        let mut events = no_events();
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut events, &mut surface);
        scheduler.run_frame(&mut events, &mut surface);

        events.push_back(Event::Closed);
        log.borrow_mut().clear();
        let state = scheduler.run_frame(&mut events, &mut surface);

        assert_eq!(state, SchedulerState::Running, "Frame 3 completes normally");
        assert!(scheduler.termination_requested());
        assert_eq!(entries(&log), vec!["b:event", "b:gui", "b:update", "b:draw", "b:late"]);

        log.borrow_mut().clear();
        let state = scheduler.run_frame(&mut events, &mut surface);

        assert_eq!(state, SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["b:drop", "a:drop"], "Frame 4 never starts");
        assert_eq!(surface.presented(), 3);
        assert_eq!(scheduler.frames(), 3);

        log.borrow_mut().clear();
        drop(scheduler);
        assert!(entries(&log).is_empty(), "Scenes are released exactly once");
    }

    #[test]
    fn close_request_cannot_be_swallowed_by_scene() {
        let mut scheduler = FrameScheduler::new(Box::new(Minimal), Resources::new());
        let mut events: VecDeque<Event> = VecDeque::from(vec![Event::Closed]);
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run_frame(&mut events, &mut surface);

        assert!(scheduler.termination_requested());
        assert_eq!(scheduler.run_frame(&mut events, &mut surface), SchedulerState::Stopped);
    }

    #[test]
    fn termination_requested_by_scene_is_deferred() {
        let log = new_log();
        let entry = Recorder::new("a", &log).on_update(|ctx| ctx.request_termination());
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        assert_eq!(scheduler.run_frame(&mut no_events(), &mut surface), SchedulerState::Running);
        assert_eq!(entries(&log), vec!["a:gui", "a:update", "a:draw", "a:late"]);

        assert_eq!(scheduler.run_frame(&mut no_events(), &mut surface), SchedulerState::Stopped);
        assert_eq!(surface.presented(), 1);
    }

    #[test]
    fn external_termination_request() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());

        scheduler.request_termination();
        let state = scheduler.run_frame(&mut no_events(), &mut HeadlessSurface::new(1, 1));

        assert_eq!(state, SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["a:drop"]);
    }

    #[test]
    fn shutdown_releases_top_first_and_is_idempotent() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler.scenes_mut().push(Recorder::new("b", &log).boxed());
        scheduler.scenes_mut().push(Recorder::new("c", &log).boxed());

        scheduler.shutdown();
        scheduler.shutdown();

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(entries(&log), vec!["c:drop", "b:drop", "a:drop"]);
    }

    #[test]
    fn stopped_scheduler_runs_nothing() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler.shutdown();
        log.borrow_mut().clear();

        let mut surface = HeadlessSurface::new(1, 1);
        let state = scheduler.run_frame(&mut no_events(), &mut surface);

        assert_eq!(state, SchedulerState::Stopped);
        assert!(entries(&log).is_empty());
        assert_eq!(surface.presented(), 0);
    }

    #[test]
    fn dropping_scheduler_releases_scenes_top_first() {
        let log = new_log();
        let mut scheduler = FrameScheduler::new(Recorder::new("a", &log).boxed(), Resources::new());
        scheduler.scenes_mut().push(Recorder::new("b", &log).boxed());

        drop(scheduler);

        assert_eq!(entries(&log), vec!["b:drop", "a:drop"]);
    }

    //=====================================================================
    // Run / Launch Tests
    //=====================================================================

    #[test]
    fn run_loops_until_stack_is_empty() {
        let log = new_log();
        let mut updates = 0;
        let entry = Recorder::new("a", &log).on_update(move |ctx| {
            updates += 1;
            if updates == 3 {
                ctx.finish();
            }
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());
        let mut surface = HeadlessSurface::new(1, 1);

        scheduler.run(&mut no_events(), &mut surface);

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.frames(), 3);
        assert_eq!(surface.presented(), 3);
    }

    #[test]
    fn launch_builds_entry_from_resources() {
        struct LevelName(&'static str);

        let mut resources = Resources::new();
        resources.insert(LevelName("lvl_1"));

        let scheduler = FrameScheduler::launch(
            |resources| {
                let name = resources.fetch::<LevelName>()?;
                assert_eq!(name.0, "lvl_1");
                Ok(Minimal)
            },
            resources,
        )
        .expect("launch succeeds");

        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(scheduler.scenes().len(), 1);
    }

    #[test]
    fn launch_propagates_construction_failure() {
        struct Missing;

        let result = FrameScheduler::launch(
            |resources| {
                resources.fetch::<Missing>()?;
                Ok(Minimal)
            },
            Resources::new(),
        );

        match result {
            Err(SceneError::MissingResource(name)) => assert!(name.ends_with("Missing")),
            other => panic!("Expected MissingResource, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn failed_push_from_scene_leaves_stack_unchanged() {
        let log = new_log();
        let entry = Recorder::new("a", &log).on_update(|ctx| {
            let result = ctx.try_push_with(|| {
                Err::<Minimal, _>(SceneError::Asset {
                    path: "pixmaps/missing.png".into(),
                    reason: "not found".into(),
                })
            });
            assert!(result.is_err());
        });
        let mut scheduler = FrameScheduler::new(entry.boxed(), Resources::new());

        scheduler.run_frame(&mut no_events(), &mut HeadlessSurface::new(1, 1));

        assert_eq!(scheduler.scenes().len(), 1);
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }
}
