//=========================================================================
// Level Scene
//=========================================================================
//
// Plays one level.
//
// - Escape finishes the scene and returns to whatever is below it
// - R restarts the level: the scene replaces itself with a fresh instance
//   from `late_update()`
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{info, trace};
use tsc_engine::prelude::*;

//=== Internal Dependencies ===============================================

use crate::music::MusicPlayer;

//=== LevelCatalog ========================================================

/// Levels the game can start.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<String>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<String>) -> Self {
        Self { levels }
    }

    /// Level started from the title screen.
    pub fn first(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new(vec!["test_level.tsc3lvl".to_string()])
    }
}

//=== LevelScene ==========================================================

pub struct LevelScene {
    level: String,
    attempt: u32,
    elapsed: Duration,
    restart_requested: bool,
}

impl LevelScene {
    const MUSIC: &'static str = "land/land_1.ogg";

    /// Loads the first level of the catalog and fades in its music.
    pub fn new(resources: &mut Resources) -> Result<Self, SceneError> {
        let level = resources
            .fetch::<LevelCatalog>()?
            .first()
            .ok_or_else(|| SceneError::Construction("level catalog is empty".to_string()))?
            .to_string();

        resources.fetch_mut::<MusicPlayer>()?.play(Self::MUSIC, true);

        info!("Entering level {}", level);
        Ok(Self::attempt(level, 1))
    }

    fn attempt(level: String, attempt: u32) -> Self {
        Self {
            level,
            attempt,
            elapsed: Duration::ZERO,
            restart_requested: false,
        }
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt
    }
}

impl Scene for LevelScene {
    fn name(&self) -> &'static str {
        "LevelScene"
    }

    fn process_event(&mut self, event: &Event, ctx: &mut EngineContext<'_>) {
        if event.is_key_pressed(KeyCode::Escape) {
            ctx.finish();
        } else if event.is_key_pressed(KeyCode::KeyR) {
            self.restart_requested = true;
        }
    }

    fn update(&mut self, _surface: &dyn RenderSurface, ctx: &mut EngineContext<'_>) {
        self.elapsed += ctx.dt_duration();
    }

    fn draw(&self, surface: &mut dyn RenderSurface, ctx: &EngineContext<'_>) {
        let (width, height) = surface.size();
        trace!(
            "Drawing {} (attempt {}, {:.1}s) at {}x{}",
            self.level(),
            self.attempt_number(),
            self.elapsed.as_secs_f32(),
            width,
            height
        );

        if let Some(music) = ctx.resources.get::<MusicPlayer>().filter(|m| m.is_fading()) {
            trace!(
                "Music fading {:?} -> {:?}",
                music.current().map(|t| (&t.path, t.volume)),
                music.next().map(|t| (&t.path, t.volume))
            );
        }
    }

    fn late_update(&mut self, ctx: &mut EngineContext<'_>) {
        if !self.restart_requested || ctx.has_finished() {
            return;
        }

        info!("Restarting {} (attempt {})", self.level, self.attempt + 1);

        let replacement = Self::attempt(self.level.clone(), self.attempt + 1);
        let popped = ctx.pop_scene();
        debug_assert!(popped.is_deferred(), "LevelScene only restarts itself");
        ctx.push_scene(replacement);

        self.restart_requested = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
