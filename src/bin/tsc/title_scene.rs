//=========================================================================
// Title Scene
//=========================================================================
//
// Entry scene of the game.
//
// - Enter starts the first level on top of the title screen
// - Escape finishes the title screen, which empties the stack and ends
//   the game
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, trace, warn};
use tsc_engine::prelude::*;

//=== Internal Dependencies ===============================================

use crate::level_scene::LevelScene;
use crate::music::MusicPlayer;

//=== TitleScene ==========================================================

pub struct TitleScene {
    background: &'static str,

    /// Blinks the "press enter" prompt.
    prompt_blink: Timer,
    prompt_visible: bool,
}

impl TitleScene {
    const BACKGROUND: &'static str = "misc/title.png";
    const MUSIC: &'static str = "game/menu.ogg";
    const PROMPT_BLINK: std::time::Duration = std::time::Duration::from_millis(600);

    pub fn new(resources: &mut Resources) -> Result<Self, SceneError> {
        resources.fetch_mut::<MusicPlayer>()?.play(Self::MUSIC, false);

        Ok(Self {
            background: Self::BACKGROUND,
            prompt_blink: Timer::started(Self::PROMPT_BLINK),
            prompt_visible: true,
        })
    }

    fn start_level(&self, ctx: &mut EngineContext<'_>) {
        let resources = &mut *ctx.resources;
        match ctx.scenes.try_push_with(|| LevelScene::new(resources)) {
            Ok(id) => info!("Level started as {}", id),
            Err(e) => warn!("Cannot start level: {}", e),
        }
    }
}

impl Scene for TitleScene {
    fn name(&self) -> &'static str {
        "TitleScene"
    }

    fn process_event(&mut self, event: &Event, ctx: &mut EngineContext<'_>) {
        if event.is_key_pressed(KeyCode::Enter) {
            self.start_level(ctx);
        } else if event.is_key_pressed(KeyCode::Escape) {
            ctx.finish();
        }
    }

    fn update(&mut self, _surface: &dyn RenderSurface, _ctx: &mut EngineContext<'_>) {
        if self.prompt_blink.is_over() {
            self.prompt_visible = !self.prompt_visible;
            self.prompt_blink.reset(Self::PROMPT_BLINK);
        }
    }

    fn draw(&self, surface: &mut dyn RenderSurface, _ctx: &EngineContext<'_>) {
        let (width, height) = surface.size();
        trace!(
            "Drawing {} at {}x{} (prompt {})",
            self.background,
            width,
            height,
            if self.prompt_visible { "on" } else { "off" }
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
