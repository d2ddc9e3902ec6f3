//=========================================================================
// Secret Chronicles
//=========================================================================
//
// Game binary: registers the engine collaborators and starts on the
// title screen.
//
//   TitleScene ──Enter──→ LevelScene (R: restart, Escape: back)
//       └──Escape──→ stack empty → exit
//
//=========================================================================

//=== Module Declarations =================================================

mod level_scene;
mod music;
mod title_scene;

//=== External Dependencies ===============================================

use std::process::ExitCode;

use log::error;
use tsc_engine::logging::{init_logging, LoggingConfig};
use tsc_engine::prelude::*;

//=== Internal Dependencies ===============================================

use level_scene::LevelCatalog;
use music::MusicPlayer;
use title_scene::TitleScene;

//=== Entry Point =========================================================

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let result = EngineBuilder::new()
        .with_title("Secret Chronicles")
        .with_window_size(800, 600)
        .with_fps_overlay(true)
        .build()
        .init(|resources| {
            resources.insert(LevelCatalog::default());
            resources.insert_ticking(MusicPlayer::new());
        })
        .run(TitleScene::new);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
