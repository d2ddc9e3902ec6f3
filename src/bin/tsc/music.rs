//=========================================================================
// Music Player
//=========================================================================
//
// Background music state with crossfading between two tracks.
//
// Architecture:
//   play(track, fade) → current / next tracks + fade Timer
//                                   ↓
//   FrameScheduler ──→ Tick::tick() every frame → volumes follow the timer
//
// Only the mixing state lives here. Streaming the files is the job of the
// audio backend, which reads `current()` / `next()` each frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::debug;
use tsc_engine::prelude::*;

//=== Track ===============================================================

/// A music file and its volume in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: String,
    pub volume: f32,
}

impl Track {
    fn new(path: impl Into<String>, volume: f32) -> Self {
        Self {
            path: path.into(),
            volume,
        }
    }
}

//=== MusicPlayer =========================================================

/// Background music with a five second crossfade.
#[derive(Debug)]
pub struct MusicPlayer {
    current: Option<Track>,
    next: Option<Track>,
    fade: Timer,
}

impl MusicPlayer {
    /// Length of a crossfade.
    pub const FADE_DURATION: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            current: None,
            next: None,
            fade: Timer::new(),
        }
    }

    /// Starts playing `path`, fading it in over the current track if
    /// `fade` is set.
    pub fn play(&mut self, path: &str, fade: bool) {
        self.play_at(path, fade, Instant::now());
    }

    /// [`MusicPlayer::play`] as if the current time were `now`.
    ///
    /// Starting a track while a fade is running abandons that fade and
    /// fades to the new track from the current one.
    pub fn play_at(&mut self, path: &str, fade: bool, now: Instant) {
        if self.fade.is_active() {
            debug!("Abandoning fade to {:?}", self.next.as_ref().map(|t| &t.path));
            if let Some(current) = self.current.as_mut() {
                current.volume = 100.0;
            }
            self.next = None;
            self.fade.stop();
            self.play_at(path, true, now);
            return;
        }

        if fade {
            debug!("Fading in {}", path);
            self.next = Some(Track::new(path, 0.0));
            self.fade.reset_at(Self::FADE_DURATION, now);
        } else {
            debug!("Playing {}", path);
            self.current = Some(Track::new(path, 100.0));
        }
    }

    /// Advances the crossfade to `now`.
    pub fn update_at(&mut self, now: Instant) {
        if !self.fade.is_active() {
            return;
        }

        let percent = self.fade.percent_over_at(now);
        if let Some(current) = self.current.as_mut() {
            current.volume = 100.0 - percent;
        }
        if let Some(next) = self.next.as_mut() {
            next.volume = percent;
        }

        if self.fade.is_over_at(now) {
            self.fade.stop();
            self.current = self.next.take();
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Track> {
        self.next.as_ref()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_active()
    }
}

impl Default for MusicPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tick for MusicPlayer {
    fn tick(&mut self, frame: &FrameTime) {
        self.update_at(frame.now);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
