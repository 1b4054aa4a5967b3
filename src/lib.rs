pub mod app;
pub mod board;
pub mod components;
pub mod config;
pub mod game;
pub mod gravity;
pub mod highscores;
pub mod input;
pub mod line_clear;
pub mod menu;
pub mod pieces;
pub mod scene;
pub mod scoring;
pub mod screenshake;
pub mod sound;
pub mod spawn;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use bevy_ecs::prelude::Resource;

/// Frame clock fed by the external driver. `elapsed` only advances while a
/// game is being played, so it doubles as the session timer.
#[derive(Resource, Debug, Clone, Default)]
pub struct Time {
    delta: f32,
    elapsed: f32,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, delta_seconds: f32) {
        self.delta = delta_seconds.max(0.0);
    }

    pub fn accumulate_play_time(&mut self) {
        self.elapsed += self.delta;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }
}
