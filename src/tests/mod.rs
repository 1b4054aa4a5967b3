#![warn(clippy::all, clippy::pedantic)]

// Test modules
pub mod app_tests;
pub mod config_loader_tests;
pub mod highscores_tests;
pub mod scene_tests;
pub mod spawn_tests;
pub mod time_tests;
