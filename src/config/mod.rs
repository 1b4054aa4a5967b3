pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::components::Rules;
use crate::game::{CLEAR_PAUSE, PAUSE_COOLDOWN, SOFT_DROP_INTERVAL};
use crate::input::KeyBindings;

// Everything the player can tune from the config file. Missing fields fall
// back to their defaults, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    // Plain values must precede the tables in TOML
    pub highscore_dir: Option<PathBuf>,
    pub rules: Rules,
    pub timing: TimingConfig,
    pub bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub clear_pause: f32,        // Seconds full rows flash before they are removed
    pub pause_cooldown: f32,     // Seconds after un-pausing before pausing again is allowed
    pub soft_drop_interval: f32, // Gravity interval clamp while soft drop is held
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clear_pause: CLEAR_PAUSE,
            pause_cooldown: PAUSE_COOLDOWN,
            soft_drop_interval: SOFT_DROP_INTERVAL,
        }
    }
}

impl Config {
    /// Directory holding the high score tables
    #[must_use]
    pub fn highscore_dir(&self) -> PathBuf {
        self.highscore_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("falling_blocks").join("scores"))
                .unwrap_or_else(|| PathBuf::from("scores"))
        })
    }
}
