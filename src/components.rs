#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow more than 3 bools in structs for input handling where bools represent distinct flags
    clippy::struct_excessive_bools
)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in world space. The y axis points down, so row 0 is the top
/// of the board and falling means `y + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Quarter turn clockwise on screen (y down)
    #[must_use]
    pub fn rotated_cw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Quarter turn counter-clockwise on screen (y down)
    #[must_use]
    pub fn rotated_ccw(self) -> Self {
        Self::new(self.y, -self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Top-level game state. Only the state machine in `app` writes it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
    HighScore,
}

/// Feature toggles. The combination also picks the high score table.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub ghost_enabled: bool,
    pub hold_enabled: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            ghost_enabled: true,
            hold_enabled: true,
        }
    }
}

/// How the last piece came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Gravity,
    SoftDrop,
    HardDrop,
}

/// Per-game bookkeeping the state machine reads after each frame
#[derive(Resource, Debug, Clone, Default)]
pub struct Session {
    pub topped_out: bool,
    pub last_drop: Option<DropKind>,
    pub pieces_locked: u32,
    pub pause_cooldown: f32,
}

impl Session {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// Screen shake effect
#[derive(Debug, Clone, Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub current_offset: (i16, i16),
    pub is_active: bool,
    pub horizontal_bias: bool, // When true, shake will prioritize horizontal movement
}

// Logical input for the current frame, resolved from raw keys through the bindings
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub soft_drop: bool, // Held, not edge triggered
    pub hard_drop: bool,
    pub hold: bool,
    pub pause: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub confirm: bool,
    pub back: bool,
}

impl Input {
    #[must_use]
    pub fn horizontal(&self) -> i32 {
        i32::from(self.move_right) - i32::from(self.move_left)
    }

    #[must_use]
    pub fn rotation(&self) -> i32 {
        i32::from(self.rotate_right) - i32::from(self.rotate_left)
    }
}
