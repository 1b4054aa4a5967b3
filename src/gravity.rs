#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when casting levels to f32 since levels never exceed 20
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::game::{MAX_LEVEL, REFERENCE_FRAME_RATE, SOFT_DROP_INTERVAL};

/// Seconds per gravity row at `level`: the reference frame rate divided by a
/// frames-per-row curve that steepens up to level 10 and again beyond it.
#[must_use]
pub fn interval_for_level(level: u32) -> f32 {
    let level = level.min(MAX_LEVEL) as f32;
    let frames_per_row = if level <= 10.0 {
        53.0 - 4.0 * level
    } else {
        10.0 - (level - 10.0)
    };
    1.0 / (REFERENCE_FRAME_RATE / frames_per_row)
}

/// Accumulates frame time and fires once per gravity tick
#[derive(Resource, Debug, Clone)]
pub struct GravityClock {
    interval: f32,
    accumulated: f32,
    soft_drop_interval: f32,
}

impl Default for GravityClock {
    fn default() -> Self {
        Self::new(0, SOFT_DROP_INTERVAL)
    }
}

impl GravityClock {
    #[must_use]
    pub fn new(level: u32, soft_drop_interval: f32) -> Self {
        Self {
            interval: interval_for_level(level),
            accumulated: 0.0,
            soft_drop_interval,
        }
    }

    /// Re-derives the interval after a level change
    pub fn set_level(&mut self, level: u32) {
        self.interval = interval_for_level(level);
        debug!("Gravity interval for level {level}: {:.4}s", self.interval);
    }

    #[must_use]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Holding soft drop clamps the interval to the soft drop minimum
    #[must_use]
    pub fn effective_interval(&self, soft_drop: bool) -> f32 {
        if soft_drop {
            self.interval.min(self.soft_drop_interval)
        } else {
            self.interval
        }
    }

    /// Adds elapsed time and reports whether a tick fired
    pub fn advance(&mut self, delta_seconds: f32, soft_drop: bool) -> bool {
        self.accumulated += delta_seconds;
        let interval = self.effective_interval(soft_drop);
        if self.accumulated >= interval {
            trace!("Gravity tick after {:.4}s", self.accumulated);
            self.accumulated = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset_accumulator(&mut self) {
        self.accumulated = 0.0;
    }

    #[must_use]
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }
}
