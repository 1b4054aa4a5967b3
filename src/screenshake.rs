#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from f32 to i16 since shake offsets are a few cells at most
    clippy::cast_possible_truncation,
    // Allow precision loss when casting between numeric types since exact precision isn't critical for visual effects
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::ScreenShake;

// Intensity added per hard-dropped row and its ceiling
const HARD_DROP_INTENSITY_PER_ROW: f32 = 0.1;
const MAX_HARD_DROP_INTENSITY: f32 = 2.0;
const HARD_DROP_DURATION: f32 = 0.2;

/// Triggers a screen shake effect with the specified intensity and duration
pub fn trigger_screen_shake(world: &mut World, intensity: f32, duration: f32) {
    let mut screen_shake = world.resource_mut::<ScreenShake>();
    screen_shake.intensity = intensity;
    screen_shake.duration = duration;
    screen_shake.is_active = true;
    screen_shake.horizontal_bias = false;
    trace!("Screen shake triggered with intensity {intensity}");
}

/// One-shot shake proportional to how far a piece was hard dropped
pub fn trigger_hard_drop_shake(world: &mut World, rows: u32) {
    if rows == 0 {
        return;
    }
    let intensity = (rows as f32 * HARD_DROP_INTENSITY_PER_ROW).min(MAX_HARD_DROP_INTENSITY);
    trigger_screen_shake(world, intensity, HARD_DROP_DURATION);
}

/// Triggers a line clear screen shake with horizontal bias
pub fn trigger_line_clear_shake(world: &mut World, lines_cleared: usize) {
    // Scale intensity based on number of lines cleared
    let base_intensity = 1.2;
    let intensity_multiplier = match lines_cleared {
        2 => 1.5,
        3 => 2.0,
        4 => 3.0,
        _ => 1.0,
    };

    let intensity = base_intensity * intensity_multiplier;
    let duration = 0.2 + (lines_cleared as f32 * 0.1); // Longer duration for more lines

    let mut screen_shake = world.resource_mut::<ScreenShake>();
    screen_shake.intensity = intensity;
    screen_shake.duration = duration;
    screen_shake.is_active = true;
    screen_shake.horizontal_bias = true;

    trace!("Line clear screen shake triggered with intensity {intensity}");
}

/// Updates the screen shake state based on elapsed time
pub fn update_screen_shake(world: &mut World, delta_seconds: f32) {
    let mut screen_shake = world.resource_mut::<ScreenShake>();
    if screen_shake.duration <= 0.0 {
        return;
    }
    screen_shake.duration -= delta_seconds;

    if screen_shake.duration <= 0.0 {
        // Reset shake when duration expires
        screen_shake.intensity = 0.0;
        screen_shake.current_offset = (0, 0);
        screen_shake.is_active = false;
        screen_shake.horizontal_bias = false;
        return;
    }

    // Fade out as the remaining duration runs down
    let intensity = screen_shake.intensity * (screen_shake.duration / 0.3).min(1.0);
    let max_offset = ((intensity * 2.0) as i16).max(1);

    screen_shake.current_offset = if screen_shake.horizontal_bias {
        // For line clear: more horizontal movement, less vertical
        (
            fastrand::i16(0..=max_offset) - max_offset / 2,
            fastrand::i16(0..=(max_offset / 3)) - max_offset / 6,
        )
    } else {
        (
            fastrand::i16(0..=max_offset) - max_offset / 2,
            fastrand::i16(0..=max_offset) - max_offset / 2,
        )
    };
}
