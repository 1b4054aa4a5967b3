#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::board::Board;
use crate::game::{CLEAR_FLASHES, CLEAR_PAUSE};

/// Full-row detection, the flashing pause and the final collapse.
/// While a clear is pending, gravity and spawning are suspended.
#[derive(Resource, Debug, Clone)]
pub struct LineClear {
    clear_pause: f32,
    remaining: f32,
    pending_rows: usize,
}

impl Default for LineClear {
    fn default() -> Self {
        Self::new(CLEAR_PAUSE)
    }
}

impl LineClear {
    #[must_use]
    pub fn new(clear_pause: f32) -> Self {
        Self {
            clear_pause,
            remaining: 0.0,
            pending_rows: 0,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending_rows > 0
    }

    #[must_use]
    pub fn pending_rows(&self) -> usize {
        self.pending_rows
    }

    #[must_use]
    pub fn flash_interval(&self) -> f32 {
        self.clear_pause / CLEAR_FLASHES
    }

    /// Flags full rows after a lock. Returns how many rows will clear; zero
    /// means play continues immediately.
    pub fn begin(&mut self, board: &mut Board) -> usize {
        let rows = board.mark_full_rows();
        if rows > 0 {
            debug!("{rows} full rows, pausing {:.2}s", self.clear_pause);
            self.pending_rows = rows;
            self.remaining = self.clear_pause;
        }
        rows
    }

    /// Flashes the marked rows and, once the pause has run out, collapses
    /// them. Returns the number of destroyed rows on the frame that happens.
    pub fn advance(&mut self, board: &mut Board, delta_seconds: f32) -> Option<usize> {
        if !self.is_active() {
            return None;
        }
        board.flash_marked_rows(delta_seconds, self.flash_interval());
        self.remaining -= delta_seconds;
        if self.remaining > 0.0 {
            return None;
        }

        let destroyed = board.collapse_marked_rows();
        info!("Cleared {destroyed} rows");
        self.pending_rows = 0;
        self.remaining = 0.0;
        Some(destroyed)
    }

    pub fn reset(&mut self) {
        self.pending_rows = 0;
        self.remaining = 0.0;
    }
}
