#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::info;

use crate::game::{
    HARD_DROP_POINTS, LINES_PER_LEVEL, MAX_LEVEL, POINTS_DOUBLE, POINTS_SINGLE, POINTS_TETRIS,
    POINTS_TRIPLE, SOFT_DROP_POINTS, STARTING_LEVEL,
};

/// Score, cleared lines and level for the running game
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(STARTING_LEVEL)
    }
}

/// What a line clear earned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAward {
    pub points: u32,
    pub leveled_up: bool,
}

impl ScoreState {
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            score: 0,
            lines: 0,
            level: level.min(MAX_LEVEL),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Points for clearing `rows` rows at once at `level`
    #[must_use]
    pub fn line_points(rows: usize, level: u32) -> u32 {
        let base = match rows {
            1 => POINTS_SINGLE,
            2 => POINTS_DOUBLE,
            3 => POINTS_TRIPLE,
            4 => POINTS_TETRIS,
            _ => 0,
        };
        base.saturating_mul(level + 1)
    }

    fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Scores a clear, adds the lines and levels up once the running line
    /// count reaches `(level + 1) * 10`
    pub fn award_lines(&mut self, rows: usize) -> LineAward {
        let points = Self::line_points(rows, self.level);
        self.add_points(points);
        self.lines = self
            .lines
            .saturating_add(u32::try_from(rows).unwrap_or(u32::MAX));

        let leveled_up =
            self.level < MAX_LEVEL && self.lines >= (self.level + 1) * LINES_PER_LEVEL;
        if leveled_up {
            self.level += 1;
            info!("Level up: {}", self.level);
        }

        LineAward { points, leveled_up }
    }

    pub fn award_soft_drop(&mut self, rows: u32) {
        self.add_points(rows.saturating_mul(SOFT_DROP_POINTS));
    }

    pub fn award_hard_drop(&mut self, rows: u32) {
        self.add_points(rows.saturating_mul(HARD_DROP_POINTS));
    }
}
