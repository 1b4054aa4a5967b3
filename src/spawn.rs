#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::debug;

use crate::pieces::PieceType;

/// What pressing hold did to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The current piece was parked; the caller spawns the next one
    Stored,
    /// The held piece came back and must be placed at the spawn point
    Swapped(PieceType),
    /// Nothing to hold
    Empty,
}

/// Current piece, one-piece preview and the held piece
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnQueue {
    current: Option<PieceType>,
    preview: Option<PieceType>,
    held: Option<PieceType>,
}

impl SpawnQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform pick among the seven shapes
    #[must_use]
    pub fn draw_next() -> PieceType {
        PieceType::random()
    }

    /// Promotes the preview to current and draws a new preview
    pub fn advance(&mut self) -> PieceType {
        self.advance_with(Self::draw_next)
    }

    /// Same as `advance` with a caller-supplied draw
    pub fn advance_with(&mut self, mut draw: impl FnMut() -> PieceType) -> PieceType {
        let current = match self.preview.take() {
            Some(piece) => piece,
            None => draw(),
        };
        self.preview = Some(draw());
        self.current = Some(current);
        debug!(
            "Spawning {} (next: {:?})",
            current.name(),
            self.preview.map(PieceType::name)
        );
        current
    }

    /// Parks the current piece, or swaps it with the held one
    pub fn hold(&mut self) -> HoldOutcome {
        let Some(current) = self.current.take() else {
            return HoldOutcome::Empty;
        };
        match self.held.replace(current) {
            Some(previous) => {
                self.current = Some(previous);
                HoldOutcome::Swapped(previous)
            }
            None => HoldOutcome::Stored,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<PieceType> {
        self.current
    }

    #[must_use]
    pub fn preview(&self) -> Option<PieceType> {
        self.preview
    }

    #[must_use]
    pub fn held(&self) -> Option<PieceType> {
        self.held
    }

    /// Forgets the current, preview and held pieces
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
