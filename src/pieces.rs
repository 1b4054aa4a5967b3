#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting rotation steps back to u8 since they are reduced modulo 4 first
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since rem_euclid results are non-negative
    clippy::cast_sign_loss,
    // Allow precision loss when casting row counts to f32 since they never exceed the board height
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting the board height to i32 since it is a small constant
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{error, trace};
use ratatui::style::Color;

use crate::board::Board;
use crate::components::Vec2;
use crate::game::{BOARD_HEIGHT, SPAWN_ORIGIN};

/// Number of blocks in every piece
pub const PIECE_CELLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Line,
    Square,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::Line,
        PieceType::Square,
        PieceType::T,
        PieceType::J,
        PieceType::L,
        PieceType::S,
        PieceType::Z,
    ];

    /// Maps a catalog index to its shape. Any other index is a programming
    /// error and terminates the process.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => PieceType::Line,
            1 => PieceType::Square,
            2 => PieceType::T,
            3 => PieceType::J,
            4 => PieceType::L,
            5 => PieceType::S,
            6 => PieceType::Z,
            _ => {
                error!("Unrecognized piece type index {index}");
                std::process::exit(1);
            }
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::from_index(fastrand::usize(0..Self::ALL.len()))
    }

    /// Cell offsets relative to the piece origin, in spawn orientation
    #[must_use]
    pub fn offsets(self) -> [Vec2; PIECE_CELLS] {
        let raw: [(f32, f32); PIECE_CELLS] = match self {
            PieceType::Line => [(-1.5, 0.5), (-0.5, 0.5), (0.5, 0.5), (1.5, 0.5)],
            PieceType::Square => [(-0.5, -0.5), (-0.5, 0.5), (0.5, -0.5), (0.5, 0.5)],
            // T turns around its middle block
            PieceType::T => [(0.0, -1.0), (-1.0, 0.0), (0.0, 0.0), (1.0, 0.0)],
            PieceType::J => [(-0.5, -0.5), (-0.5, 0.5), (0.5, 0.5), (1.5, 0.5)],
            PieceType::L => [(0.5, -0.5), (-1.5, 0.5), (-0.5, 0.5), (0.5, 0.5)],
            PieceType::S => [(0.5, -0.5), (1.5, -0.5), (-0.5, 0.5), (0.5, 0.5)],
            PieceType::Z => [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (1.5, 0.5)],
        };
        raw.map(Vec2::from)
    }

    /// Shift applied to a parking spot so every shape's blocks land on cell
    /// centers. Only the T rotates about a block center.
    #[must_use]
    pub fn origin_shift(self) -> Vec2 {
        match self {
            PieceType::T => Vec2::new(0.5, 0.5),
            _ => Vec2::default(),
        }
    }

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            PieceType::Line => Color::Green,
            PieceType::Square => Color::Blue,
            PieceType::T => Color::Yellow,
            PieceType::J => Color::Rgb(0xaa, 0x00, 0xff),
            PieceType::L => Color::Red,
            PieceType::S => Color::Rgb(0xff, 0x7f, 0x27),
            PieceType::Z => Color::Rgb(0x00, 0xff, 0xdd),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PieceType::Line => "Line",
            PieceType::Square => "Square",
            PieceType::T => "T",
            PieceType::J => "J",
            PieceType::L => "L",
            PieceType::S => "S",
            PieceType::Z => "Z",
        }
    }
}

/// True when a block may occupy the cell: inside the side walls, above the
/// floor and not on a locked block. Rows above the board are open.
#[must_use]
pub fn cell_is_free(board: &Board, row: i32, col: i32) -> bool {
    Board::is_column_in_bounds(col)
        && row < BOARD_HEIGHT as i32
        && !board.is_occupied(row, col)
}

/// Grid (row, column) of a world position
#[must_use]
pub fn grid_position(position: Vec2) -> (i32, i32) {
    (Board::row_index(position.y), Board::column_index(position.x))
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallOutcome {
    Moved,
    Landed,
}

/// The falling piece
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ActivePiece {
    pub piece_type: PieceType,
    pub origin: Vec2,
    offsets: [Vec2; PIECE_CELLS],
    pub rotation: u8,
    pub soft_drop_distance: u32,
    pub hard_drop_distance: u32,
    pub can_hold: bool,
}

impl ActivePiece {
    /// A new piece at the spawn point
    #[must_use]
    pub fn spawn(piece_type: PieceType) -> Self {
        Self::at(piece_type, Vec2::from(SPAWN_ORIGIN))
    }

    /// A new piece in spawn orientation parked at `anchor`
    #[must_use]
    pub fn at(piece_type: PieceType, anchor: Vec2) -> Self {
        Self {
            piece_type,
            origin: anchor + piece_type.origin_shift(),
            offsets: piece_type.offsets(),
            rotation: 0,
            soft_drop_distance: 0,
            hard_drop_distance: 0,
            can_hold: true,
        }
    }

    /// World positions of the blocks
    #[must_use]
    pub fn cells(&self) -> [Vec2; PIECE_CELLS] {
        self.offsets.map(|offset| self.origin + offset)
    }

    #[must_use]
    pub fn grid_cells(&self) -> [(i32, i32); PIECE_CELLS] {
        self.cells().map(grid_position)
    }

    /// True when any block sits on a locked block. Used right after spawning.
    #[must_use]
    pub fn overlaps(&self, board: &Board) -> bool {
        self.grid_cells()
            .iter()
            .any(|&(row, col)| board.is_occupied(row, col))
    }

    fn fits_after(&self, board: &Board, delta_rows: i32, delta_cols: i32) -> bool {
        self.grid_cells()
            .iter()
            .all(|&(row, col)| cell_is_free(board, row + delta_rows, col + delta_cols))
    }

    #[must_use]
    pub fn can_shift(&self, board: &Board, dx: i32) -> bool {
        self.fits_after(board, 0, dx)
    }

    /// Moves the piece sideways by one column. Returns the distance actually
    /// moved, which is zero when the move is blocked.
    pub fn try_shift(&mut self, board: &Board, dx: i32) -> i32 {
        let dx = dx.signum();
        if dx == 0 || !self.can_shift(board, dx) {
            return 0;
        }
        self.origin.x += dx as f32;
        dx
    }

    fn rotated_offsets(&self, steps: i32) -> [Vec2; PIECE_CELLS] {
        let mut offsets = self.offsets;
        for _ in 0..steps.unsigned_abs() % 4 {
            offsets = offsets.map(|offset| {
                if steps > 0 {
                    offset.rotated_cw()
                } else {
                    offset.rotated_ccw()
                }
            });
        }
        offsets
    }

    /// Rotates by quarter turns (positive is clockwise). The whole rotation
    /// is rejected if any block would leave the walls, sink below the floor or
    /// hit a locked block.
    pub fn try_rotate(&mut self, board: &Board, steps: i32) -> bool {
        if steps == 0 {
            return true;
        }
        let offsets = self.rotated_offsets(steps);
        for offset in offsets {
            let (row, col) = grid_position(self.origin + offset);
            if !cell_is_free(board, row, col) {
                trace!("Cannot rotate {}: blocked at ({row}, {col})", self.piece_type.name());
                return false;
            }
        }
        self.offsets = offsets;
        self.rotation = (i32::from(self.rotation) + steps).rem_euclid(4) as u8;
        true
    }

    #[must_use]
    pub fn can_fall(&self, board: &Board) -> bool {
        self.fits_after(board, 1, 0)
    }

    /// One gravity step. A blocked step leaves the piece in place for locking.
    pub fn fall(&mut self, board: &Board) -> FallOutcome {
        if self.can_fall(board) {
            self.origin.y += 1.0;
            FallOutcome::Moved
        } else {
            FallOutcome::Landed
        }
    }

    /// Falls until landing and returns the number of rows fallen
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut rows = 0;
        while self.fall(board) == FallOutcome::Moved {
            rows += 1;
        }
        self.hard_drop_distance += rows;
        rows
    }
}

/// Landing preview for the active piece
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct Ghost {
    pub drop_rows: u32,
    projected_from: Option<[Vec2; PIECE_CELLS]>,
}

impl Ghost {
    /// Counts how many single-row drops the piece survives, using the same
    /// collision test as real falling. Never touches the board.
    #[must_use]
    pub fn project(piece: &ActivePiece, board: &Board) -> u32 {
        let mut probe = piece.clone();
        let mut rows = 0;
        while probe.fall(board) == FallOutcome::Moved {
            rows += 1;
        }
        rows
    }

    /// Recomputes the projection if the piece moved or rotated since the last
    /// call. Returns whether a recomputation happened.
    pub fn refresh(&mut self, piece: &ActivePiece, board: &Board) -> bool {
        let cells = piece.cells();
        if self.projected_from == Some(cells) {
            return false;
        }
        self.drop_rows = Self::project(piece, board);
        self.projected_from = Some(cells);
        true
    }

    /// Forces the next `refresh` to recompute
    pub fn invalidate(&mut self) {
        self.projected_from = None;
    }

    #[must_use]
    pub fn cells(&self, piece: &ActivePiece) -> [Vec2; PIECE_CELLS] {
        let drop = Vec2::new(0.0, self.drop_rows as f32);
        piece.cells().map(|cell| cell + drop)
    }
}
