#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{error, trace, warn};
use ratatui::style::Color;

use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, COLUMN_OFFSET, ROW_OFFSET};

/// Color every cell flashes to while its row waits to be cleared
pub const FLASH_COLOR: Color = Color::White;

/// A locked block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: Color,
    flash_color: Color,
}

impl Cell {
    fn new(color: Color) -> Self {
        Self {
            color,
            flash_color: FLASH_COLOR,
        }
    }

    fn swap_colors(&mut self) {
        std::mem::swap(&mut self.color, &mut self.flash_color);
    }
}

#[derive(Debug, Clone)]
struct Row {
    cells: [Option<Cell>; BOARD_WIDTH],
    marked_for_clear: bool,
    flash_timer: f32,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            cells: [None; BOARD_WIDTH],
            marked_for_clear: false,
            // Infinite so the first flash happens on the first frame of the pause
            flash_timer: f32::INFINITY,
        }
    }
}

impl Row {
    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Visual side effects the board asks the scene to carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneRequest {
    Create { row: usize, col: usize, color: Color },
    Destroy { row: usize, col: usize },
    ShiftRow { src: usize, dst: usize },
    Recolor { row: usize, col: usize, color: Color },
    ClearAll,
}

#[derive(Resource, Debug, Clone)]
pub struct Board {
    rows: Vec<Row>,
    requests: Vec<SceneRequest>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: vec![Row::default(); BOARD_HEIGHT],
            requests: Vec::new(),
        }
    }

    /// Row index for a world y coordinate
    #[must_use]
    pub fn row_index(y: f32) -> i32 {
        (y + ROW_OFFSET) as i32
    }

    /// Column index for a world x coordinate
    #[must_use]
    pub fn column_index(x: f32) -> i32 {
        (x + COLUMN_OFFSET) as i32
    }

    /// World position of the center of a cell
    #[must_use]
    pub fn cell_center(row: usize, col: usize) -> (f32, f32) {
        (col as f32 - COLUMN_OFFSET, row as f32 - ROW_OFFSET)
    }

    #[must_use]
    pub fn is_row_in_bounds(row: i32) -> bool {
        row >= 0 && row < BOARD_HEIGHT as i32
    }

    #[must_use]
    pub fn is_column_in_bounds(col: i32) -> bool {
        col >= 0 && col < BOARD_WIDTH as i32
    }

    /// Cells outside the grid are never occupied, which leaves room above the
    /// board for pieces to spawn and rotate into.
    #[must_use]
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.cell(row, col).is_some()
    }

    #[must_use]
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        if !Self::is_row_in_bounds(row) || !Self::is_column_in_bounds(col) {
            return None;
        }
        self.rows[row as usize].cells[col as usize]
    }

    /// Writes a block into the grid. Placing onto an occupied or off-grid
    /// cell is logged and ignored.
    pub fn place(&mut self, row: i32, col: i32, color: Color) -> bool {
        if !Self::is_row_in_bounds(row) || !Self::is_column_in_bounds(col) {
            warn!("Dropping block locked outside the board at ({row}, {col})");
            return false;
        }
        let (r, c) = (row as usize, col as usize);
        if self.rows[r].cells[c].is_some() {
            error!("Block placed twice at ({row}, {col})");
            return false;
        }
        self.rows[r].cells[c] = Some(Cell::new(color));
        self.requests.push(SceneRequest::Create {
            row: r,
            col: c,
            color,
        });
        true
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(Row::is_full)
    }

    #[must_use]
    pub fn is_row_marked(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.marked_for_clear)
    }

    #[must_use]
    pub fn marked_rows(&self) -> Vec<usize> {
        (0..BOARD_HEIGHT).filter(|&row| self.is_row_marked(row)).collect()
    }

    /// Empties a row and resets its clear flag and flash phase
    pub fn clear_row(&mut self, row: usize) {
        for col in 0..BOARD_WIDTH {
            if self.rows[row].cells[col].take().is_some() {
                self.requests.push(SceneRequest::Destroy { row, col });
            }
        }
        self.rows[row].marked_for_clear = false;
        self.rows[row].flash_timer = f32::INFINITY;
    }

    /// Moves every block of `src` into `dst` and empties `src`. A block whose
    /// destination is occupied stays where it is.
    pub fn shift_row_down(&mut self, src: usize, dst: usize) {
        if src == dst {
            return;
        }
        for col in 0..BOARD_WIDTH {
            if self.rows[src].cells[col].is_none() {
                continue;
            }
            if self.rows[dst].cells[col].is_some() {
                error!("Block placed twice at ({dst}, {col}) while shifting row {src}");
                continue;
            }
            self.rows[dst].cells[col] = self.rows[src].cells[col].take();
        }
        self.requests.push(SceneRequest::ShiftRow { src, dst });
    }

    /// Flags every full row, scanning from the bottom up, and returns how many
    /// were flagged.
    pub fn mark_full_rows(&mut self) -> usize {
        let mut marked = 0;
        for row in (0..BOARD_HEIGHT).rev() {
            if self.rows[row].is_full() {
                self.rows[row].marked_for_clear = true;
                marked += 1;
            }
        }
        marked
    }

    /// Advances the flash animation of every marked row
    pub fn flash_marked_rows(&mut self, delta_seconds: f32, interval: f32) {
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            if !row.marked_for_clear {
                continue;
            }
            row.flash_timer += delta_seconds;
            if row.flash_timer < interval {
                continue;
            }
            row.flash_timer = 0.0;
            trace!("Flashing row {row_index}");
            for (col, cell) in row.cells.iter_mut().enumerate() {
                if let Some(cell) = cell {
                    cell.swap_colors();
                    self.requests.push(SceneRequest::Recolor {
                        row: row_index,
                        col,
                        color: cell.color,
                    });
                }
            }
        }
    }

    /// Destroys the marked rows and drops each surviving row by the number of
    /// destroyed rows beneath it. Returns the number of destroyed rows.
    pub fn collapse_marked_rows(&mut self) -> usize {
        let mut destroyed = 0;
        for row in (0..BOARD_HEIGHT).rev() {
            if self.rows[row].marked_for_clear {
                self.clear_row(row);
                destroyed += 1;
            } else if destroyed > 0 && self.rows[row].cells.iter().any(Option::is_some) {
                self.shift_row_down(row, row + destroyed);
            }
        }
        destroyed
    }

    /// Empties the whole grid
    pub fn clear(&mut self) {
        self.rows = vec![Row::default(); BOARD_HEIGHT];
        self.requests.push(SceneRequest::ClearAll);
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }

    /// Hands the pending scene requests to the caller
    pub fn take_requests(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.requests)
    }
}
