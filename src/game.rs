#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Affine offsets between world coordinates and grid indices
// row = y + ROW_OFFSET, column = x + COLUMN_OFFSET (both truncated)
pub const ROW_OFFSET: f32 = 9.5;
pub const COLUMN_OFFSET: f32 = 4.5;

// Piece origin for every spawn (top center of the board)
pub const SPAWN_ORIGIN: (f32, f32) = (0.0, -9.0);

// Off-board parking spots for the preview and held pieces
pub const PREVIEW_ORIGIN: (f32, f32) = (9.0, -6.0);
pub const HOLD_ORIGIN: (f32, f32) = (-9.0, -6.0);

// Game timing
pub const CLEAR_PAUSE: f32 = 1.0; // Seconds the board flashes before full rows are removed
pub const CLEAR_FLASHES: f32 = 4.0; // Color swaps per clear pause
pub const PAUSE_COOLDOWN: f32 = 0.5; // Seconds after un-pausing before pause is accepted again
pub const SOFT_DROP_INTERVAL: f32 = 0.05; // Tick interval clamp while soft drop is held

// Gravity curve
pub const REFERENCE_FRAME_RATE: f32 = 59.73;

// Line clear scoring (multiplied by level + 1)
pub const POINTS_SINGLE: u32 = 40;
pub const POINTS_DOUBLE: u32 = 100;
pub const POINTS_TRIPLE: u32 = 300;
pub const POINTS_TETRIS: u32 = 1200;

pub const SOFT_DROP_POINTS: u32 = 1; // Points per row soft dropped
pub const HARD_DROP_POINTS: u32 = 2; // Points per row hard dropped

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;
pub const MAX_LEVEL: u32 = 20;
pub const STARTING_LEVEL: u32 = 0;
pub const SELECTABLE_LEVELS: u32 = 10; // Levels 0..=9 offered by the level select menu

// High score tables
pub const HIGH_SCORE_ENTRIES: usize = 10;
pub const NAME_CAP: usize = 10;
