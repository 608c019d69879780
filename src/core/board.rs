//! Seeded board generation.
//!
//! A board is entirely determined by `(master_seed, reset_index)`. It is
//! never persisted; the client regenerates it to render, the validator
//! regenerates it to verify, and both must see bit-identical grids.

use serde::{Deserialize, Serialize};

use crate::core::rng::SeededRng;

/// Number of columns in the canonical grid.
///
/// The grid shape is a single shared constant pair: the board the player
/// sees and the board the validator replays against must agree exactly.
pub const GRID_COLS: usize = 10;

/// Number of rows in the canonical grid.
pub const GRID_ROWS: usize = 15;

/// Total number of cells on one board.
pub const TOTAL_CELLS: usize = GRID_COLS * GRID_ROWS;

/// Smallest tile value.
pub const TILE_MIN: u8 = 1;

/// Largest tile value.
pub const TILE_MAX: u8 = 9;

/// Multiplier combining the reset index into the seed.
/// Must match the client: `combined = master_seed + reset_index * 1_000_000`.
const RESET_SEED_STRIDE: u64 = 1_000_000;

/// A generated board: `GRID_ROWS x GRID_COLS` tile values in `1..=9`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[u8; GRID_COLS]; GRID_ROWS],
}

impl Board {
    /// Generate the board for `(master_seed, reset_index)`.
    ///
    /// Cells are filled row-major, one independent draw each. The combined
    /// seed `master_seed + reset_index * 1_000_000` wraps to 32 bits, the
    /// same coercion the client applies.
    pub fn generate(master_seed: u32, reset_index: u32) -> Self {
        let combined = master_seed as u64 + reset_index as u64 * RESET_SEED_STRIDE;
        let mut rng = SeededRng::new(combined as u32);

        let mut cells = [[0u8; GRID_COLS]; GRID_ROWS];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.next_int(TILE_MIN as i32, TILE_MAX as i32) as u8;
            }
        }

        Self { cells }
    }

    /// Tile value at `(row, col)`.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// All rows, for serialization toward the client.
    pub fn rows(&self) -> &[[u8; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }
}

/// Tracks which cells of the current board have been popped.
///
/// Cleared wholesale on every board regeneration.
#[derive(Clone, Debug, Default)]
pub struct PoppedMask {
    popped: [[bool; GRID_COLS]; GRID_ROWS],
}

impl PoppedMask {
    /// Fresh mask with no cell popped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Has `(row, col)` been popped?
    #[inline]
    pub fn is_popped(&self, row: usize, col: usize) -> bool {
        self.popped[row][col]
    }

    /// Mark `(row, col)` popped.
    #[inline]
    pub fn pop(&mut self, row: usize, col: usize) {
        self.popped[row][col] = true;
    }

    /// Reset every cell to unpopped.
    pub fn clear(&mut self) {
        self.popped = [[false; GRID_COLS]; GRID_ROWS];
    }

    /// Number of cells still on the board.
    pub fn remaining(&self) -> usize {
        TOTAL_CELLS
            - self
                .popped
                .iter()
                .map(|row| row.iter().filter(|&&p| p).count())
                .sum::<usize>()
    }
}

// =============================================================================
// TESTS
// =============================================================================
