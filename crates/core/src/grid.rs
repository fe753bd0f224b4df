//! Grid module - the locked-cell matrix
//!
//! The grid is a 10x20 matrix where each cell is empty (0) or holds a color
//! index in 1..=7. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom).
//!
//! Only locking and line clearing mutate a grid during play; both live in
//! their own modules and go through [`Grid::set`] / [`Grid::clear_full_rows`].

use arrayvec::ArrayVec;

use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH, MAX_COLOR};

const WIDTH: usize = GRID_WIDTH as usize;
const HEIGHT: usize = GRID_HEIGHT as usize;

/// Total number of cells on the grid
const GRID_SIZE: usize = WIDTH * HEIGHT;

/// Row indices removed by one clear, bottom to top
pub type ClearedRows = ArrayVec<usize, HEIGHT>;

/// The game grid - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; GRID_SIZE],
}

/// Create an empty grid.
pub fn create_grid() -> Grid {
    Grid::new()
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [0; GRID_SIZE],
        }
    }

    /// Build a grid from rows of color indices (top row first).
    ///
    /// Panics if the shape is not 20 rows of 10 cells or a value exceeds 7.
    pub fn from_rows(rows: &[[Cell; WIDTH]]) -> Self {
        assert_eq!(rows.len(), HEIGHT, "grid needs exactly {} rows", HEIGHT);
        let mut grid = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                grid.set(x as i8, y as i8, cell);
            }
        }
        grid
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= GRID_WIDTH as i8 || y < 0 || y >= GRID_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    ///
    /// Returns false if out of bounds. Panics on a color index above 7, since
    /// an out-of-range cell would break every consumer of the grid.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        assert!(cell <= MAX_COLOR, "cell value {} out of range 0..=7", cell);
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if c != 0)
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Borrow one row
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|&cell| cell != 0)
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Remove all full rows, compacting the rest downwards.
    ///
    /// Two-pointer scan from the bottom: non-full rows are copied down to the
    /// write cursor, then the vacated rows at the top are zeroed. Returns the
    /// removed row indices, bottom to top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src = read_y * WIDTH;
                    self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
                }
            }
        }

        self.cells[..write_y * WIDTH].fill(0);
        cleared
    }

    /// Copy the grid into a 2D array (row-major, top row first)
    pub fn write_rows(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
