//! Shape module - tetromino catalog and matrix rotation
//!
//! Every shape is a small boolean matrix (at most 4x4) paired with a fixed
//! color index. Rotation is the classic transpose-of-reversed-rows transform,
//! so an R×C matrix becomes C×R. There are no wall kicks: a rotation either
//! fits at the current origin or is rejected by the caller.

/// Largest matrix side of any catalog shape
pub const MAX_SIDE: usize = 4;

/// Offset of an occupied cell relative to the shape origin: (column, row)
pub type CellOffset = (i8, i8);

/// An occupancy matrix of up to 4x4 cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SIDE]; MAX_SIDE],
}

impl Shape {
    /// Build a shape from 0/1 rows, top row first.
    ///
    /// Panics on empty, ragged or oversized input; shapes are static data.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_SIDE, "bad shape height");
        let cols = rows[0].len();
        assert!(cols > 0 && cols <= MAX_SIDE, "bad shape width");

        let mut bits = [[false; MAX_SIDE]; MAX_SIDE];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "ragged shape row {}", r);
            for (c, &v) in row.iter().enumerate() {
                bits[r][c] = v != 0;
            }
        }

        Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            bits,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Whether cell (row, col) is occupied; false outside the matrix
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.bits[row][col]
    }

    /// Occupied cells as (col, row) offsets, row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellOffset> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols())
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }
}

/// Rotate a shape 90° clockwise.
///
/// Equivalent to reversing the row order and transposing: the new cell at
/// (r, c) comes from the old cell at (R-1-c, r).
pub fn rotate(shape: &Shape) -> Shape {
    let old_rows = shape.rows();
    let mut bits = [[false; MAX_SIDE]; MAX_SIDE];
    for (r, row) in bits.iter_mut().enumerate().take(shape.cols()) {
        for (c, cell) in row.iter_mut().enumerate().take(old_rows) {
            *cell = shape.bits[old_rows - 1 - c][r];
        }
    }
    Shape {
        rows: shape.cols,
        cols: shape.rows,
        bits,
    }
}

/// The seven catalog shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    L,
    J,
}

impl ShapeKind {
    /// Catalog order; uniform random selection indexes into this.
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::L,
        ShapeKind::J,
    ];

    /// Spawn orientation matrix
    pub fn shape(&self) -> Shape {
        match self {
            ShapeKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            ShapeKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            ShapeKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            ShapeKind::S => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            ShapeKind::Z => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            ShapeKind::L => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            ShapeKind::J => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }

    /// Fixed color index (1..=7)
    pub fn color(&self) -> u8 {
        match self {
            ShapeKind::I => 1,
            ShapeKind::O => 2,
            ShapeKind::T => 3,
            ShapeKind::S => 4,
            ShapeKind::Z => 5,
            ShapeKind::L => 6,
            ShapeKind::J => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
        }
    }
}
