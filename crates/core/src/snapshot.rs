use crate::piece::ActivePiece;
use crate::shape::{Shape, ShapeKind};
use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH};

const WIDTH: usize = GRID_WIDTH as usize;
const HEIGHT: usize = GRID_HEIGHT as usize;

/// Row-major cell matrix, top row first
pub type CellRows = [[Cell; WIDTH]; HEIGHT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
    pub color: Cell,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
            color: value.color,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute cells of the piece, including any above the visible grid
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Read-only copy of everything a renderer or observer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    /// Locked cells only
    pub grid: CellRows,
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces: u32,
    pub fall_speed_ms: f64,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.grid = [[0; WIDTH]; HEIGHT];
        self.active = None;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.pieces = 0;
        self.fall_speed_ms = 0.0;
        self.game_over = false;
    }

    /// Locked cells with the active piece drawn on top (the rendered frame).
    pub fn composited(&self) -> CellRows {
        let mut out = self.grid;
        if let Some(active) = &self.active {
            for (x, y) in active.cells() {
                if (0..WIDTH as i8).contains(&x) && (0..HEIGHT as i8).contains(&y) {
                    out[y as usize][x as usize] = active.color;
                }
            }
        }
        out
    }

    /// Occupancy of the rendered frame: true where a cell shows a block
    pub fn occupancy(&self) -> [[bool; WIDTH]; HEIGHT] {
        let frame = self.composited();
        let mut out = [[false; WIDTH]; HEIGHT];
        for (dst, src) in out.iter_mut().zip(frame.iter()) {
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d = s != 0;
            }
        }
        out
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: [[0; WIDTH]; HEIGHT],
            active: None,
            score: 0,
            level: 0,
            lines: 0,
            pieces: 0,
            fall_speed_ms: 0.0,
            game_over: false,
        }
    }
}
