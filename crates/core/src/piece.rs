//! Active piece - the falling block

use crate::collision::check_collision;
use crate::grid::Grid;
use crate::shape::{rotate, Shape, ShapeKind};
use crate::types::{Cell, SPAWN_X, SPAWN_Y};

/// The currently falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: ShapeKind,
    /// Current matrix, after any rotations
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
    pub color: Cell,
}

impl ActivePiece {
    /// New piece of `kind` at the spawn position
    pub fn spawn(kind: ShapeKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            x: SPAWN_X,
            y: SPAWN_Y,
            color: kind.color(),
        }
    }

    pub fn collides(&self, grid: &Grid) -> bool {
        check_collision(grid, &self.shape, self.x, self.y)
    }

    /// Shift by (dx, dy) if the target is free. Returns whether it moved.
    pub fn try_shift(&mut self, grid: &Grid, dx: i8, dy: i8) -> bool {
        if check_collision(grid, &self.shape, self.x + dx, self.y + dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    /// Rotate clockwise in place if the rotated matrix fits at the same origin.
    pub fn try_rotate(&mut self, grid: &Grid) -> bool {
        let rotated = rotate(&self.shape);
        if check_collision(grid, &rotated, self.x, self.y) {
            return false;
        }
        self.shape = rotated;
        true
    }

    /// Absolute grid coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}
