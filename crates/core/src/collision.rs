//! Collision and lock engine
//!
//! Pure placement queries against a [`Grid`] plus the single operation that
//! commits a piece into it.

use crate::grid::Grid;
use crate::shape::Shape;
use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH};

/// Test whether `shape` placed with its origin at (x, y) collides.
///
/// A cell collides when its column is outside the grid, its row is below the
/// floor, or it lands on an occupied cell. Cells above the top edge (negative
/// row) are only checked against the side walls.
pub fn check_collision(grid: &Grid, shape: &Shape, x: i8, y: i8) -> bool {
    shape.cells().any(|(dx, dy)| {
        let px = x + dx;
        let py = y + dy;
        px < 0
            || px >= GRID_WIDTH as i8
            || py >= GRID_HEIGHT as i8
            || (py >= 0 && grid.is_occupied(px, py))
    })
}

/// Commit `shape` at (x, y) into the grid with `color`.
///
/// The caller must have checked [`check_collision`] first. A violated
/// precondition panics before any cell is written, so the grid is never left
/// half-locked.
pub fn lock(grid: &mut Grid, shape: &Shape, x: i8, y: i8, color: Cell) {
    assert!(
        (1..=7).contains(&color),
        "lock: color index {} out of range 1..=7",
        color
    );
    assert!(
        !check_collision(grid, shape, x, y),
        "lock: shape collides at ({}, {})",
        x,
        y
    );
    assert!(
        shape.cells().all(|(_, dy)| y + dy >= 0),
        "lock: shape at ({}, {}) hangs above the grid",
        x,
        y
    );

    for (dx, dy) in shape.cells() {
        grid.set(x + dx, y + dy, color);
    }
}

/// Rows the shape can fall from (x, y) before it would collide.
pub fn drop_distance(grid: &Grid, shape: &Shape, x: i8, y: i8) -> u32 {
    let mut distance: u32 = 0;
    while !check_collision(grid, shape, x, y + distance as i8 + 1) {
        distance += 1;
    }
    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{rotate, ShapeKind};

    #[test]
    fn test_empty_grid_no_collision_at_spawn() {
        let grid = Grid::new();
        for kind in ShapeKind::ALL {
            assert!(!check_collision(&grid, &kind.shape(), 3, 0), "{:?}", kind);
        }
    }

    #[test]
    fn test_walls_and_floor() {
        let grid = Grid::new();
        let o = ShapeKind::O.shape();
        assert!(check_collision(&grid, &o, -1, 0));
        assert!(check_collision(&grid, &o, 9, 0));
        assert!(!check_collision(&grid, &o, 8, 0));
        assert!(!check_collision(&grid, &o, 0, 18));
        assert!(check_collision(&grid, &o, 0, 19));
    }

    #[test]
    fn test_above_top_only_checks_walls() {
        let mut grid = Grid::new();
        grid.set(0, 0, 1);
        let i_vertical = rotate(&ShapeKind::I.shape());
        // Rows -3..=0: only the bottom cell meets the grid, and it is free at x=1.
        assert!(!check_collision(&grid, &i_vertical, 1, -3));
        assert!(check_collision(&grid, &i_vertical, 0, -3));
        assert!(check_collision(&grid, &i_vertical, -1, -3));
        assert!(!check_collision(&grid, &i_vertical, 0, -4));
    }

    #[test]
    fn test_occupied_cell_collides() {
        let mut grid = Grid::new();
        grid.set(4, 1, 3);
        let t = ShapeKind::T.shape();
        assert!(check_collision(&grid, &t, 3, 0));
        // One row up, the T's bottom row sits on row 0 and misses (4,1).
        assert!(!check_collision(&grid, &t, 3, -1));
    }

    #[test]
    fn test_lock_writes_color() {
        let mut grid = Grid::new();
        let t = ShapeKind::T.shape();
        lock(&mut grid, &t, 3, 18, 3);
        assert_eq!(grid.get(4, 18), Some(3));
        assert_eq!(grid.get(3, 19), Some(3));
        assert_eq!(grid.get(4, 19), Some(3));
        assert_eq!(grid.get(5, 19), Some(3));
        assert_eq!(grid.filled_count(), 4);
    }

    #[test]
    #[should_panic(expected = "collides")]
    fn test_lock_on_collision_panics() {
        let mut grid = Grid::new();
        grid.set(4, 19, 1);
        lock(&mut grid, &ShapeKind::O.shape(), 3, 18, 2);
    }

    #[test]
    fn test_failed_lock_leaves_grid_untouched() {
        let mut grid = Grid::new();
        grid.set(4, 19, 1);
        let before = grid.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            lock(&mut grid, &ShapeKind::O.shape(), 3, 18, 2);
        }));
        assert!(result.is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_drop_distance() {
        let mut grid = Grid::new();
        let o = ShapeKind::O.shape();
        assert_eq!(drop_distance(&grid, &o, 0, 0), 18);
        grid.set(0, 10, 1);
        assert_eq!(drop_distance(&grid, &o, 0, 0), 8);
        assert_eq!(drop_distance(&grid, &o, 0, 8), 0);
    }
}
