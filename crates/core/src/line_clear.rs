//! Line-clear engine
//!
//! Pure form of [`Grid::clear_full_rows`]; the session loop clears in place.

use crate::grid::Grid;

/// Remove every full row from `grid`.
///
/// Returns the compacted grid and how many rows were removed. Empty rows are
/// prepended so the height never changes, and surviving rows keep their
/// relative order.
pub fn clear_lines(grid: &Grid) -> (Grid, usize) {
    let mut next = grid.clone();
    let cleared = next.clear_full_rows().len();
    (next, cleared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(grid: &mut Grid, y: i8, color: u8) {
        for x in 0..10 {
            grid.set(x, y, color);
        }
    }

    #[test]
    fn test_no_full_rows_is_identity() {
        let mut grid = Grid::new();
        grid.set(0, 19, 1);
        grid.set(9, 5, 2);
        let (next, cleared) = clear_lines(&grid);
        assert_eq!(cleared, 0);
        assert_eq!(next, grid);
    }

    #[test]
    fn test_single_full_row_shifts_rows_above() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 10, 4);
        grid.set(2, 9, 6);
        grid.set(3, 11, 7);

        let (next, cleared) = clear_lines(&grid);
        assert_eq!(cleared, 1);
        assert_eq!(next.height(), 20);
        assert!(next.row(0).iter().all(|&c| c == 0));
        // Row 9 moved down to 10, row 11 stayed put.
        assert_eq!(next.get(2, 10), Some(6));
        assert_eq!(next.get(3, 11), Some(7));
        assert_eq!(next.filled_count(), 2);
    }

    #[test]
    fn test_non_adjacent_full_rows() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 19, 1);
        fill_row(&mut grid, 17, 2);
        fill_row(&mut grid, 15, 3);
        grid.set(5, 18, 4);
        grid.set(5, 16, 5);

        let (next, cleared) = clear_lines(&grid);
        assert_eq!(cleared, 3);
        assert_eq!(next.get(5, 19), Some(4));
        assert_eq!(next.get(5, 18), Some(5));
        assert_eq!(next.filled_count(), 2);
    }

    #[test]
    fn test_clear_more_than_four_rows() {
        let mut grid = Grid::new();
        for y in 12..20 {
            fill_row(&mut grid, y, 1);
        }
        let (next, cleared) = clear_lines(&grid);
        assert_eq!(cleared, 8);
        assert_eq!(next.filled_count(), 0);
    }

    #[test]
    fn test_input_grid_is_not_mutated() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 19, 1);
        let _ = clear_lines(&grid);
        assert!(grid.is_row_full(19));
    }
}
