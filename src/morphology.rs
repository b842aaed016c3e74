//! Binary erosion and dilation with a flat 3x3 structuring element (8-connected).
//!
//! Neighbours that fall outside the grid are skipped, never treated as on or off.

use crate::grid::Grid;

const SE_RADIUS: usize = 1;

/// A pixel stays on when every in-bounds pixel of its 3x3 window is on.
///
/// The outer ring of the output is always off.
pub fn erode_3x3(grid: &Grid<bool>) -> Grid<bool> {
    let (width, height) = grid.dimensions();
    let mut out = Grid::new(width, height, false);
    if width < 3 || height < 3 {
        return out;
    }
    for row in 1..height - 1 {
        for col in 1..width - 1 {
            if grid.window(row, col, SE_RADIUS).all(|v| *v) {
                out.set(row, col, true);
            }
        }
    }
    out
}

/// A pixel turns on when any in-bounds pixel of its 3x3 window is on, border included.
pub fn dilate_3x3(grid: &Grid<bool>) -> Grid<bool> {
    let (width, height) = grid.dimensions();
    let mut out = Grid::new(width, height, false);
    for row in 0..height {
        for col in 0..width {
            if grid.window(row, col, SE_RADIUS).any(|v| *v) {
                out.set(row, col, true);
            }
        }
    }
    out
}

/// `n` erosions in a row. `n == 0` returns a copy of the input.
pub fn n_erosions(grid: &Grid<bool>, n: usize) -> Grid<bool> {
    (0..n).fold(grid.clone(), |acc, _| erode_3x3(&acc))
}

/// `n` dilations in a row. `n == 0` returns a copy of the input.
pub fn n_dilations(grid: &Grid<bool>, n: usize) -> Grid<bool> {
    (0..n).fold(grid.clone(), |acc, _| dilate_3x3(&acc))
}

#[cfg(test)]
mod test {
    use super::*;

    fn rectangle(width: usize, height: usize, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> Grid<bool> {
        let mut grid = Grid::new(width, height, false);
        for row in rows {
            for col in cols.clone() {
                grid.set(row, col, true);
            }
        }
        grid
    }

    #[test]
    fn erosion_shrinks_by_one() {
        let grid = rectangle(9, 9, 2..7, 2..7);
        assert_eq!(erode_3x3(&grid), rectangle(9, 9, 3..6, 3..6));
    }

    #[test]
    fn erosion_never_sets_the_border() {
        let grid = Grid::new(5, 4, true);
        let eroded = erode_3x3(&grid);
        assert_eq!(eroded, rectangle(5, 4, 1..3, 1..4));
    }

    #[test]
    fn dilation_grows_into_the_border() {
        let mut grid = Grid::new(4, 4, false);
        grid.set(0, 0, true);
        assert_eq!(dilate_3x3(&grid), rectangle(4, 4, 0..2, 0..2));
    }

    #[test]
    fn opening_restores_solid_rectangle() {
        let grid = rectangle(12, 12, 3..9, 2..9);
        let opened = dilate_3x3(&erode_3x3(&grid));
        assert_eq!(opened, grid);
    }

    #[test]
    fn opening_stays_inside_dilation() {
        let mut grid = rectangle(10, 10, 2..7, 2..7);
        grid.set(0, 9, true);
        grid.set(8, 1, true);
        let dilated = dilate_3x3(&grid);
        let opened = dilate_3x3(&erode_3x3(&grid));
        for (o, d) in opened.as_slice().iter().zip(dilated.as_slice()) {
            assert!(!*o || *d);
        }
    }

    #[test]
    fn zero_passes_is_identity() {
        let grid = rectangle(6, 6, 1..3, 2..5);
        assert_eq!(n_erosions(&grid, 0), grid);
        assert_eq!(n_dilations(&grid, 0), grid);
    }

    #[test]
    fn passes_are_chained() {
        let mut grid = Grid::new(9, 9, false);
        grid.set(4, 4, true);
        assert_eq!(n_dilations(&grid, 2), rectangle(9, 9, 2..7, 2..7));
        assert_eq!(n_erosions(&n_dilations(&grid, 2), 2), rectangle(9, 9, 4..5, 4..5));
    }
}
