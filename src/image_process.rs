//! Per-pixel operators of the locator: greyscale, rescaling, statistics and thresholding.
//! Each one allocates and returns a new grid with the shape of its input.

use crate::error::{LprError, LprErrorKind, LprResult};
use crate::grid::Grid;

const RED_WEIGHT: f64 = 0.299;
const GREEN_WEIGHT: f64 = 0.587;
const BLUE_WEIGHT: f64 = 0.114;

/// Luminance of three channel grids, rounded half away from zero.
pub fn rgb_to_greyscale(red: &Grid<u8>, green: &Grid<u8>, blue: &Grid<u8>) -> LprResult<Grid<u8>> {
    red.same_shape(green)?;
    red.same_shape(blue)?;
    let (width, height) = red.dimensions();
    let data = red.as_slice().iter()
        .zip(green.as_slice())
        .zip(blue.as_slice())
        .map(|((&r, &g), &b)| {
            let grey = RED_WEIGHT * r as f64 + GREEN_WEIGHT * g as f64 + BLUE_WEIGHT * b as f64;
            grey.round().min(255.0) as u8
        })
        .collect();
    Grid::from_vec(width, height, data)
}

/// `(min, max)` over the whole grid, `None` for an empty grid.
pub fn min_max_values<T: Copy + Into<f64>>(grid: &Grid<T>) -> Option<(f64, f64)> {
    let mut iter = grid.as_slice().iter().map(|v| (*v).into());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), v| {
        (if v < min { v } else { min }, if v > max { v } else { max })
    }))
}

/// Stretch the grid linearly onto `0..=255`.
///
/// A flat grid has nothing to stretch and comes back all zero.
pub fn scale_to_0_255<T: Copy + Into<f64>>(grid: &Grid<T>) -> Grid<u8> {
    let (min, max) = match min_max_values(grid) {
        Some(range) => range,
        None => return grid.map(|_| 0),
    };
    if max - min == 0.0 {
        return grid.map(|_| 0);
    }
    let range = max - min;
    grid.map(|v| {
        let out = ((*v).into() - min) * 255.0 / range;
        out.round().max(0.0).min(255.0) as u8
    })
}

/// Frequency of every value in `0..nr_bins`.
///
/// Every sample must be below `nr_bins`; anything else is an `OutOfRangeValue` error.
pub fn compute_histogram(grid: &Grid<u8>, nr_bins: usize) -> LprResult<Vec<f64>> {
    let mut histogram = vec![0.0; nr_bins];
    for (row, values) in grid.rows().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let value = value as usize;
            match histogram.get_mut(value) {
                Some(bin) => *bin += 1.0,
                None => {
                    return Err(LprError::from(LprErrorKind::OutOfRangeValue { value, bins: nr_bins, row, col }));
                }
            }
        }
    }
    Ok(histogram)
}

/// Reach of the contrast window around each pixel. The window is 5x5 even though
/// the operator is historically called the 3x3 deviation filter.
pub const DEVIATION_RADIUS: usize = 2;

/// Local contrast map: population standard deviation of the 5x5 neighbourhood
/// (clipped at the border) of each pixel.
///
/// Only pixels at least one step from the border are computed, the outer ring stays 0.
pub fn standard_deviation_5x5(grid: &Grid<u8>) -> Grid<f64> {
    let (width, height) = grid.dimensions();
    let mut out = Grid::new(width, height, 0.0);
    if width < 3 || height < 3 {
        return out;
    }
    let mut samples = Vec::with_capacity((2 * DEVIATION_RADIUS + 1).pow(2));
    for row in 1..height - 1 {
        for col in 1..width - 1 {
            samples.clear();
            samples.extend(grid.window(row, col, DEVIATION_RADIUS).map(|v| *v as f64));
            let count = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / count;
            let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
            out.set(row, col, variance.sqrt());
        }
    }
    out
}

/// `true` wherever the sample is at least `threshold`.
pub fn threshold_ge<T: Copy + PartialOrd>(grid: &Grid<T>, threshold: T) -> Grid<bool> {
    grid.map(|v| *v >= threshold)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::error::Error;

    #[test]
    fn grey_channels_stay_grey() -> Result<(), Box<dyn Error>> {
        let values: Vec<u8> = (0..=255).collect();
        let channel = Grid::from_vec(16, 16, values)?;
        let grey = rgb_to_greyscale(&channel, &channel, &channel)?;
        for (a, b) in grey.as_slice().iter().zip(channel.as_slice()) {
            assert!((*a as i16 - *b as i16).abs() <= 1, "{} vs {}", a, b);
        }
        Ok(())
    }

    #[test]
    fn greyscale_weights() -> Result<(), Box<dyn Error>> {
        let r = Grid::from_vec(3, 1, vec![255, 0, 0])?;
        let g = Grid::from_vec(3, 1, vec![0, 255, 0])?;
        let b = Grid::from_vec(3, 1, vec![0, 0, 255])?;
        let grey = rgb_to_greyscale(&r, &g, &b)?;
        // 76.245, 149.685, 29.07
        assert_eq!(grey.as_slice(), &[76, 150, 29]);
        Ok(())
    }

    #[test]
    fn greyscale_rejects_mismatched_channels() {
        let r = Grid::new(3, 2, 0u8);
        let g = Grid::new(3, 2, 0u8);
        let b = Grid::new(2, 3, 0u8);
        let err = rgb_to_greyscale(&r, &g, &b).unwrap_err();
        match err.kind() {
            LprErrorKind::ShapeMismatch { expected, actual } => {
                assert_eq!(*expected, (3, 2));
                assert_eq!(*actual, (2, 3));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn min_max() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[3.5, -1.0], [7.25, 0.0]])?;
        assert_eq!(min_max_values(&grid), Some((-1.0, 7.25)));
        assert_eq!(min_max_values(&Grid::<u8>::new(0, 0, 0)), None);
        Ok(())
    }

    #[test]
    fn scale_stretches_to_full_range() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[10u8, 20], [30, 60]])?;
        let scaled = scale_to_0_255(&grid);
        assert_eq!(scaled.as_slice(), &[0, 51, 102, 255]);
        Ok(())
    }

    #[test]
    fn scale_rounds_half_away_from_zero() -> Result<(), Box<dyn Error>> {
        // 1 * 255 / 6 = 42.5
        let grid = Grid::from_rows(&[[0u8, 1, 6]])?;
        assert_eq!(scale_to_0_255(&grid).as_slice(), &[0, 43, 255]);
        Ok(())
    }

    #[test]
    fn scale_is_idempotent_on_full_range() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[0u8, 17, 128], [200, 254, 255]])?;
        assert_eq!(scale_to_0_255(&grid), grid);
        Ok(())
    }

    #[test]
    fn scale_of_flat_grid_is_zero() {
        let grid = Grid::new(4, 3, 7.5f64);
        let scaled = scale_to_0_255(&grid);
        assert_eq!(scaled.dimensions(), (4, 3));
        assert!(scaled.as_slice().iter().all(|v| *v == 0));
    }

    #[test]
    fn scale_is_monotonic() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_vec(5, 1, vec![-3.0, -1.5, 0.2, 0.21, 9.0])?;
        let scaled = scale_to_0_255(&grid);
        assert!(scaled.as_slice().windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn histogram_counts() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[0u8, 1, 1], [3, 1, 0]])?;
        assert_eq!(compute_histogram(&grid, 4)?, vec![2.0, 3.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn histogram_rejects_values_past_last_bin() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[0u8, 1], [4, 1]])?;
        let err = compute_histogram(&grid, 4).unwrap_err();
        match err.kind() {
            LprErrorKind::OutOfRangeValue { value, bins, row, col } => {
                assert_eq!((*value, *bins, *row, *col), (4, 4, 1, 0));
            }
            other => panic!("unexpected error {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn deviation_leaves_outer_ring() {
        let mut grid = Grid::new(6, 6, 0u8);
        grid.set(3, 3, 200);
        let dev = standard_deviation_5x5(&grid);
        for col in 0..6 {
            assert_eq!(*dev.get(0, col), 0.0);
            assert_eq!(*dev.get(5, col), 0.0);
        }
        for row in 0..6 {
            assert_eq!(*dev.get(row, 0), 0.0);
            assert_eq!(*dev.get(row, 5), 0.0);
        }
        assert!(*dev.get(1, 1) > 0.0);
    }

    #[test]
    fn deviation_window_is_5x5() {
        // (1, 1) sees rows/cols -1..=3 clipped to 0..=3, 16 samples.
        // A bright pixel at distance 2 is only visible to a 5x5 window.
        let mut grid = Grid::new(7, 7, 0u8);
        grid.set(3, 3, 160);
        let dev = standard_deviation_5x5(&grid);
        let mean = 160.0 / 16.0;
        let expected = ((15.0 * mean * mean + (160.0 - mean) * (160.0 - mean)) / 16.0f64).sqrt();
        assert!((dev.get(1, 1) - expected).abs() < 1e-9);
        // interior pixel with a full 25 sample window
        let mean = 160.0 / 25.0;
        let expected = ((24.0 * mean * mean + (160.0 - mean) * (160.0 - mean)) / 25.0f64).sqrt();
        assert!((dev.get(2, 2) - expected).abs() < 1e-9);
    }

    #[test]
    fn deviation_of_tiny_grid_is_zero() {
        let grid = Grid::new(2, 5, 9u8);
        assert!(standard_deviation_5x5(&grid).as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn threshold_is_inclusive() -> Result<(), Box<dyn Error>> {
        let grid = Grid::from_rows(&[[159u8, 160, 161]])?;
        let binary = threshold_ge(&grid, 160);
        assert_eq!(binary.as_slice(), &[false, true, true]);
        assert_eq!(binary.to_levels(255).as_slice(), &[0, 255, 255]);
        Ok(())
    }
}
