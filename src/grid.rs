//! Pixel grids shared by every stage of the locator.
//!
//! A [`Grid`] is a flat row-major buffer with explicit width and height.
//! Index order is always `(row, col)`.

use crate::error::{LprError, LprErrorKind, LprResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Grid of component ids, `0` is background.
pub type LabelGrid = Grid<u32>;

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, init: T) -> Self {
        Self { width, height, data: vec![init; width * height] }
    }

    /// Build a grid from nested rows. Every row must have the length of the first one.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> LprResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LprError::shape_mismatch((width, height), (row.len(), height)));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { width, height, data })
    }

    /// Copy out the region covered by `bbox`, corners included.
    /// Parts of the box outside the grid are dropped.
    pub fn crop(&self, bbox: &BoundingBox) -> Self {
        let max_col = bbox.max_col.min(self.width.saturating_sub(1));
        let max_row = bbox.max_row.min(self.height.saturating_sub(1));
        if self.data.is_empty() || bbox.min_col > max_col || bbox.min_row > max_row {
            return Self { width: 0, height: 0, data: Vec::new() };
        }
        let width = max_col - bbox.min_col + 1;
        let height = max_row - bbox.min_row + 1;
        let mut data = Vec::with_capacity(width * height);
        for row in bbox.min_row..=max_row {
            data.extend_from_slice(&self.row(row)[bbox.min_col..=max_col]);
        }
        Self { width, height, data }
    }
}

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> LprResult<Self> {
        if data.len() != width * height {
            return Err(LprErrorKind::BufferLength { expected: width * height, actual: data.len() }.into());
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.height && col < self.width, "({}, {}) out of {}x{} grid", row, col, self.width, self.height);
        row * self.width + col
    }

    #[inline]
    fn check_row(&self, row: usize) {
        assert!(row < self.height, "row {} out of {}x{} grid", row, self.width, self.height);
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let index = self.index(row, col);
        self.data[index] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        self.check_row(row);
        &self.data[row * self.width..(row + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on 0, an empty grid yields no rows anyway
        self.data.chunks(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid { width: self.width, height: self.height, data: self.data.iter().map(f).collect() }
    }

    pub(crate) fn same_shape<U>(&self, other: &Grid<U>) -> LprResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(LprError::shape_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }

    /// Samples inside the window `row ± radius`, `col ± radius`, clipped at the border.
    pub(crate) fn window(&self, row: usize, col: usize, radius: usize) -> impl Iterator<Item = &T> {
        let rows = row.saturating_sub(radius)..(row + radius + 1).min(self.height);
        let cols = col.saturating_sub(radius)..(col + radius + 1).min(self.width);
        rows.flat_map(move |r| self.row(r)[cols.clone()].iter())
    }
}

impl Grid<bool> {
    /// Numeric form of a binary grid: `on` for set pixels, `0` otherwise.
    pub fn to_levels(&self, on: u8) -> Grid<u8> {
        self.map(|&v| if v { on } else { 0 })
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }
}

/// Whether a sample counts as foreground in the binary stages.
pub trait Foreground {
    fn is_foreground(&self) -> bool;
}

impl Foreground for bool {
    fn is_foreground(&self) -> bool {
        *self
    }
}

impl Foreground for u8 {
    fn is_foreground(&self) -> bool {
        *self != 0
    }
}

impl Foreground for u32 {
    fn is_foreground(&self) -> bool {
        *self != 0
    }
}

impl Foreground for f64 {
    fn is_foreground(&self) -> bool {
        *self != 0.0
    }
}

/// Axis aligned box, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_col: usize,
    pub min_row: usize,
    pub max_col: usize,
    pub max_row: usize,
}

impl BoundingBox {
    pub fn new(min_col: usize, min_row: usize, max_col: usize, max_row: usize) -> Self {
        Self { min_col, min_row, max_col, max_row }
    }

    /// Box of a single pixel, grown with [`BoundingBox::include`].
    pub fn at(row: usize, col: usize) -> Self {
        Self::new(col, row, col, row)
    }

    /// Half the image size, centered. Used when nothing plate-like was found.
    pub fn centered(width: usize, height: usize) -> Self {
        let (w, h) = (width as f64, height as f64);
        let min_col = (w / 2.0 - w / 4.0) as usize;
        let max_col = (w / 2.0 + w / 4.0) as usize;
        let min_row = (h / 2.0 - h / 4.0) as usize;
        let max_row = (h / 2.0 + h / 4.0) as usize;
        Self::new(
            min_col,
            min_row,
            max_col.min(width.saturating_sub(1)),
            max_row.min(height.saturating_sub(1)),
        )
    }

    pub fn include(&mut self, row: usize, col: usize) {
        if col < self.min_col {
            self.min_col = col;
        }
        if col > self.max_col {
            self.max_col = col;
        }
        if row < self.min_row {
            self.min_row = row;
        }
        if row > self.max_row {
            self.max_row = row;
        }
    }

    /// Distance between the outer columns, `0` for a single column.
    pub fn col_span(&self) -> usize {
        self.max_col - self.min_col
    }

    pub fn row_span(&self) -> usize {
        self.max_row - self.min_row
    }

    /// `col_span / row_span`, `None` when either span is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.col_span() == 0 || self.row_span() == 0 {
            return None;
        }
        Some(self.col_span() as f64 / self.row_span() as f64)
    }

    /// Pixel width, corners included.
    pub fn width(&self) -> usize {
        self.col_span() + 1
    }

    pub fn height(&self) -> usize {
        self.row_span() + 1
    }
}
