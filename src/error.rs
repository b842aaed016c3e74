use image::ImageError;
use thiserror::Error;

use std::io::Error as IOError;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct LprError(LprErrorKind);

#[derive(Debug, Error)]
pub enum LprErrorKind {
    /// Grids handed to one operator disagree on width/height.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: (usize, usize), actual: (usize, usize) },

    /// A flat buffer does not hold `width * height` samples.
    #[error("buffer holds {actual} samples, grid needs {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// A sample violates an operator precondition.
    #[error("value {value} at ({row}, {col}) is outside [0, {bins})")]
    OutOfRangeValue { value: usize, bins: usize, row: usize, col: usize },

    /// Nothing survived the region filter.
    #[error("no component matches the plate shape")]
    NoComponentFound,

    #[error(transparent)]
    IOError(#[from] IOError),

    #[error(transparent)]
    ImageError(#[from] ImageError),
}

pub type LprResult<T> = Result<T, LprError>;

impl LprError {
    pub fn kind(&self) -> &LprErrorKind {
        &self.0
    }

    pub(crate) fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self(LprErrorKind::ShapeMismatch { expected, actual })
    }

    pub fn is_no_component(&self) -> bool {
        matches!(self.kind(), LprErrorKind::NoComponentFound)
    }
}

impl<T> From<T> for LprError
where T: Into<LprErrorKind>
{
    fn from(e: T) -> Self {
        Self(e.into())
    }
}
