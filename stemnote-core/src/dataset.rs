//! The 4D-STEM dataset container.

use ndarray::{s, Array4, ArrayView2, ArrayView4};

use crate::grid::{ScanGrid, ScanIndex, ScanRegion};
use crate::{Error, Result};

/// An immutable 4D intensity array indexed by
/// `(scan_row, scan_col, pattern_row, pattern_col)`.
///
/// Samples are stored as `f64`, which is also the accumulator type of every
/// reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: Array4<f64>,
}

impl Dataset {
    /// Wraps a 4D array.
    ///
    /// # Errors
    /// Returns [`Error::InvalidShape`] if any dimension is zero.
    pub fn new(data: Array4<f64>) -> Result<Self> {
        if data.shape().contains(&0) {
            return Err(Error::InvalidShape(format!(
                "all four dimensions must be non-zero, got {:?}",
                data.shape()
            )));
        }
        Ok(Self { data })
    }

    /// Builds a dataset of the given shape from a sample function
    /// `f(row, col, pattern_row, pattern_col)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidShape`] if any dimension is zero.
    pub fn from_fn<F>(shape: (usize, usize, usize, usize), f: F) -> Result<Self>
    where
        F: FnMut((usize, usize, usize, usize)) -> f64,
    {
        Self::new(Array4::from_shape_fn(shape, f))
    }

    /// Scan grid addressed by the first two axes.
    #[must_use]
    pub fn grid(&self) -> ScanGrid {
        let shape = self.data.shape();
        ScanGrid::new(shape[0], shape[1])
    }

    /// Diffraction pattern size as `(height, width)`.
    #[must_use]
    pub fn pattern_shape(&self) -> (usize, usize) {
        let shape = self.data.shape();
        (shape[2], shape[3])
    }

    /// Full shape `(rows, cols, pattern_height, pattern_width)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    /// View of the whole array.
    #[must_use]
    pub fn view(&self) -> ArrayView4<'_, f64> {
        self.data.view()
    }

    /// The diffraction pattern recorded at `index`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if the index is outside the grid.
    pub fn pattern(&self, index: ScanIndex) -> Result<ArrayView2<'_, f64>> {
        let index = self.grid().check(index)?;
        Ok(self.data.slice(s![index.row, index.col, .., ..]))
    }

    /// Sub-array of all patterns inside `region`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRegion`] if the region is empty or exceeds the grid.
    pub fn region(&self, region: ScanRegion) -> Result<ArrayView4<'_, f64>> {
        let region = region.check(self.grid())?;
        Ok(self
            .data
            .slice(s![region.y1..region.y2, region.x1..region.x2, .., ..]))
    }
}
