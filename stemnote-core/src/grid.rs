//! Scan grid geometry: scan indices, linear order and rectangular regions.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the spatial scan grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanGrid {
    /// Number of scan rows.
    pub rows: usize,
    /// Number of scan columns.
    pub cols: usize,
}

impl ScanGrid {
    /// Creates a grid of `rows` x `cols` scan points.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of scan points (diffraction patterns).
    #[must_use]
    pub fn num_images(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if `index` addresses a scan point of this grid.
    #[must_use]
    pub fn contains(&self, index: ScanIndex) -> bool {
        index.col < self.cols && index.row < self.rows
    }

    /// Validates `index` against the grid.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if the index is outside the grid.
    pub fn check(&self, index: ScanIndex) -> Result<ScanIndex> {
        if self.contains(index) {
            Ok(index)
        } else {
            Err(Error::IndexOutOfRange {
                col: index.col,
                row: index.row,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    /// Row-major linear index: `col + cols * row`.
    #[must_use]
    pub fn linear(&self, index: ScanIndex) -> usize {
        index.col + self.cols * index.row
    }

    /// Inverse of [`ScanGrid::linear`]. Wraps modulo `num_images`.
    #[must_use]
    pub fn from_linear(&self, linear: usize) -> ScanIndex {
        let n = self.num_images().max(1);
        let linear = linear % n;
        let cols = self.cols.max(1);
        ScanIndex::new(linear % cols, linear / cols)
    }

    /// Region covering the whole grid.
    #[must_use]
    pub fn full_region(&self) -> ScanRegion {
        ScanRegion {
            x1: 0,
            y1: 0,
            x2: self.cols,
            y2: self.rows,
        }
    }
}

/// A single scan point, addressed as `(col, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanIndex {
    /// Scan column (x).
    pub col: usize,
    /// Scan row (y).
    pub row: usize,
}

impl ScanIndex {
    /// Creates a scan index.
    #[must_use]
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for ScanIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Axis-aligned, half-open rectangle of scan points `[x1, x2) x [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanRegion {
    /// First column (inclusive).
    pub x1: usize,
    /// First row (inclusive).
    pub y1: usize,
    /// Last column (exclusive).
    pub x2: usize,
    /// Last row (exclusive).
    pub y2: usize,
}

impl ScanRegion {
    /// Creates a region from half-open bounds, swapping reversed edges.
    #[must_use]
    pub fn new(x1: usize, y1: usize, x2: usize, y2: usize) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Smallest region containing both corner scan points (inclusive).
    #[must_use]
    pub fn from_corners(a: ScanIndex, b: ScanIndex) -> Self {
        Self {
            x1: a.col.min(b.col),
            y1: a.row.min(b.row),
            x2: a.col.max(b.col) + 1,
            y2: a.row.max(b.row) + 1,
        }
    }

    /// Region containing exactly one scan point.
    #[must_use]
    pub fn single(index: ScanIndex) -> Self {
        Self::from_corners(index, index)
    }

    /// Number of columns covered.
    #[must_use]
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }

    /// Number of rows covered.
    #[must_use]
    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }

    /// Number of scan points covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Returns true if the region covers no scan point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left scan point.
    #[must_use]
    pub fn origin(&self) -> ScanIndex {
        ScanIndex::new(self.x1, self.y1)
    }

    /// Inclusive bottom-right scan point, `None` for an empty region.
    #[must_use]
    pub fn last(&self) -> Option<ScanIndex> {
        if self.is_empty() {
            None
        } else {
            Some(ScanIndex::new(self.x2 - 1, self.y2 - 1))
        }
    }

    /// Returns true if `index` lies inside the region.
    #[must_use]
    pub fn contains(&self, index: ScanIndex) -> bool {
        (self.x1..self.x2).contains(&index.col) && (self.y1..self.y2).contains(&index.row)
    }

    /// Validates the region against `grid`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRegion`] if the region is empty or extends past the grid.
    pub fn check(&self, grid: ScanGrid) -> Result<Self> {
        if self.is_empty() || self.x2 > grid.cols || self.y2 > grid.rows {
            return Err(Error::InvalidRegion {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }
        Ok(*self)
    }
}

impl std::fmt::Display for ScanRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}) x [{}, {})", self.x1, self.x2, self.y1, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_roundtrip() {
        let grid = ScanGrid::new(3, 4);
        assert_eq!(grid.num_images(), 12);
        for linear in 0..grid.num_images() {
            assert_eq!(grid.linear(grid.from_linear(linear)), linear);
        }
        assert_eq!(grid.from_linear(7), ScanIndex::new(3, 1));
        assert_eq!(grid.from_linear(12), ScanIndex::new(0, 0));
    }

    #[test]
    fn test_region_from_corners_normalizes() {
        let region = ScanRegion::from_corners(ScanIndex::new(3, 0), ScanIndex::new(1, 2));
        assert_eq!(region, ScanRegion::new(1, 0, 4, 3));
        assert_eq!(region.len(), 9);
        assert_eq!(region.origin(), ScanIndex::new(1, 0));
        assert_eq!(region.last(), Some(ScanIndex::new(3, 2)));
        assert!(region.contains(ScanIndex::new(2, 1)));
        assert!(!region.contains(ScanIndex::new(0, 1)));
    }

    #[test]
    fn test_region_check() {
        let grid = ScanGrid::new(3, 4);
        assert!(ScanRegion::new(0, 0, 4, 3).check(grid).is_ok());
        assert!(ScanRegion::new(0, 0, 5, 3).check(grid).is_err());
        assert!(ScanRegion::new(2, 1, 2, 3).check(grid).is_err());
    }

    #[test]
    fn test_grid_check() {
        let grid = ScanGrid::new(3, 4);
        assert!(grid.check(ScanIndex::new(3, 2)).is_ok());
        assert_eq!(
            grid.check(ScanIndex::new(4, 0)),
            Err(Error::IndexOutOfRange {
                col: 4,
                row: 0,
                cols: 4,
                rows: 3
            })
        );
    }
}
