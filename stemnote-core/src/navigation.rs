//! Which diffraction pattern the annotator is showing.

use crate::grid::{ScanGrid, ScanIndex, ScanRegion};
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A displayable diffraction pattern: one scan point or the sum over a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplayTarget {
    /// The pattern recorded at one scan point.
    SinglePoint(ScanIndex),
    /// The pixel-wise sum of every pattern in a region.
    CombinedRegion(ScanRegion),
}

impl DisplayTarget {
    /// The scan point navigation steps from.
    #[must_use]
    pub fn anchor(&self) -> ScanIndex {
        match self {
            Self::SinglePoint(index) => *index,
            Self::CombinedRegion(region) => region.origin(),
        }
    }
}

impl std::fmt::Display for DisplayTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinglePoint(index) => write!(f, "index {index}"),
            Self::CombinedRegion(region) => write!(f, "region {region}"),
        }
    }
}

/// State machine over [`DisplayTarget`]s for one scan grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    grid: ScanGrid,
    current: DisplayTarget,
}

impl Navigator {
    /// Starts at `SinglePoint(0)`.
    #[must_use]
    pub fn new(grid: ScanGrid) -> Self {
        Self {
            grid,
            current: DisplayTarget::SinglePoint(ScanIndex::default()),
        }
    }

    /// Grid being navigated.
    #[must_use]
    pub fn grid(&self) -> ScanGrid {
        self.grid
    }

    /// Target currently displayed.
    #[must_use]
    pub fn current(&self) -> DisplayTarget {
        self.current
    }

    /// Row-major linear index of the current anchor point.
    #[must_use]
    pub fn linear_index(&self) -> usize {
        self.grid.linear(self.current.anchor())
    }

    /// Advances one scan point in row-major order, wrapping after the last.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> DisplayTarget {
        let n = self.grid.num_images().max(1);
        let linear = (self.linear_index() + 1) % n;
        self.current = DisplayTarget::SinglePoint(self.grid.from_linear(linear));
        self.current
    }

    /// Steps back one scan point in row-major order, wrapping before the first.
    pub fn previous(&mut self) -> DisplayTarget {
        let n = self.grid.num_images().max(1);
        let linear = (self.linear_index() + n - 1) % n;
        self.current = DisplayTarget::SinglePoint(self.grid.from_linear(linear));
        self.current
    }

    /// Jumps to a single scan point.
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if the index is outside the grid.
    pub fn select_point(&mut self, index: ScanIndex) -> Result<DisplayTarget> {
        let index = self.grid.check(index)?;
        self.current = DisplayTarget::SinglePoint(index);
        Ok(self.current)
    }

    /// Jumps to a region. A region covering a single point becomes `SinglePoint`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidRegion`] if the region is empty or exceeds the grid.
    pub fn select_region(&mut self, region: ScanRegion) -> Result<DisplayTarget> {
        let region = region.check(self.grid)?;
        self.current = if region.len() == 1 {
            DisplayTarget::SinglePoint(region.origin())
        } else {
            DisplayTarget::CombinedRegion(region)
        };
        Ok(self.current)
    }
}
