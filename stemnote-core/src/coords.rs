//! Display-surface coordinate transforms.
//!
//! Two families of mappings are provided:
//!
//! - [`NormalizedTransform`]: surface pixels to the normalized pattern frame
//!   (`[-1, 1]` on both axes, origin at the image center, +y up).
//! - [`ScanTransform`]: surface pixels of the virtual image to scan indices.
//!
//! All pixel coordinates are surface-local: `(0, 0)` is the top-left corner
//! of the drawn image, not of the window.

use crate::grid::{ScanGrid, ScanIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of a display surface in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surface {
    /// Width in pixels (at least 1).
    pub width: u32,
    /// Height in pixels (at least 1).
    pub height: u32,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Surface {
    /// Creates a surface, clamping degenerate sizes to one pixel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Returns true if `p` lies on the surface.
    #[must_use]
    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < f64::from(self.width) && p.y < f64::from(self.height)
    }
}

/// A position on a display surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelPoint {
    /// Horizontal position, growing to the right.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

impl PixelPoint {
    /// Creates a pixel point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A position in the normalized pattern frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedCoord {
    /// `-1` at the left edge, `+1` at the right edge.
    pub x: f64,
    /// `-1` at the bottom edge, `+1` at the top edge.
    pub y: f64,
}

impl NormalizedCoord {
    /// Creates a normalized coordinate.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if the coordinate lies within the pattern bounds.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.x.abs() <= 1.0 && self.y.abs() <= 1.0
    }
}

impl std::fmt::Display for NormalizedCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Maps surface pixels to the normalized pattern frame and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizedTransform {
    surface: Surface,
}

impl NormalizedTransform {
    /// Creates a transform for the given surface.
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    /// Surface this transform was built for.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// `x = (2*xp - W) / W`, `y = -(2*yp - H) / H`.
    #[must_use]
    pub fn pixel_to_normalized(&self, p: PixelPoint) -> NormalizedCoord {
        let w = f64::from(self.surface.width);
        let h = f64::from(self.surface.height);
        NormalizedCoord {
            x: (2.0 * p.x - w) / w,
            y: -(2.0 * p.y - h) / h,
        }
    }

    /// `xp = round(W*(x+1)/2)`, `yp = round(H*(1-y)/2)`.
    #[must_use]
    pub fn normalized_to_pixel(&self, c: NormalizedCoord) -> PixelPoint {
        let w = f64::from(self.surface.width);
        let h = f64::from(self.surface.height);
        PixelPoint {
            x: (0.5 * w * (c.x + 1.0)).round(),
            y: (0.5 * h * (1.0 - c.y)).round(),
        }
    }
}

/// Scan index as computed from a pixel, before any range policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawIndex {
    /// Column, possibly negative or past the grid.
    pub col: i64,
    /// Row, possibly negative or past the grid.
    pub row: i64,
}

impl RawIndex {
    /// Reject policy: `None` unless the index lies inside `grid`.
    #[must_use]
    pub fn checked(self, grid: ScanGrid) -> Option<ScanIndex> {
        let col = usize::try_from(self.col).ok()?;
        let row = usize::try_from(self.row).ok()?;
        let index = ScanIndex::new(col, row);
        grid.contains(index).then_some(index)
    }

    /// Clamp policy: the nearest index inside `grid`.
    #[must_use]
    pub fn clamped(self, grid: ScanGrid) -> ScanIndex {
        let clamp = |v: i64, len: usize| -> usize {
            let max = len.saturating_sub(1);
            usize::try_from(v.max(0)).map_or(max, |v| v.min(max))
        };
        ScanIndex::new(clamp(self.col, grid.cols), clamp(self.row, grid.rows))
    }
}

/// Maps virtual-image surface pixels to scan indices and back.
///
/// Each scan point owns the cell `[W*col/cols, W*(col+1)/cols)` of the
/// surface. The inverse returns a pixel inside that cell (its center when the
/// cell is at least two pixels wide), so the round trip is exact whenever the
/// surface has at least one pixel per scan point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTransform {
    surface: Surface,
    grid: ScanGrid,
}

impl ScanTransform {
    /// Creates a transform for a surface showing `grid`.
    #[must_use]
    pub fn new(surface: Surface, grid: ScanGrid) -> Self {
        Self { surface, grid }
    }

    /// Surface this transform was built for.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Scan grid this transform addresses.
    #[must_use]
    pub fn grid(&self) -> ScanGrid {
        self.grid
    }

    /// `col = floor(cols * xp / W)`, `row = floor(rows * yp / H)`. No clamping.
    ///
    /// A non-finite result (NaN or infinite pixel, empty surface) maps to `-1`,
    /// which [`RawIndex::checked`] rejects.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn pixel_to_index(&self, p: PixelPoint) -> RawIndex {
        let cell = |v: f64| if v.is_finite() { v.floor() as i64 } else { -1 };
        RawIndex {
            col: cell(self.grid.cols as f64 * p.x / f64::from(self.surface.width)),
            row: cell(self.grid.rows as f64 * p.y / f64::from(self.surface.height)),
        }
    }

    /// Pixel inside the cell of `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn index_to_pixel(&self, index: ScanIndex) -> PixelPoint {
        let x = cell_pixel(u64::from(self.surface.width), self.grid.cols, index.col);
        let y = cell_pixel(u64::from(self.surface.height), self.grid.rows, index.row);
        PixelPoint::new(x as f64, y as f64)
    }

    /// Top-left and bottom-right surface corners of the cell of `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_bounds(&self, index: ScanIndex) -> (PixelPoint, PixelPoint) {
        let w = f64::from(self.surface.width);
        let h = f64::from(self.surface.height);
        let cols = self.grid.cols.max(1) as f64;
        let rows = self.grid.rows.max(1) as f64;
        (
            PixelPoint::new(w * index.col as f64 / cols, h * index.row as f64 / rows),
            PixelPoint::new(
                w * (index.col + 1) as f64 / cols,
                h * (index.row + 1) as f64 / rows,
            ),
        )
    }
}

/// `max(ceil(len*i/n), floor(len*(2i+1)/(2n)))` in exact integer arithmetic.
fn cell_pixel(len: u64, n: usize, i: usize) -> u64 {
    let n = n.max(1) as u64;
    let i = i as u64;
    let start = (len * i).div_ceil(n);
    let center = len * (2 * i + 1) / (2 * n);
    start.max(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_maps_to_origin() {
        let t = NormalizedTransform::new(Surface::new(64, 64));
        let c = t.pixel_to_normalized(PixelPoint::new(32.0, 32.0));
        assert_relative_eq!(c.x, 0.0);
        assert_relative_eq!(c.y, 0.0);
    }

    #[test]
    fn test_edges() {
        let t = NormalizedTransform::new(Surface::new(200, 100));
        let top_right = t.pixel_to_normalized(PixelPoint::new(200.0, 0.0));
        assert_relative_eq!(top_right.x, 1.0);
        assert_relative_eq!(top_right.y, 1.0);
        let bottom_left = t.pixel_to_normalized(PixelPoint::new(0.0, 100.0));
        assert_relative_eq!(bottom_left.x, -1.0);
        assert_relative_eq!(bottom_left.y, -1.0);
    }

    #[test]
    fn test_normalized_roundtrip() {
        let t = NormalizedTransform::new(Surface::new(97, 61));
        for yp in 0..61 {
            for xp in 0..97 {
                let p = PixelPoint::new(f64::from(xp), f64::from(yp));
                let back = t.normalized_to_pixel(t.pixel_to_normalized(p));
                assert!((back.x - p.x).abs() <= 1.0, "x {xp} -> {}", back.x);
                assert!((back.y - p.y).abs() <= 1.0, "y {yp} -> {}", back.y);
            }
        }
    }

    #[test]
    fn test_scan_roundtrip() {
        for (w, h, cols, rows) in [(64, 64, 4, 3), (5, 7, 4, 7), (300, 211, 17, 1), (1, 1, 1, 1)] {
            let grid = ScanGrid::new(rows, cols);
            let t = ScanTransform::new(Surface::new(w, h), grid);
            for row in 0..rows {
                for col in 0..cols {
                    let index = ScanIndex::new(col, row);
                    let p = t.index_to_pixel(index);
                    assert!(Surface::new(w, h).contains(p));
                    assert_eq!(t.pixel_to_index(p).checked(grid), Some(index));
                }
            }
        }
    }

    #[test]
    fn test_last_pixel_stays_in_grid() {
        let grid = ScanGrid::new(3, 4);
        let t = ScanTransform::new(Surface::new(64, 48), grid);
        let raw = t.pixel_to_index(PixelPoint::new(63.0, 47.0));
        assert_eq!(raw.checked(grid), Some(ScanIndex::new(3, 2)));
    }

    #[test]
    fn test_out_of_range_policies() {
        let grid = ScanGrid::new(3, 4);
        let t = ScanTransform::new(Surface::new(64, 48), grid);
        let raw = t.pixel_to_index(PixelPoint::new(70.0, -3.0));
        assert_eq!(raw.checked(grid), None);
        assert_eq!(raw.clamped(grid), ScanIndex::new(3, 0));
    }

    #[test]
    fn test_non_finite_pixel_is_out_of_range() {
        let grid = ScanGrid::new(3, 4);
        let t = ScanTransform::new(Surface::new(64, 48), grid);
        for p in [
            PixelPoint::new(f64::NAN, 3.0),
            PixelPoint::new(3.0, f64::NAN),
            PixelPoint::new(f64::INFINITY, 3.0),
            PixelPoint::new(3.0, f64::NEG_INFINITY),
        ] {
            assert_eq!(t.pixel_to_index(p).checked(grid), None);
        }
        let empty = ScanTransform::new(Surface::new(0, 0), grid);
        let raw = empty.pixel_to_index(PixelPoint::new(0.0, 0.0));
        assert_eq!(raw.checked(grid), None);
        assert_eq!(raw.clamped(grid), ScanIndex::new(0, 0));
    }

    #[test]
    fn test_cell_bounds() {
        let grid = ScanGrid::new(2, 4);
        let t = ScanTransform::new(Surface::new(80, 40), grid);
        let (min, max) = t.cell_bounds(ScanIndex::new(1, 1));
        assert_relative_eq!(min.x, 20.0);
        assert_relative_eq!(min.y, 20.0);
        assert_relative_eq!(max.x, 40.0);
        assert_relative_eq!(max.y, 40.0);
    }
}
