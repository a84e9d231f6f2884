//! Virtual STEM image viewer state.

use std::sync::Arc;

use ndarray::Array2;

use crate::coords::{PixelPoint, ScanTransform, Surface};
use crate::dataset::Dataset;
use crate::events::{InteractionMode, ViewEvent, ViewListener};
use crate::grid::{ScanGrid, ScanIndex, ScanRegion};
use crate::navigation::DisplayTarget;
use crate::reduce::render_virtual_image;
use crate::Result;

/// Selection marker in both logical and surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// What is selected.
    pub target: DisplayTarget,
    /// Top-left surface corner of the selection.
    pub min: PixelPoint,
    /// Bottom-right surface corner of the selection.
    pub max: PixelPoint,
}

/// The virtual STEM image and the scan selection drawn on it.
#[derive(Debug, Clone)]
pub struct Viewer {
    dataset: Arc<Dataset>,
    image: Array2<u8>,
    transform: ScanTransform,
    mode: InteractionMode,
    anchor: ScanIndex,
    marker: Marker,
    hover: Option<ScanIndex>,
}

impl Viewer {
    /// Reduces `dataset` to its virtual image and selects scan point 0.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, surface: Surface) -> Self {
        let image = render_virtual_image(&dataset);
        let transform = ScanTransform::new(surface, dataset.grid());
        let target = DisplayTarget::SinglePoint(ScanIndex::default());
        let mut viewer = Self {
            dataset,
            image,
            transform,
            mode: InteractionMode::Normal,
            anchor: ScanIndex::default(),
            marker: Marker {
                target,
                min: PixelPoint::default(),
                max: PixelPoint::default(),
            },
            hover: None,
        };
        viewer.set_marker(target);
        viewer
    }

    /// Rescaled virtual image, `(rows, cols)`.
    #[must_use]
    pub fn image(&self) -> &Array2<u8> {
        &self.image
    }

    /// Dataset this viewer summarizes.
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Scan grid of the dataset.
    #[must_use]
    pub fn grid(&self) -> ScanGrid {
        self.transform.grid()
    }

    /// Current pixel-to-index transform.
    #[must_use]
    pub fn transform(&self) -> ScanTransform {
        self.transform
    }

    /// Current click mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Sets the click mode.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    /// First corner of the next region selection.
    #[must_use]
    pub fn anchor(&self) -> ScanIndex {
        self.anchor
    }

    /// Current selection marker.
    #[must_use]
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Scan point under the cursor, if it is over the grid.
    #[must_use]
    pub fn hovered(&self) -> Option<ScanIndex> {
        self.hover
    }

    /// Rebinds to a resized surface and re-derives the marker rectangle.
    pub fn resize(&mut self, surface: Surface) {
        if surface == self.transform.surface() {
            return;
        }
        self.transform = ScanTransform::new(surface, self.grid());
        self.set_marker(self.marker.target);
    }

    /// Tracks the cursor. Returns the scan point under it, if any.
    pub fn hover(&mut self, pixel: PixelPoint) -> Option<ScanIndex> {
        self.hover = self.transform.pixel_to_index(pixel).checked(self.grid());
        self.hover
    }

    /// Drops the hover index (cursor left the image).
    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    /// Region a `Select` click at `pixel` would produce.
    #[must_use]
    pub fn region_preview(&self, pixel: PixelPoint) -> ScanRegion {
        let terminal = self.transform.pixel_to_index(pixel).clamped(self.grid());
        ScanRegion::from_corners(self.anchor, terminal)
    }

    /// Handles a click on the virtual image.
    ///
    /// In `Normal` mode a click outside the grid is ignored; otherwise it
    /// selects that scan point and makes it the region anchor. In `Select`
    /// mode the click is clamped into the grid and closes a region with the
    /// anchor.
    pub fn click(&mut self, pixel: PixelPoint) -> Option<ViewEvent> {
        match self.mode {
            InteractionMode::Normal => {
                let index = self.transform.pixel_to_index(pixel).checked(self.grid())?;
                self.anchor = index;
                self.set_marker(DisplayTarget::SinglePoint(index));
                Some(ViewEvent::PointSelected(index))
            }
            InteractionMode::Select => {
                let region = self.region_preview(pixel);
                if region.len() == 1 {
                    self.set_marker(DisplayTarget::SinglePoint(region.origin()));
                    Some(ViewEvent::PointSelected(region.origin()))
                } else {
                    self.set_marker(DisplayTarget::CombinedRegion(region));
                    Some(ViewEvent::RegionSelected(region))
                }
            }
        }
    }

    fn set_marker(&mut self, target: DisplayTarget) {
        let (first, last) = match target {
            DisplayTarget::SinglePoint(index) => (index, index),
            DisplayTarget::CombinedRegion(region) => {
                (region.origin(), region.last().unwrap_or(region.origin()))
            }
        };
        let (min, _) = self.transform.cell_bounds(first);
        let (_, max) = self.transform.cell_bounds(last);
        self.marker = Marker { target, min, max };
    }
}

impl ViewListener for Viewer {
    fn on_point_selected(&mut self, index: ScanIndex) -> Result<()> {
        let index = self.grid().check(index)?;
        self.anchor = index;
        self.set_marker(DisplayTarget::SinglePoint(index));
        Ok(())
    }

    fn on_region_selected(&mut self, region: ScanRegion) -> Result<()> {
        let region = region.check(self.grid())?;
        self.anchor = region.origin();
        self.set_marker(DisplayTarget::CombinedRegion(region));
        Ok(())
    }

    fn on_navigation_changed(&mut self, target: DisplayTarget) -> Result<()> {
        match target {
            DisplayTarget::SinglePoint(index) => self.on_point_selected(index),
            DisplayTarget::CombinedRegion(region) => self.on_region_selected(region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[allow(clippy::cast_precision_loss)]
    fn viewer() -> Viewer {
        let ds = Dataset::from_fn((3, 4, 2, 2), |(r, c, _, _)| (r * 4 + c) as f64).unwrap();
        Viewer::new(Arc::new(ds), Surface::new(80, 60))
    }

    #[test]
    fn test_virtual_image_is_rescaled() {
        let v = viewer();
        assert_eq!(v.image().dim(), (3, 4));
        assert_eq!(v.image()[[0, 0]], 0);
        assert_eq!(v.image()[[2, 3]], 255);
    }

    #[test]
    fn test_normal_click_selects_point() {
        let mut v = viewer();
        let event = v.click(PixelPoint::new(45.0, 25.0));
        assert_eq!(event, Some(ViewEvent::PointSelected(ScanIndex::new(2, 1))));
        assert_eq!(v.anchor(), ScanIndex::new(2, 1));
    }

    #[test]
    fn test_normal_click_outside_grid_is_ignored() {
        let mut v = viewer();
        let _ = v.click(PixelPoint::new(45.0, 25.0));
        assert_eq!(v.click(PixelPoint::new(85.0, 25.0)), None);
        assert_eq!(v.click(PixelPoint::new(-1.0, 25.0)), None);
        assert_eq!(
            v.marker().target,
            DisplayTarget::SinglePoint(ScanIndex::new(2, 1))
        );
    }

    #[test]
    fn test_select_click_builds_clamped_region() {
        let mut v = viewer();
        let _ = v.click(PixelPoint::new(25.0, 5.0));
        v.set_mode(InteractionMode::Select);
        let event = v.click(PixelPoint::new(500.0, 500.0));
        assert_eq!(
            event,
            Some(ViewEvent::RegionSelected(ScanRegion::new(1, 0, 4, 3)))
        );
        let marker = v.marker();
        assert_relative_eq!(marker.min.x, 20.0);
        assert_relative_eq!(marker.max.x, 80.0);
        assert_relative_eq!(marker.max.y, 60.0);
    }

    #[test]
    fn test_select_click_on_anchor_is_point() {
        let mut v = viewer();
        let _ = v.click(PixelPoint::new(25.0, 5.0));
        v.set_mode(InteractionMode::Select);
        assert_eq!(
            v.click(PixelPoint::new(22.0, 8.0)),
            Some(ViewEvent::PointSelected(ScanIndex::new(1, 0)))
        );
    }

    #[test]
    fn test_marker_follows_resize() {
        let mut v = viewer();
        v.on_point_selected(ScanIndex::new(1, 1)).unwrap();
        assert_relative_eq!(v.marker().min.x, 20.0);
        v.resize(Surface::new(160, 120));
        assert_relative_eq!(v.marker().min.x, 40.0);
        assert_relative_eq!(v.marker().min.y, 40.0);
    }

    #[test]
    fn test_navigation_sync() {
        let mut v = viewer();
        v.on_navigation_changed(DisplayTarget::SinglePoint(ScanIndex::new(3, 2)))
            .unwrap();
        assert_eq!(v.anchor(), ScanIndex::new(3, 2));
        assert!(v
            .on_navigation_changed(DisplayTarget::SinglePoint(ScanIndex::new(4, 0)))
            .is_err());
    }

    #[test]
    fn test_hover() {
        let mut v = viewer();
        assert_eq!(v.hover(PixelPoint::new(79.0, 59.0)), Some(ScanIndex::new(3, 2)));
        assert_eq!(v.hover(PixelPoint::new(80.0, 59.0)), None);
    }
}
