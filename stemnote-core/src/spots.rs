//! Ordered store of user-placed diffraction spot markers.

use crate::coords::{NormalizedCoord, NormalizedTransform, PixelPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A spot marker on the displayed diffraction pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spot {
    /// Position in the normalized pattern frame. Authoritative.
    pub coord: NormalizedCoord,
    /// Position on the display surface, derived from `coord`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pixel: PixelPoint,
    /// Whether the spot is part of the current selection.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub selected: bool,
}

/// Spot markers in creation order.
///
/// Creation order is the only identity a spot has: indices returned by the
/// store are positions in that order and shift down when earlier spots are
/// deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotStore {
    spots: Vec<Spot>,
    transform: NormalizedTransform,
    hovered: Option<usize>,
}

impl SpotStore {
    /// Creates an empty store bound to `transform`.
    #[must_use]
    pub fn new(transform: NormalizedTransform) -> Self {
        Self {
            spots: Vec::new(),
            transform,
            hovered: None,
        }
    }

    /// Number of spots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Returns true if no spot is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Spot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Spot> {
        self.spots.get(index)
    }

    /// Spots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter()
    }

    /// Normalized coordinates in creation order.
    pub fn coordinates(&self) -> impl Iterator<Item = NormalizedCoord> + '_ {
        self.spots.iter().map(|s| s.coord)
    }

    /// Indices of selected spots, ascending.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.spots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.selected.then_some(i))
            .collect()
    }

    /// Transform used to derive pixel positions.
    #[must_use]
    pub fn transform(&self) -> NormalizedTransform {
        self.transform
    }

    /// Appends an unselected spot. Returns `None` if `coord` lies outside the pattern.
    pub fn add(&mut self, coord: NormalizedCoord) -> Option<usize> {
        if !coord.is_inside() {
            return None;
        }
        self.spots.push(Spot {
            coord,
            pixel: self.transform.normalized_to_pixel(coord),
            selected: false,
        });
        Some(self.spots.len() - 1)
    }

    /// Appends a spot at a surface pixel, converting through the current transform.
    pub fn add_at_pixel(&mut self, pixel: PixelPoint) -> Option<usize> {
        self.add(self.transform.pixel_to_normalized(pixel))
    }

    /// First spot (in creation order) within `radius` of `pixel`.
    #[must_use]
    pub fn find_near(&self, pixel: PixelPoint, radius: f64) -> Option<usize> {
        self.spots
            .iter()
            .position(|s| s.pixel.distance(pixel) <= radius)
    }

    /// Flips the selection of the first spot within `radius` of `pixel`.
    pub fn toggle_selection_near(&mut self, pixel: PixelPoint, radius: f64) -> Option<usize> {
        let index = self.find_near(pixel, radius)?;
        let spot = &mut self.spots[index];
        spot.selected = !spot.selected;
        Some(index)
    }

    /// Replaces the selection with `indices`. Out-of-range indices are ignored.
    pub fn set_selected_indices(&mut self, indices: &[usize]) {
        for spot in &mut self.spots {
            spot.selected = false;
        }
        for &i in indices {
            if let Some(spot) = self.spots.get_mut(i) {
                spot.selected = true;
            }
        }
    }

    /// Selects every spot.
    pub fn select_all(&mut self) {
        for spot in &mut self.spots {
            spot.selected = true;
        }
    }

    /// Deselects every spot.
    pub fn clear_selection(&mut self) {
        self.set_selected_indices(&[]);
    }

    /// Removes every selected spot. Returns the number removed.
    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selected_indices();
        if selected.len() == self.spots.len() {
            self.spots.clear();
        } else {
            for &i in selected.iter().rev() {
                let _ = self.spots.remove(i);
            }
        }
        self.hovered = None;
        selected.len()
    }

    /// Removes all spots. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.spots.len();
        self.spots.clear();
        self.hovered = None;
        removed
    }

    /// Moves every spot of `other` to the end of this store, keeping their
    /// order and selection. Pixels are re-derived through this store's transform.
    pub fn append(&mut self, other: SpotStore) {
        let transform = self.transform;
        self.spots.extend(other.spots.into_iter().map(|spot| Spot {
            pixel: transform.normalized_to_pixel(spot.coord),
            ..spot
        }));
    }

    /// Rebinds the store to `transform` and re-derives every pixel position.
    pub fn recompute_pixels(&mut self, transform: NormalizedTransform) {
        self.transform = transform;
        for spot in &mut self.spots {
            spot.pixel = transform.normalized_to_pixel(spot.coord);
        }
    }

    /// Updates the hover highlight to the first spot within `radius` of `pixel`.
    pub fn update_hover(&mut self, pixel: PixelPoint, radius: f64) -> Option<usize> {
        self.hovered = self.find_near(pixel, radius);
        self.hovered
    }

    /// Spot under the cursor, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Drops cursor-derived state (the hover highlight).
    pub fn clear_cursor(&mut self) {
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Surface;
    use approx::assert_relative_eq;

    fn store() -> SpotStore {
        SpotStore::new(NormalizedTransform::new(Surface::new(100, 100)))
    }

    #[test]
    fn test_add_rejects_outside_pattern() {
        let mut s = store();
        assert_eq!(s.add(NormalizedCoord::new(1.2, 0.0)), None);
        assert_eq!(s.add(NormalizedCoord::new(0.0, -1.01)), None);
        assert_eq!(s.add(NormalizedCoord::new(1.0, -1.0)), Some(0));
        assert_eq!(s.add(NormalizedCoord::new(0.5, 0.5)), Some(1));
        assert_eq!(s.len(), 2);
        assert!(s.iter().all(|spot| !spot.selected));
    }

    #[test]
    fn test_add_derives_pixel() {
        let mut s = store();
        let i = s.add(NormalizedCoord::new(0.5, 0.5)).unwrap();
        let spot = s.get(i).unwrap();
        assert_relative_eq!(spot.pixel.x, 75.0);
        assert_relative_eq!(spot.pixel.y, 25.0);
    }

    #[test]
    fn test_toggle_first_match_only() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.0, 0.0));
        let _ = s.add(NormalizedCoord::new(0.02, 0.0));
        assert_eq!(s.toggle_selection_near(PixelPoint::new(51.0, 50.0), 3.0), Some(0));
        assert_eq!(s.selected_indices(), vec![0]);
        assert_eq!(s.toggle_selection_near(PixelPoint::new(51.0, 50.0), 3.0), Some(0));
        assert!(s.selected_indices().is_empty());
        assert_eq!(s.toggle_selection_near(PixelPoint::new(10.0, 10.0), 3.0), None);
    }

    #[test]
    fn test_set_selected_ignores_out_of_range() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.1, 0.1));
        let _ = s.add(NormalizedCoord::new(0.2, 0.2));
        s.set_selected_indices(&[1, 7]);
        assert_eq!(s.selected_indices(), vec![1]);
        s.set_selected_indices(&[0]);
        assert_eq!(s.selected_indices(), vec![0]);
    }

    #[test]
    fn test_delete_selected_keeps_order() {
        let mut s = store();
        for x in [-0.6, -0.3, 0.0, 0.3, 0.6] {
            let _ = s.add(NormalizedCoord::new(x, 0.0));
        }
        s.set_selected_indices(&[0, 2, 4]);
        assert_eq!(s.delete_selected(), 3);
        let xs: Vec<f64> = s.coordinates().map(|c| c.x).collect();
        assert_eq!(xs, vec![-0.3, 0.3]);
        assert!(s.selected_indices().is_empty());
    }

    #[test]
    fn test_add_then_delete_restores_store() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.1, -0.2));
        let _ = s.add(NormalizedCoord::new(-0.4, 0.3));
        let before = s.clone();
        let i = s.add(NormalizedCoord::new(0.7, 0.7)).unwrap();
        s.set_selected_indices(&[i]);
        assert_eq!(s.delete_selected(), 1);
        assert_eq!(s, before);
    }

    #[test]
    fn test_recompute_pixels_on_resize() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(-0.5, 0.0));
        s.recompute_pixels(NormalizedTransform::new(Surface::new(400, 200)));
        let spot = s.get(0).unwrap();
        assert_relative_eq!(spot.pixel.x, 100.0);
        assert_relative_eq!(spot.pixel.y, 100.0);
        assert_relative_eq!(spot.coord.x, -0.5);
    }

    #[test]
    fn test_hover_cleared_by_cursor_reset() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.0, 0.0));
        assert_eq!(s.update_hover(PixelPoint::new(52.0, 49.0), 5.0), Some(0));
        assert_eq!(s.hovered(), Some(0));
        s.clear_cursor();
        assert_eq!(s.hovered(), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_append_keeps_order_and_rebinds_pixels() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.0, 0.0));
        let mut other = SpotStore::new(NormalizedTransform::new(Surface::new(200, 200)));
        let _ = other.add(NormalizedCoord::new(0.5, 0.5));
        let _ = other.add(NormalizedCoord::new(-0.5, 0.5));
        other.set_selected_indices(&[1]);

        s.append(other);
        let coords: Vec<_> = s.coordinates().collect();
        assert_eq!(
            coords,
            vec![
                NormalizedCoord::new(0.0, 0.0),
                NormalizedCoord::new(0.5, 0.5),
                NormalizedCoord::new(-0.5, 0.5),
            ]
        );
        assert_eq!(s.selected_indices(), vec![2]);
        let spot = s.get(1).unwrap();
        assert_relative_eq!(spot.pixel.x, 75.0);
        assert_relative_eq!(spot.pixel.y, 25.0);
    }

    #[test]
    fn test_clear_reports_removed_count() {
        let mut s = store();
        let _ = s.add(NormalizedCoord::new(0.0, 0.0));
        let _ = s.add(NormalizedCoord::new(0.2, 0.0));
        let _ = s.update_hover(PixelPoint::new(50.0, 50.0), 5.0);
        assert_eq!(s.clear(), 2);
        assert!(s.is_empty());
        assert_eq!(s.hovered(), None);
        assert_eq!(s.clear(), 0);
    }
}
