//! Diffraction pattern annotator state.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array2;

use crate::config::{AnnotatorConfig, SpotRetention};
use crate::coords::{NormalizedCoord, NormalizedTransform, PixelPoint, Surface};
use crate::dataset::Dataset;
use crate::events::{InteractionMode, SpotAction, ViewEvent, ViewListener};
use crate::grid::{ScanIndex, ScanRegion};
use crate::navigation::{DisplayTarget, Navigator};
use crate::reduce::render_pattern;
use crate::spots::SpotStore;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spot coordinates placed on one display target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternAnnotations {
    /// Pattern the spots were placed on.
    pub target: DisplayTarget,
    /// Normalized spot coordinates in creation order.
    pub spots: Vec<NormalizedCoord>,
}

/// The displayed diffraction pattern and the spots placed on it.
#[derive(Debug, Clone)]
pub struct Annotator {
    dataset: Arc<Dataset>,
    navigator: Navigator,
    pattern: Array2<u8>,
    transform: NormalizedTransform,
    config: AnnotatorConfig,
    mode: InteractionMode,
    spots: SpotStore,
    stash: BTreeMap<DisplayTarget, SpotStore>,
}

impl Annotator {
    /// Opens `dataset` at scan point 0.
    ///
    /// # Errors
    /// Returns [`crate::Error::ConfigError`] if `config` is invalid.
    pub fn new(dataset: Arc<Dataset>, surface: Surface, config: AnnotatorConfig) -> Result<Self> {
        config.validate()?;
        let navigator = Navigator::new(dataset.grid());
        let pattern = render_pattern(&dataset, navigator.current())?;
        let transform = NormalizedTransform::new(surface);
        Ok(Self {
            dataset,
            navigator,
            pattern,
            transform,
            config,
            mode: InteractionMode::Normal,
            spots: SpotStore::new(transform),
            stash: BTreeMap::new(),
        })
    }

    /// Rescaled pattern of the current target, `(height, width)`.
    #[must_use]
    pub fn pattern(&self) -> &Array2<u8> {
        &self.pattern
    }

    /// Target currently displayed.
    #[must_use]
    pub fn current(&self) -> DisplayTarget {
        self.navigator.current()
    }

    /// Navigation state.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Spots on the current target.
    #[must_use]
    pub fn spots(&self) -> &SpotStore {
        &self.spots
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Current pixel-to-normalized transform.
    #[must_use]
    pub fn transform(&self) -> NormalizedTransform {
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

    /// Replaces the configuration.
    ///
    /// Switching from `PerPattern` to `Shared` appends every stashed list,
    /// ordered by target, to the current one, so no spot is dropped. The
    /// stash stays empty while `Shared` is active; switching back attributes
    /// the whole current list to the current target.
    ///
    /// # Errors
    /// Returns [`crate::Error::ConfigError`] if `config` is invalid; the old one is kept.
    pub fn set_config(&mut self, config: AnnotatorConfig) -> Result<()> {
        config.validate()?;
        let previous = self.config.retention;
        self.config = config;
        if previous == SpotRetention::PerPattern && self.config.retention == SpotRetention::Shared {
            for (_, stashed) in std::mem::take(&mut self.stash) {
                self.spots.append(stashed);
            }
        }
        Ok(())
    }

    /// Rebinds to a resized surface and re-derives every spot pixel.
    pub fn resize(&mut self, surface: Surface) {
        if surface == self.transform.surface() {
            return;
        }
        self.transform = NormalizedTransform::new(surface);
        self.spots.recompute_pixels(self.transform);
    }

    /// Normalized position under the cursor; updates the spot hover highlight.
    pub fn hover(&mut self, pixel: PixelPoint) -> NormalizedCoord {
        let _ = self.spots.update_hover(pixel, self.config.spot_radius);
        self.transform.pixel_to_normalized(pixel)
    }

    /// Drops the hover highlight (cursor left the pattern).
    pub fn clear_hover(&mut self) {
        self.spots.clear_cursor();
    }

    /// Handles a click on the pattern.
    ///
    /// `Normal` mode places a spot (ignored outside the pattern); `Select`
    /// mode toggles the first spot within the marker radius.
    pub fn click(&mut self, pixel: PixelPoint) -> Option<SpotAction> {
        match self.mode {
            InteractionMode::Normal => self.spots.add_at_pixel(pixel).map(SpotAction::Added),
            InteractionMode::Select => self
                .spots
                .toggle_selection_near(pixel, self.config.spot_radius)
                .map(SpotAction::Toggled),
        }
    }

    /// Replaces the spot selection (e.g. from a list widget).
    pub fn set_selected_indices(&mut self, indices: &[usize]) {
        self.spots.set_selected_indices(indices);
    }

    /// Selects every spot on the current target.
    pub fn select_all(&mut self) {
        self.spots.select_all();
    }

    /// Deletes the selected spots. Returns the number removed.
    pub fn delete_selected(&mut self) -> usize {
        self.spots.delete_selected()
    }

    /// Removes every spot on the current target. Returns the number removed.
    pub fn clear_spots(&mut self) -> usize {
        self.spots.clear()
    }

    /// Shows a single scan point.
    ///
    /// # Errors
    /// Returns an error if the index is outside the grid; nothing changes then.
    pub fn display_single(&mut self, index: ScanIndex) -> Result<DisplayTarget> {
        let previous = self.current();
        let target = self.navigator.select_point(index)?;
        self.enter(previous, target)?;
        Ok(target)
    }

    /// Shows the combined pattern of a region.
    ///
    /// # Errors
    /// Returns an error if the region is empty or outside the grid; nothing changes then.
    pub fn display_region(&mut self, region: ScanRegion) -> Result<DisplayTarget> {
        let previous = self.current();
        let target = self.navigator.select_region(region)?;
        self.enter(previous, target)?;
        Ok(target)
    }

    /// Steps to the next scan point.
    ///
    /// # Errors
    /// Returns an error if the pattern cannot be rendered.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<ViewEvent> {
        let previous = self.current();
        let target = self.navigator.next();
        self.enter(previous, target)?;
        Ok(ViewEvent::NavigationChanged(target))
    }

    /// Steps to the previous scan point.
    ///
    /// # Errors
    /// Returns an error if the pattern cannot be rendered.
    pub fn previous(&mut self) -> Result<ViewEvent> {
        let previous = self.current();
        let target = self.navigator.previous();
        self.enter(previous, target)?;
        Ok(ViewEvent::NavigationChanged(target))
    }

    /// Every non-empty spot list, current target included, ordered by target.
    #[must_use]
    pub fn annotations(&self) -> Vec<PatternAnnotations> {
        let mut all: BTreeMap<DisplayTarget, &SpotStore> =
            self.stash.iter().map(|(target, store)| (*target, store)).collect();
        let _ = all.insert(self.current(), &self.spots);
        all.into_iter()
            .filter(|(_, store)| !store.is_empty())
            .map(|(target, store)| PatternAnnotations {
                target,
                spots: store.coordinates().collect(),
            })
            .collect()
    }

    fn enter(&mut self, previous: DisplayTarget, target: DisplayTarget) -> Result<()> {
        self.pattern = render_pattern(&self.dataset, target)?;
        if self.config.retention == SpotRetention::PerPattern && previous != target {
            let incoming = self
                .stash
                .remove(&target)
                .unwrap_or_else(|| SpotStore::new(self.transform));
            let outgoing = std::mem::replace(&mut self.spots, incoming);
            if !outgoing.is_empty() {
                let _ = self.stash.insert(previous, outgoing);
            }
            self.spots.recompute_pixels(self.transform);
        }
        self.spots.clear_cursor();
        Ok(())
    }
}

impl ViewListener for Annotator {
    fn on_point_selected(&mut self, index: ScanIndex) -> Result<()> {
        self.display_single(index).map(|_| ())
    }

    fn on_region_selected(&mut self, region: ScanRegion) -> Result<()> {
        self.display_region(region).map(|_| ())
    }
}
