//! Events exchanged between the viewer and the annotator.
//!
//! Neither view holds a reference to the other. Each emits [`ViewEvent`]s
//! from user input and implements [`ViewListener`] for the events it cares
//! about; the [`crate::Coordinator`] routes between them.

use crate::grid::{ScanIndex, ScanRegion};
use crate::navigation::DisplayTarget;
use crate::Result;

/// Click dispatch mode, set by discrete key-down / key-up events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Clicks select scan points / place spots.
    #[default]
    Normal,
    /// Clicks extend a region / toggle spot selection.
    Select,
}

/// Event emitted by one view for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// A scan point was picked on the virtual image.
    PointSelected(ScanIndex),
    /// A region spanning more than one scan point was picked on the virtual image.
    RegionSelected(ScanRegion),
    /// The annotator moved to another pattern on its own (next / previous).
    NavigationChanged(DisplayTarget),
}

/// Result of a click on the diffraction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotAction {
    /// A spot was placed at this index.
    Added(usize),
    /// The selection flag of the spot at this index flipped.
    Toggled(usize),
}

/// Callback contract between the two views.
pub trait ViewListener {
    /// A scan point was selected elsewhere.
    ///
    /// # Errors
    /// Returns an error if the index does not fit the listener's dataset.
    fn on_point_selected(&mut self, _index: ScanIndex) -> Result<()> {
        Ok(())
    }

    /// A multi-point region was selected elsewhere.
    ///
    /// # Errors
    /// Returns an error if the region does not fit the listener's dataset.
    fn on_region_selected(&mut self, _region: ScanRegion) -> Result<()> {
        Ok(())
    }

    /// The displayed pattern changed elsewhere.
    ///
    /// # Errors
    /// Returns an error if the target does not fit the listener's dataset.
    fn on_navigation_changed(&mut self, _target: DisplayTarget) -> Result<()> {
        Ok(())
    }
}
