//! Owner of the dataset and both views; routes events between them.

use std::sync::Arc;

use crate::annotator::Annotator;
use crate::config::AnnotatorConfig;
use crate::coords::{NormalizedCoord, PixelPoint, Surface};
use crate::dataset::Dataset;
use crate::events::{InteractionMode, SpotAction, ViewEvent, ViewListener};
use crate::grid::ScanIndex;
use crate::viewer::Viewer;
use crate::{Error, Result};

/// Views over one loaded dataset.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    viewer: Viewer,
    annotator: Annotator,
}

impl Session {
    /// Shared dataset.
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Virtual image viewer.
    #[must_use]
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Diffraction pattern annotator.
    #[must_use]
    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }
}

/// Holds the interaction mode and the (optional) session.
///
/// Before a dataset is loaded every input is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    config: AnnotatorConfig,
    viewer_surface: Surface,
    pattern_surface: Surface,
    select_held: bool,
    select_latched: bool,
    session: Option<Session>,
}

impl Coordinator {
    /// Creates a coordinator with no dataset.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `config` is invalid.
    pub fn new(config: AnnotatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Replaces the current session with one over `dataset`, at scan point 0.
    ///
    /// # Errors
    /// Returns an error if the annotator cannot be built; the prior session is kept.
    pub fn load(&mut self, dataset: Dataset) -> Result<()> {
        let dataset = Arc::new(dataset);
        let mode = self.mode();
        let mut viewer = Viewer::new(Arc::clone(&dataset), self.viewer_surface);
        let mut annotator =
            Annotator::new(Arc::clone(&dataset), self.pattern_surface, self.config.clone())?;
        viewer.set_mode(mode);
        annotator.set_mode(mode);
        self.session = Some(Session {
            dataset,
            viewer,
            annotator,
        });
        Ok(())
    }

    /// Drops the loaded session. Surfaces, config and the select latch are kept.
    pub fn unload(&mut self) {
        self.session = None;
    }

    /// Loaded session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns true once a dataset is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Annotator configuration.
    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Replaces the annotator configuration.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `config` is invalid; the old one is kept.
    pub fn set_config(&mut self, config: AnnotatorConfig) -> Result<()> {
        config.validate()?;
        if let Some(session) = &mut self.session {
            session.annotator.set_config(config.clone())?;
        }
        self.config = config;
        Ok(())
    }

    /// Effective click mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.select_held || self.select_latched {
            InteractionMode::Select
        } else {
            InteractionMode::Normal
        }
    }

    /// The select modifier key went down.
    pub fn select_key_down(&mut self) {
        self.select_held = true;
        self.push_mode();
    }

    /// The select modifier key went up.
    pub fn select_key_up(&mut self) {
        self.select_held = false;
        self.push_mode();
    }

    /// Latches select mode on or off independently of the modifier key.
    pub fn set_select_latched(&mut self, latched: bool) {
        self.select_latched = latched;
        self.push_mode();
    }

    /// Whether select mode is latched.
    #[must_use]
    pub fn select_latched(&self) -> bool {
        self.select_latched
    }

    fn push_mode(&mut self) {
        let mode = self.mode();
        if let Some(session) = &mut self.session {
            session.viewer.set_mode(mode);
            session.annotator.set_mode(mode);
        }
    }

    /// The virtual image surface changed size.
    pub fn resize_viewer(&mut self, surface: Surface) {
        self.viewer_surface = surface;
        if let Some(session) = &mut self.session {
            session.viewer.resize(surface);
        }
    }

    /// The pattern surface changed size.
    pub fn resize_pattern(&mut self, surface: Surface) {
        self.pattern_surface = surface;
        if let Some(session) = &mut self.session {
            session.annotator.resize(surface);
        }
    }

    /// Click on the virtual image. Returns the event routed to the annotator.
    ///
    /// # Errors
    /// Returns an error if the annotator rejects the selection.
    pub fn viewer_click(&mut self, pixel: PixelPoint) -> Result<Option<ViewEvent>> {
        let Some(session) = &mut self.session else {
            return Ok(None);
        };
        let Some(event) = session.viewer.click(pixel) else {
            return Ok(None);
        };
        Self::route(session, event)?;
        Ok(Some(event))
    }

    /// Cursor over the virtual image.
    pub fn viewer_hover(&mut self, pixel: Option<PixelPoint>) -> Option<ScanIndex> {
        let session = self.session.as_mut()?;
        match pixel {
            Some(pixel) => session.viewer.hover(pixel),
            None => {
                session.viewer.clear_hover();
                None
            }
        }
    }

    /// Click on the diffraction pattern.
    pub fn pattern_click(&mut self, pixel: PixelPoint) -> Option<SpotAction> {
        self.session.as_mut()?.annotator.click(pixel)
    }

    /// Cursor over the diffraction pattern.
    pub fn pattern_hover(&mut self, pixel: Option<PixelPoint>) -> Option<NormalizedCoord> {
        let session = self.session.as_mut()?;
        match pixel {
            Some(pixel) => Some(session.annotator.hover(pixel)),
            None => {
                session.annotator.clear_hover();
                None
            }
        }
    }

    /// Shows the next pattern and moves the viewer marker with it.
    ///
    /// # Errors
    /// Returns [`Error::NoDataset`] before a dataset is loaded.
    pub fn next(&mut self) -> Result<ViewEvent> {
        let session = self.session.as_mut().ok_or(Error::NoDataset)?;
        let event = session.annotator.next()?;
        Self::route(session, event)?;
        Ok(event)
    }

    /// Shows the previous pattern and moves the viewer marker with it.
    ///
    /// # Errors
    /// Returns [`Error::NoDataset`] before a dataset is loaded.
    pub fn previous(&mut self) -> Result<ViewEvent> {
        let session = self.session.as_mut().ok_or(Error::NoDataset)?;
        let event = session.annotator.previous()?;
        Self::route(session, event)?;
        Ok(event)
    }

    /// Replaces the spot selection from an external list.
    pub fn set_selected_spots(&mut self, indices: &[usize]) {
        if let Some(session) = &mut self.session {
            session.annotator.set_selected_indices(indices);
        }
    }

    /// Selects every spot on the current pattern.
    pub fn select_all_spots(&mut self) {
        if let Some(session) = &mut self.session {
            session.annotator.select_all();
        }
    }

    /// Deletes the selected spots. Returns the number removed.
    pub fn delete_selected_spots(&mut self) -> usize {
        self.session
            .as_mut()
            .map_or(0, |session| session.annotator.delete_selected())
    }

    /// Removes every spot on the current pattern. Returns the number removed.
    pub fn clear_spots(&mut self) -> usize {
        self.session
            .as_mut()
            .map_or(0, |session| session.annotator.clear_spots())
    }

    fn route(session: &mut Session, event: ViewEvent) -> Result<()> {
        match event {
            ViewEvent::PointSelected(index) => session.annotator.on_point_selected(index),
            ViewEvent::RegionSelected(region) => session.annotator.on_region_selected(region),
            ViewEvent::NavigationChanged(target) => session.viewer.on_navigation_changed(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ScanRegion;
    use crate::navigation::DisplayTarget;

    #[allow(clippy::cast_precision_loss)]
    fn loaded() -> Coordinator {
        let mut c = Coordinator::new(AnnotatorConfig::default()).unwrap();
        c.resize_viewer(Surface::new(40, 30));
        c.resize_pattern(Surface::new(64, 64));
        let ds = Dataset::from_fn((3, 4, 4, 4), |(r, c, y, x)| (r + c + y + x) as f64).unwrap();
        c.load(ds).unwrap();
        c
    }

    #[test]
    fn test_inert_before_load() {
        let mut c = Coordinator::new(AnnotatorConfig::default()).unwrap();
        assert!(!c.is_loaded());
        assert_eq!(c.viewer_click(PixelPoint::new(1.0, 1.0)).unwrap(), None);
        assert_eq!(c.pattern_click(PixelPoint::new(1.0, 1.0)), None);
        assert_eq!(c.next(), Err(Error::NoDataset));
        assert_eq!(c.delete_selected_spots(), 0);
        assert_eq!(c.clear_spots(), 0);
    }

    #[test]
    fn test_viewer_click_drives_annotator() {
        let mut c = loaded();
        let event = c.viewer_click(PixelPoint::new(25.0, 15.0)).unwrap();
        assert_eq!(event, Some(ViewEvent::PointSelected(ScanIndex::new(2, 1))));
        let session = c.session().unwrap();
        assert_eq!(
            session.annotator().current(),
            DisplayTarget::SinglePoint(ScanIndex::new(2, 1))
        );
    }

    #[test]
    fn test_shift_region_selection() {
        let mut c = loaded();
        let _ = c.viewer_click(PixelPoint::new(5.0, 5.0)).unwrap();
        c.select_key_down();
        assert_eq!(c.mode(), InteractionMode::Select);
        let event = c.viewer_click(PixelPoint::new(25.0, 15.0)).unwrap();
        let region = ScanRegion::new(0, 0, 3, 2);
        assert_eq!(event, Some(ViewEvent::RegionSelected(region)));
        c.select_key_up();
        assert_eq!(c.mode(), InteractionMode::Normal);
        assert_eq!(
            c.session().unwrap().annotator().current(),
            DisplayTarget::CombinedRegion(region)
        );
    }

    #[test]
    fn test_navigation_moves_viewer_marker() {
        let mut c = loaded();
        let _ = c.next().unwrap();
        let _ = c.next().unwrap();
        let viewer = c.session().unwrap().viewer();
        assert_eq!(
            viewer.marker().target,
            DisplayTarget::SinglePoint(ScanIndex::new(2, 0))
        );
        assert_eq!(viewer.anchor(), ScanIndex::new(2, 0));
        let _ = c.previous().unwrap();
        assert_eq!(
            c.session().unwrap().viewer().anchor(),
            ScanIndex::new(1, 0)
        );
    }

    #[test]
    fn test_latch_and_key_combine() {
        let mut c = loaded();
        c.set_select_latched(true);
        c.select_key_down();
        c.select_key_up();
        assert_eq!(c.mode(), InteractionMode::Select);
        let _ = c.pattern_click(PixelPoint::new(32.0, 32.0));
        assert!(c.session().unwrap().annotator().spots().is_empty());
        c.set_select_latched(false);
        assert_eq!(
            c.pattern_click(PixelPoint::new(32.0, 32.0)),
            Some(SpotAction::Added(0))
        );
    }

    #[test]
    fn test_reload_keeps_surfaces() {
        let mut c = loaded();
        let ds = Dataset::from_fn((2, 2, 8, 8), |_| 1.0).unwrap();
        c.load(ds).unwrap();
        let session = c.session().unwrap();
        assert_eq!(session.viewer().transform().surface(), Surface::new(40, 30));
        assert_eq!(session.annotator().transform().surface(), Surface::new(64, 64));
        assert!(session.annotator().pattern().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_clear_spots_empties_current_pattern() {
        let mut c = loaded();
        let _ = c.pattern_click(PixelPoint::new(10.0, 10.0));
        let _ = c.pattern_click(PixelPoint::new(50.0, 50.0));
        assert_eq!(c.clear_spots(), 2);
        assert!(c.session().unwrap().annotator().spots().is_empty());
    }

    #[test]
    fn test_unload_returns_to_inert_state() {
        let mut c = loaded();
        c.set_select_latched(true);
        c.unload();
        assert!(!c.is_loaded());
        assert_eq!(c.next(), Err(Error::NoDataset));
        assert_eq!(c.pattern_click(PixelPoint::new(10.0, 10.0)), None);
        assert_eq!(c.mode(), InteractionMode::Select);

        let ds = Dataset::from_fn((2, 2, 4, 4), |_| 1.0).unwrap();
        c.load(ds).unwrap();
        let session = c.session().unwrap();
        assert_eq!(session.annotator().transform().surface(), Surface::new(64, 64));
        assert!(session.annotator().spots().is_empty());
    }
}
