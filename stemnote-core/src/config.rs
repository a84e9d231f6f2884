//! Annotator configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest allowed spot marker radius, in display pixels.
pub const MIN_SPOT_RADIUS: f64 = 1.0;
/// Largest allowed spot marker radius, in display pixels.
pub const MAX_SPOT_RADIUS: f64 = 100.0;

/// What happens to placed spots when the displayed pattern changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpotRetention {
    /// Every display target keeps its own spot list, restored on return.
    #[default]
    PerPattern,
    /// One spot list survives every navigation.
    Shared,
}

impl std::fmt::Display for SpotRetention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotRetention::PerPattern => write!(f, "Per pattern"),
            SpotRetention::Shared => write!(f, "Shared"),
        }
    }
}

/// Configuration for the diffraction pattern annotator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatorConfig {
    /// Marker radius in display pixels; also the select-mode hit radius.
    pub spot_radius: f64,
    /// Whether markers are drawn.
    pub show_spots: bool,
    /// Spot retention across navigation.
    pub retention: SpotRetention,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            spot_radius: 5.0,
            show_spots: true,
            retention: SpotRetention::PerPattern,
        }
    }
}

impl AnnotatorConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the marker radius.
    #[must_use]
    pub fn with_spot_radius(mut self, radius: f64) -> Self {
        self.spot_radius = radius;
        self
    }

    /// Sets marker visibility.
    #[must_use]
    pub fn with_show_spots(mut self, show: bool) -> Self {
        self.show_spots = show;
        self
    }

    /// Sets the retention policy.
    #[must_use]
    pub fn with_retention(mut self, retention: SpotRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the spot radius is outside `[1, 100]`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SPOT_RADIUS..=MAX_SPOT_RADIUS).contains(&self.spot_radius) {
            return Err(Error::ConfigError(format!(
                "spot radius {} outside [{MIN_SPOT_RADIUS}, {MAX_SPOT_RADIUS}]",
                self.spot_radius
            )));
        }
        Ok(())
    }
}
