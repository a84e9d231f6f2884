//! stemnote-core: Core types for exploring and annotating 4D-STEM datasets.
//!
//! This crate provides the dataset container, the reductions that turn it
//! into displayable images, the coordinate transforms between display
//! surfaces and logical coordinates, the spot annotation store, and the
//! viewer / annotator state machines tied together by a [`Coordinator`].
//!

pub mod annotator;
pub mod config;
pub mod coordinator;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod events;
pub mod grid;
pub mod navigation;
pub mod reduce;
pub mod spots;
pub mod viewer;

pub use annotator::{Annotator, PatternAnnotations};
pub use config::{AnnotatorConfig, SpotRetention, MAX_SPOT_RADIUS, MIN_SPOT_RADIUS};
pub use coordinator::{Coordinator, Session};
pub use coords::{
    NormalizedCoord, NormalizedTransform, PixelPoint, RawIndex, ScanTransform, Surface,
};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use events::{InteractionMode, SpotAction, ViewEvent, ViewListener};
pub use grid::{ScanGrid, ScanIndex, ScanRegion};
pub use navigation::{DisplayTarget, Navigator};
pub use reduce::{
    region_sum, render_pattern, render_virtual_image, rescale_to_u8, single_pattern,
    virtual_image_sum,
};
pub use spots::{Spot, SpotStore};
pub use viewer::{Marker, Viewer};
