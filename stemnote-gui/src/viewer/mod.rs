//! Visualization modules for image display.

mod colormap;
mod overlay;
mod texture;

pub use colormap::Colormap;
pub use overlay::{cell_rect, draw_crosshair, draw_spots, to_screen};
pub use texture::intensity_image;
