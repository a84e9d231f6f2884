//! UI rendering modules.
//!
//! - `control_panel`: left sidebar with controls, spot list and status bar
//! - `main_view`: central panel with the virtual image and the pattern
//! - `theme`: palettes and egui style

mod control_panel;
mod main_view;
pub mod theme;
