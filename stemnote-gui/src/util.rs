//! Numeric conversion utilities for stemnote-gui.
//!
//! egui works in `f32` points while the core transforms work in `f64`
//! pixels; these helpers keep the casts in one place.

/// Convert usize to f32 with allowed precision loss.
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f32(value: usize) -> f32 {
    value as f32
}

/// Convert f64 to f32 with allowed truncation.
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_f32(value: f64) -> f32 {
    value as f32
}

/// Convert f32 to u8 with clamping to [0, 255].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn f32_to_u8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 255.0);
    clamped.round() as u8
}

/// Convert a widget extent in points to whole surface pixels (at least 1).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn extent_to_u32(value: f32) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    value.min(u32::MAX as f32).floor() as u32
}

/// Shorten a path to its file name for display.
#[must_use]
pub fn display_name(path: &std::path::Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
