//! Marker and spot rendering helpers.

use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke};
use stemnote_core::{PixelPoint, ScanIndex, ScanTransform, SpotStore};

use crate::util::f64_to_f32;

/// Half-length of the crosshair arms, in points.
const CROSSHAIR_ARM: f32 = 10.0;

/// Map a surface pixel into screen space for an image drawn at `rect`.
#[must_use]
pub fn to_screen(rect: Rect, p: PixelPoint) -> Pos2 {
    rect.min + egui::vec2(f64_to_f32(p.x), f64_to_f32(p.y))
}

/// Screen rectangle covered by one scan cell.
#[must_use]
pub fn cell_rect(rect: Rect, transform: &ScanTransform, index: ScanIndex) -> Rect {
    let (min, max) = transform.cell_bounds(index);
    Rect::from_min_max(to_screen(rect, min), to_screen(rect, max))
}

/// Draw a crosshair centred on `center`.
pub fn draw_crosshair(painter: &Painter, center: Pos2, stroke: Stroke) {
    let dx = egui::vec2(CROSSHAIR_ARM, 0.0);
    let dy = egui::vec2(0.0, CROSSHAIR_ARM);
    painter.line_segment([center - dx, center + dx], stroke);
    painter.line_segment([center - dy, center + dy], stroke);
}

/// Draw every spot as a circle; selected spots are filled, the hovered one
/// gets a thicker outline.
pub fn draw_spots(painter: &Painter, rect: Rect, spots: &SpotStore, radius: f32, color: Color32) {
    let hovered = spots.hovered();
    for (i, spot) in spots.iter().enumerate() {
        let center = to_screen(rect, spot.pixel);
        if spot.selected {
            painter.circle_filled(center, radius, color.gamma_multiply(0.5));
        }
        let width = if hovered == Some(i) { 2.5 } else { 1.5 };
        painter.circle_stroke(center, radius, Stroke::new(width, color));
    }
}
