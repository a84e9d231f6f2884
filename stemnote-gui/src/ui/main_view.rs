//! Main view (central panel) rendering: virtual image and diffraction pattern.

use eframe::egui::{self, Align2, Color32, FontId, Rect, Stroke};
use stemnote_core::{DisplayTarget, InteractionMode, PixelPoint, SpotAction, Surface, ViewEvent};

use super::theme::accent;
use crate::app::StemnoteApp;
use crate::util::{extent_to_u32, f64_to_f32, usize_to_f32};
use crate::viewer::{cell_rect, draw_crosshair, draw_spots, to_screen};

/// Largest rectangle with the image's aspect ratio that fits `available`.
fn fit_size(available: egui::Vec2, (rows, cols): (usize, usize)) -> egui::Vec2 {
    let aspect = usize_to_f32(cols.max(1)) / usize_to_f32(rows.max(1));
    let width = available.x.min(available.y * aspect).max(1.0);
    egui::vec2(width, (width / aspect).max(1.0))
}

fn surface_of(rect: Rect) -> Surface {
    Surface::new(extent_to_u32(rect.width()), extent_to_u32(rect.height()))
}

/// Pointer position relative to the image's top-left corner.
fn local_pixel(rect: Rect, pos: Option<egui::Pos2>) -> Option<PixelPoint> {
    pos.filter(|p| rect.contains(*p)).map(|p| {
        let d = p - rect.min;
        PixelPoint::new(f64::from(d.x), f64::from(d.y))
    })
}

fn paint_texture(painter: &egui::Painter, rect: Rect, texture: Option<&egui::TextureHandle>) {
    match texture {
        Some(tex) => {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), rect, uv, Color32::WHITE);
        }
        None => {
            painter.rect_filled(rect, 0.0, Color32::BLACK);
        }
    }
}

impl StemnoteApp {
    /// Render the central panel with both image views.
    pub(crate) fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.coordinator.is_loaded() {
                ui.centered_and_justified(|ui| ui.label("No Data"));
                return;
            }
            ui.columns(2, |columns| {
                self.render_virtual_view(&mut columns[0]);
                self.render_pattern_view(&mut columns[1]);
            });
        });
    }

    fn render_virtual_view(&mut self, ui: &mut egui::Ui) {
        let Some(shape) = self.coordinator.session().map(|s| s.viewer().image().dim()) else {
            return;
        };
        let size = fit_size(ui.available_size(), shape);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        self.coordinator.resize_viewer(surface_of(rect));

        let cursor = local_pixel(rect, response.hover_pos());
        let _ = self.coordinator.viewer_hover(cursor);

        if response.clicked() {
            if let Some(pixel) = local_pixel(rect, response.interact_pointer_pos()) {
                match self.coordinator.viewer_click(pixel) {
                    Ok(Some(ViewEvent::PointSelected(index))) => {
                        self.status.info(format!("Showing index {index}"));
                    }
                    Ok(Some(ViewEvent::RegionSelected(region))) => {
                        self.status
                            .info(format!("Showing region {region} ({} points)", region.len()));
                    }
                    Ok(_) => {}
                    Err(e) => self.status.error(format!("Error: {e}")),
                }
                ui.ctx().request_repaint();
            }
        }

        let Some(session) = self.coordinator.session() else {
            return;
        };
        let viewer = session.viewer();
        let painter = ui.painter_at(rect);
        paint_texture(&painter, rect, self.virtual_texture.as_ref());

        let marker = viewer.marker();
        let marker_rect =
            Rect::from_min_max(to_screen(rect, marker.min), to_screen(rect, marker.max));
        let stroke = Stroke::new(2.0, accent::GREEN);
        match marker.target {
            DisplayTarget::SinglePoint(_) => {
                draw_crosshair(&painter, marker_rect.center(), stroke);
            }
            DisplayTarget::CombinedRegion(_) => {
                painter.rect_stroke(marker_rect, 0.0, stroke);
            }
        }

        if viewer.mode() == InteractionMode::Select {
            if let Some(pixel) = cursor {
                let region = viewer.region_preview(pixel);
                let transform = viewer.transform();
                let first = cell_rect(rect, &transform, region.origin());
                let last = region
                    .last()
                    .map_or(first, |index| cell_rect(rect, &transform, index));
                painter.rect_stroke(first.union(last), 0.0, Stroke::new(1.5, accent::YELLOW));
            }
        }

        if let Some(index) = viewer.hovered() {
            painter.text(
                rect.left_top() + egui::vec2(4.0, 4.0),
                Align2::LEFT_TOP,
                format!("Index: {index}"),
                FontId::monospace(11.0),
                accent::YELLOW,
            );
        }
    }

    fn render_pattern_view(&mut self, ui: &mut egui::Ui) {
        let Some(shape) = self.coordinator.session().map(|s| s.annotator().pattern().dim()) else {
            return;
        };
        let size = fit_size(ui.available_size(), shape);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        self.coordinator.resize_pattern(surface_of(rect));

        self.ui_state.pattern_cursor = self
            .coordinator
            .pattern_hover(local_pixel(rect, response.hover_pos()));

        if response.clicked() {
            if let Some(pixel) = local_pixel(rect, response.interact_pointer_pos()) {
                if let Some(SpotAction::Added(i)) = self.coordinator.pattern_click(pixel) {
                    log::debug!("Added spot {i}");
                }
            }
        }

        let Some(session) = self.coordinator.session() else {
            return;
        };
        let annotator = session.annotator();
        let painter = ui.painter_at(rect);
        paint_texture(&painter, rect, self.pattern_texture.as_ref());

        let config = annotator.config();
        if config.show_spots {
            draw_spots(
                &painter,
                rect,
                annotator.spots(),
                f64_to_f32(config.spot_radius),
                accent::RED,
            );
        }

        if let Some(coord) = self.ui_state.pattern_cursor {
            painter.text(
                rect.left_top() + egui::vec2(4.0, 4.0),
                Align2::LEFT_TOP,
                format!("Coordinates: {coord}"),
                FontId::monospace(11.0),
                accent::YELLOW,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size_keeps_aspect() {
        let size = fit_size(egui::vec2(400.0, 300.0), (10, 20));
        assert_eq!(size, egui::vec2(400.0, 200.0));
        let size = fit_size(egui::vec2(400.0, 300.0), (30, 10));
        assert!((size.x - 100.0).abs() < 1e-3);
        assert!((size.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_local_pixel_outside_rect_is_none() {
        let rect = Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(50.0, 50.0));
        assert!(local_pixel(rect, Some(egui::pos2(5.0, 20.0))).is_none());
        let p = local_pixel(rect, Some(egui::pos2(35.0, 20.0))).unwrap();
        assert_eq!(p, PixelPoint::new(25.0, 10.0));
    }
}
