//! Control panel (left sidebar) and status bar rendering.

use eframe::egui::{self, RichText};
use rfd::FileDialog;
use stemnote_core::{
    AnnotatorConfig, InteractionMode, SpotRetention, MAX_SPOT_RADIUS, MIN_SPOT_RADIUS,
};

use super::theme::{accent, form_label, primary_button, section_header, ThemeColors};
use crate::app::StemnoteApp;
use crate::state::{ExportKind, StatusLevel};
use crate::util::display_name;
use crate::viewer::Colormap;

#[cfg(feature = "hdf5")]
const DATASET_EXTENSIONS: &[&str] = &["npz", "h5", "hdf5"];
#[cfg(not(feature = "hdf5"))]
const DATASET_EXTENSIONS: &[&str] = &["npz"];

impl StemnoteApp {
    /// Render the left sidebar.
    pub(crate) fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("STEMNOTE")
                        .size(14.0)
                        .strong()
                        .color(accent::BLUE),
                );
                ui.separator();

                self.render_file_section(ui);
                ui.separator();
                self.render_position_section(ui);
                ui.separator();
                self.render_spot_controls(ui);
                ui.separator();
                self.render_view_controls(ui);
                ui.separator();
                self.render_spot_list(ui);
                ui.separator();
                self.render_actions(ui);
            });
    }

    fn render_file_section(&mut self, ui: &mut egui::Ui) {
        if ui.add(primary_button("Load Data")).clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("4D-STEM dataset", DATASET_EXTENSIONS)
                .pick_file()
            {
                self.load_file(path);
            }
        }
        if ui
            .add_enabled(self.coordinator.is_loaded(), egui::Button::new("Close"))
            .clicked()
        {
            self.close_file();
        }
        let name = self
            .ui_state
            .loaded_file
            .as_deref()
            .map_or_else(|| "No file loaded".to_string(), display_name);
        ui.label(RichText::new(name).weak());
    }

    fn render_position_section(&self, ui: &mut egui::Ui) {
        ui.label(section_header("Position"));
        let Some(session) = self.coordinator.session() else {
            ui.label(RichText::new("-").weak());
            return;
        };
        let (rows, cols, ky, kx) = session.dataset().shape();
        egui::Grid::new("position_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(form_label("Scan"));
                ui.label(format!("{cols} x {rows}"));
                ui.end_row();

                ui.label(form_label("Pattern"));
                ui.label(format!("{kx} x {ky}"));
                ui.end_row();

                ui.label(form_label("Showing"));
                ui.label(session.annotator().current().to_string());
                ui.end_row();

                ui.label(form_label("Index"));
                ui.label(
                    session
                        .viewer()
                        .hovered()
                        .map_or_else(|| "-".to_string(), |i| i.to_string()),
                );
                ui.end_row();

                ui.label(form_label("Coordinates"));
                ui.label(
                    self.ui_state
                        .pattern_cursor
                        .map_or_else(|| "-".to_string(), |c| c.to_string()),
                );
                ui.end_row();
            });
    }

    fn render_spot_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(section_header("Spots"));
        let mut config = self.coordinator.config().clone();

        ui.horizontal(|ui| {
            ui.label(form_label("Spot size"));
            ui.add(egui::Slider::new(
                &mut config.spot_radius,
                MIN_SPOT_RADIUS..=MAX_SPOT_RADIUS,
            ));
        });
        ui.checkbox(&mut config.show_spots, "Show Spots");

        let mut latched = self.coordinator.select_latched();
        if ui
            .checkbox(&mut latched, "Select Mode")
            .on_hover_text("Hold Shift for a temporary select mode")
            .changed()
        {
            self.coordinator.set_select_latched(latched);
        }

        ui.horizontal(|ui| {
            ui.label(form_label("Keep spots"));
            egui::ComboBox::from_id_salt("retention")
                .selected_text(config.retention.to_string())
                .show_ui(ui, |ui| {
                    for r in [SpotRetention::PerPattern, SpotRetention::Shared] {
                        ui.selectable_value(&mut config.retention, r, r.to_string());
                    }
                });
        });

        self.apply_config(config);
    }

    fn apply_config(&mut self, config: AnnotatorConfig) {
        if &config == self.coordinator.config() {
            return;
        }
        if let Err(e) = self.coordinator.set_config(config) {
            self.status.error(format!("Error: {e}"));
        }
    }

    fn render_view_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(form_label("Colormap"));
            egui::ComboBox::from_id_salt("colormap")
                .selected_text(self.ui_state.colormap.to_string())
                .show_ui(ui, |ui| {
                    for cmap in Colormap::ALL {
                        ui.selectable_value(&mut self.ui_state.colormap, cmap, cmap.to_string());
                    }
                });
        });
        let mode = match self.coordinator.mode() {
            InteractionMode::Normal => "normal",
            InteractionMode::Select => "select",
        };
        ui.label(RichText::new(format!("Mode: {mode}")).weak());
    }

    fn render_spot_list(&mut self, ui: &mut egui::Ui) {
        let Some(session) = self.coordinator.session() else {
            return;
        };
        let spots = session.annotator().spots();
        ui.label(section_header(&format!("Spot list ({})", spots.len())));

        let mut selection = spots.selected_indices();
        let mut changed = false;
        egui::ScrollArea::vertical()
            .max_height(180.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (i, spot) in spots.iter().enumerate() {
                    let text = format!("{i:>3}  {}", spot.coord);
                    let response = ui.selectable_label(spot.selected, text);
                    if response.clicked() {
                        let additive = ui.input(|inp| inp.modifiers.command);
                        match (additive, selection.binary_search(&i)) {
                            (true, Ok(pos)) => {
                                selection.remove(pos);
                            }
                            (true, Err(pos)) => selection.insert(pos, i),
                            (false, _) => selection = vec![i],
                        }
                        changed = true;
                    }
                }
            });

        if changed {
            self.coordinator.set_selected_spots(&selection);
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let loaded = self.coordinator.is_loaded();
        ui.add_enabled_ui(loaded, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Delete Selected").clicked() {
                    self.delete_selected();
                }
                if ui.button("Clear Spots").clicked() {
                    self.clear_spots();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Previous Image").clicked() {
                    self.navigate(false);
                }
                if ui.button("Next Image").clicked() {
                    self.navigate(true);
                }
            });

            ui.add_space(6.0);
            ui.label(section_header("Export"));
            egui::ComboBox::from_id_salt("export_kind")
                .selected_text(self.ui_state.export_kind.to_string())
                .show_ui(ui, |ui| {
                    for kind in ExportKind::ALL {
                        ui.selectable_value(&mut self.ui_state.export_kind, kind, kind.to_string());
                    }
                });
            if ui.button("Export Data").clicked() {
                self.export_with_dialog();
            }
        });
    }

    /// Render the status bar along the bottom edge.
    pub(crate) fn render_status_bar(&self, ctx: &egui::Context) {
        let colors = ThemeColors::from_ctx(ctx);
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(colors.bg_header)
                    .inner_margin(egui::Margin::symmetric(12.0, 6.0)),
            )
            .show(ctx, |ui| {
                let color = match self.status.level {
                    StatusLevel::Info => ThemeColors::from_ui(ui).text_muted,
                    StatusLevel::Error => accent::RED,
                };
                ui.label(RichText::new(&self.status.text).color(color));
            });
    }
}
