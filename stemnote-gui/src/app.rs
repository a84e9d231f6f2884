//! Main application state and logic.
//!
//! Contains the `StemnoteApp` struct which owns the [`Coordinator`], the
//! textures derived from it, and the status line.

use std::path::{Path, PathBuf};

use eframe::egui;
use stemnote_core::{render_virtual_image, Coordinator, DisplayTarget, ViewEvent};
use stemnote_io::{load_dataset, save_gray_png, SpotFileWriter};

use crate::state::{ExportKind, Status, UiState};
use crate::util::display_name;
use crate::viewer::{intensity_image, Colormap};

/// Main application state.
#[derive(Default)]
pub struct StemnoteApp {
    /// Dataset session and both views.
    pub(crate) coordinator: Coordinator,
    /// UI display state.
    pub(crate) ui_state: UiState,
    /// Status line.
    pub(crate) status: Status,

    /// Cached virtual image texture.
    pub(crate) virtual_texture: Option<egui::TextureHandle>,
    /// Colormap the virtual image texture was built with.
    virtual_colormap: Option<Colormap>,
    /// Cached diffraction pattern texture.
    pub(crate) pattern_texture: Option<egui::TextureHandle>,
    /// Pattern and colormap the pattern texture was built with.
    pattern_key: Option<(DisplayTarget, Colormap)>,

    /// Shift state seen on the previous frame.
    shift_held: bool,
}

impl StemnoteApp {
    /// Load a dataset, replacing the current one on success.
    ///
    /// On failure the previous dataset stays loaded and the error goes to
    /// the status line.
    pub fn load_file(&mut self, path: PathBuf) {
        let loaded = load_dataset(&path).and_then(|dataset| {
            let shape = dataset.shape();
            self.coordinator.load(dataset)?;
            Ok(shape)
        });
        match loaded {
            Ok((rows, cols, ky, kx)) => {
                self.status.info(format!(
                    "Loaded {}: {rows}x{cols} scan, {ky}x{kx} patterns",
                    display_name(&path)
                ));
                self.ui_state.loaded_file = Some(path);
                self.invalidate_textures();
            }
            Err(e) => {
                self.status.error(format!("Error: {e}"));
            }
        }
    }

    /// Close the current dataset; spots placed on it are discarded.
    pub fn close_file(&mut self) {
        if !self.coordinator.is_loaded() {
            return;
        }
        self.coordinator.unload();
        self.invalidate_textures();
        self.ui_state.pattern_cursor = None;
        if let Some(path) = self.ui_state.loaded_file.take() {
            log::info!("Closed {}", path.display());
            self.status.info(format!("Closed {}", display_name(&path)));
        }
    }

    /// Drop cached textures so the next frame rebuilds them.
    fn invalidate_textures(&mut self) {
        self.virtual_texture = None;
        self.virtual_colormap = None;
        self.pattern_texture = None;
        self.pattern_key = None;
    }

    /// Rebuild textures whose source image or colormap changed.
    pub fn refresh_textures(&mut self, ctx: &egui::Context) {
        let Some(session) = self.coordinator.session() else {
            return;
        };
        let colormap = self.ui_state.colormap;

        if self.virtual_colormap != Some(colormap) || self.virtual_texture.is_none() {
            let img = intensity_image(session.viewer().image(), colormap);
            self.virtual_texture =
                Some(ctx.load_texture("virtual", img, egui::TextureOptions::NEAREST));
            self.virtual_colormap = Some(colormap);
        }

        let key = (session.annotator().current(), colormap);
        if self.pattern_key != Some(key) || self.pattern_texture.is_none() {
            let img = intensity_image(session.annotator().pattern(), colormap);
            self.pattern_texture =
                Some(ctx.load_texture("pattern", img, egui::TextureOptions::NEAREST));
            self.pattern_key = Some(key);
        }
    }

    /// Step to the next or previous pattern.
    pub fn navigate(&mut self, forward: bool) {
        let result = if forward {
            self.coordinator.next()
        } else {
            self.coordinator.previous()
        };
        match result {
            Ok(ViewEvent::NavigationChanged(target)) => {
                log::debug!("Showing {target}");
                self.status.info(format!("Showing {target}"));
            }
            Ok(_) => {}
            Err(e) => self.status.error(format!("Error: {e}")),
        }
    }

    /// Delete the selected spots of the current pattern.
    pub fn delete_selected(&mut self) {
        let removed = self.coordinator.delete_selected_spots();
        if removed > 0 {
            self.status.info(format!("Deleted {removed} spot(s)"));
        }
    }

    /// Remove every spot of the current pattern.
    pub fn clear_spots(&mut self) {
        let removed = self.coordinator.clear_spots();
        if removed > 0 {
            self.status.info(format!("Cleared {removed} spot(s)"));
        }
    }

    /// Ask for a destination and export.
    pub fn export_with_dialog(&mut self) {
        let kind = self.ui_state.export_kind;
        let (name, extensions) = kind.filter();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(name, extensions)
            .set_file_name(kind.default_file_name())
            .save_file()
        {
            self.export(kind, &path);
        }
    }

    /// Write the chosen export to `path`.
    pub fn export(&mut self, kind: ExportKind, path: &Path) {
        let Some(session) = self.coordinator.session() else {
            self.status.error("Nothing to export: no dataset loaded");
            return;
        };
        let annotator = session.annotator();
        let result = match kind {
            ExportKind::SpotsText => SpotFileWriter::create(path).and_then(|mut w| {
                w.write_text(annotator.current(), annotator.spots().coordinates())
                    .map(|n| format!("Exported {n} spot(s) to {}", display_name(path)))
            }),
            ExportKind::AnnotationsJson => SpotFileWriter::create(path).and_then(|mut w| {
                let all = annotator.annotations();
                w.write_json(&all).map(|()| {
                    format!("Exported {} pattern(s) to {}", all.len(), display_name(path))
                })
            }),
            ExportKind::VirtualImagePng => {
                save_gray_png(path, &render_virtual_image(session.dataset()))
                    .map(|()| format!("Saved virtual image to {}", display_name(path)))
            }
            ExportKind::PatternPng => save_gray_png(path, annotator.pattern())
                .map(|()| format!("Saved pattern to {}", display_name(path))),
        };
        match result {
            Ok(msg) => {
                log::info!("{msg}");
                self.status.info(msg);
            }
            Err(e) => {
                log::warn!("Export to {} failed: {e}", path.display());
                self.status.error(format!("Export failed: {e}"));
            }
        }
    }

    /// Keyboard: Shift held selects, arrows navigate, Delete removes spots.
    pub fn handle_keys(&mut self, ctx: &egui::Context) {
        let (shift, next, prev, delete, select_all) = ctx.input(|i| {
            (
                i.modifiers.shift,
                i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.modifiers.command && i.key_pressed(egui::Key::A),
            )
        });

        if shift != self.shift_held {
            if shift {
                self.coordinator.select_key_down();
            } else {
                self.coordinator.select_key_up();
            }
            self.shift_held = shift;
        }

        if !self.coordinator.is_loaded() {
            return;
        }
        if next {
            self.navigate(true);
        }
        if prev {
            self.navigate(false);
        }
        if delete {
            self.delete_selected();
        }
        if select_all {
            self.coordinator.select_all_spots();
        }
    }
}

impl eframe::App for StemnoteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.refresh_textures(ctx);
        self.render_side_panel(ctx);
        self.render_status_bar(ctx);
        self.render_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;
    use ndarray_npy::NpzWriter;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_npz(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("scan.npz");
        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array("data", &Array4::<f64>::from_elem((2, 3, 4, 4), 1.0))
            .unwrap();
        let _ = npz.finish().unwrap();
        path
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let dir = TempDir::new().unwrap();
        let mut app = StemnoteApp::default();
        app.load_file(write_npz(&dir));
        assert!(app.coordinator.is_loaded());

        let bad = dir.path().join("bad.npz");
        std::fs::write(&bad, b"garbage").unwrap();
        app.load_file(bad);

        assert_eq!(app.status.level, crate::state::StatusLevel::Error);
        let session = app.coordinator.session().unwrap();
        assert_eq!(session.dataset().shape(), (2, 3, 4, 4));
        assert!(app
            .ui_state
            .loaded_file
            .as_ref()
            .is_some_and(|p| p.ends_with("scan.npz")));
    }

    #[test]
    fn test_export_without_dataset_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = StemnoteApp::default();
        app.export(ExportKind::SpotsText, &dir.path().join("spots.txt"));
        assert_eq!(app.status.level, crate::state::StatusLevel::Error);
        assert!(!dir.path().join("spots.txt").exists());
    }

    #[test]
    fn test_navigate_updates_status() {
        let dir = TempDir::new().unwrap();
        let mut app = StemnoteApp::default();
        app.load_file(write_npz(&dir));
        app.navigate(true);
        assert!(app.status.text.contains("(1, 0)"));
        app.navigate(false);
        app.navigate(false);
        assert!(app.status.text.contains("(2, 1)"));
    }

    #[test]
    fn test_clear_spots_reports_count() {
        let dir = TempDir::new().unwrap();
        let mut app = StemnoteApp::default();
        app.load_file(write_npz(&dir));
        app.coordinator.resize_pattern(stemnote_core::Surface::new(64, 64));
        let _ = app
            .coordinator
            .pattern_click(stemnote_core::PixelPoint::new(20.0, 20.0));
        app.clear_spots();
        assert_eq!(app.status.text, "Cleared 1 spot(s)");
        assert!(app.coordinator.session().unwrap().annotator().spots().is_empty());
    }

    #[test]
    fn test_close_file_unloads_dataset() {
        let dir = TempDir::new().unwrap();
        let mut app = StemnoteApp::default();
        app.load_file(write_npz(&dir));
        app.close_file();
        assert!(!app.coordinator.is_loaded());
        assert!(app.ui_state.loaded_file.is_none());
        assert!(app.status.text.contains("scan.npz"));

        app.export(ExportKind::PatternPng, &dir.path().join("pattern.png"));
        assert_eq!(app.status.level, crate::state::StatusLevel::Error);
    }
}
