//! UI state for view options and export choices.

use std::path::PathBuf;

use stemnote_core::NormalizedCoord;

use crate::viewer::Colormap;

/// What the export button writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportKind {
    /// Current pattern's spots as `x y` text.
    #[default]
    SpotsText,
    /// Every annotated pattern as JSON.
    AnnotationsJson,
    /// Virtual image as 8-bit PNG.
    VirtualImagePng,
    /// Current diffraction pattern as 8-bit PNG.
    PatternPng,
}

impl ExportKind {
    /// Every export kind, in menu order.
    pub const ALL: [ExportKind; 4] = [
        ExportKind::SpotsText,
        ExportKind::AnnotationsJson,
        ExportKind::VirtualImagePng,
        ExportKind::PatternPng,
    ];

    /// File dialog filter `(name, extensions)`.
    #[must_use]
    pub fn filter(self) -> (&'static str, &'static [&'static str]) {
        const TEXT: &[&str] = &["txt"];
        const JSON: &[&str] = &["json"];
        const PNG: &[&str] = &["png"];
        match self {
            ExportKind::SpotsText => ("Text", TEXT),
            ExportKind::AnnotationsJson => ("JSON", JSON),
            ExportKind::VirtualImagePng | ExportKind::PatternPng => ("PNG", PNG),
        }
    }

    /// Suggested file name.
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportKind::SpotsText => "spots.txt",
            ExportKind::AnnotationsJson => "annotations.json",
            ExportKind::VirtualImagePng => "virtual_image.png",
            ExportKind::PatternPng => "pattern.png",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::SpotsText => write!(f, "Spots (text)"),
            ExportKind::AnnotationsJson => write!(f, "All annotations (JSON)"),
            ExportKind::VirtualImagePng => write!(f, "Virtual image (PNG)"),
            ExportKind::PatternPng => write!(f, "Pattern (PNG)"),
        }
    }
}

/// UI display state.
#[derive(Default)]
pub struct UiState {
    /// Colormap for both images.
    pub colormap: Colormap,
    /// Export target for the export button.
    pub export_kind: ExportKind,
    /// Path of the loaded file.
    pub loaded_file: Option<PathBuf>,
    /// Logical coordinate under the cursor on the pattern.
    pub pattern_cursor: Option<NormalizedCoord>,
}
