//! Application theme and color definitions.
//!
//! Light and dark palettes with monospace fonts, following system preference.

use eframe::egui::{
    self, Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Theme, Visuals,
};

/// Palette for one theme.
#[derive(Clone, Copy)]
pub struct ThemeColors {
    pub bg_dark: Color32,
    pub bg_panel: Color32,
    pub bg_header: Color32,
    pub bg_input: Color32,
    pub border: Color32,
    pub border_light: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub button_hover: Color32,
}

/// Dark palette.
pub const DARK: ThemeColors = ThemeColors {
    bg_dark: Color32::from_rgb(0x1a, 0x1a, 0x1a),
    bg_panel: Color32::from_rgb(0x1f, 0x1f, 0x1f),
    bg_header: Color32::from_rgb(0x25, 0x25, 0x25),
    bg_input: Color32::from_rgb(0x2a, 0x2a, 0x2a),
    border: Color32::from_rgb(0x33, 0x33, 0x33),
    border_light: Color32::from_rgb(0x44, 0x44, 0x44),
    text_primary: Color32::from_rgb(0xe0, 0xe0, 0xe0),
    text_muted: Color32::from_rgb(0x88, 0x88, 0x88),
    button_hover: Color32::from_rgb(0x3a, 0x3a, 0x3a),
};

/// Light palette.
pub const LIGHT: ThemeColors = ThemeColors {
    bg_dark: Color32::from_rgb(0xf5, 0xf5, 0xf5),
    bg_panel: Color32::from_rgb(0xff, 0xff, 0xff),
    bg_header: Color32::from_rgb(0xfa, 0xfa, 0xfa),
    bg_input: Color32::from_rgb(0xf0, 0xf0, 0xf0),
    border: Color32::from_rgb(0xd0, 0xd0, 0xd0),
    border_light: Color32::from_rgb(0xc0, 0xc0, 0xc0),
    text_primary: Color32::from_rgb(0x1a, 0x1a, 0x1a),
    text_muted: Color32::from_rgb(0x66, 0x66, 0x66),
    button_hover: Color32::from_rgb(0xdd, 0xdd, 0xdd),
};

/// Shared accent colors (same for both themes).
pub mod accent {
    use eframe::egui::Color32;

    pub const BLUE: Color32 = Color32::from_rgb(0x4a, 0x9e, 0xff);
    pub const GREEN: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
    pub const RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
    pub const YELLOW: Color32 = Color32::from_rgb(0xf5, 0xc5, 0x18);
}

impl ThemeColors {
    /// Get colors for the current theme from context.
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        Self::from_dark_mode(ctx.style().visuals.dark_mode)
    }

    /// Get colors for the current theme from UI.
    pub fn from_ui(ui: &egui::Ui) -> Self {
        Self::from_dark_mode(ui.visuals().dark_mode)
    }

    /// Get colors based on dark mode flag.
    pub fn from_dark_mode(is_dark: bool) -> Self {
        if is_dark {
            DARK
        } else {
            LIGHT
        }
    }
}

/// Configure style based on current visuals (dark/light mode).
pub fn configure_style(ctx: &egui::Context) {
    let theme = if ctx.style().visuals.dark_mode {
        Theme::Dark
    } else {
        Theme::Light
    };
    let visuals = match theme {
        Theme::Dark => build_visuals(Visuals::dark(), DARK, 0.3),
        Theme::Light => build_visuals(Visuals::light(), LIGHT, 0.2),
    };
    ctx.set_visuals(visuals);
    configure_fonts_and_spacing(ctx);
}

fn build_visuals(mut visuals: Visuals, c: ThemeColors, selection_alpha: f32) -> Visuals {
    visuals.window_fill = c.bg_panel;
    visuals.panel_fill = c.bg_panel;
    visuals.faint_bg_color = c.bg_dark;
    visuals.extreme_bg_color = c.bg_input;

    let rounding = Rounding::same(4.0);
    let w = &mut visuals.widgets;

    w.noninteractive.bg_fill = c.bg_input;
    w.noninteractive.fg_stroke = Stroke::new(1.0, c.text_muted);
    w.noninteractive.bg_stroke = Stroke::new(1.0, c.border);
    w.noninteractive.rounding = rounding;

    w.inactive.bg_fill = c.bg_input;
    w.inactive.fg_stroke = Stroke::new(1.0, c.text_primary);
    w.inactive.bg_stroke = Stroke::new(1.0, c.border_light);
    w.inactive.rounding = rounding;

    w.hovered.bg_fill = c.button_hover;
    w.hovered.fg_stroke = Stroke::new(1.0, c.text_primary);
    w.hovered.bg_stroke = Stroke::new(1.0, accent::BLUE);
    w.hovered.rounding = rounding;

    w.active.bg_fill = accent::BLUE;
    w.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    w.active.bg_stroke = Stroke::new(1.0, accent::BLUE);
    w.active.rounding = rounding;

    w.open.bg_fill = c.bg_input;
    w.open.fg_stroke = Stroke::new(1.0, c.text_primary);
    w.open.bg_stroke = Stroke::new(1.0, c.border_light);
    w.open.rounding = rounding;

    visuals.selection.bg_fill = accent::BLUE.gamma_multiply(selection_alpha);
    visuals.selection.stroke = Stroke::new(1.0, accent::BLUE);

    visuals
}

/// Configure fonts and spacing (theme-independent).
fn configure_fonts_and_spacing(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Small, FontId::new(10.0, FontFamily::Monospace)),
        (TextStyle::Body, FontId::new(12.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(12.0, FontFamily::Monospace)),
        (TextStyle::Heading, FontId::new(14.0, FontFamily::Monospace)),
        (
            TextStyle::Monospace,
            FontId::new(12.0, FontFamily::Monospace),
        ),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.indent = 16.0;

    ctx.set_style(style);
}

/// Style a button as the primary action button.
pub fn primary_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(egui::RichText::new(text).color(Color32::WHITE))
        .fill(accent::GREEN)
        .rounding(Rounding::same(4.0))
}

/// Create a section header label.
pub fn section_header(text: &str) -> egui::RichText {
    egui::RichText::new(text.to_uppercase()).size(11.0).strong()
}

/// Create a form label.
pub fn form_label(text: &str) -> egui::RichText {
    egui::RichText::new(text.to_uppercase()).size(10.0)
}
