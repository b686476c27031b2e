//! Theme styling functions.

use eframe::egui::{self, Color32, CornerRadius, Stroke};

use super::colors;
use crate::egui_app::flash::FlashKind;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.panel_fill = colors::BG_PAGE;
    style.visuals.window_fill = colors::CARD_BG;
    style.visuals.window_stroke = Stroke::new(1.0, colors::BORDER);
    style.visuals.override_text_color = Some(colors::INK);

    style.visuals.widgets.active.bg_fill = colors::GRAD_A;
    style.visuals.widgets.hovered.bg_fill = colors::GRAD_B;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.selection.bg_fill = colors::GRAD_B;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    ctx.set_style(style);
}

/// Create a frame style for the top bar
pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Create a frame style for the central panel
pub fn page_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::BG_PAGE)
        .inner_margin(egui::Margin::symmetric(16, 12))
}

/// White rounded card used for forms and list rows
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CARD_BG)
        .stroke(Stroke::new(1.0, colors::BORDER))
        .corner_radius(CornerRadius::same(10))
        .inner_margin(egui::Margin::same(12))
}

/// Dashboard card; grey when the module is not available
pub fn tile_frame(enabled: bool) -> egui::Frame {
    egui::Frame::new()
        .fill(if enabled { colors::GRAD_B } else { colors::DISABLED })
        .corner_radius(CornerRadius::same(12))
        .inner_margin(egui::Margin::same(16))
}

/// Create a frame for modal dialogs
pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CARD_BG)
        .stroke(Stroke::new(1.0, colors::BORDER))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(egui::Margin::same(20))
        .shadow(egui::epaint::Shadow {
            offset: [0, 4],
            blur: 12,
            spread: 0,
            color: Color32::from_black_alpha(60),
        })
}

pub fn flash_color(kind: FlashKind) -> Color32 {
    match kind {
        FlashKind::Success => colors::SUCCESS,
        FlashKind::Danger => colors::DANGER,
        FlashKind::Warning => colors::WARNING,
    }
}

/// Filled button in the primary color with white text
pub fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(colors::TEXT_LIGHT))
        .fill(colors::PRIMARY)
        .corner_radius(CornerRadius::same(6))
}

pub fn danger_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(colors::TEXT_LIGHT))
        .fill(colors::DANGER)
        .corner_radius(CornerRadius::same(6))
}
