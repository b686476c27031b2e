//! Small pieces shared by several views.

use std::time::Instant;

use eframe::egui;

use crate::egui_app::flash::FlashSlot;
use crate::egui_app::screens::FieldErrors;
use crate::egui_app::theme::{colors, styles};
use crate::shared::pagination::Pagination;

pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];

pub enum PagerAction {
    GoTo(u32),
    PageSize(u32),
}

pub fn flash(ui: &mut egui::Ui, slot: &FlashSlot, now: Instant) {
    let Some(flash) = slot.visible(now) else {
        return;
    };
    let color = styles::flash_color(flash.kind);
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.colored_label(color, &flash.text);
        });
    ui.add_space(6.0);
}

pub fn field_error(ui: &mut egui::Ui, errors: &FieldErrors, key: &str) {
    if let Some(msg) = errors.get(key) {
        ui.colored_label(colors::DANGER, egui::RichText::new(msg).small());
    }
}

/// Labelled single-line input over a copy of `current`; the new text when edited.
pub fn input(
    ui: &mut egui::Ui,
    label: &str,
    current: &str,
    password: bool,
    errors: &FieldErrors,
    key: &str,
) -> Option<String> {
    ui.label(label);
    let mut value = current.to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut value)
            .password(password)
            .desired_width(f32::INFINITY),
    );
    field_error(ui, errors, key);
    ui.add_space(4.0);
    response.changed().then_some(value)
}

pub fn pager(ui: &mut egui::Ui, pagination: &Pagination) -> Option<PagerAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(pagination.can_prev(), egui::Button::new("‹ Anterior"))
            .clicked()
        {
            action = Some(PagerAction::GoTo(pagination.page.saturating_sub(1)));
        }
        ui.label(format!(
            "Página {} de {} ({} itens)",
            pagination.page,
            pagination.total_pages(),
            pagination.count
        ));
        if ui
            .add_enabled(pagination.can_next(), egui::Button::new("Próxima ›"))
            .clicked()
        {
            action = Some(PagerAction::GoTo(pagination.page + 1));
        }

        let mut size = pagination.page_size;
        egui::ComboBox::from_id_salt(("page_size", ui.id()))
            .selected_text(format!("{} por página", size))
            .show_ui(ui, |ui| {
                for option in PAGE_SIZES {
                    ui.selectable_value(&mut size, option, option.to_string());
                }
            });
        if size != pagination.page_size {
            action = Some(PagerAction::PageSize(size));
        }
    });
    action
}

/// Yes/no dialog. `Some(true)` on confirm, `Some(false)` on cancel.
pub fn confirm_dialog(ctx: &egui::Context, title: &str, text: &str) -> Option<bool> {
    let mut answer = None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .frame(styles::modal_frame())
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(text);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Cancelar").clicked() {
                    answer = Some(false);
                }
                if ui.add(styles::danger_button("Excluir")).clicked() {
                    answer = Some(true);
                }
            });
        });
    answer
}
