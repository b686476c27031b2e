use std::time::Instant;

use eframe::egui;

use crate::egui_app::runtime::Dispatcher;
use crate::egui_app::screens::checklist::ChecklistScreen;
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::views::widgets::{self, PagerAction};
use crate::shared::models::ItemId;

enum RowAction {
    Toggle(ItemId, bool),
    Edit(ItemId),
    Delete(ItemId),
}

pub fn render(
    ui: &mut egui::Ui,
    screen: &mut ChecklistScreen,
    dispatcher: &Dispatcher,
    can_manage: bool,
    now: Instant,
) {
    ui.horizontal(|ui| {
        ui.heading("Checklist LGPD");
        if screen.loading {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if can_manage && ui.add(styles::primary_button("+ Novo item")).clicked() {
                screen.open_create(can_manage);
            }
        });
    });
    ui.add_space(8.0);
    widgets::flash(ui, &screen.flash, now);

    let mut action = None;
    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            if screen.rows.is_empty() && !screen.loading {
                ui.colored_label(colors::TEXT_MUTED, "Nenhum item cadastrado.");
            }
            for row in &screen.rows {
                styles::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let mut checked = row.is_completed;
                        let toggle = ui
                            .add_enabled(can_manage, egui::Checkbox::without_text(&mut checked))
                            .on_disabled_hover_text("Apenas Admin/DPO podem alterar.");
                        if toggle.changed() {
                            action = Some(RowAction::Toggle(row.id, row.is_completed));
                        }
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new(&row.activity).strong());
                            if !row.description.is_empty() {
                                ui.colored_label(colors::TEXT_MUTED, &row.description);
                            }
                        });
                        if can_manage {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("Excluir").clicked() {
                                    action = Some(RowAction::Delete(row.id));
                                }
                                if ui.button("Editar").clicked() {
                                    action = Some(RowAction::Edit(row.id));
                                }
                            });
                        }
                    });
                });
                ui.add_space(6.0);
            }
        });

    match action {
        Some(RowAction::Toggle(id, current)) => screen.toggle(dispatcher, id, current, can_manage),
        Some(RowAction::Edit(id)) => screen.open_edit(id, can_manage),
        Some(RowAction::Delete(id)) => screen.ask_delete(id, can_manage),
        None => {}
    }

    match widgets::pager(ui, &screen.pagination) {
        Some(PagerAction::GoTo(page)) => screen.go_to(dispatcher, page),
        Some(PagerAction::PageSize(size)) => screen.set_page_size(dispatcher, size),
        None => {}
    }

    if screen.form_open {
        render_form(ui.ctx(), screen, dispatcher, can_manage);
    }

    if screen.confirm_delete.is_some() {
        match widgets::confirm_dialog(ui.ctx(), "Excluir item", "Deseja realmente excluir este item?") {
            Some(true) => screen.confirm_delete(dispatcher),
            Some(false) => screen.cancel_delete(),
            None => {}
        }
    }
}

fn render_form(ctx: &egui::Context, screen: &mut ChecklistScreen, dispatcher: &Dispatcher, can_manage: bool) {
    let title = if screen.editing.is_some() { "Editar item" } else { "Novo item" };
    let mut close = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .frame(styles::modal_frame())
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Atividade");
            ui.add(egui::TextEdit::singleline(&mut screen.form.activity).desired_width(320.0));
            ui.label("Descrição");
            ui.add(egui::TextEdit::multiline(&mut screen.form.description).desired_width(320.0));
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Cancelar").clicked() {
                    close = true;
                }
                let label = if screen.saving { "Salvando..." } else { "Salvar" };
                if ui.add_enabled(!screen.saving, styles::primary_button(label)).clicked() {
                    screen.save(dispatcher, can_manage);
                }
            });
        });
    if close {
        screen.close_form();
    }
}
