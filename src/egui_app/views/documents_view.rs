use std::time::Instant;

use eframe::egui;

use crate::egui_app::runtime::Dispatcher;
use crate::egui_app::screens::documents::{display_date, DocumentChoices, DocumentsScreen};
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::views::widgets::{self, PagerAction};
use crate::shared::format::mask_date_br;
use crate::shared::models::{Choice, ItemId};

enum RowAction {
    Edit(ItemId),
    Delete(ItemId),
}

pub fn render(
    ui: &mut egui::Ui,
    screen: &mut DocumentsScreen,
    dispatcher: &Dispatcher,
    can_manage: bool,
    now: Instant,
) {
    ui.horizontal(|ui| {
        ui.heading("Documentos");
        if screen.loading {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if can_manage && ui.add(styles::primary_button("+ Nova atividade")).clicked() {
                screen.open_create();
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
                ui.colored_label(colors::TEXT_MUTED, "Nenhum documento cadastrado.");
            }
            for row in &screen.rows {
                styles::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(&row.atividade).strong());
                    let choices = &screen.choices;
                    ui.colored_label(
                        colors::TEXT_MUTED,
                        format!(
                            "{} · {} · {}",
                            DocumentChoices::label(&choices.dimensao, &row.dimensao),
                            DocumentChoices::label(&choices.criticidade, &row.criticidade),
                            DocumentChoices::label(&choices.status, &row.status),
                        ),
                    );
                    if !row.base_legal.is_empty() {
                        ui.label(format!("Base legal: {}", row.base_legal));
                    }
                    ui.label(format!(
                        "Próxima revisão: {}",
                        display_date(row.proxima_revisao.as_deref())
                    ));
                    ui.horizontal(|ui| {
                        if let Some(url) = screen.download_url(row) {
                            ui.hyperlink_to("Baixar arquivo", url);
                        }
                        if can_manage {
                            if ui.button("Editar").clicked() {
                                action = Some(RowAction::Edit(row.id));
                            }
                            if ui.button("Excluir").clicked() {
                                action = Some(RowAction::Delete(row.id));
                            }
                        }
                    });
                });
                ui.add_space(6.0);
            }
        });

    match action {
        Some(RowAction::Edit(id)) => screen.open_edit(id),
        Some(RowAction::Delete(id)) => screen.ask_delete(id),
        None => {}
    }

    match widgets::pager(ui, &screen.pagination) {
        Some(PagerAction::GoTo(page)) => screen.go_to(dispatcher, page),
        Some(PagerAction::PageSize(size)) => screen.set_page_size(dispatcher, size),
        None => {}
    }

    if screen.form_open && can_manage {
        render_form(ui.ctx(), screen, dispatcher);
    }

    if screen.confirm_delete.is_some() {
        match widgets::confirm_dialog(ui.ctx(), "Excluir atividade", "Deseja realmente excluir?") {
            Some(true) => screen.confirm_delete(dispatcher),
            Some(false) => screen.cancel_delete(),
            None => {}
        }
    }
}

fn select(ui: &mut egui::Ui, label: &str, value: &mut String, options: &[Choice]) {
    ui.label(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(DocumentChoices::label(options, value).to_string())
        .width(320.0)
        .show_ui(ui, |ui| {
            for (code, text) in options {
                ui.selectable_value(value, code.clone(), text.as_str());
            }
        });
}

fn render_form(ctx: &egui::Context, screen: &mut DocumentsScreen, dispatcher: &Dispatcher) {
    let title = if screen.editing.is_some() { "Editar atividade" } else { "Nova atividade" };
    let mut close = false;
    let choices = screen.choices.clone();
    egui::Window::new(title)
        .collapsible(false)
        .frame(styles::modal_frame())
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let form = &mut screen.form;
            select(ui, "Dimensão", &mut form.dimensao, &choices.dimensao);
            ui.label("Atividade");
            ui.add(egui::TextEdit::singleline(&mut form.atividade).desired_width(320.0));
            ui.label("Base legal");
            ui.add(egui::TextEdit::singleline(&mut form.base_legal).desired_width(320.0));
            ui.label("Evidência");
            ui.add(egui::TextEdit::singleline(&mut form.evidencia).desired_width(320.0));
            ui.label("Próxima revisão (dd/mm/aaaa)");
            let mut date = form.proxima_revisao.clone();
            if ui.add(egui::TextEdit::singleline(&mut date).desired_width(320.0)).changed() {
                form.proxima_revisao = mask_date_br(&date);
            }
            ui.label("Comentários");
            ui.add(egui::TextEdit::multiline(&mut form.comentarios).desired_width(320.0));
            select(ui, "Criticidade", &mut form.criticidade, &choices.criticidade);
            select(ui, "Status", &mut form.status, &choices.status);
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Cancelar").clicked() {
                    close = true;
                }
                let label = if screen.saving { "Salvando..." } else { "Salvar" };
                if ui.add_enabled(!screen.saving, styles::primary_button(label)).clicked() {
                    screen.save(dispatcher);
                }
            });
        });
    if close {
        screen.close_form();
    }
}
