use std::time::Instant;

use eframe::egui;

use crate::egui_app::runtime::Dispatcher;
use crate::egui_app::screens::users::{FormMode, UserField, UsersScreen, DPO_ALREADY_EXISTS};
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::views::widgets::{self, PagerAction};
use crate::shared::format::format_phone_br;
use crate::shared::models::{ItemId, Role};

enum RowAction {
    Edit(ItemId),
    Delete(ItemId),
}

pub fn render(ui: &mut egui::Ui, screen: &mut UsersScreen, dispatcher: &Dispatcher, now: Instant) {
    ui.heading("Cadastro de Usuário");
    ui.add_space(8.0);
    widgets::flash(ui, &screen.flash, now);

    ui.columns(2, |cols| {
        render_form(&mut cols[0], screen, dispatcher, now);
        render_list(&mut cols[1], screen, dispatcher);
    });

    if screen.confirm_delete.is_some() {
        match widgets::confirm_dialog(ui.ctx(), "Excluir usuário", "Deseja realmente excluir este usuário?") {
            Some(true) => screen.confirm_delete(dispatcher),
            Some(false) => screen.cancel_delete(),
            None => {}
        }
    }
}

fn render_form(ui: &mut egui::Ui, screen: &mut UsersScreen, dispatcher: &Dispatcher, now: Instant) {
    styles::card_frame().show(ui, |ui| {
        let editing = matches!(screen.mode, FormMode::Edit(_));
        ui.label(
            egui::RichText::new(if editing { "Editar usuário" } else { "Novo usuário" })
                .size(18.0)
                .strong(),
        );
        ui.add_space(6.0);

        let mut edits: Vec<(UserField, String)> = Vec::new();
        let errors = &screen.errors;
        let form = &screen.form;
        let mut field = |ui: &mut egui::Ui, label: &str, f: UserField, current: &str, password: bool| {
            if let Some(v) = widgets::input(ui, label, current, password, errors, f.key()) {
                edits.push((f, v));
            }
        };
        field(ui, "E-mail", UserField::Email, &form.email, false);
        field(ui, "Nome", UserField::FirstName, &form.first_name, false);
        field(ui, "Sobrenome", UserField::LastName, &form.last_name, false);
        field(
            ui,
            "Telefone",
            UserField::PhoneNumber,
            &format_phone_br(&form.phone_number),
            false,
        );

        ui.label("Tipo de usuário");
        let mut role = form.role;
        egui::ComboBox::from_id_salt("user_role")
            .selected_text(role.label())
            .show_ui(ui, |ui| {
                for option in Role::ASSIGNABLE {
                    ui.selectable_value(&mut role, option, option.label());
                }
            });
        widgets::field_error(ui, errors, "role");
        if screen.shows_dpo_warning() && !errors.contains_key("role") {
            ui.colored_label(colors::WARNING, DPO_ALREADY_EXISTS);
        }

        if form.role == Role::Dpo {
            field(
                ui,
                "Data da nomeação (dd/mm/aaaa)",
                UserField::AppointmentDate,
                &form.appointment_date,
                false,
            );
            if let Some(validity) = form.validity_preview() {
                ui.colored_label(colors::TEXT_MUTED, format!("Validade: {}", validity));
            }
        }

        let (p1, p2) = if editing {
            ("Nova senha (opcional)", "Confirmar nova senha")
        } else {
            ("Senha", "Confirmar senha")
        };
        field(ui, p1, UserField::Password, &form.password, true);
        field(ui, p2, UserField::Password2, &form.password2, true);

        let role_changed = role != form.role;
        for (f, v) in edits {
            screen.set_field(f, &v);
        }
        if role_changed {
            screen.set_role(role);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let label = if screen.submitting { "Salvando..." } else { "Salvar" };
            if ui.add_enabled(!screen.submitting, styles::primary_button(label)).clicked() {
                screen.submit(dispatcher, now);
            }
            if editing && ui.button("Cancelar edição").clicked() {
                screen.reset_form(true);
            }
        });
    });
}

fn render_list(ui: &mut egui::Ui, screen: &mut UsersScreen, dispatcher: &Dispatcher) {
    ui.horizontal(|ui| {
        let search = ui.add(egui::TextEdit::singleline(&mut screen.query).hint_text("Buscar"));
        let enter = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Buscar").clicked() || enter {
            screen.search(dispatcher);
        }
        if screen.loading {
            ui.spinner();
        }
    });
    ui.add_space(6.0);

    let mut action = None;
    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            for user in &screen.users {
                let Some(id) = user.id else { continue };
                styles::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let name = user.full_name();
                    ui.label(egui::RichText::new(if name.is_empty() { &user.email } else { &name }).strong());
                    ui.colored_label(colors::TEXT_MUTED, format!("{} · {}", user.email, user.role.label()));
                    ui.horizontal(|ui| {
                        if ui.button("Editar").clicked() {
                            action = Some(RowAction::Edit(id));
                        }
                        if ui.button("Excluir").clicked() {
                            action = Some(RowAction::Delete(id));
                        }
                    });
                });
                ui.add_space(6.0);
            }
        });

    match action {
        Some(RowAction::Edit(id)) => screen.start_edit(dispatcher, id),
        Some(RowAction::Delete(id)) => screen.ask_delete(id),
        None => {}
    }

    match widgets::pager(ui, &screen.pagination) {
        Some(PagerAction::GoTo(page)) => screen.go_to(dispatcher, page),
        Some(PagerAction::PageSize(size)) => screen.set_page_size(dispatcher, size),
        None => {}
    }
}
