use std::time::Instant;

use eframe::egui;

use crate::egui_app::runtime::Dispatcher;
use crate::egui_app::screens::profile::ProfileScreen;
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::views::widgets;

pub fn render(ui: &mut egui::Ui, screen: &mut ProfileScreen, dispatcher: &Dispatcher, now: Instant) {
    ui.heading("Meu perfil");
    ui.add_space(8.0);
    widgets::flash(ui, &screen.flash, now);

    if screen.loading {
        ui.spinner();
        return;
    }

    ui.set_max_width(420.0);
    styles::card_frame().show(ui, |ui| {
        egui::Grid::new("profile_info").num_columns(2).show(ui, |ui| {
            ui.colored_label(colors::TEXT_MUTED, "E-mail");
            ui.label(&screen.email);
            ui.end_row();
            ui.colored_label(colors::TEXT_MUTED, "Perfil");
            ui.label(screen.role.label());
            ui.end_row();
        });

        if screen.avatar.is_some()
            && ui
                .add_enabled(!screen.saving, egui::Button::new("Remover foto"))
                .clicked()
        {
            screen.remove_avatar(dispatcher);
        }

        ui.separator();
        ui.label(egui::RichText::new("Alterar senha").strong());

        let mut cleared = Vec::new();
        let fields = [
            ("Senha atual", "current_password"),
            ("Nova senha", "password"),
            ("Confirmar nova senha", "password2"),
        ];
        for (label, key) in fields {
            let value = match key {
                "current_password" => &mut screen.form.current_password,
                "password" => &mut screen.form.password,
                _ => &mut screen.form.password2,
            };
            ui.label(label);
            if ui
                .add(egui::TextEdit::singleline(value).password(true).desired_width(f32::INFINITY))
                .changed()
            {
                cleared.push(key);
            }
            widgets::field_error(ui, &screen.errors, key);
        }
        for key in cleared {
            screen.clear_error(key);
        }

        ui.add_space(8.0);
        let label = if screen.saving { "Salvando..." } else { "Salvar" };
        if ui.add_enabled(!screen.saving, styles::primary_button(label)).clicked() {
            screen.submit(dispatcher, now);
        }
    });
}
