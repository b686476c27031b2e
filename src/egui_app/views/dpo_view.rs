use eframe::egui;

use crate::egui_app::screens::dpo::{DpoScreen, DpoState};
use crate::egui_app::theme::{colors, styles};

pub fn render(ui: &mut egui::Ui, screen: &mut DpoScreen) {
    ui.heading("Encarregado de Dados (DPO)");
    ui.add_space(12.0);

    match &screen.state {
        DpoState::Loading => {
            ui.spinner();
        }
        DpoState::Failed(msg) => {
            ui.colored_label(colors::DANGER, msg);
        }
        DpoState::Loaded(profile) => {
            styles::card_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&profile.name).size(20.0).strong());
                    if let Some(url) = &profile.avatar_url {
                        ui.hyperlink_to("Ver foto", url);
                    }
                });
                ui.add_space(8.0);
                egui::Grid::new("dpo_card").num_columns(2).show(ui, |ui| {
                    ui.colored_label(colors::TEXT_MUTED, "E-mail");
                    ui.label(&profile.email);
                    ui.end_row();

                    ui.colored_label(colors::TEXT_MUTED, "Telefone");
                    match profile.tel_link() {
                        Some(link) => ui.hyperlink_to(&profile.phone, link),
                        None => ui.label(&profile.phone),
                    };
                    ui.end_row();

                    ui.colored_label(colors::TEXT_MUTED, "Data da nomeação");
                    ui.label(&profile.appointment_date);
                    ui.end_row();

                    ui.colored_label(colors::TEXT_MUTED, "Validade da nomeação");
                    ui.label(&profile.appointment_validity);
                    ui.end_row();
                });
            });
        }
    }
}
