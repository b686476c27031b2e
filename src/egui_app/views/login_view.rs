use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if state.auth_state.loading {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.spinner();
            ui.label("Restaurando sessão...");
        });
        return;
    }

    let dispatcher = &state.dispatcher;
    let screen = &mut state.login;

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(egui::RichText::new("Bem-vindo(a)!").size(28.0).strong().color(colors::GRAD_A));
        ui.label("Preencha as informações abaixo para acessar a sua conta.");
        ui.add_space(20.0);

        ui.set_max_width(360.0);
        styles::card_frame().show(ui, |ui| {
            ui.label(egui::RichText::new("Login").size(20.0).strong());
            ui.add_space(8.0);

            if let Some(error) = &screen.error {
                ui.colored_label(colors::DANGER, error);
                ui.add_space(6.0);
            }

            ui.label("E-mail");
            ui.add(egui::TextEdit::singleline(&mut screen.email).desired_width(f32::INFINITY));
            ui.label("Senha");
            let password = ui.add(
                egui::TextEdit::singleline(&mut screen.password)
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.add_space(10.0);

            let submitting = screen.submitting();
            let label = if submitting { "Entrando..." } else { "Entrar" };
            if ui.add_enabled(!submitting, styles::primary_button(label)).clicked() || enter {
                screen.submit(dispatcher);
            }

            ui.add_space(8.0);
            if ui.link("Esqueci minha senha").clicked() {
                screen.toggle_reset();
            }

            if screen.reset_open {
                ui.separator();
                ui.label("Informe seu e-mail para redefinir a senha.");
                ui.add(egui::TextEdit::singleline(&mut screen.reset_email).desired_width(f32::INFINITY));
                let busy = screen.reset_busy();
                if ui
                    .add_enabled(!busy, egui::Button::new(if busy { "Enviando..." } else { "Enviar" }))
                    .clicked()
                {
                    screen.request_reset(dispatcher);
                }
                if let Some(msg) = &screen.reset_message {
                    ui.colored_label(colors::TEXT_MUTED, msg);
                }
            }
        });
    });
}
