use std::time::Instant;

use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::types::AppView;

pub mod checklist_view;
pub mod documents_view;
pub mod dpo_view;
pub mod home_view;
pub mod login_view;
pub mod profile_view;
pub mod users_view;
pub mod widgets;

const NAV: [AppView; 6] = [
    AppView::Home,
    AppView::Checklist,
    AppView::Documents,
    AppView::Dpo,
    AppView::Users,
    AppView::Profile,
];

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_panel")
        .frame(styles::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    colors::TEXT_LIGHT,
                    egui::RichText::new("LGPD").size(18.0).strong(),
                );
                if !state.auth_state.authenticated() {
                    return;
                }

                ui.add_space(16.0);
                let mut target = None;
                for view in NAV {
                    let selected = state.current_view == view;
                    let text = egui::RichText::new(view.title()).color(colors::TEXT_LIGHT);
                    if ui.selectable_label(selected, text).clicked() && !selected {
                        target = Some(view);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sair").clicked() {
                        state.logout(None);
                        return;
                    }
                    if let Some(user) = state.user() {
                        ui.colored_label(
                            colors::TEXT_LIGHT,
                            format!("{} ({})", user.greeting_name(), user.role.label()),
                        );
                    }
                });

                if let Some(view) = target {
                    state.navigate(view);
                }
            });
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState, now: Instant) {
    let can_manage = state.can_manage();

    egui::CentralPanel::default()
        .frame(styles::page_frame())
        .show(ctx, |ui| match state.current_view {
            AppView::Login => login_view::render(ui, state),
            AppView::Home => {
                if let Some(view) = home_view::render(ui, state) {
                    state.navigate(view);
                }
            }
            AppView::Checklist => {
                if let Some(screen) = state.checklist.as_mut() {
                    checklist_view::render(ui, screen, &state.dispatcher, can_manage, now);
                }
            }
            AppView::Users => {
                if let Some(screen) = state.users.as_mut() {
                    users_view::render(ui, screen, &state.dispatcher, now);
                }
            }
            AppView::Documents => {
                if let Some(screen) = state.documents.as_mut() {
                    documents_view::render(ui, screen, &state.dispatcher, can_manage, now);
                }
            }
            AppView::Dpo => {
                if let Some(screen) = state.dpo.as_mut() {
                    dpo_view::render(ui, screen);
                }
            }
            AppView::Profile => {
                if let Some(screen) = state.profile.as_mut() {
                    profile_view::render(ui, screen, &state.dispatcher, now);
                }
            }
        });
}
