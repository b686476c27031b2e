use eframe::egui;

use crate::egui_app::screens::home::HEADLINE;
use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles};
use crate::egui_app::types::AppView;

/// Returns the card the user clicked, if any.
pub fn render(ui: &mut egui::Ui, state: &AppState) -> Option<AppView> {
    let mut target = None;

    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(HEADLINE).size(22.0).strong().color(colors::GRAD_A));
    });
    ui.add_space(16.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("home_cards")
            .num_columns(2)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (i, card) in state.home.cards().iter().enumerate() {
                    let response = styles::tile_frame(card.enabled())
                        .show(ui, |ui| {
                            ui.set_min_size(egui::vec2(180.0, 60.0));
                            ui.centered_and_justified(|ui| {
                                ui.colored_label(
                                    colors::TEXT_LIGHT,
                                    egui::RichText::new(card.title).strong(),
                                );
                            });
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        target = card.target;
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });

        ui.add_space(16.0);
        ui.label(egui::RichText::new(state.home.greeting(state.user())).size(16.0));
    });

    target
}
