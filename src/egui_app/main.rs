/**
 * egui Native Desktop App - Main Entry Point
 *
 * Loads the configuration, wires the HTTP client and token store into the
 * app state and hands control to eframe.
 */
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use lgpd_mobile::egui_app::theme::styles;
use lgpd_mobile::egui_app::{
    views, AppState, Config, Dispatcher, FileTokenStore, HttpClient, MemoryTokenStore,
    ReqwestClient, TokenStore,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn token_store() -> Arc<dyn TokenStore> {
    match FileTokenStore::default_path() {
        Some(path) => {
            tracing::info!("[AUTH] Token file: {}", path.display());
            Arc::new(FileTokenStore::open(path))
        }
        None => {
            tracing::warn!("[AUTH] No data directory, tokens kept in memory");
            Arc::new(MemoryTokenStore::new())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load()?;
    tracing::info!(
        "Starting LGPD client ({}) against {}",
        config.app().app_env,
        config.app().api_url
    );

    let tokens = token_store();
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(config.app(), Arc::clone(&tokens))?);
    let dispatcher = Dispatcher::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "LGPD - Gestão de Documentos",
        options,
        Box::new(move |cc| {
            styles::apply_global_theme(&cc.egui_ctx);
            let dispatcher = dispatcher.with_repaint(cc.egui_ctx.clone());
            Ok(Box::new(LgpdApp {
                state: AppState::new(config, client, tokens, dispatcher),
            }))
        }),
    )?;
    Ok(())
}

/// Main application state
struct LgpdApp {
    state: AppState,
}

impl eframe::App for LgpdApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let active = ctx.input(|i| {
            i.events.iter().any(|e| {
                matches!(
                    e,
                    egui::Event::Key { .. }
                        | egui::Event::Text(_)
                        | egui::Event::PointerButton { .. }
                        | egui::Event::MouseWheel { .. }
                )
            })
        });
        if active {
            self.state.touch(now);
        }

        self.state.update(now);

        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state, now);

        if let Some(after) = self.state.repaint_after(now) {
            ctx.request_repaint_after(after);
        }
    }
}
