//! LGPD Compliance Client - Main Library
//!
//! Native desktop client for an LGPD (Lei Geral de Proteção de Dados)
//! compliance backend: a compliance checklist with instant completion
//! toggles, user registration, the document registry, the appointed DPO
//! card and the user's own profile.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Configuration, error types, wire models
//!   - Page normalization and the paging cursor
//!   - Brazilian-format masks (phone, `dd/mm/aaaa` dates, names)
//!
//! - **`egui_app`** - Native desktop app (egui/eframe)
//!   - HTTP client contract and its reqwest implementation
//!   - Token store, authentication and inactivity logout
//!   - Optimistic toggle controller for checklist completion
//!   - Per-screen state machines and their views
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lgpd_mobile::egui_app::http::HttpClient;
//! use lgpd_mobile::egui_app::screens::ChecklistScreen;
//! use lgpd_mobile::egui_app::{Dispatcher, MemoryTokenStore, ReqwestClient};
//! use lgpd_mobile::shared::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder().api_url("http://127.0.0.1:8000/api/v1/").build()?;
//! let dispatcher = Dispatcher::new()?;
//! let client: Arc<dyn HttpClient> =
//!     Arc::new(ReqwestClient::new(&config, Arc::new(MemoryTokenStore::new()))?);
//! let mut checklist = ChecklistScreen::new(client, 10);
//! checklist.load(&dispatcher);
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! egui runs on the main thread. Network calls run on a small tokio runtime
//! owned by [`egui_app::Dispatcher`] and report back over channels that the
//! frame loop drains, so state is only ever mutated on the UI thread.
//!
//! # Error Handling
//!
//! - `shared::error` and `shared::config` carry decoding and config errors
//! - `egui_app::http::HttpError` is the single failure type of the network layer
//! - screens turn failures into flash messages; nothing panics on a bad response

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod egui_app;
