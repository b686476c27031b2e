//! egui Native Desktop App Module
//!
//! The compliance client: network plumbing, session handling and one state
//! machine per screen, drawn by the views.
//!
//! # Architecture
//!
//! - **`config`** - Client configuration wrapper (API and media URLs)
//! - **`http`** - `HttpClient` contract and the reqwest implementation
//! - **`token_store`** - Access/refresh token persistence
//! - **`auth`** - Login, session bootstrap, logout and password reset
//! - **`inactivity`** - Idle-session deadline
//! - **`flash`** - Transient status messages
//! - **`runtime`** - Async dispatcher bridging tokio and the frame loop
//! - **`optimistic`** - Optimistic toggle controller
//! - **`screens`** - Per-screen state machines
//! - **`state`** - `AppState`, navigation and session lifecycle
//! - **`views`** / **`theme`** - egui rendering
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Main application entry point
//! ├── config.rs       - Configuration wrapper
//! ├── http.rs         - HTTP client
//! ├── auth.rs         - Authentication service and state
//! ├── optimistic.rs   - Optimistic toggle controller
//! ├── screens/        - Screen state machines
//! ├── state/          - AppState
//! ├── theme/          - Colors and frames
//! └── views/          - egui views
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! // Run the egui app:
//! // cargo run --bin lgpd_app
//! ```

pub mod auth;
pub mod config;
pub mod flash;
pub mod http;
pub mod inactivity;
pub mod optimistic;
pub mod runtime;
pub mod screens;
#[cfg(test)]
pub(crate) mod scripted;
pub mod state;
pub mod theme;
pub mod token_store;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use auth::{AuthService, AuthState};
pub use config::Config;
pub use flash::{FlashKind, FlashSlot};
pub use http::{HttpClient, HttpError, ReqwestClient};
pub use optimistic::{ToggleController, ToggleOutcome};
pub use runtime::Dispatcher;
pub use state::AppState;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{AppView, SessionUser};
