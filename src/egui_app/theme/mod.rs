//! Theme Module
//!
//! Color palette and frame builders shared by the views.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lgpd_mobile::egui_app::theme::{colors, styles};
//!
//! styles::apply_global_theme(ctx);
//! styles::card_frame().show(ui, |ui| {
//!     ui.colored_label(colors::INK, "Checklist");
//! });
//! ```

pub mod colors;
pub mod styles;

pub use colors::*;
pub use styles::*;
