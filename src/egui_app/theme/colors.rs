//! Color constants for the LGPD client.
//!
//! Institutional navy/blue gradient on a light grey page, with the usual
//! status colors for flash messages and badges.

use eframe::egui::Color32;

/// Gradient start - Navy
pub const GRAD_A: Color32 = Color32::from_rgb(0x00, 0x33, 0x66);

/// Gradient end - Blue
pub const GRAD_B: Color32 = Color32::from_rgb(0x00, 0x5B, 0x96);

/// Top bar background
pub const TOP_BAR_BG: Color32 = GRAD_A;

/// Page background - Light grey
pub const BG_PAGE: Color32 = Color32::from_rgb(0xF5, 0xF5, 0xF5);

/// Card and form background
pub const CARD_BG: Color32 = Color32::WHITE;

/// Card border
pub const BORDER: Color32 = Color32::from_rgb(0xD9, 0xDE, 0xE7);

/// Primary text (ink)
pub const INK: Color32 = Color32::from_rgb(0x07, 0x17, 0x44);

/// Muted text
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x6B, 0x72, 0x80);

/// Text on the navy bar and cards
pub const TEXT_LIGHT: Color32 = Color32::WHITE;

/// Primary action
pub const PRIMARY: Color32 = GRAD_B;

/// Disabled card / button
pub const DISABLED: Color32 = Color32::from_rgb(0x9C, 0xA3, 0xAF);

pub const SUCCESS: Color32 = Color32::from_rgb(0x16, 0xA3, 0x4A);
pub const DANGER: Color32 = Color32::from_rgb(0xDC, 0x35, 0x45);
pub const WARNING: Color32 = Color32::from_rgb(0xF5, 0x9E, 0x0B);
