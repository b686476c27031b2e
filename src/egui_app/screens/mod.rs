//! Per-screen state machines.
//!
//! A screen owns its rows, form, flash slot and an [`Inbox`](crate::egui_app::runtime::Inbox)
//! of finished requests. User actions spawn requests on the
//! [`Dispatcher`](crate::egui_app::runtime::Dispatcher); `poll` applies the
//! results once per frame. Nothing here draws; the views in
//! `egui_app::views` read and drive these types.

pub mod checklist;
pub mod documents;
pub mod dpo;
pub mod home;
pub mod login;
pub mod profile;
pub mod users;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::egui_app::http::HttpError;

pub use checklist::ChecklistScreen;
pub use documents::DocumentsScreen;
pub use dpo::DpoScreen;
pub use home::HomeScreen;
pub use login::LoginScreen;
pub use profile::ProfileScreen;
pub use users::UsersScreen;

pub const CONTACT_ADMIN: &str = "Se o problema persistir, contate o administrador.";
pub const SAVE_FORBIDDEN: &str = "Sem permissão. (Apenas Admin/DPO podem salvar aqui.)";
pub const FIX_HIGHLIGHTED: &str = "Corrija os campos destacados.";

/// Field name to message, as shown under each input.
pub type FieldErrors = BTreeMap<String, String>;

fn value_text(value: &Value, separator: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| value_text(item, separator))
            .collect::<Vec<_>>()
            .join(separator),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Describe a failed save from the server's answer.
///
/// 403 is a permission message, a string body is shown as is and an object
/// body becomes `field: a; b | other: c`. `None` when there was no usable
/// answer.
pub fn save_error_text(err: &HttpError) -> Option<String> {
    if err.status() == Some(403) {
        return Some(SAVE_FORBIDDEN.to_string());
    }
    match err.data()? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(
            map.iter()
                .map(|(key, value)| format!("{}: {}", key, value_text(value, "; ")))
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        _ => None,
    }
}

/// Per-field messages from a DRF validation body; list values are joined with spaces.
pub fn field_errors(data: &Value) -> FieldErrors {
    data.as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value_text(value, " ")))
                .collect()
        })
        .unwrap_or_default()
}
