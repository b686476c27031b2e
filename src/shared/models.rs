//! Wire models for the compliance API.
//!
//! Field names follow the backend (Portuguese, snake_case); Rust-side names
//! are renamed where it reads better. Every field the backend may omit has a
//! serde default so a partial payload still decodes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::error::SharedError;

/// Server-assigned primary key.
pub type ItemId = i64;

/// Decode a JSON value already held in memory.
pub fn decode<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, SharedError> {
    serde_json::from_value(value.clone()).map_err(SharedError::from)
}

/// Django serializes blank text columns as `null` on some endpoints.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One LGPD checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ItemId,
    #[serde(rename = "atividade", default, deserialize_with = "null_as_empty")]
    pub activity: String,
    #[serde(rename = "descricao", default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Creation payload. `is_completed` is private and always `false`: a new
/// item cannot be created already completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewChecklistItem {
    #[serde(rename = "atividade")]
    pub activity: String,
    #[serde(rename = "descricao")]
    pub description: String,
    is_completed: bool,
}

impl NewChecklistItem {
    pub fn new(activity: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }
}

/// Edit payload: only the text fields, never the completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistUpdate {
    #[serde(rename = "atividade")]
    pub activity: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Body of the completion toggle `PATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPatch {
    pub is_completed: bool,
}

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Dpo,
    Gerente,
    /// Missing, empty or unrecognized role
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles selectable in the registration form.
    pub const ASSIGNABLE: [Role; 3] = [Role::Admin, Role::Dpo, Role::Gerente];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dpo => "dpo",
            Role::Gerente => "gerente",
            Role::Unknown => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Dpo => "DPO",
            Role::Gerente => "Gerente",
            Role::Unknown => "-",
        }
    }

    /// Admins and the DPO may create, edit, delete and toggle compliance records.
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Admin | Role::Dpo)
    }

    pub fn parse(value: &str) -> Role {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "dpo" => Role::Dpo,
            "gerente" => Role::Gerente,
            _ => Role::Unknown,
        }
    }
}

/// A user account as returned by `users/`, `users/<id>/`, `users/me/` and `users/dpo/`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub id: Option<ItemId>,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    pub username: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub appointment_date: Option<String>,
    pub appointment_validity: Option<String>,
    pub avatar: Option<String>,
}

impl UserRecord {
    /// `first last`, skipping blanks; empty when both are blank.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Response of `PATCH users/me/`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProfileUpdateResponse {
    #[serde(flatten)]
    pub user: UserRecord,
    #[serde(default)]
    pub reauth_required: bool,
}

/// Tokens returned by `auth/login/` and the refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// One row of the document registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub id: ItemId,
    #[serde(deserialize_with = "null_as_empty")]
    pub dimensao: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub atividade: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub base_legal: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub evidencia: String,
    pub proxima_revisao: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub comentarios: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub criticidade: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
    pub arquivo_url: Option<String>,
}

/// `(code, label)` pair as served by `documentos/choices/`.
pub type Choice = (String, String);
