//! Read-only card of the appointed DPO ("Encarregado").

use std::sync::Arc;
use std::time::Duration;

use crate::egui_app::config::Config;
use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::runtime::{Dispatcher, Pending};
use crate::shared::format::{digits_only, format_date_long_pt_br, format_phone_br};
use crate::shared::models::UserRecord;

pub const NOT_FOUND: &str = "Nenhum DPO encontrado.";
pub const LOAD_FAILED: &str = "Não foi possível carregar os dados do DPO.";

/// What the card shows; missing values are `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpoProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Digits for a `tel:` link; empty when there is no phone
    pub phone_digits: String,
    pub appointment_date: String,
    pub appointment_validity: String,
    pub avatar_url: Option<String>,
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn long_date(value: Option<&str>) -> String {
    value
        .and_then(format_date_long_pt_br)
        .unwrap_or_else(|| "-".to_string())
}

impl DpoProfile {
    pub fn from_record(record: &UserRecord, config: &Config) -> Self {
        let name = [
            record.full_name(),
            record.email.clone(),
            record.username.clone().unwrap_or_default(),
        ]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "-".to_string());

        let raw_phone = record.phone_number.as_deref().unwrap_or_default();
        let phone_digits = digits_only(raw_phone);
        let phone = if phone_digits.is_empty() {
            or_dash(raw_phone)
        } else {
            format_phone_br(raw_phone)
        };

        Self {
            name,
            email: or_dash(&record.email),
            phone,
            phone_digits,
            appointment_date: long_date(record.appointment_date.as_deref()),
            appointment_validity: long_date(record.appointment_validity.as_deref()),
            avatar_url: record
                .avatar
                .as_deref()
                .and_then(|avatar| config.absolute_url(avatar)),
        }
    }

    pub fn tel_link(&self) -> Option<String> {
        (!self.phone_digits.is_empty()).then(|| format!("tel:{}", self.phone_digits))
    }
}

pub async fn fetch_dpo(client: &dyn HttpClient) -> Result<UserRecord, HttpError> {
    client.get("users/dpo/", Vec::new()).await?.json()
}

pub fn load_error_message(err: &HttpError) -> String {
    match err.status() {
        Some(404) => NOT_FOUND.to_string(),
        _ => err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| LOAD_FAILED.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DpoState {
    Loading,
    Loaded(DpoProfile),
    Failed(String),
}

pub struct DpoScreen {
    client: Arc<dyn HttpClient>,
    config: Config,
    pub state: DpoState,
    pending: Pending<Result<UserRecord, HttpError>>,
}

impl DpoScreen {
    pub fn new(client: Arc<dyn HttpClient>, config: Config) -> Self {
        Self {
            client,
            config,
            state: DpoState::Loading,
            pending: Pending::idle(),
        }
    }

    pub fn load(&mut self, dispatcher: &Dispatcher) {
        self.state = DpoState::Loading;
        let client = Arc::clone(&self.client);
        self.pending
            .start(dispatcher.spawn(async move { fetch_dpo(client.as_ref()).await }));
    }

    pub fn poll(&mut self) -> bool {
        match self.pending.poll() {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.pending.wait(timeout) {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, result: Result<UserRecord, HttpError>) {
        self.state = match result {
            Ok(record) => DpoState::Loaded(DpoProfile::from_record(&record, &self.config)),
            Err(e) => {
                tracing::warn!("[DPO] Failed to load DPO: {}", e);
                DpoState::Failed(load_error_message(&e))
            }
        };
    }
}
