//! The signed-in user's own profile: password change and avatar removal.
//!
//! A password change answered with `reauth_required` ends the session after a
//! short delay so the success message can be read. The state layer polls
//! [`ProfileScreen::logout_due`] and performs the logout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};

use crate::egui_app::flash::{FlashKind, FlashSlot};
use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::runtime::{Dispatcher, Inbox};
use crate::egui_app::screens::{field_errors, FieldErrors, FIX_HIGHLIGHTED};
use crate::egui_app::token_store::TokenStore;
use crate::shared::models::{ProfileUpdateResponse, Role, UserRecord};

pub const MAX_AVATAR_MB: u32 = 5;
pub const LOGOUT_DELAY: Duration = Duration::from_millis(1500);
pub const SUCCESS_TTL: Duration = Duration::from_millis(2500);
pub const NOTHING_TO_SAVE_TTL: Duration = Duration::from_millis(2000);

pub const NOTHING_TO_SAVE: &str = "Nenhuma alteração para salvar.";
pub const REAUTH_REQUIRED: &str =
    "Senha alterada com sucesso. Você será redirecionado para o login.";
pub const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";
const LOAD_FAILED: &str = "Falha ao carregar seu perfil.";
const SAVE_FAILED: &str = "Falha ao salvar. Tente novamente.";
const REMOVE_FAILED: &str = "Falha ao remover a foto. Tente novamente.";

fn too_large() -> String {
    format!("Arquivo muito grande. Tamanho máximo: {}MB.", MAX_AVATAR_MB)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current_password: String,
    pub password: String,
    pub password2: String,
}

impl PasswordForm {
    pub fn wants_change(&self) -> bool {
        !self.password.is_empty() || !self.password2.is_empty()
    }

    /// Empty unless a new password was typed.
    pub fn validate(&self) -> FieldErrors {
        let mut e = FieldErrors::new();
        if !self.wants_change() {
            return e;
        }
        if self.current_password.is_empty() {
            e.insert("current_password".into(), "Informe sua senha atual.".into());
        }
        if self.password.is_empty() {
            e.insert("password".into(), "Informe a nova senha.".into());
        }
        if self.password2.is_empty() {
            e.insert("password2".into(), "Confirme a nova senha.".into());
        }
        if !self.password.is_empty() && self.password.chars().count() < 3 {
            e.insert(
                "password".into(),
                "A senha deve ter pelo menos 3 caracteres.".into(),
            );
        }
        if self.password != self.password2 {
            e.insert("password2".into(), "As senhas não coincidem.".into());
        }
        e
    }

    /// `PATCH users/me/` body; the refresh token lets the server blacklist it.
    pub fn payload(&self, refresh: Option<String>) -> Value {
        let mut data = Map::new();
        data.insert("current_password".into(), json!(self.current_password));
        data.insert("password".into(), json!(self.password));
        if let Some(refresh) = refresh {
            data.insert("refresh".into(), json!(refresh));
        }
        Value::Object(data)
    }
}

/// Outcome of a failed save: field errors, flash text, and whether to log out.
pub fn save_failure(err: &HttpError) -> (FieldErrors, String, bool) {
    match (err.status(), err.data()) {
        (Some(400), Some(data)) if data.is_object() => {
            (field_errors(data), FIX_HIGHLIGHTED.to_string(), false)
        }
        (Some(401), _) => (FieldErrors::new(), SESSION_EXPIRED.to_string(), true),
        (Some(413), _) => (FieldErrors::new(), too_large(), false),
        _ => (FieldErrors::new(), SAVE_FAILED.to_string(), false),
    }
}

pub fn remove_avatar_failure(err: &HttpError) -> String {
    match err.status() {
        Some(413) => too_large(),
        _ => REMOVE_FAILED.to_string(),
    }
}

async fn patch_me(client: &dyn HttpClient, body: Value) -> Result<ProfileUpdateResponse, HttpError> {
    let response = client.patch("users/me/", body).await?;
    // 204 or a bare body still counts as saved
    Ok(response.json().unwrap_or_default())
}

#[derive(Debug)]
enum Event {
    Loaded(Result<UserRecord, HttpError>),
    Saved(Result<ProfileUpdateResponse, HttpError>),
    AvatarRemoved(Result<ProfileUpdateResponse, HttpError>),
}

pub struct ProfileScreen {
    client: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub form: PasswordForm,
    pub errors: FieldErrors,
    pub loading: bool,
    pub saving: bool,
    pub flash: FlashSlot,
    logout_at: Option<Instant>,
    updated_user: Option<UserRecord>,
    inbox: Inbox<Event>,
}

impl ProfileScreen {
    pub fn new(client: Arc<dyn HttpClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            email: String::new(),
            role: Role::Unknown,
            avatar: None,
            form: PasswordForm::default(),
            errors: FieldErrors::new(),
            loading: false,
            saving: false,
            flash: FlashSlot::new(),
            logout_at: None,
            updated_user: None,
            inbox: Inbox::new(),
        }
    }

    pub fn load(&mut self, dispatcher: &Dispatcher) {
        self.loading = true;
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            let result = client.get("users/me/", Vec::new()).await.and_then(|r| r.json());
            Event::Loaded(result)
        });
    }

    pub fn clear_error(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn submit(&mut self, dispatcher: &Dispatcher, now: Instant) {
        if self.saving {
            return;
        }
        self.flash.clear();
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            self.flash.show(FlashKind::Danger, FIX_HIGHLIGHTED, now);
            return;
        }
        if !self.form.wants_change() {
            self.flash
                .show_for(FlashKind::Warning, NOTHING_TO_SAVE, NOTHING_TO_SAVE_TTL, now);
            return;
        }

        self.saving = true;
        let body = self.form.payload(self.tokens.refresh());
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Saved(patch_me(client.as_ref(), body).await)
        });
    }

    pub fn remove_avatar(&mut self, dispatcher: &Dispatcher) {
        if self.saving {
            return;
        }
        self.flash.clear();
        self.errors.clear();
        self.saving = true;
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::AvatarRemoved(patch_me(client.as_ref(), json!({ "remove_avatar": true })).await)
        });
    }

    /// True once the delayed logout is due.
    pub fn logout_due(&self, now: Instant) -> bool {
        self.logout_at.is_some_and(|at| now >= at)
    }

    pub fn logout_deadline(&self) -> Option<Instant> {
        self.logout_at
    }

    /// Fresh user data after a save, for the session header.
    pub fn take_updated_user(&mut self) -> Option<UserRecord> {
        self.updated_user.take()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let events = self.inbox.drain();
        let changed = !events.is_empty();
        for event in events {
            self.handle(event, now);
        }
        self.flash.tick(now) || changed
    }

    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.inbox.wait(timeout) {
            Some(event) => {
                self.handle(event, Instant::now());
                true
            }
            None => false,
        }
    }

    fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(me) => {
                        self.email = me.email.to_lowercase();
                        self.role = me.role;
                        self.avatar = me.avatar.filter(|a| !a.is_empty());
                        self.form = PasswordForm::default();
                    }
                    Err(e) => {
                        tracing::warn!("[PROFILE] Failed to load profile: {}", e);
                        self.flash.show(FlashKind::Danger, LOAD_FAILED, now);
                    }
                }
            }
            Event::Saved(Ok(response)) => {
                self.saving = false;
                if response.reauth_required {
                    tracing::info!("[PROFILE] Password changed, re-authentication required");
                    self.flash.show(FlashKind::Success, REAUTH_REQUIRED, now);
                    self.logout_at = Some(now + LOGOUT_DELAY);
                    return;
                }
                self.flash
                    .show_for(FlashKind::Success, "Perfil atualizado com sucesso.", SUCCESS_TTL, now);
                self.form = PasswordForm::default();
                if let Some(avatar) = response.user.avatar.clone().filter(|a| !a.is_empty()) {
                    self.avatar = Some(avatar);
                }
                self.updated_user = Some(response.user).filter(|u| !u.email.is_empty());
            }
            Event::Saved(Err(e)) => {
                self.saving = false;
                tracing::warn!("[PROFILE] Save failed: {}", e);
                let (errors, text, logout) = save_failure(&e);
                self.errors = errors;
                self.flash.show(FlashKind::Danger, text, now);
                if logout {
                    self.logout_at = Some(now + LOGOUT_DELAY);
                }
            }
            Event::AvatarRemoved(Ok(response)) => {
                self.saving = false;
                self.avatar = None;
                self.flash
                    .show_for(FlashKind::Success, "Foto removida com sucesso.", SUCCESS_TTL, now);
                self.updated_user = Some(response.user).filter(|u| !u.email.is_empty());
            }
            Event::AvatarRemoved(Err(e)) => {
                self.saving = false;
                tracing::warn!("[PROFILE] Avatar removal failed: {}", e);
                self.flash
                    .show(FlashKind::Danger, remove_avatar_failure(&e), now);
            }
        }
    }
}
