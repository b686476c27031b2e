//! Authentication: login, session bootstrap, logout and password reset.
//!
//! Tokens go to the [`TokenStore`]; the signed-in user is first derived from
//! the access token's claims and then refreshed from `users/me/`.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::token_store::TokenStore;
use crate::egui_app::types::SessionUser;
use crate::shared::models::{Role, TokenPair, UserRecord};

pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas. Verifique seu e-mail e senha.";
pub const CANNOT_CONNECT: &str =
    "Não foi possível conectar ao servidor. Confira sua rede e a API_URL (porta 8000).";
pub const SERVER_UNAVAILABLE: &str =
    "Servidor indisponível no momento. Tente novamente em instantes.";
pub const RESET_EMAIL_REQUIRED: &str = "Informe um e-mail.";
pub const RESET_SENT: &str = "Se o e-mail existir, enviaremos instruções de redefinição.";
pub const SESSION_EXPIRED_BY_INACTIVITY: &str =
    "Sessão encerrada por inatividade. Faça login novamente.";

/// Authentication state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn can_manage(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::can_manage)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("e-mail and password are required")]
    MissingCredentials,

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl AuthError {
    /// Text for the login screen.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingCredentials => INVALID_CREDENTIALS.to_string(),
            AuthError::Http(err) => login_error_message(err),
        }
    }
}

/// Map a failed `auth/login/` to the message shown under the form.
pub fn login_error_message(err: &HttpError) -> String {
    match err.status() {
        Some(400) | Some(401) => INVALID_CREDENTIALS.to_string(),
        None => CANNOT_CONNECT.to_string(),
        Some(status) if status >= 500 => SERVER_UNAVAILABLE.to_string(),
        Some(_) => error_detail(err).unwrap_or_else(|| "Tente novamente.".to_string()),
    }
}

/// `detail`, then `error`, then the first `non_field_errors` entry.
fn error_detail(err: &HttpError) -> Option<String> {
    let data = err.data()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| data.get(key).and_then(Value::as_str))
        .or_else(|| data.get("non_field_errors")?.get(0)?.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Claims read from the JWT payload. The signature is not verified; the
/// server remains the authority.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl AccessClaims {
    /// Decode the middle segment of `header.payload.signature`.
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// A token without `exp` counts as expired.
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= now_unix)
    }

    pub fn to_user(&self) -> SessionUser {
        let sub = self.sub.as_ref().and_then(Value::as_str);
        SessionUser {
            email: self
                .email
                .as_deref()
                .or(sub)
                .unwrap_or_default()
                .to_lowercase(),
            first_name: self
                .first_name
                .as_deref()
                .or(self.given_name.as_deref())
                .unwrap_or_default()
                .to_string(),
            role: Role::parse(self.role.as_deref().unwrap_or_default()),
            avatar: None,
        }
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Session operations against the API.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(client: Arc<dyn HttpClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// `POST auth/login/`, store the tokens, then resolve the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        tracing::info!("[AUTH] Logging in {}", email);
        let response = self
            .client
            .post(
                "auth/login/",
                Some(json!({ "email": email, "password": password })),
            )
            .await
            .inspect_err(|e| tracing::warn!("[AUTH] Login failed: {}", e))?;

        let tokens: TokenPair = response.json().unwrap_or_default();
        if tokens.access.is_some() {
            self.tokens.set_access(tokens.access);
        }
        if tokens.refresh.is_some() {
            self.tokens.set_refresh(tokens.refresh);
        }

        let claims_user = self
            .tokens
            .access()
            .and_then(|access| AccessClaims::decode(&access))
            .map(|claims| claims.to_user())
            .unwrap_or_default();

        Ok(self.fetch_me().await.map(SessionUser::from).unwrap_or(claims_user))
    }

    /// Resume a stored session. `None` when there is nothing to resume.
    pub async fn bootstrap(&self) -> Option<SessionUser> {
        if !self.tokens.has_tokens() {
            return None;
        }

        let prefilled = self
            .tokens
            .access()
            .and_then(|access| AccessClaims::decode(&access))
            .filter(|claims| !claims.is_expired(now_unix()))
            .map(|claims| claims.to_user());

        match self.fetch_me().await {
            Ok(me) => {
                tracing::info!("[AUTH] Session resumed for {}", me.email);
                Some(me.into())
            }
            Err(e) => {
                tracing::info!("[AUTH] Could not refresh user on startup: {}", e);
                prefilled
            }
        }
    }

    /// `GET users/me/`. The email is lower-cased.
    pub async fn fetch_me(&self) -> Result<UserRecord, HttpError> {
        let mut me: UserRecord = self.client.get("users/me/", Vec::new()).await?.json()?;
        me.email = me.email.to_lowercase();
        Ok(me)
    }

    /// Best-effort server logout; local tokens are always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self.client.post("auth/logout/", None).await {
            tracing::debug!("[AUTH] Server logout failed: {}", e);
        }
        self.tokens.clear();
        tracing::info!("[AUTH] Logged out");
    }

    /// Request a reset e-mail. The answer does not reveal whether the account exists.
    pub async fn password_reset(&self, email: &str) -> &'static str {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return RESET_EMAIL_REQUIRED;
        }
        if let Err(e) = self
            .client
            .post("auth/password-reset/", Some(json!({ "email": email })))
            .await
        {
            tracing::debug!("[AUTH] Password reset request failed: {}", e);
        }
        RESET_SENT
    }
}
