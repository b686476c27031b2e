//! Session lifecycle: login, resume, logout, password reset.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use assert_matches::assert_matches;
use base64::Engine;
use lgpd_mobile::egui_app::auth::{
    AuthError, CANNOT_CONNECT, INVALID_CREDENTIALS, RESET_EMAIL_REQUIRED, RESET_SENT,
};
use lgpd_mobile::egui_app::http::Method;
use lgpd_mobile::egui_app::{AuthService, MemoryTokenStore, TokenStore};
use lgpd_mobile::shared::Role;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{start_api, ScriptedClient};

fn jwt(claims: Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", payload)
}

fn service(client: &Arc<ScriptedClient>, tokens: &Arc<MemoryTokenStore>) -> AuthService {
    AuthService::new(client.clone(), tokens.clone())
}

#[tokio::test]
async fn test_login_over_http_stores_tokens() {
    let api = start_api(MemoryTokenStore::new(), false).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .and(body_json(json!({"email": "dpo@empresa.com", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "DPO@Empresa.com",
            "first_name": "Carla",
            "role": "dpo"
        })))
        .mount(&api.server)
        .await;

    let auth = AuthService::new(Arc::new(api.client), api.tokens.clone());
    let user = crate::assert_ok!(auth.login(" DPO@empresa.com ", "s3cret").await);

    assert_eq!(user.email, "dpo@empresa.com");
    assert_eq!(user.role, Role::Dpo);
    assert_eq!(api.tokens.access().as_deref(), Some("a1"));
    assert_eq!(api.tokens.refresh().as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_login_falls_back_to_token_claims() {
    let client = Arc::new(ScriptedClient::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    let access = jwt(json!({"email": "Gerente@X.com", "role": "gerente", "exp": 4_000_000_000i64}));
    client
        .ok(Method::Post, "auth/login/", 200, json!({"access": access, "refresh": "r"}))
        .fail(Method::Get, "users/me/", 500, Value::Null);

    let user = crate::assert_ok!(service(&client, &tokens).login("gerente@x.com", "pw").await);
    assert_eq!(user.email, "gerente@x.com");
    assert_eq!(user.role, Role::Gerente);
    assert!(!user.can_manage());
}

#[tokio::test]
async fn test_login_error_messages() {
    let client = Arc::new(ScriptedClient::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    let auth = service(&client, &tokens);

    let err = auth.login("", "pw").await.unwrap_err();
    assert_matches!(err, AuthError::MissingCredentials);
    assert_eq!(client.request_count(), 0);

    client.fail(Method::Post, "auth/login/", 400, json!({"non_field_errors": ["x"]}));
    let err = auth.login("a@b.c", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), INVALID_CREDENTIALS);

    client.offline(Method::Post, "auth/login/");
    let err = auth.login("a@b.c", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), CANNOT_CONNECT);
    assert!(!tokens.has_tokens());
}

#[tokio::test]
async fn test_bootstrap_without_tokens_is_none() {
    let client = Arc::new(ScriptedClient::new());
    let tokens = Arc::new(MemoryTokenStore::new());

    assert!(service(&client, &tokens).bootstrap().await.is_none());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_bootstrap_keeps_unexpired_claims_when_offline() {
    let client = Arc::new(ScriptedClient::new());
    client.offline(Method::Get, "users/me/");
    let live = jwt(json!({"sub": "admin@x.com", "role": "admin", "exp": 4_000_000_000i64}));
    let tokens = Arc::new(MemoryTokenStore::with_tokens(Some(&live), Some("r")));

    let user = service(&client, &tokens).bootstrap().await.unwrap();
    assert_eq!(user.email, "admin@x.com");
    assert!(user.can_manage());

    let expired = jwt(json!({"sub": "admin@x.com", "role": "admin", "exp": 1}));
    let tokens = Arc::new(MemoryTokenStore::with_tokens(Some(&expired), Some("r")));
    assert!(service(&client, &tokens).bootstrap().await.is_none());
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_server_fails() {
    let client = Arc::new(ScriptedClient::new());
    client.fail(Method::Post, "auth/logout/", 500, Value::Null);
    let tokens = Arc::new(MemoryTokenStore::with_tokens(Some("a"), Some("r")));

    service(&client, &tokens).logout().await;

    assert!(!tokens.has_tokens());
    assert_eq!(client.requests_to(Method::Post, "auth/logout/").len(), 1);
}

#[tokio::test]
async fn test_password_reset_is_neutral() {
    let client = Arc::new(ScriptedClient::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    let auth = service(&client, &tokens);

    assert_eq!(auth.password_reset("  ").await, RESET_EMAIL_REQUIRED);

    client.fail(Method::Post, "auth/password-reset/", 400, json!({"email": ["unknown"]}));
    assert_eq!(auth.password_reset("Nobody@X.com").await, RESET_SENT);
    let sent = &client.requests_to(Method::Post, "auth/password-reset/")[0];
    assert_eq!(sent.body, Some(json!({"email": "nobody@x.com"})));
}
