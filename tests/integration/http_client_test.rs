//! reqwest client against a wiremock server: bearer header, refresh on 401,
//! body parsing.

use std::sync::Arc;

use lgpd_mobile::egui_app::http::{HttpClient, HttpError};
use lgpd_mobile::egui_app::{MemoryTokenStore, ReqwestClient, TokenStore};
use lgpd_mobile::shared::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::start_api;

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("a"), Some("r")), false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .and(header("authorization", "Bearer a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
        .expect(1)
        .mount(&api.server)
        .await;

    let response = crate::assert_ok!(api.client.get("/users/me/", Vec::new()).await);
    assert_eq!(response.status, 200);
    assert_eq!(response.data["email"], "a@b.c");
}

#[tokio::test]
async fn test_query_params_are_sent() {
    let api = start_api(MemoryTokenStore::new(), false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .and(query_param("page", "2"))
        .and(query_param("q", "ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&api.server)
        .await;

    let params = vec![
        ("page".to_string(), "2".to_string()),
        ("q".to_string(), "ana".to_string()),
    ];
    let response = crate::assert_ok!(api.client.get("users/", params).await);
    assert_eq!(response.data, json!([]));
}

#[tokio::test]
async fn test_expired_access_is_refreshed_and_request_replayed() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("old"), Some("r")), false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checklists/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "r"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new", "refresh": "r2"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/checklists/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .expect(1)
        .mount(&api.server)
        .await;

    let response = crate::assert_ok!(api.client.get("checklists/", Vec::new()).await);
    assert_eq!(response.data["count"], 0);
    assert_eq!(api.tokens.access().as_deref(), Some("new"));
    assert_eq!(api.tokens.refresh().as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_failed_refresh_clears_tokens_and_returns_original_401() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("old"), Some("r")), false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "blacklisted"})))
        .expect(1)
        .mount(&api.server)
        .await;

    let err = api.client.get("users/me/", Vec::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.detail(), Some("expired"));
    assert!(!api.tokens.has_tokens());
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("old"), None), false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&api.server)
        .await;

    let err = api.client.get("users/me/", Vec::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!api.tokens.has_tokens());
}

#[tokio::test]
async fn test_cookie_mode_refreshes_without_body() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("old"), None), true).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&api.server)
        .await;

    crate::assert_ok!(api.client.get("documents/", Vec::new()).await);
    assert_eq!(api.tokens.access().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_login_401_is_not_refreshed() {
    let api = start_api(MemoryTokenStore::with_tokens(Some("old"), Some("r")), false).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&api.server)
        .await;

    let err = api
        .client
        .post("auth/login/", Some(json!({"email": "a@b.c", "password": "x"})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(api.tokens.access().as_deref(), Some("old"));
}

#[tokio::test]
async fn test_body_parsing() {
    let api = start_api(MemoryTokenStore::new(), false).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/checklists/3/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&api.server)
        .await;

    let deleted = crate::assert_ok!(api.client.delete("checklists/3/").await);
    assert_eq!(deleted.status, 204);
    assert_eq!(deleted.data, Value::Null);

    let err = api.client.get("health/", Vec::new()).await.unwrap_err();
    assert_eq!(
        err,
        HttpError::Status {
            status: 500,
            data: json!("Internal Server Error"),
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = AppConfig::builder()
        .api_url("http://127.0.0.1:1/api/v1")
        .build()
        .unwrap();
    let client = ReqwestClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();

    let err = client.get("users/me/", Vec::new()).await.unwrap_err();
    crate::assert_err!(Err::<(), _>(err.clone()), HttpError::Network(_));
    assert!(!err.has_response());
}
