//! HTTP client contract and its reqwest implementation.
//!
//! Screens only see [`HttpClient`]: `get/post/patch/put/delete` against the
//! configured base URL, resolving to an [`HttpResponse`] (`status` + parsed
//! `data`) or failing with an [`HttpError`] that exposes the response status
//! and body when the server answered.
//!
//! [`ReqwestClient`] adds the bearer token from the [`TokenStore`] and, on a
//! `401`, refreshes the access token once and replays the request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;

use crate::egui_app::token_store::TokenStore;
use crate::shared::config::AppConfig;
use crate::shared::models::TokenPair;

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` when empty, a JSON string when not JSON
    pub data: Value,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_value(self.data.clone()).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// Failure of a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status
    #[error("request failed with status {status}")]
    Status { status: u16, data: Value },

    /// No response: connection refused, DNS, timeout, TLS
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl HttpError {
    /// `response.status`, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `response.data`, when there was a response.
    pub fn data(&self) -> Option<&Value> {
        match self {
            HttpError::Status { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn has_response(&self) -> bool {
        matches!(self, HttpError::Status { .. })
    }

    /// DRF's `{"detail": "..."}` message, when present.
    pub fn detail(&self) -> Option<&str> {
        self.data()?.get("detail")?.as_str()
    }
}

/// The only seam between screens and the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;

    async fn get(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::new(Method::Get, path).with_params(params))
            .await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<HttpResponse, HttpError> {
        let mut request = HttpRequest::new(Method::Post, path);
        request.body = body;
        self.send(request).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::new(Method::Patch, path).with_body(body))
            .await
    }

    async fn put(&self, path: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::new(Method::Put, path).with_body(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::new(Method::Delete, path)).await
    }
}

const LOGIN_PATH: &str = "auth/login/";
const JWT_REFRESH_PATH: &str = "auth/token/refresh/";
const COOKIE_REFRESH_PATH: &str = "auth/refresh/";

/// reqwest-backed [`HttpClient`].
pub struct ReqwestClient {
    base: Url,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    cookie_mode: bool,
    refresh_lock: Mutex<()>,
}

impl ReqwestClient {
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, HttpError> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| HttpError::Network(format!("invalid base URL {}: {}", config.api_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .cookie_store(config.cookie_mode)
            .build()
            .map_err(|e| HttpError::Network(format!("failed to build client: {}", e)))?;

        Ok(Self {
            base,
            client,
            tokens,
            cookie_mode: config.cookie_mode,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Paths are appended to the base URL; a leading `/` does not reset it.
    pub fn url_for(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Network(format!("invalid path {}: {}", path, e)))
    }

    async fn execute(
        &self,
        request: &HttpRequest,
        access: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(&request.path)?;
        tracing::debug!("[HTTP] {:?} {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = access {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("[HTTP] {:?} {} failed: {}", request.method, request.path, e);
            HttpError::Network(e.to_string())
        })?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let data = parse_body(&bytes);

        if (200..300).contains(&status) {
            Ok(HttpResponse { status, data })
        } else {
            tracing::debug!("[HTTP] {:?} {} -> {}", request.method, request.path, status);
            Err(HttpError::Status { status, data })
        }
    }

    /// Obtain a fresh access token. Callers that waited on the lock while
    /// another refresh succeeded get that token instead of refreshing again.
    async fn refresh_access(&self, stale: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.tokens.access() {
            if Some(current.as_str()) != stale {
                return Some(current);
            }
        }

        let request = if self.cookie_mode {
            HttpRequest::new(Method::Post, COOKIE_REFRESH_PATH)
        } else {
            let Some(refresh) = self.tokens.refresh() else {
                tracing::info!("[HTTP] No refresh token, dropping session");
                self.tokens.clear();
                return None;
            };
            HttpRequest::new(Method::Post, JWT_REFRESH_PATH).with_body(json!({ "refresh": refresh }))
        };

        let refreshed = self
            .execute(&request, None)
            .await
            .and_then(|resp| resp.json::<TokenPair>());

        match refreshed {
            Ok(TokenPair {
                access: Some(access),
                refresh,
            }) => {
                tracing::info!("[HTTP] Access token refreshed");
                self.tokens.set_access(Some(access.clone()));
                if refresh.is_some() {
                    self.tokens.set_refresh(refresh);
                }
                Some(access)
            }
            Ok(_) => {
                tracing::warn!("[HTTP] Refresh response without access token");
                self.tokens.clear();
                None
            }
            Err(e) => {
                tracing::warn!("[HTTP] Token refresh failed: {}", e);
                self.tokens.clear();
                None
            }
        }
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn is_auth_path(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    path == LOGIN_PATH || path == JWT_REFRESH_PATH || path == COOKIE_REFRESH_PATH
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let access = self.tokens.access();
        match self.execute(&request, access.as_deref()).await {
            Err(err) if err.status() == Some(401) && !is_auth_path(&request.path) => {
                match self.refresh_access(access.as_deref()).await {
                    Some(fresh) => self.execute(&request, Some(&fresh)).await,
                    None => Err(err),
                }
            }
            other => other,
        }
    }
}
