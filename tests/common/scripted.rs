//! Scripted in-memory API
//!
//! An [`HttpClient`] with canned replies, for driving screens without a server.
//!
//! Replies are queued per `(method, path)`; once a queue runs dry the last
//! reply served on that route repeats.
//! Every request is recorded so callers can assert what went over the wire,
//! including that nothing did.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use lgpd_mobile::egui_app::http::{HttpClient, HttpError, HttpRequest, HttpResponse, Method};

type Reply = Result<HttpResponse, HttpError>;

#[derive(Debug, Default)]
struct Route {
    queued: VecDeque<Reply>,
    last: Option<Reply>,
}

#[derive(Debug, Default)]
pub struct ScriptedClient {
    routes: Mutex<HashMap<(Method, String), Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    latency: Option<Duration>,
}

fn route_key(method: Method, path: &str) -> (Method, String) {
    (method, path.trim_start_matches('/').to_string())
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply, to observe state while a request is in flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry(route_key(method, path))
                .or_default()
                .queued
                .push_back(reply);
        }
        self
    }

    pub fn ok(&self, method: Method, path: &str, status: u16, data: Value) -> &Self {
        self.on(method, path, Ok(HttpResponse { status, data }))
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, data: Value) -> &Self {
        self.on(method, path, Err(HttpError::Status { status, data }))
    }

    pub fn offline(&self, method: Method, path: &str) -> &Self {
        self.on(
            method,
            path,
            Err(HttpError::Network("connection refused".to_string())),
        )
    }

    /// All requests so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        let key = route_key(method, path);
        self.requests()
            .into_iter()
            .filter(|r| route_key(r.method, &r.path) == key)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self, method: Method, path: &str) -> Reply {
        let Ok(mut routes) = self.routes.lock() else {
            return Err(HttpError::Network("script unavailable".to_string()));
        };
        let Some(route) = routes.get_mut(&route_key(method, path)) else {
            return Err(HttpError::Status {
                status: 404,
                data: json!({ "detail": "Not found." }),
            });
        };
        if let Some(reply) = route.queued.pop_front() {
            route.last = Some(reply.clone());
            return reply;
        }
        route
            .last
            .clone()
            .unwrap_or_else(|| Err(HttpError::Network("empty script".to_string())))
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let reply = self.next_reply(request.method, &request.path);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_repeat_last() {
        let client = ScriptedClient::new();
        client
            .ok(Method::Get, "users/me/", 200, json!({"email": "a@b.c"}))
            .fail(Method::Get, "users/me/", 401, Value::Null);

        assert!(client.get("users/me/", Vec::new()).await.is_ok());
        assert_eq!(client.get("/users/me/", Vec::new()).await.unwrap_err().status(), Some(401));
        assert_eq!(client.get("users/me/", Vec::new()).await.unwrap_err().status(), Some(401));
        assert_eq!(client.requests_to(Method::Get, "users/me/").len(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_is_404() {
        let client = ScriptedClient::new();
        let err = client.delete("checklists/1/").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(client.request_count(), 1);
    }
}
