//! Scripted API fixtures
//!
//! Canned checklist pages and a dispatcher/client pair for driving screens
//! without a server.

use std::sync::Arc;
use std::time::Duration;

use lgpd_mobile::egui_app::http::Method;
use lgpd_mobile::egui_app::screens::ChecklistScreen;
use lgpd_mobile::egui_app::Dispatcher;
use serde_json::{json, Value};

use super::scripted::ScriptedClient;

pub const WAIT: Duration = Duration::from_secs(5);

/// One checklist row as the API serves it.
pub fn checklist_row(id: i64, activity: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "atividade": activity,
        "descricao": "",
        "is_completed": completed
    })
}

/// DRF-style paginated body.
pub fn page_of(rows: Vec<Value>) -> Value {
    json!({
        "count": rows.len(),
        "next": null,
        "previous": null,
        "results": rows
    })
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub client: Arc<ScriptedClient>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new().expect("runtime"),
            client: Arc::new(ScriptedClient::new()),
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            dispatcher: Dispatcher::new().expect("runtime"),
            client: Arc::new(ScriptedClient::new().with_latency(latency)),
        }
    }

    /// Checklist screen with `rows` already loaded.
    pub fn checklist(&self, rows: Vec<Value>) -> ChecklistScreen {
        self.client.ok(Method::Get, "checklists/", 200, page_of(rows));
        let mut screen = ChecklistScreen::new(self.client.clone(), 10);
        screen.load(&self.dispatcher);
        assert!(screen.wait(&self.dispatcher, WAIT), "checklist did not load");
        screen
    }

    /// Requests other than the initial list fetch.
    pub fn writes(&self) -> usize {
        self.client
            .requests()
            .iter()
            .filter(|r| r.method != Method::Get)
            .count()
    }
}
