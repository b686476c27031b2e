//! Document registry ("Documentos"): activities with legal basis, evidence,
//! review date, criticality and status.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use crate::egui_app::flash::{FlashKind, FlashSlot};
use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::runtime::{Dispatcher, Inbox};
use crate::egui_app::screens::save_error_text;
use crate::shared::format::{br_to_iso, iso_to_br};
use crate::shared::models::{decode, Choice, DocumentRecord, ItemId};
use crate::shared::pagination::{Page, Pagination};

pub const LOAD_FAILED: &str = "Falha ao carregar a listagem.";
pub const NETWORK_FAILED: &str = "Erro de rede. Verifique sua conexão.";
pub const ERROR_TTL: Duration = Duration::from_millis(6000);

fn choice_list(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(code, label)| (code.to_string(), label.to_string()))
        .collect()
}

/// Select options for the coded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChoices {
    pub dimensao: Vec<Choice>,
    pub criticidade: Vec<Choice>,
    pub status: Vec<Choice>,
}

impl Default for DocumentChoices {
    fn default() -> Self {
        Self {
            dimensao: choice_list(&[
                ("GPV", "Gestão de privacidade"),
                ("GSI", "Gestão de SI"),
                ("PRC", "Processos"),
            ]),
            criticidade: choice_list(&[
                ("NA", "Não aplicável"),
                ("BP", "Boas práticas"),
                ("BX", "Baixa"),
                ("MD", "Média"),
                ("AL", "Alta"),
            ]),
            status: choice_list(&[
                ("NA", "Não aplicável"),
                ("NI", "Não Iniciado"),
                ("EA", "Em andamento"),
                ("FI", "Finalizado"),
            ]),
        }
    }
}

impl DocumentChoices {
    /// Take each list from the server when present and non-empty.
    pub fn merge(data: &Value) -> Self {
        let fallback = Self::default();
        let pick = |key: &str, default: Vec<Choice>| {
            data.get(key)
                .and_then(|v| decode::<Vec<Choice>>(v).ok())
                .filter(|list| !list.is_empty())
                .unwrap_or(default)
        };
        Self {
            dimensao: pick("dimensao", fallback.dimensao),
            criticidade: pick("criticidade", fallback.criticidade),
            status: pick("status", fallback.status),
        }
    }

    /// Display label for a code; unknown codes show as is.
    pub fn label<'a>(list: &'a [Choice], code: &'a str) -> &'a str {
        list.iter()
            .find(|(c, _)| c == code)
            .map(|(_, label)| label.as_str())
            .unwrap_or(code)
    }
}

/// Form state; `proxima_revisao` is edited as `dd/mm/aaaa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentForm {
    pub dimensao: String,
    pub atividade: String,
    pub base_legal: String,
    pub evidencia: String,
    pub proxima_revisao: String,
    pub comentarios: String,
    pub criticidade: String,
    pub status: String,
}

impl Default for DocumentForm {
    fn default() -> Self {
        Self {
            dimensao: String::new(),
            atividade: String::new(),
            base_legal: String::new(),
            evidencia: String::new(),
            proxima_revisao: String::new(),
            comentarios: String::new(),
            criticidade: "NA".to_string(),
            status: "NI".to_string(),
        }
    }
}

/// Body of `POST documentos/` and `PUT documentos/<id>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPayload {
    pub dimensao: String,
    pub atividade: String,
    pub base_legal: String,
    pub evidencia: String,
    pub proxima_revisao: Option<String>,
    pub comentarios: String,
    pub criticidade: String,
    pub status: String,
}

impl DocumentForm {
    pub fn from_record(record: &DocumentRecord) -> Self {
        let or = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            dimensao: record.dimensao.clone(),
            atividade: record.atividade.clone(),
            base_legal: record.base_legal.clone(),
            evidencia: record.evidencia.clone(),
            proxima_revisao: record
                .proxima_revisao
                .as_deref()
                .and_then(iso_to_br)
                .unwrap_or_default(),
            comentarios: record.comentarios.clone(),
            criticidade: or(&record.criticidade, "NA"),
            status: or(&record.status, "NI"),
        }
    }

    /// An empty or malformed review date is sent as `null`.
    pub fn payload(&self) -> DocumentPayload {
        DocumentPayload {
            dimensao: self.dimensao.clone(),
            atividade: self.atividade.clone(),
            base_legal: self.base_legal.clone(),
            evidencia: self.evidencia.clone(),
            proxima_revisao: br_to_iso(self.proxima_revisao.trim()),
            comentarios: self.comentarios.clone(),
            criticidade: self.criticidade.clone(),
            status: self.status.clone(),
        }
    }
}

/// `dd/mm/aaaa` for list cells, `-` when there is no date.
pub fn display_date(value: Option<&str>) -> String {
    value.and_then(iso_to_br).unwrap_or_else(|| "-".to_string())
}

/// File links are relative to the API base URL.
pub fn absolute_file_url(api_url: &str, raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(raw.to_string());
    }
    Some(format!("{}{}", api_url.trim_end_matches('/'), raw))
}

pub fn save_error_message(err: &HttpError) -> String {
    save_error_text(err).unwrap_or_else(|| NETWORK_FAILED.to_string())
}

pub async fn fetch_choices(client: &dyn HttpClient) -> DocumentChoices {
    match client.get("documentos/choices/", Vec::new()).await {
        Ok(response) => DocumentChoices::merge(&response.data),
        Err(e) => {
            tracing::warn!("[DOCS] Using built-in choices: {}", e);
            DocumentChoices::default()
        }
    }
}

fn page_params(page: u32, page_size: u32) -> Vec<(String, String)> {
    vec![
        ("page".to_string(), page.to_string()),
        ("page_size".to_string(), page_size.to_string()),
    ]
}

/// Fetch `page`; when a paginated answer comes back empty past page 1, step
/// back one page. Returns the page actually shown.
pub async fn fetch_page(
    client: &dyn HttpClient,
    page: u32,
    page_size: u32,
) -> Result<(u32, Page<DocumentRecord>), HttpError> {
    let response = client
        .get("documentos/", page_params(page, page_size))
        .await?;
    let rows: Page<DocumentRecord> = Page::from_value(&response.data);

    if response.data.is_object() && rows.results.is_empty() && page > 1 {
        let previous = page - 1;
        tracing::debug!("[DOCS] Page {} is empty, showing {}", page, previous);
        let retry = client
            .get("documentos/", page_params(previous, page_size))
            .await?;
        return Ok((previous, Page::from_value(&retry.data)));
    }
    Ok((page, rows))
}

pub async fn save_document(
    client: &dyn HttpClient,
    id: Option<ItemId>,
    payload: &DocumentPayload,
) -> Result<(), HttpError> {
    let body = serde_json::to_value(payload).map_err(|e| HttpError::Decode(e.to_string()))?;
    match id {
        Some(id) => client.put(&format!("documentos/{}/", id), body).await?,
        None => client.post("documentos/", Some(body)).await?,
    };
    Ok(())
}

pub async fn delete_document(client: &dyn HttpClient, id: ItemId) -> Result<(), HttpError> {
    client.delete(&format!("documentos/{}/", id)).await?;
    Ok(())
}

#[derive(Debug)]
enum Event {
    Choices(DocumentChoices),
    Loaded(Result<(u32, Page<DocumentRecord>), HttpError>),
    Saved {
        created: bool,
        result: Result<(), HttpError>,
    },
    Deleted(Result<(), HttpError>),
}

pub struct DocumentsScreen {
    client: Arc<dyn HttpClient>,
    api_url: String,
    pub rows: Vec<DocumentRecord>,
    pub choices: DocumentChoices,
    pub pagination: Pagination,
    pub loading: bool,
    pub flash: FlashSlot,

    pub form: DocumentForm,
    pub form_open: bool,
    pub editing: Option<ItemId>,
    pub saving: bool,
    pub confirm_delete: Option<ItemId>,

    inbox: Inbox<Event>,
}

impl DocumentsScreen {
    pub fn new(client: Arc<dyn HttpClient>, api_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            rows: Vec::new(),
            choices: DocumentChoices::default(),
            pagination: Pagination::new(page_size),
            loading: false,
            flash: FlashSlot::new(),
            form: DocumentForm::default(),
            form_open: false,
            editing: None,
            saving: false,
            confirm_delete: None,
            inbox: Inbox::new(),
        }
    }

    /// Choices and the first page.
    pub fn open(&mut self, dispatcher: &Dispatcher) {
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Choices(fetch_choices(client.as_ref()).await)
        });
        self.load(dispatcher);
    }

    pub fn load(&mut self, dispatcher: &Dispatcher) {
        self.loading = true;
        let client = Arc::clone(&self.client);
        let (page, page_size) = (self.pagination.page, self.pagination.page_size);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Loaded(fetch_page(client.as_ref(), page, page_size).await)
        });
    }

    pub fn go_to(&mut self, dispatcher: &Dispatcher, page: u32) {
        if self.pagination.go_to(page) {
            self.load(dispatcher);
        }
    }

    pub fn set_page_size(&mut self, dispatcher: &Dispatcher, page_size: u32) {
        self.pagination.set_page_size(page_size);
        self.load(dispatcher);
    }

    pub fn download_url(&self, row: &DocumentRecord) -> Option<String> {
        absolute_file_url(&self.api_url, row.arquivo_url.as_deref())
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = DocumentForm::default();
        self.form_open = true;
    }

    pub fn open_edit(&mut self, id: ItemId) {
        if let Some(row) = self.rows.iter().find(|row| row.id == id) {
            self.form = DocumentForm::from_record(row);
            self.editing = Some(id);
            self.form_open = true;
        }
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.editing = None;
    }

    pub fn save(&mut self, dispatcher: &Dispatcher) {
        if self.saving {
            return;
        }
        self.saving = true;
        let client = Arc::clone(&self.client);
        let id = self.editing;
        let payload = self.form.payload();
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Saved {
                created: id.is_none(),
                result: save_document(client.as_ref(), id, &payload).await,
            }
        });
    }

    pub fn ask_delete(&mut self, id: ItemId) {
        self.confirm_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    pub fn confirm_delete(&mut self, dispatcher: &Dispatcher) {
        let Some(id) = self.confirm_delete.take() else {
            return;
        };
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Deleted(delete_document(client.as_ref(), id).await)
        });
    }

    pub fn poll(&mut self, dispatcher: &Dispatcher, now: Instant) -> bool {
        let events = self.inbox.drain();
        let changed = !events.is_empty();
        for event in events {
            self.handle(event, dispatcher, now);
        }
        self.flash.tick(now) || changed
    }

    pub fn wait(&mut self, dispatcher: &Dispatcher, timeout: Duration) -> bool {
        match self.inbox.wait(timeout) {
            Some(event) => {
                self.handle(event, dispatcher, Instant::now());
                true
            }
            None => false,
        }
    }

    fn handle(&mut self, event: Event, dispatcher: &Dispatcher, now: Instant) {
        match event {
            Event::Choices(choices) => self.choices = choices,
            Event::Loaded(Ok((page, rows))) => {
                self.loading = false;
                self.pagination.page = page;
                self.pagination.absorb(&rows);
                self.rows = rows.results;
            }
            Event::Loaded(Err(e)) => {
                self.loading = false;
                tracing::error!("[DOCS] Failed to load documents: {}", e);
                self.flash.show(FlashKind::Danger, LOAD_FAILED, now);
            }
            Event::Saved { created, result } => {
                self.saving = false;
                match result {
                    Ok(()) => {
                        let text = if created {
                            "Atividade criada com sucesso!"
                        } else {
                            "Atividade atualizada com sucesso!"
                        };
                        self.flash.show(FlashKind::Success, text, now);
                        self.close_form();
                        self.load(dispatcher);
                    }
                    Err(e) => {
                        tracing::warn!("[DOCS] Save failed: {}", e);
                        self.flash
                            .show_for(FlashKind::Danger, save_error_message(&e), ERROR_TTL, now);
                    }
                }
            }
            Event::Deleted(Ok(())) => {
                self.flash.show(FlashKind::Success, "Excluído com sucesso.", now);
                self.load(dispatcher);
            }
            Event::Deleted(Err(e)) => {
                tracing::warn!("[DOCS] Delete failed: {}", e);
                self.flash
                    .show_for(FlashKind::Danger, save_error_message(&e), ERROR_TTL, now);
            }
        }
    }
}
