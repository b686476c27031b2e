//! LGPD checklist: paginated list, completion toggles, create/edit/delete.
//!
//! Toggles go through [`ToggleController`]; the row flips as soon as the user
//! clicks and is rolled back from the snapshot if the `PATCH` fails.
//! Create/edit/delete refetch the current page when they succeed.

use std::sync::Arc;
use std::time::Instant;

use crate::egui_app::flash::{FlashKind, FlashSlot};
use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::optimistic::{confirm, PendingToggle, ToggleController, ToggleFailure};
use crate::egui_app::runtime::{Dispatcher, Inbox};
use crate::egui_app::screens::{save_error_text, CONTACT_ADMIN};
use crate::shared::models::{ChecklistItem, ChecklistUpdate, ItemId, NewChecklistItem};
use crate::shared::pagination::{Page, Pagination};

pub const COLLECTION: &str = "checklists";

pub const LOAD_FAILED: &str =
    "Falha ao carregar itens do checklist. Se o problema persistir, contate o administrador.";
pub const DELETE_FAILED: &str =
    "Falha ao excluir o item. Se o problema persistir, contate o administrador.";
const SAVE_FAILED: &str = "Erro ao salvar. Verifique os dados e a conexão.";

/// `GET checklists/?page=&page_size=`
pub async fn fetch_page(
    client: &dyn HttpClient,
    params: Vec<(String, String)>,
) -> Result<Page<ChecklistItem>, HttpError> {
    let response = client.get("checklists/", params).await?;
    Ok(Page::from_value(&response.data))
}

/// `POST checklists/`; the new item is never completed.
pub async fn create_item(client: &dyn HttpClient, item: &NewChecklistItem) -> Result<(), HttpError> {
    let body = serde_json::to_value(item).map_err(|e| HttpError::Decode(e.to_string()))?;
    client.post("checklists/", Some(body)).await?;
    Ok(())
}

/// `PUT checklists/<id>/` with the text fields only.
pub async fn update_item(
    client: &dyn HttpClient,
    id: ItemId,
    update: &ChecklistUpdate,
) -> Result<(), HttpError> {
    let body = serde_json::to_value(update).map_err(|e| HttpError::Decode(e.to_string()))?;
    client.put(&format!("checklists/{}/", id), body).await?;
    Ok(())
}

pub async fn delete_item(client: &dyn HttpClient, id: ItemId) -> Result<(), HttpError> {
    client.delete(&format!("checklists/{}/", id)).await?;
    Ok(())
}

/// Message for a failed create or edit.
pub fn save_error_message(err: &HttpError) -> String {
    let base = save_error_text(err).unwrap_or_else(|| SAVE_FAILED.to_string());
    format!("{} {}", base, CONTACT_ADMIN)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistForm {
    pub activity: String,
    pub description: String,
}

#[derive(Debug)]
enum Event {
    Loaded(Result<Page<ChecklistItem>, HttpError>),
    Toggled(PendingToggle, Result<(), ToggleFailure>),
    Saved {
        created: bool,
        result: Result<(), HttpError>,
    },
    Deleted(Result<(), HttpError>),
}

pub struct ChecklistScreen {
    client: Arc<dyn HttpClient>,
    pub rows: Vec<ChecklistItem>,
    pub pagination: Pagination,
    pub loading: bool,
    pub flash: FlashSlot,
    toggles: ToggleController,

    pub form: ChecklistForm,
    pub form_open: bool,
    pub editing: Option<ItemId>,
    pub saving: bool,

    pub confirm_delete: Option<ItemId>,
    pub deleting: bool,

    inbox: Inbox<Event>,
}

impl ChecklistScreen {
    pub fn new(client: Arc<dyn HttpClient>, page_size: u32) -> Self {
        Self {
            client,
            rows: Vec::new(),
            pagination: Pagination::new(page_size),
            loading: false,
            flash: FlashSlot::new(),
            toggles: ToggleController::new(COLLECTION),
            form: ChecklistForm::default(),
            form_open: false,
            editing: None,
            saving: false,
            confirm_delete: None,
            deleting: false,
            inbox: Inbox::new(),
        }
    }

    /// Use a controller configured differently (e.g. per-item serialization).
    pub fn with_toggle_controller(mut self, controller: ToggleController) -> Self {
        self.toggles = controller;
        self
    }

    pub fn toggles_in_flight(&self) -> usize {
        self.toggles.in_flight_count()
    }

    /// Fetch the current page.
    pub fn load(&mut self, dispatcher: &Dispatcher) {
        self.loading = true;
        let client = Arc::clone(&self.client);
        let params = self.pagination.params();
        tracing::debug!("[CHECKLIST] Loading page {}", self.pagination.page);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Loaded(fetch_page(client.as_ref(), params).await)
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

    /// Flip `is_completed` of one row now and confirm it in the background.
    /// Without `can_manage` nothing happens and no request is made.
    pub fn toggle(&mut self, dispatcher: &Dispatcher, id: ItemId, current: bool, can_manage: bool) {
        let Some(pending) = self.toggles.begin(&mut self.rows, id, current, can_manage) else {
            return;
        };
        let request = match pending.request() {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("[CHECKLIST] Could not encode toggle of item {}: {}", id, e);
                let failure = ToggleFailure::from_error(&e);
                self.toggles
                    .settle(pending, Err(failure), &mut self.rows, &mut self.flash, Instant::now());
                return;
            }
        };
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            let result = confirm(client.as_ref(), request).await;
            Event::Toggled(pending, result)
        });
    }

    pub fn open_create(&mut self, can_manage: bool) {
        if !can_manage {
            return;
        }
        self.editing = None;
        self.form = ChecklistForm::default();
        self.form_open = true;
    }

    pub fn open_edit(&mut self, id: ItemId, can_manage: bool) {
        if !can_manage {
            return;
        }
        let Some(row) = self.rows.iter().find(|row| row.id == id) else {
            return;
        };
        self.form = ChecklistForm {
            activity: row.activity.clone(),
            description: row.description.clone(),
        };
        self.editing = Some(id);
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.editing = None;
        self.form = ChecklistForm::default();
    }

    /// Create or update from the form. Ignored while a save is in flight.
    pub fn save(&mut self, dispatcher: &Dispatcher, can_manage: bool) {
        if !can_manage || self.saving {
            return;
        }
        self.saving = true;
        let client = Arc::clone(&self.client);
        let activity = self.form.activity.clone();
        let description = self.form.description.clone();

        match self.editing {
            Some(id) => {
                let update = ChecklistUpdate {
                    activity,
                    description,
                };
                dispatcher.spawn_to(self.inbox.sender(), async move {
                    Event::Saved {
                        created: false,
                        result: update_item(client.as_ref(), id, &update).await,
                    }
                });
            }
            None => {
                let item = NewChecklistItem::new(activity, description);
                dispatcher.spawn_to(self.inbox.sender(), async move {
                    Event::Saved {
                        created: true,
                        result: create_item(client.as_ref(), &item).await,
                    }
                });
            }
        }
    }

    pub fn ask_delete(&mut self, id: ItemId, can_manage: bool) {
        if can_manage {
            self.confirm_delete = Some(id);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    pub fn confirm_delete(&mut self, dispatcher: &Dispatcher) {
        if self.deleting {
            return;
        }
        let Some(id) = self.confirm_delete else {
            return;
        };
        self.deleting = true;
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Deleted(delete_item(client.as_ref(), id).await)
        });
    }

    /// Apply finished requests. Returns whether anything changed.
    pub fn poll(&mut self, dispatcher: &Dispatcher, now: Instant) -> bool {
        let events = self.inbox.drain();
        let changed = !events.is_empty();
        for event in events {
            self.handle(event, dispatcher, now);
        }
        self.flash.tick(now) || changed
    }

    /// Block until one request finishes and apply it. For headless drivers.
    pub fn wait(&mut self, dispatcher: &Dispatcher, timeout: std::time::Duration) -> bool {
        match self.inbox.wait(timeout) {
            Some(event) => {
                self.handle(event, dispatcher, Instant::now());
                true
            }
            None => false,
        }
    }

    /// Apply one finished request to the screen.
    ///
    /// A failed toggle restores the rows captured when it began, even if a
    /// reload replaced them while it was in flight. The list then shows the
    /// earlier page until the next load.
    fn handle(&mut self, event: Event, dispatcher: &Dispatcher, now: Instant) {
        match event {
            Event::Loaded(Ok(page)) => {
                self.loading = false;
                self.pagination.absorb(&page);
                self.rows = page.results;
                if self.pagination.clamp() {
                    self.load(dispatcher);
                }
            }
            Event::Loaded(Err(e)) => {
                self.loading = false;
                tracing::error!("[CHECKLIST] Failed to load items: {}", e);
                self.rows.clear();
                self.pagination.reset_counts();
                self.flash.show(FlashKind::Danger, LOAD_FAILED, now);
            }
            Event::Toggled(pending, result) => {
                self.toggles
                    .settle(pending, result, &mut self.rows, &mut self.flash, now);
            }
            Event::Saved { created, result } => {
                self.saving = false;
                match result {
                    Ok(()) => {
                        let text = if created {
                            "Item criado com sucesso!"
                        } else {
                            "Item atualizado com sucesso!"
                        };
                        tracing::info!("[CHECKLIST] {}", text);
                        self.flash.show(FlashKind::Success, text, now);
                        self.close_form();
                        self.load(dispatcher);
                    }
                    Err(e) => {
                        tracing::warn!("[CHECKLIST] Save failed: {}", e);
                        self.flash.show(FlashKind::Danger, save_error_message(&e), now);
                    }
                }
            }
            Event::Deleted(result) => {
                self.deleting = false;
                self.confirm_delete = None;
                match result {
                    Ok(()) => {
                        self.flash.show(FlashKind::Success, "Excluído com sucesso!", now);
                        self.load(dispatcher);
                    }
                    Err(e) => {
                        tracing::warn!("[CHECKLIST] Delete failed: {}", e);
                        self.flash.show(FlashKind::Danger, DELETE_FAILED, now);
                    }
                }
            }
        }
    }
}
