//! # Optimistic toggle with rollback
//!
//! Flips a boolean on one row of a server-backed list, shows the change right
//! away and reconciles with the backend:
//!
//! 1. [`ToggleController::begin`] (synchronous): snapshot the whole list, then
//!    negate the row's flag in place.
//! 2. [`confirm`] (async): `PATCH <collection>/<id>/ {"is_completed": v}`.
//! 3. [`ToggleController::settle`]: on success drop the snapshot; on any
//!    failure restore the list verbatim from the snapshot and raise a flash
//!    message (`warning` for 403, `danger` otherwise).
//!
//! Per row the state is either `Confirmed(v)` or `Pending(!v, snapshot)`.
//!
//! Overlapping toggles on different rows each keep their own snapshot. Two
//! toggles on the same row are not serialized unless
//! [`ToggleController::serialize_per_item`] is enabled: the second snapshot
//! already contains the first unconfirmed flip, and a failure of the first
//! rolls back the second as well.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use lgpd_mobile::egui_app::optimistic::{confirm, ToggleController, ToggleFailure};
//! # use lgpd_mobile::egui_app::flash::FlashSlot;
//! # use lgpd_mobile::egui_app::http::HttpClient;
//! # async fn example(client: &dyn HttpClient, rows: &mut Vec<lgpd_mobile::shared::ChecklistItem>) {
//! let mut controller = ToggleController::new("checklists");
//! let mut flash = FlashSlot::new();
//! if let Some(pending) = controller.begin(rows, 1, false, true) {
//!     let result = match pending.request() {
//!         Ok(request) => confirm(client, request).await,
//!         Err(e) => Err(ToggleFailure::from_error(&e)),
//!     };
//!     controller.settle(pending, result, rows, &mut flash, std::time::Instant::now());
//! }
//! # }
//! ```

use std::collections::HashSet;
use std::time::Instant;

use crate::egui_app::flash::{FlashKind, FlashSlot};
use crate::egui_app::http::{HttpClient, HttpError, HttpRequest, Method};
use crate::shared::models::{ChecklistItem, CompletionPatch, ItemId};

pub const PERMISSION_DENIED_MESSAGE: &str = "Você não tem permissão para alterar este item.";
pub const UPDATE_FAILED_MESSAGE: &str =
    "Não foi possível atualizar o item. Se o problema persistir, contate o administrador.";

/// Copy of some state taken before a speculative change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T: Clone> {
    saved: T,
}

impl<T: Clone> Snapshot<T> {
    /// Copy `state`, then run `mutate` on it.
    pub fn apply(state: &mut T, mutate: impl FnOnce(&mut T)) -> Self {
        let saved = state.clone();
        mutate(state);
        Self { saved }
    }

    /// Put the saved copy back, discarding everything done since.
    pub fn restore(self, state: &mut T) {
        *state = self.saved;
    }

    pub fn saved(&self) -> &T {
        &self.saved
    }
}

/// Why the remote confirmation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleFailure {
    /// HTTP 403
    AuthorizationDenied,
    /// Anything else, including no response and unexpected error shapes
    NetworkOrServer,
}

impl ToggleFailure {
    pub fn from_error(err: &HttpError) -> Self {
        match err.status() {
            Some(403) => ToggleFailure::AuthorizationDenied,
            _ => ToggleFailure::NetworkOrServer,
        }
    }

    pub fn flash_kind(&self) -> FlashKind {
        match self {
            ToggleFailure::AuthorizationDenied => FlashKind::Warning,
            ToggleFailure::NetworkOrServer => FlashKind::Danger,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ToggleFailure::AuthorizationDenied => PERMISSION_DENIED_MESSAGE,
            ToggleFailure::NetworkOrServer => UPDATE_FAILED_MESSAGE,
        }
    }
}

/// How a toggle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Committed,
    RolledBack(ToggleFailure),
}

/// One in-flight toggle: the speculative value and the pre-toggle list.
#[derive(Debug, Clone)]
pub struct PendingToggle {
    pub item_id: ItemId,
    pub value: bool,
    path: String,
    snapshot: Snapshot<Vec<ChecklistItem>>,
}

impl PendingToggle {
    /// The list as it was right before this toggle.
    pub fn snapshot(&self) -> &[ChecklistItem] {
        self.snapshot.saved()
    }

    /// `PATCH <collection>/<id>/ {"is_completed": value}`
    pub fn request(&self) -> Result<HttpRequest, HttpError> {
        let body = serde_json::to_value(CompletionPatch {
            is_completed: self.value,
        })
        .map_err(|e| HttpError::Decode(e.to_string()))?;
        Ok(HttpRequest::new(Method::Patch, self.path.clone()).with_body(body))
    }
}

/// Persist a toggle. Never retries.
pub async fn confirm(client: &dyn HttpClient, request: HttpRequest) -> Result<(), ToggleFailure> {
    match client.send(request).await {
        Ok(_) => Ok(()),
        Err(err) => {
            tracing::warn!(
                "[CHECKLIST] Toggle not persisted: {} {}",
                err,
                err.data().map(|d| d.to_string()).unwrap_or_default()
            );
            Err(ToggleFailure::from_error(&err))
        }
    }
}

/// Applies and settles optimistic toggles for one collection endpoint.
#[derive(Debug, Clone)]
pub struct ToggleController {
    collection: String,
    serialize_per_item: bool,
    in_flight: HashSet<ItemId>,
}

impl ToggleController {
    /// `collection` is the endpoint prefix, e.g. `checklists`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into().trim_matches('/').to_string(),
            serialize_per_item: false,
            in_flight: HashSet::new(),
        }
    }

    /// Reject a toggle on a row whose previous toggle is still in flight.
    pub fn serialize_per_item(mut self, enabled: bool) -> Self {
        self.serialize_per_item = enabled;
        self
    }

    pub fn is_in_flight(&self, item_id: ItemId) -> bool {
        self.in_flight.contains(&item_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Step 1. Returns `None` (and leaves `rows` untouched) when the caller is
    /// not authorized, the row is not in the list, or the row is busy under
    /// per-item serialization.
    pub fn begin(
        &mut self,
        rows: &mut Vec<ChecklistItem>,
        item_id: ItemId,
        current_value: bool,
        authorized: bool,
    ) -> Option<PendingToggle> {
        if !authorized {
            return None;
        }
        if !rows.iter().any(|row| row.id == item_id) {
            tracing::warn!("[CHECKLIST] Toggle ignored, item {} not in the list", item_id);
            return None;
        }
        if self.serialize_per_item && self.in_flight.contains(&item_id) {
            tracing::debug!("[CHECKLIST] Toggle ignored, item {} still pending", item_id);
            return None;
        }

        let value = !current_value;
        let snapshot = Snapshot::apply(rows, |rows| {
            for row in rows.iter_mut().filter(|row| row.id == item_id) {
                row.is_completed = value;
            }
        });
        self.in_flight.insert(item_id);
        tracing::debug!("[CHECKLIST] Item {} optimistically set to {}", item_id, value);

        Some(PendingToggle {
            item_id,
            value,
            path: format!("{}/{}/", self.collection, item_id),
            snapshot,
        })
    }

    /// Step 3. Commit or roll back.
    pub fn settle(
        &mut self,
        pending: PendingToggle,
        result: Result<(), ToggleFailure>,
        rows: &mut Vec<ChecklistItem>,
        flash: &mut FlashSlot,
        now: Instant,
    ) -> ToggleOutcome {
        self.in_flight.remove(&pending.item_id);
        match result {
            Ok(()) => {
                tracing::debug!("[CHECKLIST] Item {} confirmed as {}", pending.item_id, pending.value);
                ToggleOutcome::Committed
            }
            Err(failure) => {
                tracing::info!("[CHECKLIST] Rolling back item {} ({:?})", pending.item_id, failure);
                pending.snapshot.restore(rows);
                flash.show(failure.flash_kind(), failure.message(), now);
                ToggleOutcome::RolledBack(failure)
            }
        }
    }
}
