//! User registration and administration ("Cadastro de Usuário").
//!
//! One form serves both creation and edition. Validation runs locally first;
//! server-side 400s are mapped back onto the same per-field messages. Only one
//! DPO may exist, so the screen tracks whether one is already appointed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};

use crate::egui_app::flash::{FlashKind, FlashSlot};
use crate::egui_app::http::{HttpClient, HttpError};
use crate::egui_app::runtime::{Dispatcher, Inbox};
use crate::egui_app::screens::{field_errors, FieldErrors, FIX_HIGHLIGHTED};
use crate::shared::format::{
    add_years_to_iso, br_to_iso, digits_only, is_date_br, is_valid_name, iso_to_br, mask_date_br,
    sanitize_name,
};
use crate::shared::models::{ItemId, Role, UserRecord};
use crate::shared::pagination::{Page, Pagination};

pub const PASSWORD_MIN_CHARS: usize = 3;
pub const APPOINTMENT_YEARS: u32 = 2;
pub const SUCCESS_TTL: Duration = Duration::from_millis(2500);
pub const DELETE_SUCCESS_TTL: Duration = Duration::from_millis(2000);

pub const DPO_ALREADY_EXISTS: &str = "Já existe um DPO nomeado. Edite o DPO atual para alterar.";
const NAME_CHARS: &str = "Use apenas letras, espaços, hífen e apóstrofo.";
const FORBIDDEN: &str = "Você não tem permissão para executar esta ação.";
const SAVE_FAILED: &str = "Erro ao salvar. Verifique os dados e tente novamente.";
const LOAD_FAILED: &str = "Falha ao carregar usuários.";
const EDIT_LOAD_FAILED: &str = "Falha ao carregar usuário para edição.";
const DELETE_FAILED: &str = "Falha ao excluir o usuário.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ItemId),
}

/// Editable inputs; each maps to the backend field of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Email,
    FirstName,
    LastName,
    PhoneNumber,
    AppointmentDate,
    Password,
    Password2,
}

impl UserField {
    pub fn key(&self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::PhoneNumber => "phone_number",
            UserField::AppointmentDate => "appointment_date",
            UserField::Password => "password",
            UserField::Password2 => "password2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Digits only; the view masks them
    pub phone_number: String,
    pub role: Role,
    /// `dd/mm/aaaa`
    pub appointment_date: String,
    pub password: String,
    pub password2: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            role: Role::Gerente,
            appointment_date: String::new(),
            password: String::new(),
            password2: String::new(),
        }
    }
}

impl UserForm {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            phone_number: digits_only(record.phone_number.as_deref().unwrap_or_default()),
            role: match record.role {
                Role::Unknown => Role::Gerente,
                role => role,
            },
            appointment_date: record
                .appointment_date
                .as_deref()
                .and_then(iso_to_br)
                .unwrap_or_default(),
            password: String::new(),
            password2: String::new(),
        }
    }

    /// Store `value` with the field's input mask applied.
    pub fn set(&mut self, field: UserField, value: &str) {
        match field {
            UserField::Email => self.email = value.to_string(),
            UserField::FirstName => self.first_name = sanitize_name(value),
            UserField::LastName => self.last_name = sanitize_name(value),
            UserField::PhoneNumber => {
                self.phone_number = digits_only(value).chars().take(11).collect()
            }
            UserField::AppointmentDate => self.appointment_date = mask_date_br(value),
            UserField::Password => self.password = value.to_string(),
            UserField::Password2 => self.password2 = value.to_string(),
        }
    }

    /// `dd/mm/aaaa` of the appointment end, shown while editing a DPO.
    pub fn validity_preview(&self) -> Option<String> {
        if self.role != Role::Dpo {
            return None;
        }
        let iso = br_to_iso(&self.appointment_date)?;
        iso_to_br(&add_years_to_iso(&iso, APPOINTMENT_YEARS)?)
    }
}

/// Client-side checks. Later rules overwrite earlier messages for the same field.
pub fn validate(
    form: &UserForm,
    mode: FormMode,
    original_role: Option<Role>,
    dpo_exists: bool,
) -> FieldErrors {
    let mut e = FieldErrors::new();
    let mut set = |key: &str, msg: &str| {
        e.insert(key.to_string(), msg.to_string());
    };
    let too_short = |p: &str| !p.is_empty() && p.chars().count() < PASSWORD_MIN_CHARS;
    let min_len_msg = format!(
        "A senha deve ter pelo menos {} caracteres.",
        PASSWORD_MIN_CHARS
    );

    if form.email.trim().is_empty() {
        set("email", "E-mail é obrigatório.");
    }
    if form.role == Role::Unknown {
        set("role", "Selecione o tipo de usuário.");
    }

    match mode {
        FormMode::Create => {
            if form.password.is_empty() {
                set("password", "Senha é obrigatória.");
            }
            if too_short(&form.password) {
                set("password", &min_len_msg);
            }
            if form.password2 != form.password {
                set("password2", "As senhas não coincidem.");
            }
        }
        FormMode::Edit(_) if !form.password.is_empty() || !form.password2.is_empty() => {
            if form.password.is_empty() {
                set("password", "Informe a nova senha.");
            }
            if form.password2.is_empty() {
                set("password2", "Confirme a nova senha.");
            }
            if too_short(&form.password) {
                set("password", &min_len_msg);
            }
            if form.password2 != form.password {
                set("password2", "As senhas não coincidem.");
            }
        }
        FormMode::Edit(_) => {}
    }

    if !is_valid_name(&form.first_name) {
        set("first_name", NAME_CHARS);
    }
    if !is_valid_name(&form.last_name) {
        set("last_name", NAME_CHARS);
    }

    if form.role == Role::Dpo {
        let len = digits_only(&form.phone_number).len();
        if len == 0 {
            set("phone_number", "Telefone é obrigatório para DPO.");
        } else if len != 10 && len != 11 {
            set("phone_number", "Telefone deve ter 10 ou 11 dígitos.");
        }
        if !is_date_br(&form.appointment_date) {
            set("appointment_date", "Informe a data no formato dd/mm/aaaa.");
        }
        let becomes_dpo = mode == FormMode::Create || original_role != Some(Role::Dpo);
        if dpo_exists && becomes_dpo {
            set("role", DPO_ALREADY_EXISTS);
        }
    }
    e
}

/// Body of `POST users/` or `PATCH users/<id>/`.
pub fn build_payload(form: &UserForm, mode: FormMode, original_role: Option<Role>) -> Value {
    let mut data = Map::new();
    data.insert("email".into(), json!(form.email.trim().to_lowercase()));
    data.insert("first_name".into(), json!(form.first_name.trim()));
    data.insert("last_name".into(), json!(form.last_name.trim()));
    data.insert("role".into(), json!(form.role.as_str()));

    if !form.phone_number.is_empty() {
        data.insert("phone_number".into(), json!(digits_only(&form.phone_number)));
    }

    if form.role == Role::Dpo {
        let iso = br_to_iso(&form.appointment_date);
        let validity = iso
            .as_deref()
            .and_then(|iso| add_years_to_iso(iso, APPOINTMENT_YEARS));
        data.insert("appointment_date".into(), json!(iso));
        data.insert("appointment_validity".into(), json!(validity));
    } else if matches!(mode, FormMode::Edit(_)) && original_role == Some(Role::Dpo) {
        data.insert("appointment_date".into(), Value::Null);
        data.insert("appointment_validity".into(), Value::Null);
    }

    match mode {
        FormMode::Create => {
            data.insert("password".into(), json!(form.password));
        }
        FormMode::Edit(_) if !form.password.is_empty() => {
            data.insert("password".into(), json!(form.password));
        }
        FormMode::Edit(_) => {}
    }
    Value::Object(data)
}

/// Field errors and flash text for a failed save.
pub fn save_failure(err: &HttpError) -> (FieldErrors, String) {
    match (err.status(), err.data()) {
        (Some(400), Some(data)) if data.is_object() => {
            let errors = field_errors(data);
            let text = errors
                .get("role")
                .filter(|msg| msg.to_lowercase().contains("dpo"))
                .cloned()
                .unwrap_or_else(|| FIX_HIGHLIGHTED.to_string());
            (errors, text)
        }
        (Some(403), _) => (FieldErrors::new(), FORBIDDEN.to_string()),
        _ => (FieldErrors::new(), SAVE_FAILED.to_string()),
    }
}

pub async fn fetch_users(
    client: &dyn HttpClient,
    mut params: Vec<(String, String)>,
    query: &str,
) -> Result<Page<UserRecord>, HttpError> {
    let query = query.trim();
    if !query.is_empty() {
        params.push(("q".to_string(), query.to_string()));
    }
    let response = client.get("users/", params).await?;
    Ok(Page::from_value(&response.data))
}

/// `GET users/dpo/`: 200 means a DPO exists, 404 means none; anything else
/// is treated as existing.
pub async fn dpo_exists(client: &dyn HttpClient) -> bool {
    match client.get("users/dpo/", Vec::new()).await {
        Ok(_) => true,
        Err(e) => e.status() != Some(404),
    }
}

pub async fn fetch_user(client: &dyn HttpClient, id: ItemId) -> Result<UserRecord, HttpError> {
    client.get(&format!("users/{}/", id), Vec::new()).await?.json()
}

/// Returns the response status.
pub async fn save_user(
    client: &dyn HttpClient,
    mode: FormMode,
    payload: Value,
) -> Result<u16, HttpError> {
    let response = match mode {
        FormMode::Create => client.post("users/", Some(payload)).await?,
        FormMode::Edit(id) => client.patch(&format!("users/{}/", id), payload).await?,
    };
    Ok(response.status)
}

#[derive(Debug)]
enum Event {
    Loaded(Result<Page<UserRecord>, HttpError>),
    DpoChecked(bool),
    EditLoaded(ItemId, Result<UserRecord, HttpError>),
    Saved(FormMode, Result<u16, HttpError>),
    Deleted(ItemId, Result<(), HttpError>),
}

pub struct UsersScreen {
    client: Arc<dyn HttpClient>,
    pub users: Vec<UserRecord>,
    pub pagination: Pagination,
    pub query: String,
    pub loading: bool,
    pub flash: FlashSlot,

    pub form: UserForm,
    pub mode: FormMode,
    original_role: Option<Role>,
    pub errors: FieldErrors,
    pub submitting: bool,

    pub dpo_exists: bool,
    pub checking_dpo: bool,
    pub confirm_delete: Option<ItemId>,

    inbox: Inbox<Event>,
}

impl UsersScreen {
    pub fn new(client: Arc<dyn HttpClient>, page_size: u32) -> Self {
        Self {
            client,
            users: Vec::new(),
            pagination: Pagination::new(page_size),
            query: String::new(),
            loading: false,
            flash: FlashSlot::new(),
            form: UserForm::default(),
            mode: FormMode::Create,
            original_role: None,
            errors: FieldErrors::new(),
            submitting: false,
            dpo_exists: false,
            checking_dpo: false,
            confirm_delete: None,
            inbox: Inbox::new(),
        }
    }

    pub fn open(&mut self, dispatcher: &Dispatcher) {
        self.load(dispatcher);
        self.check_dpo(dispatcher);
    }

    pub fn load(&mut self, dispatcher: &Dispatcher) {
        self.loading = true;
        let client = Arc::clone(&self.client);
        let params = self.pagination.params();
        let query = self.query.clone();
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Loaded(fetch_users(client.as_ref(), params, &query).await)
        });
    }

    /// New search term: back to page 1.
    pub fn search(&mut self, dispatcher: &Dispatcher) {
        self.pagination.page = 1;
        self.load(dispatcher);
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

    pub fn check_dpo(&mut self, dispatcher: &Dispatcher) {
        self.checking_dpo = true;
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::DpoChecked(dpo_exists(client.as_ref()).await)
        });
    }

    /// Editing a field clears its error.
    pub fn set_field(&mut self, field: UserField, value: &str) {
        self.form.set(field, value);
        self.errors.remove(field.key());
    }

    pub fn set_role(&mut self, role: Role) {
        self.form.role = role;
        self.errors.remove("role");
    }

    /// The DPO warning is shown as soon as `dpo` is picked while another DPO exists.
    pub fn shows_dpo_warning(&self) -> bool {
        self.form.role == Role::Dpo
            && self.dpo_exists
            && !self.checking_dpo
            && (self.mode == FormMode::Create || self.original_role != Some(Role::Dpo))
    }

    pub fn reset_form(&mut self, clear_flash: bool) {
        self.form = UserForm::default();
        self.mode = FormMode::Create;
        self.original_role = None;
        self.errors.clear();
        if clear_flash {
            self.flash.clear();
        }
    }

    pub fn start_edit(&mut self, dispatcher: &Dispatcher, id: ItemId) {
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::EditLoaded(id, fetch_user(client.as_ref(), id).await)
        });
    }

    pub fn submit(&mut self, dispatcher: &Dispatcher, now: Instant) {
        if self.submitting {
            return;
        }
        self.flash.clear();
        self.errors = validate(&self.form, self.mode, self.original_role, self.dpo_exists);
        if !self.errors.is_empty() {
            self.flash.show(FlashKind::Danger, FIX_HIGHLIGHTED, now);
            return;
        }

        self.submitting = true;
        let payload = build_payload(&self.form, self.mode, self.original_role);
        let mode = self.mode;
        let client = Arc::clone(&self.client);
        dispatcher.spawn_to(self.inbox.sender(), async move {
            Event::Saved(mode, save_user(client.as_ref(), mode, payload).await)
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
            let result = client.delete(&format!("users/{}/", id)).await.map(|_| ());
            Event::Deleted(id, result)
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
            Event::Loaded(Ok(page)) => {
                self.loading = false;
                self.pagination.absorb(&page);
                self.users = page.results;
                if self.pagination.clamp() {
                    self.load(dispatcher);
                }
            }
            Event::Loaded(Err(e)) => {
                self.loading = false;
                tracing::warn!("[USERS] Failed to load users: {}", e);
                self.users.clear();
                self.flash.show(FlashKind::Danger, LOAD_FAILED, now);
            }
            Event::DpoChecked(exists) => {
                self.checking_dpo = false;
                self.dpo_exists = exists;
            }
            Event::EditLoaded(id, Ok(record)) => {
                self.form = UserForm::from_record(&record);
                self.original_role = Some(record.role).filter(|r| *r != Role::Unknown);
                self.mode = FormMode::Edit(id);
                self.errors.clear();
                self.flash.clear();
            }
            Event::EditLoaded(id, Err(e)) => {
                tracing::warn!("[USERS] Failed to load user {}: {}", id, e);
                self.flash.show(FlashKind::Danger, EDIT_LOAD_FAILED, now);
            }
            Event::Saved(mode, Ok(status)) => {
                self.submitting = false;
                let text = match (mode, status) {
                    (FormMode::Create, 201) => "Usuário cadastrado com sucesso!",
                    (FormMode::Edit(_), 200 | 204) => "Dados alterados com sucesso!",
                    _ => {
                        tracing::warn!("[USERS] Unexpected save status {}", status);
                        return;
                    }
                };
                tracing::info!("[USERS] {}", text);
                self.flash.show_for(FlashKind::Success, text, SUCCESS_TTL, now);
                self.reset_form(false);
                self.load(dispatcher);
                self.check_dpo(dispatcher);
            }
            Event::Saved(_, Err(e)) => {
                self.submitting = false;
                tracing::warn!("[USERS] Save failed: {}", e);
                let (errors, text) = save_failure(&e);
                self.errors = errors;
                self.flash.show(FlashKind::Danger, text, now);
            }
            Event::Deleted(id, Ok(())) => {
                if self.mode == FormMode::Edit(id) {
                    self.reset_form(true);
                }
                self.flash.show_for(
                    FlashKind::Success,
                    "Usuário excluído com sucesso.",
                    DELETE_SUCCESS_TTL,
                    now,
                );
                self.load(dispatcher);
                self.check_dpo(dispatcher);
            }
            Event::Deleted(_, Err(e)) => {
                let text = e.detail().unwrap_or(DELETE_FAILED).to_string();
                self.flash.show(FlashKind::Danger, text, now);
            }
        }
    }
}
