//! User management screen: DPO uniqueness, edit and delete flows.

use std::time::Instant;

use lgpd_mobile::egui_app::http::Method;
use lgpd_mobile::egui_app::screens::users::{FormMode, UserField, DPO_ALREADY_EXISTS};
use lgpd_mobile::egui_app::screens::UsersScreen;
use lgpd_mobile::egui_app::FlashKind;
use lgpd_mobile::shared::Role;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_flash;
use crate::common::{page_of, Harness, WAIT};

fn current_dpo() -> serde_json::Value {
    json!({
        "id": 7,
        "email": "dpo@empresa.com",
        "first_name": "Carla",
        "last_name": "Dias",
        "phone_number": "11987654321",
        "role": "dpo",
        "appointment_date": "2024-03-15",
        "appointment_validity": "2026-03-15"
    })
}

/// Screen opened with the list and the DPO lookup both answered.
fn opened(h: &Harness) -> UsersScreen {
    let mut screen = UsersScreen::new(h.client.clone(), 10);
    screen.open(&h.dispatcher);
    assert!(screen.wait(&h.dispatcher, WAIT));
    assert!(screen.wait(&h.dispatcher, WAIT));
    assert!(!screen.loading);
    assert!(!screen.checking_dpo);
    screen
}

fn fill_new_dpo(screen: &mut UsersScreen) {
    screen.set_field(UserField::Email, "novo@empresa.com");
    screen.set_field(UserField::FirstName, "Bruno");
    screen.set_field(UserField::PhoneNumber, "(21) 3456-7890");
    screen.set_field(UserField::AppointmentDate, "01062025");
    screen.set_field(UserField::Password, "abc");
    screen.set_field(UserField::Password2, "abc");
    screen.set_role(Role::Dpo);
}

#[test]
fn test_second_dpo_is_blocked_before_any_request() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![current_dpo()]))
        .ok(Method::Get, "users/dpo/", 200, current_dpo());
    let mut screen = opened(&h);
    assert!(screen.dpo_exists);

    fill_new_dpo(&mut screen);
    assert!(screen.shows_dpo_warning());

    screen.submit(&h.dispatcher, Instant::now());
    assert_eq!(screen.errors["role"], DPO_ALREADY_EXISTS);
    assert!(!screen.submitting);
    assert_eq!(h.writes(), 0);
    assert_flash!(screen.flash, FlashKind::Danger);
}

#[test]
fn test_first_dpo_is_created_with_iso_dates() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![]))
        .fail(Method::Get, "users/dpo/", 404, json!({"detail": "Not found."}))
        .ok(Method::Post, "users/", 201, json!({"id": 8}));
    let mut screen = opened(&h);
    assert!(!screen.dpo_exists);

    fill_new_dpo(&mut screen);
    assert!(!screen.shows_dpo_warning());
    assert_eq!(screen.form.validity_preview().as_deref(), Some("01/06/2027"));

    screen.submit(&h.dispatcher, Instant::now());
    assert!(screen.wait(&h.dispatcher, WAIT));

    let body = h.client.requests_to(Method::Post, "users/")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["phone_number"], "2134567890");
    assert_eq!(body["appointment_date"], "2025-06-01");
    assert_eq!(body["appointment_validity"], "2027-06-01");
    assert_flash!(screen.flash, FlashKind::Success);
    assert_eq!(screen.mode, FormMode::Create);
}

#[test]
fn test_editing_current_dpo_is_allowed() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![current_dpo()]))
        .ok(Method::Get, "users/dpo/", 200, current_dpo())
        .ok(Method::Get, "users/7/", 200, current_dpo())
        .ok(Method::Patch, "users/7/", 200, current_dpo());
    let mut screen = opened(&h);

    screen.start_edit(&h.dispatcher, 7);
    assert!(screen.wait(&h.dispatcher, WAIT));
    assert_eq!(screen.mode, FormMode::Edit(7));
    assert_eq!(screen.form.appointment_date, "15/03/2024");
    assert_eq!(screen.form.phone_number, "11987654321");
    assert!(!screen.shows_dpo_warning());

    screen.set_field(UserField::LastName, "Dias Souza");
    screen.submit(&h.dispatcher, Instant::now());
    assert!(screen.wait(&h.dispatcher, WAIT));

    let patch = &h.client.requests_to(Method::Patch, "users/7/")[0];
    let body = patch.body.as_ref().unwrap();
    assert_eq!(body["last_name"], "Dias Souza");
    assert!(body.get("password").is_none());
    assert_eq!(
        screen.flash.visible(Instant::now()).unwrap().text,
        "Dados alterados com sucesso!"
    );
    assert_eq!(screen.mode, FormMode::Create);
}

#[test]
fn test_server_rejection_maps_field_errors() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![]))
        .fail(Method::Get, "users/dpo/", 404, json!({"detail": "Not found."}))
        .fail(
            Method::Post,
            "users/",
            400,
            json!({"email": ["Usuário com este email já existe."]}),
        );
    let mut screen = opened(&h);

    screen.set_field(UserField::Email, "dup@empresa.com");
    screen.set_field(UserField::Password, "abc");
    screen.set_field(UserField::Password2, "abc");
    screen.submit(&h.dispatcher, Instant::now());
    assert!(screen.wait(&h.dispatcher, WAIT));

    assert_eq!(screen.errors["email"], "Usuário com este email já existe.");
    assert_eq!(screen.form.email, "dup@empresa.com");
    assert_flash!(screen.flash, FlashKind::Danger);
}

#[test]
fn test_deleting_the_edited_user_resets_the_form() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![current_dpo()]))
        .ok(Method::Get, "users/dpo/", 200, current_dpo())
        .ok(Method::Get, "users/7/", 200, current_dpo())
        .ok(Method::Delete, "users/7/", 204, serde_json::Value::Null);
    let mut screen = opened(&h);
    screen.start_edit(&h.dispatcher, 7);
    assert!(screen.wait(&h.dispatcher, WAIT));

    screen.ask_delete(7);
    screen.confirm_delete(&h.dispatcher);
    assert_eq!(screen.confirm_delete, None);
    assert!(screen.wait(&h.dispatcher, WAIT));

    assert_eq!(screen.mode, FormMode::Create);
    assert_eq!(screen.form.email, "");
    assert_eq!(
        screen.flash.visible(Instant::now()).unwrap().text,
        "Usuário excluído com sucesso."
    );
    assert_eq!(h.client.requests_to(Method::Delete, "users/7/").len(), 1);
}

#[test]
fn test_cancelled_delete_sends_nothing() {
    let h = Harness::new();
    h.client
        .ok(Method::Get, "users/", 200, page_of(vec![current_dpo()]))
        .ok(Method::Get, "users/dpo/", 200, current_dpo());
    let mut screen = opened(&h);

    screen.ask_delete(7);
    screen.cancel_delete();
    screen.confirm_delete(&h.dispatcher);
    assert_eq!(h.writes(), 0);
}
