//! Checklist completion toggles end to end through the screen
//!
//! Every scenario starts from a loaded page and drives the screen exactly
//! like the view does: `toggle`, then let the dispatcher deliver the result.

use std::time::{Duration, Instant};

use lgpd_mobile::egui_app::http::Method;
use lgpd_mobile::egui_app::optimistic::{
    ToggleController, PERMISSION_DENIED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
use lgpd_mobile::egui_app::screens::checklist::COLLECTION;
use lgpd_mobile::egui_app::FlashKind;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_flash;
use crate::common::{checklist_row, Harness, WAIT};

fn completed(screen: &lgpd_mobile::egui_app::screens::ChecklistScreen) -> Vec<bool> {
    screen.rows.iter().map(|r| r.is_completed).collect()
}

#[test]
fn test_scenario_a_commit_on_success() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    h.client.ok(Method::Patch, "checklists/1/", 200, json!({"id": 1, "is_completed": true}));

    screen.toggle(&h.dispatcher, 1, false, true);
    assert_eq!(completed(&screen), vec![true]);

    assert!(screen.wait(&h.dispatcher, WAIT));
    assert_eq!(completed(&screen), vec![true]);
    assert!(screen.flash.visible(Instant::now()).is_none());
    assert_eq!(screen.toggles_in_flight(), 0);
}

#[test]
fn test_scenario_b_forbidden_rolls_back_with_warning() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    h.client.fail(Method::Patch, "checklists/1/", 403, json!({"detail": "Sem permissão."}));

    screen.toggle(&h.dispatcher, 1, false, true);
    assert_eq!(completed(&screen), vec![true]);

    assert!(screen.wait(&h.dispatcher, WAIT));
    assert_eq!(completed(&screen), vec![false]);
    assert_flash!(screen.flash, FlashKind::Warning);
    let text = &screen.flash.visible(Instant::now()).unwrap().text;
    crate::assert_contains!(text, "permissão");
    assert_eq!(text, PERMISSION_DENIED_MESSAGE);
}

#[test]
fn test_scenario_c_server_error_rolls_back_with_danger() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    h.client.fail(Method::Patch, "checklists/1/", 500, json!("Internal Server Error"));

    screen.toggle(&h.dispatcher, 1, false, true);
    assert!(screen.wait(&h.dispatcher, WAIT));

    assert_eq!(completed(&screen), vec![false]);
    assert_flash!(screen.flash, FlashKind::Danger);
    assert_eq!(
        screen.flash.visible(Instant::now()).unwrap().text,
        UPDATE_FAILED_MESSAGE
    );
}

#[test]
fn test_scenario_d_no_permission_is_inert() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    let requests_before = h.client.request_count();

    screen.toggle(&h.dispatcher, 1, false, false);

    assert_eq!(completed(&screen), vec![false]);
    assert_eq!(h.client.request_count(), requests_before);
    assert_eq!(screen.toggles_in_flight(), 0);
    assert!(screen.flash.visible(Instant::now()).is_none());
    assert!(!screen.wait(&h.dispatcher, Duration::from_millis(100)));
}

#[test]
fn test_failure_message_clears_after_three_seconds() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    h.client.offline(Method::Patch, "checklists/1/");

    screen.toggle(&h.dispatcher, 1, false, true);
    assert!(screen.wait(&h.dispatcher, WAIT));

    let now = Instant::now();
    assert!(screen.flash.visible(now + Duration::from_millis(2900)).is_some());
    assert!(screen.flash.visible(now + Duration::from_millis(3001)).is_none());
}

#[test]
fn test_unknown_item_sends_nothing() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);

    screen.toggle(&h.dispatcher, 99, false, true);
    assert_eq!(h.writes(), 0);
    assert_eq!(completed(&screen), vec![false]);
}

#[test]
fn test_failed_toggle_discards_concurrent_change_on_other_item() {
    let h = Harness::with_latency(Duration::from_millis(30));
    let mut screen = h.checklist(vec![
        checklist_row(1, "Mapear dados", false),
        checklist_row(2, "Nomear DPO", false),
    ]);
    h.client
        .fail(Method::Patch, "checklists/1/", 500, json!(null))
        .ok(Method::Patch, "checklists/2/", 200, json!({"id": 2}));

    screen.toggle(&h.dispatcher, 1, false, true);
    screen.toggle(&h.dispatcher, 2, false, true);
    assert_eq!(completed(&screen), vec![true, true]);
    assert_eq!(screen.toggles_in_flight(), 2);

    assert!(screen.wait(&h.dispatcher, WAIT));
    assert!(screen.wait(&h.dispatcher, WAIT));

    // the rollback restores the snapshot taken before either toggle
    assert_eq!(completed(&screen), vec![false, false]);
    assert_eq!(h.writes(), 2);
}

#[test]
fn test_same_item_toggles_are_unguarded_by_default() {
    let h = Harness::with_latency(Duration::from_millis(30));
    let mut screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    h.client.ok(Method::Patch, "checklists/1/", 200, json!({"id": 1}));

    screen.toggle(&h.dispatcher, 1, false, true);
    screen.toggle(&h.dispatcher, 1, true, true);
    assert_eq!(completed(&screen), vec![false]);

    assert!(screen.wait(&h.dispatcher, WAIT));
    assert!(screen.wait(&h.dispatcher, WAIT));

    let mut bodies: Vec<bool> = h
        .client
        .requests_to(Method::Patch, "checklists/1/")
        .iter()
        .filter_map(|r| r.body.as_ref()?.get("is_completed")?.as_bool())
        .collect();
    bodies.sort();
    assert_eq!(bodies, vec![false, true]);
    assert_eq!(completed(&screen), vec![false]);
}

#[test]
fn test_serialized_controller_rejects_second_toggle_on_same_item() {
    let h = Harness::with_latency(Duration::from_millis(30));
    let screen = h.checklist(vec![checklist_row(1, "Mapear dados", false)]);
    let mut screen =
        screen.with_toggle_controller(ToggleController::new(COLLECTION).serialize_per_item(true));
    h.client.ok(Method::Patch, "checklists/1/", 200, json!({"id": 1}));

    screen.toggle(&h.dispatcher, 1, false, true);
    screen.toggle(&h.dispatcher, 1, true, true);
    assert_eq!(completed(&screen), vec![true]);
    assert_eq!(screen.toggles_in_flight(), 1);

    assert!(screen.wait(&h.dispatcher, WAIT));
    assert_eq!(h.client.requests_to(Method::Patch, "checklists/1/").len(), 1);
    assert_eq!(completed(&screen), vec![true]);

    screen.toggle(&h.dispatcher, 1, true, true);
    assert_eq!(completed(&screen), vec![false]);
}

#[test]
fn test_created_items_start_incomplete() {
    let h = Harness::new();
    let mut screen = h.checklist(vec![]);
    h.client.ok(Method::Post, "checklists/", 201, json!({"id": 5, "is_completed": false}));

    screen.open_create(true);
    screen.form.activity = "Revisar contratos".into();
    screen.form.description = "Cláusulas de tratamento".into();
    screen.save(&h.dispatcher, true);
    assert!(screen.wait(&h.dispatcher, WAIT));

    let post = &h.client.requests_to(Method::Post, "checklists/")[0];
    assert_eq!(post.body.as_ref().unwrap()["is_completed"], json!(false));
}
