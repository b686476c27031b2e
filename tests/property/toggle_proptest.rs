//! Property-based tests for optimistic toggles

use std::time::Instant;

use lgpd_mobile::egui_app::flash::FlashSlot;
use lgpd_mobile::egui_app::optimistic::{ToggleController, ToggleFailure, ToggleOutcome};
use lgpd_mobile::shared::ChecklistItem;
use proptest::prelude::*;

fn rows_from(flags: &[bool]) -> Vec<ChecklistItem> {
    flags
        .iter()
        .enumerate()
        .map(|(i, done)| ChecklistItem {
            id: i as i64 + 1,
            activity: format!("Atividade {}", i + 1),
            description: String::new(),
            is_completed: *done,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_begin_flips_exactly_one_row(
        flags in prop::collection::vec(any::<bool>(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut rows = rows_from(&flags);
        let target = pick.index(flags.len());
        let id = rows[target].id;
        let current = rows[target].is_completed;

        let mut controller = ToggleController::new("checklists");
        let pending = controller.begin(&mut rows, id, current, true).unwrap();

        prop_assert_eq!(pending.value, !current);
        for (i, row) in rows.iter().enumerate() {
            if i == target {
                prop_assert_eq!(row.is_completed, !flags[i]);
            } else {
                prop_assert_eq!(row.is_completed, flags[i]);
            }
        }
    }

    #[test]
    fn test_failure_restores_the_snapshot(
        flags in prop::collection::vec(any::<bool>(), 1..20),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..5),
        denied in any::<bool>(),
    ) {
        let original = rows_from(&flags);
        let mut rows = original.clone();
        let mut controller = ToggleController::new("checklists");
        let mut flash = FlashSlot::new();

        let first = picks[0].index(flags.len());
        let (id, current) = (rows[first].id, rows[first].is_completed);
        let pending = controller.begin(&mut rows, id, current, true).unwrap();
        // later toggles on other rows land on top of the first one
        for pick in &picks[1..] {
            let i = pick.index(flags.len());
            let (id, current) = (rows[i].id, rows[i].is_completed);
            let _ = controller.begin(&mut rows, id, current, true);
        }

        let failure = if denied {
            ToggleFailure::AuthorizationDenied
        } else {
            ToggleFailure::NetworkOrServer
        };
        let now = Instant::now();
        let outcome = controller.settle(pending, Err(failure), &mut rows, &mut flash, now);

        prop_assert_eq!(outcome, ToggleOutcome::RolledBack(failure));
        prop_assert_eq!(rows, original);
        prop_assert_eq!(flash.visible(now).map(|f| f.kind), Some(failure.flash_kind()));
    }

    #[test]
    fn test_unauthorized_never_mutates(flags in prop::collection::vec(any::<bool>(), 1..20)) {
        let mut rows = rows_from(&flags);
        let mut controller = ToggleController::new("checklists");
        for id in 1..=flags.len() as i64 {
            prop_assert!(controller.begin(&mut rows, id, false, false).is_none());
        }
        prop_assert_eq!(rows, rows_from(&flags));
        prop_assert_eq!(controller.in_flight_count(), 0);
    }
}
