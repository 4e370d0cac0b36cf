use chrono::{DateTime, Duration, TimeZone, Utc};
use kanri_core::error::CoreError;
use kanri_core::grid::SLOT_MINUTES;
use kanri_core::models::{Epic, Subtask, Task, TaskStatus, UNASSIGNED};
use kanri_core::store::TaskStore;

fn process_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn store() -> TaskStore {
    TaskStore::new(process_start())
}

/// Start time `slots` slots after process start.
fn at(slots: i64) -> DateTime<Utc> {
    process_start() + Duration::minutes(slots * SLOT_MINUTES)
}

#[test]
fn ids_are_monotonic_across_kinds() {
    let mut store = store();
    let t = store.add_task(Task::new("a")).unwrap();
    let e = store.add_epic(Epic::new("b", ""));
    let s = store.add_subtask(Subtask::new("c", e)).unwrap();
    assert_eq!((t, e, s), (1, 2, 3));
}

#[test]
fn conflicting_add_consumes_no_id_and_mutates_nothing() {
    let mut store = store();
    store
        .add_task(Task::scheduled("first", at(0), 60))
        .unwrap();

    let err = store.add_task(Task::scheduled("second", at(1), 60));
    assert!(matches!(err, Err(CoreError::SlotConflict { .. })));
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.prioritized().len(), 1);

    // The id counter did not advance on the failed add.
    let next = store.add_task(Task::new("third")).unwrap();
    assert_eq!(next, 2);
}

#[test]
fn subtask_with_unknown_epic_returns_sentinel() {
    let mut store = store();
    let id = store.add_subtask(Subtask::new("orphan", 42)).unwrap();
    assert_eq!(id, UNASSIGNED);
    assert!(store.subtasks().is_empty());
    // No id consumed either.
    assert_eq!(store.add_task(Task::new("t")).unwrap(), 1);
}

#[test]
fn epic_status_follows_children() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("release", ""));
    let a = store.add_subtask(Subtask::new("a", epic_id)).unwrap();
    let b = store.add_subtask(Subtask::new("b", epic_id)).unwrap();
    let c = store.add_subtask(Subtask::new("c", epic_id)).unwrap();
    assert_eq!(store.view_epic(epic_id).unwrap().base.status, TaskStatus::New);

    // {NEW, DONE, DONE} classifies as IN_PROGRESS.
    for id in [b, c] {
        let mut sub = store.view_subtask(id).unwrap();
        sub.base.status = TaskStatus::Done;
        assert!(store.update_subtask(sub).unwrap());
    }
    assert_eq!(
        store.view_epic(epic_id).unwrap().base.status,
        TaskStatus::InProgress
    );

    let mut last = store.view_subtask(a).unwrap();
    last.base.status = TaskStatus::Done;
    store.update_subtask(last).unwrap();
    assert_eq!(store.view_epic(epic_id).unwrap().base.status, TaskStatus::Done);
}

#[test]
fn epic_duration_tracks_child_mutations() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", ""));
    let a = store
        .add_subtask(Subtask::scheduled("a", epic_id, at(0), 30))
        .unwrap();
    let b = store
        .add_subtask(Subtask::scheduled("b", epic_id, at(4), 45))
        .unwrap();
    assert_eq!(store.view_epic(epic_id).unwrap().base.duration, 75);

    let mut sub = store.view_subtask(a).unwrap();
    sub.base.duration = 15;
    store.update_subtask(sub).unwrap();
    assert_eq!(store.view_epic(epic_id).unwrap().base.duration, 60);

    store.delete_subtask(b);
    assert_eq!(store.view_epic(epic_id).unwrap().base.duration, 15);
}

#[test]
fn direct_edits_to_derived_epic_fields_are_rejected() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", "old"));
    store
        .add_subtask(Subtask::scheduled("s", epic_id, at(0), 30))
        .unwrap();

    let mut epic = store.view_epic(epic_id).unwrap();
    epic.base.status = TaskStatus::Done;
    assert!(!store.update_epic(epic));

    let mut epic = store.view_epic(epic_id).unwrap();
    epic.base.duration = 999;
    assert!(!store.update_epic(epic));

    let mut epic = store.view_epic(epic_id).unwrap();
    epic.base.name = "renamed".to_string();
    epic.base.description = "new".to_string();
    assert!(store.update_epic(epic));
    let stored = store.view_epic(epic_id).unwrap();
    assert_eq!(stored.base.name, "renamed");
    assert_eq!(stored.base.duration, 30);
}

#[test]
fn update_conflict_keeps_record_but_leaves_old_slots_released() {
    let mut store = store();
    let moving = store.add_task(Task::scheduled("moving", at(0), 30)).unwrap();
    store.add_task(Task::scheduled("blocker", at(10), 30)).unwrap();

    let mut attempt = store.view_task(moving).unwrap();
    attempt.start_time = Some(at(10));
    let err = store.update_task(attempt);
    assert!(matches!(err, Err(CoreError::SlotConflict { .. })));

    // The record kept its pre-update fields.
    let stored = store.view_task(moving).unwrap();
    assert_eq!(stored.start_time, Some(at(0)));

    // But the old window was released and is now claimable by someone else.
    store.add_task(Task::scheduled("claimer", at(0), 30)).unwrap();
}

#[test]
fn update_reschedules_within_the_grid() {
    let mut store = store();
    let id = store.add_task(Task::scheduled("t", at(0), 30)).unwrap();

    let mut task = store.view_task(id).unwrap();
    task.start_time = Some(at(8));
    assert!(store.update_task(task).unwrap());

    // The original window is free again, the new one is claimed.
    store.add_task(Task::scheduled("other", at(0), 30)).unwrap();
    assert!(store.add_task(Task::scheduled("clash", at(8), 15)).is_err());
}

#[test]
fn update_of_unknown_id_is_a_no_op() {
    let mut store = store();
    let mut ghost = Task::new("ghost");
    ghost.id = 9;
    assert!(!store.update_task(ghost).unwrap());

    let mut sub = Subtask::new("ghost", 1);
    sub.base.id = 9;
    assert!(!store.update_subtask(sub).unwrap());
}

#[test]
fn subtask_reparenting_is_rejected() {
    let mut store = store();
    let first = store.add_epic(Epic::new("first", ""));
    let second = store.add_epic(Epic::new("second", ""));
    let id = store.add_subtask(Subtask::new("s", first)).unwrap();

    let mut moved = store.view_subtask(id).unwrap();
    moved.epic_id = second;
    assert!(!store.update_subtask(moved).unwrap());
    assert_eq!(store.view_subtask(id).unwrap().epic_id, first);
}

#[test]
fn history_deduplicates_and_touches_to_tail() {
    let mut store = store();
    let a = store.add_task(Task::new("a")).unwrap();
    let b = store.add_task(Task::new("b")).unwrap();

    store.view_task(a);
    store.view_task(b);
    store.view_task(a);

    let ids: Vec<_> = store.history().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
fn missing_id_lookup_has_no_side_effects() {
    let mut store = store();
    assert!(store.view_task(1).is_none());
    assert!(store.view_epic(1).is_none());
    assert!(store.view_subtask(1).is_none());
    assert!(store.history().is_empty());
}

#[test]
fn views_return_defensive_copies() {
    let mut store = store();
    let id = store.add_task(Task::new("original")).unwrap();
    let mut copy = store.view_task(id).unwrap();
    copy.name = "mutated".to_string();
    assert_eq!(store.view_task(id).unwrap().name, "original");
}

#[test]
fn deleting_an_epic_cascades_everywhere() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", ""));
    let child = store
        .add_subtask(Subtask::scheduled("s", epic_id, at(0), 30))
        .unwrap();
    store.view_subtask(child);
    store.view_epic(epic_id);

    assert!(store.delete_epic(epic_id));
    assert!(store.subtasks().is_empty());
    assert!(store.prioritized().is_empty());
    assert!(store.history().is_empty());
    // The child's slots were freed.
    store.add_task(Task::scheduled("reclaim", at(0), 30)).unwrap();
}

#[test]
fn prioritized_orders_by_start_with_unscheduled_last() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", ""));
    let late = store.add_task(Task::scheduled("late", at(8), 30)).unwrap();
    let never = store.add_task(Task::new("never")).unwrap();
    let early = store
        .add_subtask(Subtask::scheduled("early", epic_id, at(0), 30))
        .unwrap();

    let order: Vec<_> = store.prioritized().iter().map(|e| e.id()).collect();
    assert_eq!(order, vec![early, late, never]);
}

#[test]
fn clear_subtasks_twice_is_idempotent() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", ""));
    store
        .add_subtask(Subtask::scheduled("s", epic_id, at(0), 30))
        .unwrap();

    for _ in 0..2 {
        store.clear_subtasks();
        let epic = store.view_epic(epic_id).unwrap();
        assert_eq!(epic.base.status, TaskStatus::New);
        assert_eq!(epic.base.duration, 0);
        assert_eq!(epic.base.start_time, None);
        assert_eq!(epic.end_time, None);
        assert!(store.subtasks().is_empty());
    }
}

#[test]
fn clear_epics_removes_children_too() {
    let mut store = store();
    let epic_id = store.add_epic(Epic::new("e", ""));
    store.add_subtask(Subtask::new("s", epic_id)).unwrap();
    store.view_epic(epic_id);

    store.clear_epics();
    assert!(store.epics().is_empty());
    assert!(store.subtasks().is_empty());
    assert!(store.history().is_empty());
}

#[test]
fn clear_epic_subtasks_targets_one_epic() {
    let mut store = store();
    let kept = store.add_epic(Epic::new("kept", ""));
    let cleared = store.add_epic(Epic::new("cleared", ""));
    store.add_subtask(Subtask::new("k", kept)).unwrap();
    store.add_subtask(Subtask::new("c1", cleared)).unwrap();
    store.add_subtask(Subtask::new("c2", cleared)).unwrap();

    assert!(store.clear_epic_subtasks(cleared));
    assert!(store.subtasks_of(cleared).is_empty());
    assert_eq!(store.subtasks_of(kept).len(), 1);
    assert!(!store.clear_epic_subtasks(404));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any set of pairwise distinct one-slot windows is accepted in full.
        #[test]
        fn disjoint_windows_all_reserve(slots in proptest::collection::hash_set(0u16..1000, 1..40)) {
            let mut store = store();
            for slot in &slots {
                let task = Task::scheduled("t", at(*slot as i64), SLOT_MINUTES);
                prop_assert!(store.add_task(task).is_ok());
            }
            prop_assert_eq!(store.tasks().len(), slots.len());
        }

        /// Re-adding into an occupied slot always fails and leaves the store
        /// unchanged.
        #[test]
        fn overlapping_window_always_conflicts(slot in 0u16..1000) {
            let mut store = store();
            store.add_task(Task::scheduled("first", at(slot as i64), SLOT_MINUTES)).unwrap();
            let before = store.tasks().len();
            let err = store.add_task(Task::scheduled("second", at(slot as i64), SLOT_MINUTES));
            prop_assert!(err.is_err());
            prop_assert_eq!(store.tasks().len(), before);
        }
    }
}
