//! Derived state for epics. An epic's status, duration and time span belong
//! to this module alone; the store re-runs it after every change to an
//! epic's children and rejects direct edits of the derived fields.

use crate::models::{Epic, Subtask, TaskStatus};

/// Classifies an epic over its current children:
/// no children or all NEW gives NEW; all DONE gives DONE; at least one DONE
/// or IN_PROGRESS (but not all DONE) gives IN_PROGRESS.
pub fn derived_status(children: &[&Subtask]) -> TaskStatus {
    if children.is_empty() {
        return TaskStatus::New;
    }
    let done = children
        .iter()
        .filter(|sub| sub.base.status == TaskStatus::Done)
        .count();
    let in_progress = children
        .iter()
        .filter(|sub| sub.base.status == TaskStatus::InProgress)
        .count();
    if done == children.len() {
        TaskStatus::Done
    } else if done >= 1 || in_progress >= 1 {
        TaskStatus::InProgress
    } else {
        TaskStatus::New
    }
}

/// Recomputes every derived field of `epic` from `children`.
///
/// Duration sums every child regardless of status, while the start/end span
/// only considers children that are not DONE. The two rules are evaluated
/// independently: an epic whose children are all DONE keeps its summed
/// duration while the span collapses to `None`.
pub fn refresh(epic: &mut Epic, children: &[&Subtask]) {
    epic.base.status = derived_status(children);
    epic.base.duration = children.iter().map(|sub| sub.base.duration).sum();

    let open = || {
        children
            .iter()
            .filter(|sub| sub.base.status != TaskStatus::Done)
    };
    epic.base.start_time = open().filter_map(|sub| sub.base.start_time).min();
    epic.end_time = open().filter_map(|sub| sub.base.end_time()).max();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Epic;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn child(status: TaskStatus) -> Subtask {
        let mut sub = Subtask::new("s", 1);
        sub.base.status = status;
        sub
    }

    #[rstest]
    #[case(&[], TaskStatus::New)]
    #[case(&[TaskStatus::New, TaskStatus::New], TaskStatus::New)]
    #[case(&[TaskStatus::Done, TaskStatus::Done], TaskStatus::Done)]
    #[case(&[TaskStatus::New, TaskStatus::Done, TaskStatus::Done], TaskStatus::InProgress)]
    #[case(&[TaskStatus::InProgress, TaskStatus::New], TaskStatus::InProgress)]
    #[case(&[TaskStatus::Done], TaskStatus::Done)]
    fn status_classification(#[case] statuses: &[TaskStatus], #[case] expected: TaskStatus) {
        let children: Vec<Subtask> = statuses.iter().map(|s| child(*s)).collect();
        let refs: Vec<&Subtask> = children.iter().collect();
        assert_eq!(derived_status(&refs), expected);
    }

    #[test]
    fn duration_sums_all_children_while_span_skips_done_ones() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        let mut done = child(TaskStatus::Done);
        done.base.start_time = Some(start);
        done.base.duration = 120;

        let mut open = child(TaskStatus::New);
        open.base.start_time = Some(start + Duration::hours(3));
        open.base.duration = 30;

        let mut epic = Epic::new("e", "");
        refresh(&mut epic, &[&done, &open]);

        assert_eq!(epic.base.duration, 150);
        assert_eq!(epic.base.start_time, open.base.start_time);
        assert_eq!(epic.end_time, open.base.end_time());
    }

    #[test]
    fn all_done_children_null_the_span_but_keep_the_duration() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut sub = child(TaskStatus::Done);
        sub.base.start_time = Some(start);
        sub.base.duration = 60;

        let mut epic = Epic::new("e", "");
        refresh(&mut epic, &[&sub]);

        assert_eq!(epic.base.status, TaskStatus::Done);
        assert_eq!(epic.base.duration, 60);
        assert_eq!(epic.base.start_time, None);
        assert_eq!(epic.end_time, None);
    }

    #[test]
    fn no_children_resets_everything() {
        let mut epic = Epic::new("e", "");
        epic.base.duration = 45;
        epic.base.status = TaskStatus::InProgress;
        refresh(&mut epic, &[]);
        assert_eq!(epic.base.status, TaskStatus::New);
        assert_eq!(epic.base.duration, 0);
        assert_eq!(epic.base.start_time, None);
        assert_eq!(epic.end_time, None);
    }
}
