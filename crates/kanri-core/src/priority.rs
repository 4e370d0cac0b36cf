use crate::models::TaskId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Ordering key for one indexed item. Variant order makes every dated item
/// sort before every unscheduled one; the id tiebreak keeps distinct items
/// with equal start times from colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum StartKey {
    At(DateTime<Utc>),
    Unscheduled,
}

fn key(start: Option<DateTime<Utc>>) -> StartKey {
    start.map(StartKey::At).unwrap_or(StartKey::Unscheduled)
}

/// Ordered view over all schedulable items (tasks and subtasks; epics are
/// excluded) by start time ascending. Exists so "what is scheduled next"
/// does not depend on storage iteration order.
#[derive(Debug, Default)]
pub struct PriorityIndex {
    entries: BTreeSet<(StartKey, TaskId)>,
}

impl PriorityIndex {
    pub fn insert(&mut self, id: TaskId, start: Option<DateTime<Utc>>) {
        self.entries.insert((key(start), id));
    }

    /// Removes by identity: `start` must be the start time the item was
    /// indexed under.
    pub fn remove(&mut self, id: TaskId, start: Option<DateTime<Utc>>) {
        self.entries.remove(&(key(start), id));
    }

    /// Ids in schedule order, unscheduled items last.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.entries.iter().map(|(_, id)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
