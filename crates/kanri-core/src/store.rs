use crate::aggregate;
use crate::error::CoreError;
use crate::grid::SchedulingGrid;
use crate::history::HistoryTracker;
use crate::models::{Epic, Subtask, Task, TaskEntry, TaskId, UNASSIGNED};
use crate::priority::PriorityIndex;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Aggregate root for the whole board.
///
/// Every external call enters here. A mutation updates entity storage, the
/// [`SchedulingGrid`], the [`PriorityIndex`] and the [`HistoryTracker`] as
/// one unit; callers embedding the store in a concurrent host must serialize
/// access around the whole struct, since partial application across the four
/// structures is a correctness bug.
///
/// Failed adds and updates leave the store unchanged, with one deliberate
/// exception on the update path documented at [`TaskStore::update_task`].
#[derive(Debug)]
pub struct TaskStore {
    last_id: TaskId,
    tasks: HashMap<TaskId, Task>,
    epics: HashMap<TaskId, Epic>,
    subtasks: HashMap<TaskId, Subtask>,
    grid: SchedulingGrid,
    priority: PriorityIndex,
    history: HistoryTracker,
}

impl TaskStore {
    /// `process_start` anchors the scheduling grid: reservations are tracked
    /// for one year from this instant.
    pub fn new(process_start: DateTime<Utc>) -> Self {
        Self {
            last_id: 0,
            tasks: HashMap::new(),
            epics: HashMap::new(),
            subtasks: HashMap::new(),
            grid: SchedulingGrid::new(process_start),
            priority: PriorityIndex::default(),
            history: HistoryTracker::default(),
        }
    }

    fn next_id(&mut self) -> TaskId {
        self.last_id += 1;
        self.last_id
    }

    // ------------------------------------------------------------------
    // Adds
    // ------------------------------------------------------------------

    /// Inserts a plain task, reserving its time window first. On a schedule
    /// conflict nothing is mutated and no id is consumed.
    pub fn add_task(&mut self, mut task: Task) -> Result<TaskId, CoreError> {
        self.grid.reserve(task.start_time, task.duration)?;
        let id = self.next_id();
        task.id = id;
        self.priority.insert(id, task.start_time);
        debug!(id, name = %task.name, "task added");
        self.tasks.insert(id, task);
        Ok(id)
    }

    /// Inserts an epic. Epics never reserve slots, so this cannot conflict.
    pub fn add_epic(&mut self, mut epic: Epic) -> TaskId {
        let id = self.next_id();
        epic.base.id = id;
        debug!(id, name = %epic.base.name, "epic added");
        self.epics.insert(id, epic);
        id
    }

    /// Inserts a subtask under its epic and refreshes the epic's derived
    /// fields. Returns the sentinel [`UNASSIGNED`] when the referenced epic
    /// does not exist (no error is raised and no id is consumed); a schedule
    /// conflict aborts with nothing mutated.
    pub fn add_subtask(&mut self, mut sub: Subtask) -> Result<TaskId, CoreError> {
        if !self.epics.contains_key(&sub.epic_id) {
            return Ok(UNASSIGNED);
        }
        self.grid.reserve(sub.base.start_time, sub.base.duration)?;
        let id = self.next_id();
        sub.base.id = id;
        let epic_id = sub.epic_id;
        self.priority.insert(id, sub.base.start_time);
        debug!(id, epic_id, name = %sub.base.name, "subtask added");
        self.subtasks.insert(id, sub);
        if let Some(epic) = self.epics.get_mut(&epic_id) {
            epic.subtask_ids.push(id);
        }
        self.refresh_epic(epic_id);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    /// Replaces a stored task. Returns `Ok(false)` for an unknown id.
    ///
    /// When the time window changed, the old slots are released before the
    /// new window is reserved. If that reservation conflicts, the record
    /// keeps its previous fields but the old slots stay free; the caller
    /// sees the conflict and decides whether to resubmit.
    pub fn update_task(&mut self, task: Task) -> Result<bool, CoreError> {
        let (old_start, old_duration) = match self.tasks.get(&task.id) {
            Some(existing) => (existing.start_time, existing.duration),
            None => return Ok(false),
        };
        self.reschedule(task.id, old_start, old_duration, task.start_time, task.duration)?;
        self.priority.remove(task.id, old_start);
        self.priority.insert(task.id, task.start_time);
        self.tasks.insert(task.id, task);
        Ok(true)
    }

    /// Replaces a stored subtask and refreshes its epic. Returns `Ok(false)`
    /// for an unknown id or an attempt to change the epic assignment.
    /// Conflict handling matches [`TaskStore::update_task`].
    pub fn update_subtask(&mut self, sub: Subtask) -> Result<bool, CoreError> {
        let (old_start, old_duration, epic_id) = match self.subtasks.get(&sub.base.id) {
            Some(existing) => (
                existing.base.start_time,
                existing.base.duration,
                existing.epic_id,
            ),
            None => return Ok(false),
        };
        if sub.epic_id != epic_id {
            return Ok(false);
        }
        self.reschedule(
            sub.base.id,
            old_start,
            old_duration,
            sub.base.start_time,
            sub.base.duration,
        )?;
        self.priority.remove(sub.base.id, old_start);
        self.priority.insert(sub.base.id, sub.base.start_time);
        self.subtasks.insert(sub.base.id, sub);
        self.refresh_epic(epic_id);
        Ok(true)
    }

    /// Updates an epic's name and description. The status, duration, start
    /// and end fields are owned by the aggregator: if any of them differs
    /// from the stored value the whole update is rejected with `false`.
    pub fn update_epic(&mut self, epic: Epic) -> bool {
        let Some(stored) = self.epics.get_mut(&epic.base.id) else {
            return false;
        };
        if epic.base.status != stored.base.status
            || epic.base.duration != stored.base.duration
            || epic.base.start_time != stored.base.start_time
            || epic.end_time != stored.end_time
        {
            return false;
        }
        stored.base.name = epic.base.name;
        stored.base.description = epic.base.description;
        true
    }

    /// Frees the old window and claims the new one when the window changed.
    fn reschedule(
        &mut self,
        id: TaskId,
        old_start: Option<DateTime<Utc>>,
        old_duration: i64,
        new_start: Option<DateTime<Utc>>,
        new_duration: i64,
    ) -> Result<(), CoreError> {
        if (new_start, new_duration) == (old_start, old_duration) {
            return Ok(());
        }
        self.grid.release(old_start, old_duration);
        if let Err(conflict) = self.grid.reserve(new_start, new_duration) {
            warn!(id, "schedule conflict on update; previous window stays released");
            return Err(conflict);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Deletes and clears
    // ------------------------------------------------------------------

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.remove(&id) else {
            return false;
        };
        self.grid.release(task.start_time, task.duration);
        self.priority.remove(id, task.start_time);
        self.history.remove(id);
        debug!(id, "task deleted");
        true
    }

    pub fn delete_subtask(&mut self, id: TaskId) -> bool {
        let Some(sub) = self.subtasks.remove(&id) else {
            return false;
        };
        self.grid.release(sub.base.start_time, sub.base.duration);
        self.priority.remove(id, sub.base.start_time);
        self.history.remove(id);
        if let Some(epic) = self.epics.get_mut(&sub.epic_id) {
            epic.subtask_ids.retain(|child| *child != id);
        }
        self.refresh_epic(sub.epic_id);
        debug!(id, epic_id = sub.epic_id, "subtask deleted");
        true
    }

    /// Deletes an epic and cascades to every child subtask: each child is
    /// removed from storage, the priority index, the grid and the history,
    /// then the epic itself follows.
    pub fn delete_epic(&mut self, id: TaskId) -> bool {
        let Some(epic) = self.epics.remove(&id) else {
            return false;
        };
        for child in &epic.subtask_ids {
            if let Some(sub) = self.subtasks.remove(child) {
                self.grid.release(sub.base.start_time, sub.base.duration);
                self.priority.remove(*child, sub.base.start_time);
                self.history.remove(*child);
            }
        }
        self.history.remove(id);
        debug!(id, children = epic.subtask_ids.len(), "epic deleted");
        true
    }

    pub fn clear_tasks(&mut self) {
        let Self {
            tasks,
            grid,
            priority,
            history,
            ..
        } = self;
        for (id, task) in tasks.drain() {
            grid.release(task.start_time, task.duration);
            priority.remove(id, task.start_time);
            history.remove(id);
        }
        debug!("tasks cleared");
    }

    /// Removes every subtask and refreshes every epic, which leaves all
    /// epics at status NEW, duration 0 and a null span. Calling it again is
    /// a no-op.
    pub fn clear_subtasks(&mut self) {
        self.drain_all_subtasks();
        let epic_ids: Vec<TaskId> = self.epics.keys().copied().collect();
        for id in epic_ids {
            if let Some(epic) = self.epics.get_mut(&id) {
                epic.subtask_ids.clear();
            }
            self.refresh_epic(id);
        }
        debug!("subtasks cleared");
    }

    /// Removes every epic, cascading to every subtask first.
    pub fn clear_epics(&mut self) {
        self.drain_all_subtasks();
        let Self { epics, history, .. } = self;
        for (id, _) in epics.drain() {
            history.remove(id);
        }
        debug!("epics cleared");
    }

    /// Removes the children of one epic and refreshes its derived fields.
    /// Returns `false` when the epic is unknown.
    pub fn clear_epic_subtasks(&mut self, epic_id: TaskId) -> bool {
        let Some(epic) = self.epics.get_mut(&epic_id) else {
            return false;
        };
        let children = std::mem::take(&mut epic.subtask_ids);
        for id in children {
            if let Some(sub) = self.subtasks.remove(&id) {
                self.grid.release(sub.base.start_time, sub.base.duration);
                self.priority.remove(id, sub.base.start_time);
                self.history.remove(id);
            }
        }
        self.refresh_epic(epic_id);
        true
    }

    fn drain_all_subtasks(&mut self) {
        let Self {
            subtasks,
            grid,
            priority,
            history,
            ..
        } = self;
        for (id, sub) in subtasks.drain() {
            grid.release(sub.base.start_time, sub.base.duration);
            priority.remove(id, sub.base.start_time);
            history.remove(id);
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Returns a value copy of the task and records the view in history.
    /// Mutating the returned value never affects stored state until it is
    /// resubmitted through an update.
    pub fn view_task(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.get(&id)?.clone();
        self.history.record(TaskEntry::Task(task.clone()));
        Some(task)
    }

    /// See [`TaskStore::view_task`].
    pub fn view_epic(&mut self, id: TaskId) -> Option<Epic> {
        let epic = self.epics.get(&id)?.clone();
        self.history.record(TaskEntry::Epic(epic.clone()));
        Some(epic)
    }

    /// See [`TaskStore::view_task`].
    pub fn view_subtask(&mut self, id: TaskId) -> Option<Subtask> {
        let sub = self.subtasks.get(&id)?.clone();
        self.history.record(TaskEntry::Subtask(sub.clone()));
        Some(sub)
    }

    /// All plain tasks, in no particular order. Does not record views.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn epics(&self) -> Vec<Epic> {
        self.epics.values().cloned().collect()
    }

    pub fn subtasks(&self) -> Vec<Subtask> {
        self.subtasks.values().cloned().collect()
    }

    /// The children of one epic in ownership order; empty for an unknown id.
    pub fn subtasks_of(&self, epic_id: TaskId) -> Vec<Subtask> {
        let Some(epic) = self.epics.get(&epic_id) else {
            return Vec::new();
        };
        epic.subtask_ids
            .iter()
            .filter_map(|id| self.subtasks.get(id))
            .cloned()
            .collect()
    }

    /// View history, oldest first.
    pub fn history(&self) -> Vec<TaskEntry> {
        self.history.entries()
    }

    /// All schedulable items ordered by start time, unscheduled items last.
    pub fn prioritized(&self) -> Vec<TaskEntry> {
        self.priority
            .ids()
            .filter_map(|id| {
                self.tasks
                    .get(&id)
                    .cloned()
                    .map(TaskEntry::Task)
                    .or_else(|| self.subtasks.get(&id).cloned().map(TaskEntry::Subtask))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Trusted replay
    // ------------------------------------------------------------------
    //
    // The persistence layer replays saved state through these mutators.
    // Replay trusts previously validated data: grid slots are occupied
    // without collision checks and no conflict is re-derived.

    pub(crate) fn restore_task(&mut self, task: Task) {
        self.last_id = self.last_id.max(task.id);
        self.grid.occupy(task.start_time, task.duration);
        self.priority.insert(task.id, task.start_time);
        self.tasks.insert(task.id, task);
    }

    /// The child list is rebuilt by the subtask rows that follow, and the
    /// derived fields by [`TaskStore::refresh_all_epics`] afterwards.
    pub(crate) fn restore_epic(&mut self, mut epic: Epic) {
        self.last_id = self.last_id.max(epic.base.id);
        epic.subtask_ids.clear();
        self.epics.insert(epic.base.id, epic);
    }

    pub(crate) fn restore_subtask(&mut self, sub: Subtask) {
        self.last_id = self.last_id.max(sub.base.id);
        self.grid.occupy(sub.base.start_time, sub.base.duration);
        self.priority.insert(sub.base.id, sub.base.start_time);
        if let Some(epic) = self.epics.get_mut(&sub.epic_id) {
            epic.subtask_ids.push(sub.base.id);
        }
        self.subtasks.insert(sub.base.id, sub);
    }

    pub(crate) fn refresh_all_epics(&mut self) {
        let epic_ids: Vec<TaskId> = self.epics.keys().copied().collect();
        for id in epic_ids {
            self.refresh_epic(id);
        }
    }

    /// Re-records a historical view of `id`, if the entity still exists.
    pub(crate) fn restore_view(&mut self, id: TaskId) {
        let entry = if let Some(task) = self.tasks.get(&id) {
            Some(TaskEntry::Task(task.clone()))
        } else if let Some(epic) = self.epics.get(&id) {
            Some(TaskEntry::Epic(epic.clone()))
        } else {
            self.subtasks.get(&id).cloned().map(TaskEntry::Subtask)
        };
        if let Some(entry) = entry {
            self.history.record(entry);
        }
    }

    // ------------------------------------------------------------------

    fn refresh_epic(&mut self, epic_id: TaskId) {
        let Self {
            epics, subtasks, ..
        } = self;
        let Some(epic) = epics.get_mut(&epic_id) else {
            return;
        };
        let children: Vec<&Subtask> = epic
            .subtask_ids
            .iter()
            .filter_map(|id| subtasks.get(id))
            .collect();
        aggregate::refresh(epic, &children);
    }
}
