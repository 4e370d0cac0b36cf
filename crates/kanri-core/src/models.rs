use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier for every board entity. Ids are assigned monotonically from 1
/// by the store and never reused.
pub type TaskId = i32;

/// Sentinel for "not assigned yet": the id of a freshly constructed entity,
/// and the epic reference of a subtask that has no epic.
pub const UNASSIGNED: TaskId = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    New,
    InProgress,
    Done,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::New => write!(f, "NEW"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(TaskStatus::New),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

/// Discriminant used where the three entity kinds travel together, e.g. in
/// the persisted row format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Task,
    Epic,
    Subtask,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task kind: {0}")]
pub struct ParseTaskKindError(String);

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Task => write!(f, "TASK"),
            TaskKind::Epic => write!(f, "EPIC"),
            TaskKind::Subtask => write!(f, "SUBTASK"),
        }
    }
}

impl FromStr for TaskKind {
    type Err = ParseTaskKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TASK" => Ok(TaskKind::Task),
            "EPIC" => Ok(TaskKind::Epic),
            "SUBTASK" => Ok(TaskKind::Subtask),
            _ => Err(ParseTaskKindError(s.to_string())),
        }
    }
}

/// The base record shared by every entity kind, and the whole record of a
/// plain task. `duration` is a planned length in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: i64,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: UNASSIGNED,
            name: String::new(),
            description: String::new(),
            status: TaskStatus::New,
            start_time: None,
            duration: 0,
        }
    }
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn scheduled(name: impl Into<String>, start_time: DateTime<Utc>, duration: i64) -> Self {
        Self {
            name: name.into(),
            start_time: Some(start_time),
            duration,
            ..Default::default()
        }
    }

    /// End of the planned window; `None` when the task is unscheduled.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.start_time.map(|start| start + Duration::minutes(self.duration))
    }
}

/// A composite task. Its `base.status`, `base.duration`, `base.start_time`
/// and `end_time` are derived from the children and owned by the aggregator;
/// direct updates to them are rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    pub base: Task,
    pub subtask_ids: Vec<TaskId>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Epic {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            base: Task {
                name: name.into(),
                description: description.into(),
                ..Default::default()
            },
            subtask_ids: Vec::new(),
            end_time: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.base.id
    }
}

/// A child task belonging to exactly one epic. `epic_id` is fixed when the
/// subtask is added and cannot be changed through updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub base: Task,
    pub epic_id: TaskId,
}

impl Subtask {
    pub fn new(name: impl Into<String>, epic_id: TaskId) -> Self {
        Self {
            base: Task::new(name),
            epic_id,
        }
    }

    pub fn scheduled(
        name: impl Into<String>,
        epic_id: TaskId,
        start_time: DateTime<Utc>,
        duration: i64,
    ) -> Self {
        Self {
            base: Task::scheduled(name, start_time, duration),
            epic_id,
        }
    }

    pub fn id(&self) -> TaskId {
        self.base.id
    }
}

/// A value snapshot of any board entity, dispatched by kind. Used wherever
/// the three kinds travel together: the view history and the priority
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEntry {
    Task(Task),
    Epic(Epic),
    Subtask(Subtask),
}

impl TaskEntry {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskEntry::Task(_) => TaskKind::Task,
            TaskEntry::Epic(_) => TaskKind::Epic,
            TaskEntry::Subtask(_) => TaskKind::Subtask,
        }
    }

    /// The shared base record of the snapshotted entity.
    pub fn base(&self) -> &Task {
        match self {
            TaskEntry::Task(task) => task,
            TaskEntry::Epic(epic) => &epic.base,
            TaskEntry::Subtask(sub) => &sub.base,
        }
    }

    pub fn id(&self) -> TaskId {
        self.base().id
    }
}
