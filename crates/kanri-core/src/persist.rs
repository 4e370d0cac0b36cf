//! File-backed wrapper around [`TaskStore`].
//!
//! The whole board is rewritten after every operation, views included (a
//! view changes the history, which is part of the saved state). The line
//! format is flat CSV: a header, one 8-column row per entity, a blank
//! separator line, then a single comma-joined line of history ids oldest
//! first. Fields are written unquoted, so commas inside names or
//! descriptions are not round-trippable.
//!
//! Loading replays rows through the store's trusted-replay mutators: grid
//! slots are occupied without re-validation and no conflict is re-derived.

use crate::error::CoreError;
use crate::models::{Epic, Subtask, Task, TaskEntry, TaskId, TaskKind, TaskStatus, UNASSIGNED};
use crate::store::TaskStore;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "id,kind,name,status,description,start,duration,epic";

/// A [`TaskStore`] that persists itself to a CSV file after every operation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    store: TaskStore,
}

impl FileStore {
    /// Opens the board at `path`, replaying its contents if the file exists
    /// and is non-empty. `process_start` anchors the scheduling grid exactly
    /// as in [`TaskStore::new`].
    pub fn open(
        path: impl Into<PathBuf>,
        process_start: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let path = path.into();
        let mut store = TaskStore::new(process_start);
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if !contents.trim().is_empty() {
                decode(&mut store, &contents)?;
            }
        }
        Ok(Self { path, store })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), CoreError> {
        fs::write(&self.path, encode(&self.store))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutating operations: delegate, then rewrite the file.
    // ------------------------------------------------------------------

    pub fn add_task(&mut self, task: Task) -> Result<TaskId, CoreError> {
        let id = self.store.add_task(task)?;
        self.save()?;
        Ok(id)
    }

    pub fn add_epic(&mut self, epic: Epic) -> Result<TaskId, CoreError> {
        let id = self.store.add_epic(epic);
        self.save()?;
        Ok(id)
    }

    pub fn add_subtask(&mut self, sub: Subtask) -> Result<TaskId, CoreError> {
        let id = self.store.add_subtask(sub)?;
        self.save()?;
        Ok(id)
    }

    pub fn update_task(&mut self, task: Task) -> Result<bool, CoreError> {
        let updated = self.store.update_task(task)?;
        self.save()?;
        Ok(updated)
    }

    pub fn update_epic(&mut self, epic: Epic) -> Result<bool, CoreError> {
        let updated = self.store.update_epic(epic);
        self.save()?;
        Ok(updated)
    }

    pub fn update_subtask(&mut self, sub: Subtask) -> Result<bool, CoreError> {
        let updated = self.store.update_subtask(sub)?;
        self.save()?;
        Ok(updated)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<bool, CoreError> {
        let deleted = self.store.delete_task(id);
        self.save()?;
        Ok(deleted)
    }

    pub fn delete_epic(&mut self, id: TaskId) -> Result<bool, CoreError> {
        let deleted = self.store.delete_epic(id);
        self.save()?;
        Ok(deleted)
    }

    pub fn delete_subtask(&mut self, id: TaskId) -> Result<bool, CoreError> {
        let deleted = self.store.delete_subtask(id);
        self.save()?;
        Ok(deleted)
    }

    pub fn clear_tasks(&mut self) -> Result<(), CoreError> {
        self.store.clear_tasks();
        self.save()
    }

    pub fn clear_epics(&mut self) -> Result<(), CoreError> {
        self.store.clear_epics();
        self.save()
    }

    pub fn clear_subtasks(&mut self) -> Result<(), CoreError> {
        self.store.clear_subtasks();
        self.save()
    }

    pub fn clear_epic_subtasks(&mut self, epic_id: TaskId) -> Result<bool, CoreError> {
        let cleared = self.store.clear_epic_subtasks(epic_id);
        self.save()?;
        Ok(cleared)
    }

    /// A view mutates history, so it persists like any other operation.
    pub fn view_task(&mut self, id: TaskId) -> Result<Option<Task>, CoreError> {
        let task = self.store.view_task(id);
        self.save()?;
        Ok(task)
    }

    pub fn view_epic(&mut self, id: TaskId) -> Result<Option<Epic>, CoreError> {
        let epic = self.store.view_epic(id);
        self.save()?;
        Ok(epic)
    }

    pub fn view_subtask(&mut self, id: TaskId) -> Result<Option<Subtask>, CoreError> {
        let sub = self.store.view_subtask(id);
        self.save()?;
        Ok(sub)
    }

    // ------------------------------------------------------------------
    // Side-effect-free reads pass straight through.
    // ------------------------------------------------------------------

    pub fn tasks(&self) -> Vec<Task> {
        self.store.tasks()
    }

    pub fn epics(&self) -> Vec<Epic> {
        self.store.epics()
    }

    pub fn subtasks(&self) -> Vec<Subtask> {
        self.store.subtasks()
    }

    pub fn subtasks_of(&self, epic_id: TaskId) -> Vec<Subtask> {
        self.store.subtasks_of(epic_id)
    }

    pub fn history(&self) -> Vec<TaskEntry> {
        self.store.history()
    }

    pub fn prioritized(&self) -> Vec<TaskEntry> {
        self.store.prioritized()
    }
}

// ----------------------------------------------------------------------
// Line codec
// ----------------------------------------------------------------------

fn format_start(start: Option<DateTime<Utc>>) -> String {
    start
        .map(|s| s.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn row(kind: TaskKind, base: &Task, epic_id: Option<TaskId>) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        base.id,
        kind,
        base.name,
        base.status,
        base.description,
        format_start(base.start_time),
        base.duration,
        epic_id.map(|id| id.to_string()).unwrap_or_default(),
    )
}

fn encode(store: &TaskStore) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    let mut tasks = store.tasks();
    tasks.sort_by_key(|t| t.id);
    for task in &tasks {
        out.push_str(&row(TaskKind::Task, task, None));
        out.push('\n');
    }

    let mut epics = store.epics();
    epics.sort_by_key(|e| e.base.id);
    for epic in &epics {
        out.push_str(&row(TaskKind::Epic, &epic.base, None));
        out.push('\n');
    }

    let mut subtasks = store.subtasks();
    subtasks.sort_by_key(|s| s.base.id);
    for sub in &subtasks {
        out.push_str(&row(TaskKind::Subtask, &sub.base, Some(sub.epic_id)));
        out.push('\n');
    }

    out.push('\n');
    let mut first = true;
    for entry in store.history() {
        if !first {
            out.push(',');
        }
        let _ = write!(out, "{}", entry.id());
        first = false;
    }
    out.push('\n');
    out
}

fn parse_start(field: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
    if field.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(field)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| CoreError::Corrupt(format!("bad timestamp '{field}': {e}")))
}

struct ParsedRow {
    kind: TaskKind,
    base: Task,
    epic_id: TaskId,
}

fn parse_row(line: &str) -> Result<ParsedRow, CoreError> {
    let fields: Vec<&str> = line.splitn(8, ',').collect();
    if fields.len() != 8 {
        return Err(CoreError::Corrupt(format!("bad row '{line}'")));
    }
    let id: TaskId = fields[0]
        .parse()
        .map_err(|_| CoreError::Corrupt(format!("bad id '{}'", fields[0])))?;
    let kind: TaskKind = fields[1]
        .parse()
        .map_err(|_| CoreError::Corrupt(format!("bad kind '{}'", fields[1])))?;
    let status: TaskStatus = fields[3]
        .parse()
        .map_err(|_| CoreError::Corrupt(format!("bad status '{}'", fields[3])))?;
    let duration: i64 = fields[6]
        .parse()
        .map_err(|_| CoreError::Corrupt(format!("bad duration '{}'", fields[6])))?;
    let epic_id: TaskId = if fields[7].trim().is_empty() {
        UNASSIGNED
    } else {
        fields[7]
            .trim()
            .parse()
            .map_err(|_| CoreError::Corrupt(format!("bad epic id '{}'", fields[7])))?
    };

    Ok(ParsedRow {
        kind,
        base: Task {
            id,
            name: fields[2].to_string(),
            description: fields[4].to_string(),
            status,
            start_time: parse_start(fields[5])?,
            duration,
        },
        epic_id,
    })
}

fn parse_history_line(line: &str) -> Vec<TaskId> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    let mut ids = Vec::new();
    for item in line.split(',') {
        match item.trim().parse::<TaskId>() {
            Ok(id) => ids.push(id),
            // A malformed history line loses the history, not the board.
            Err(_) => return Vec::new(),
        }
    }
    ids
}

fn decode(store: &mut TaskStore, contents: &str) -> Result<(), CoreError> {
    let mut rows = Vec::new();
    let mut history_ids = Vec::new();
    let mut in_rows = true;

    for (index, line) in contents.lines().enumerate() {
        if index == 0 {
            // Header line; tolerated verbatim or absent in hand-edited files.
            if line == HEADER {
                continue;
            }
        }
        if in_rows {
            if line.trim().is_empty() {
                in_rows = false;
                continue;
            }
            rows.push(parse_row(line)?);
        } else if !line.trim().is_empty() {
            history_ids = parse_history_line(line);
        }
    }

    // Two passes so every epic exists before its subtasks link to it,
    // whatever order the rows were written in.
    for parsed in &rows {
        match parsed.kind {
            TaskKind::Task => store.restore_task(parsed.base.clone()),
            TaskKind::Epic => store.restore_epic(Epic {
                base: parsed.base.clone(),
                subtask_ids: Vec::new(),
                end_time: None,
            }),
            TaskKind::Subtask => {}
        }
    }
    for parsed in rows {
        if parsed.kind == TaskKind::Subtask {
            store.restore_subtask(Subtask {
                base: parsed.base,
                epic_id: parsed.epic_id,
            });
        }
    }

    store.refresh_all_epics();
    for id in history_ids {
        store.restore_view(id);
    }
    Ok(())
}
