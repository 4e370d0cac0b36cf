use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use kanri_core::models::{Epic, Subtask, Task, TaskEntry, TaskId, TaskKind, TaskStatus};

#[derive(Debug, Clone)]
pub struct ViewRow {
    pub id: TaskId,
    pub kind: TaskKind,
    pub name: String,
    pub status: TaskStatus,
    pub start: Option<DateTime<Utc>>,
    pub duration: i64,
    pub epic: Option<TaskId>,
    pub indent: bool,
}

impl ViewRow {
    pub fn task(task: &Task) -> Self {
        Self {
            id: task.id,
            kind: TaskKind::Task,
            name: task.name.clone(),
            status: task.status,
            start: task.start_time,
            duration: task.duration,
            epic: None,
            indent: false,
        }
    }

    pub fn epic(epic: &Epic) -> Self {
        Self {
            id: epic.base.id,
            kind: TaskKind::Epic,
            name: epic.base.name.clone(),
            status: epic.base.status,
            start: epic.base.start_time,
            duration: epic.base.duration,
            epic: None,
            indent: false,
        }
    }

    pub fn subtask(sub: &Subtask, indent: bool) -> Self {
        Self {
            id: sub.base.id,
            kind: TaskKind::Subtask,
            name: sub.base.name.clone(),
            status: sub.base.status,
            start: sub.base.start_time,
            duration: sub.base.duration,
            epic: Some(sub.epic_id),
            indent,
        }
    }

    pub fn entry(entry: &TaskEntry) -> Self {
        match entry {
            TaskEntry::Task(task) => Self::task(task),
            TaskEntry::Epic(epic) => Self::epic(epic),
            TaskEntry::Subtask(sub) => Self::subtask(sub, false),
        }
    }
}

fn format_start(start: Option<DateTime<Utc>>) -> String {
    start
        .map(|s| s.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn display_rows(rows: &[ViewRow]) {
    if rows.is_empty() {
        println!("Nothing to show.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Kind", "Name", "Status", "Start", "Minutes", "Epic"]);

    for view in rows {
        let mut row = Row::new();
        row.add_cell(Cell::new(view.id));
        row.add_cell(Cell::new(view.kind));

        let display_name = if view.indent {
            format!("  {}", view.name)
        } else {
            view.name.clone()
        };
        let name_cell = match view.status {
            TaskStatus::Done => Cell::new(display_name)
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey),
            TaskStatus::InProgress => Cell::new(display_name).fg(Color::Yellow),
            TaskStatus::New => Cell::new(display_name),
        };
        row.add_cell(name_cell);

        row.add_cell(Cell::new(view.status));
        row.add_cell(Cell::new(format_start(view.start)));
        row.add_cell(Cell::new(view.duration));
        row.add_cell(Cell::new(
            view.epic.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}
