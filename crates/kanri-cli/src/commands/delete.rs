use anyhow::{bail, Result};
use kanri_core::models::{TaskId, TaskKind};
use kanri_core::persist::FileStore;

/// Resolves an id to its kind and name without touching the view history.
pub fn find_entry(store: &FileStore, id: TaskId) -> Option<(TaskKind, String)> {
    if let Some(task) = store.tasks().into_iter().find(|t| t.id == id) {
        return Some((TaskKind::Task, task.name));
    }
    if let Some(epic) = store.epics().into_iter().find(|e| e.id() == id) {
        return Some((TaskKind::Epic, epic.base.name));
    }
    if let Some(sub) = store.subtasks().into_iter().find(|s| s.id() == id) {
        return Some((TaskKind::Subtask, sub.base.name));
    }
    None
}

pub fn delete_entry(store: &mut FileStore, kind: TaskKind, id: TaskId) -> Result<()> {
    let deleted = match kind {
        TaskKind::Task => store.delete_task(id)?,
        TaskKind::Epic => store.delete_epic(id)?,
        TaskKind::Subtask => store.delete_subtask(id)?,
    };
    if !deleted {
        bail!("No entity with id '{id}'");
    }
    println!("Deleted {} {}.", kind.to_string().to_lowercase(), id);
    Ok(())
}
