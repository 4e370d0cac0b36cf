use crate::cli::ShowCommand;
use crate::views::table::{display_rows, ViewRow};
use anyhow::{bail, Result};
use kanri_core::persist::FileStore;

/// Shows one entity by id. Each hit is recorded in the view history; a miss
/// leaves the history untouched.
pub fn show_entry(store: &mut FileStore, command: ShowCommand) -> Result<()> {
    if let Some(task) = store.view_task(command.id)? {
        display_rows(&[ViewRow::task(&task)]);
        return Ok(());
    }
    if let Some(epic) = store.view_epic(command.id)? {
        let mut rows = vec![ViewRow::epic(&epic)];
        let mut children = store.subtasks_of(epic.id());
        children.sort_by_key(|s| s.base.id);
        for sub in &children {
            rows.push(ViewRow::subtask(sub, true));
        }
        display_rows(&rows);
        return Ok(());
    }
    if let Some(sub) = store.view_subtask(command.id)? {
        display_rows(&[ViewRow::subtask(&sub, false)]);
        return Ok(());
    }
    bail!("No entity with id '{}'", command.id);
}
