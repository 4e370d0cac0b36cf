use crate::views::table::{display_rows, ViewRow};
use anyhow::Result;
use kanri_core::persist::FileStore;

/// Lists the whole board: plain tasks first, then each epic followed by its
/// subtasks, all in id order.
pub fn list_board(store: &FileStore) -> Result<()> {
    let mut rows = Vec::new();

    let mut tasks = store.tasks();
    tasks.sort_by_key(|t| t.id);
    for task in &tasks {
        rows.push(ViewRow::task(task));
    }

    let mut epics = store.epics();
    epics.sort_by_key(|e| e.base.id);
    for epic in &epics {
        rows.push(ViewRow::epic(epic));
        let mut children = store.subtasks_of(epic.id());
        children.sort_by_key(|s| s.base.id);
        for sub in &children {
            rows.push(ViewRow::subtask(sub, true));
        }
    }

    display_rows(&rows);
    Ok(())
}
