use crate::views::table::{display_rows, ViewRow};
use anyhow::Result;
use kanri_core::persist::FileStore;

/// Prints tasks and subtasks in start-time order, unscheduled items last.
pub fn show_schedule(store: &FileStore) -> Result<()> {
    let rows: Vec<ViewRow> = store.prioritized().iter().map(ViewRow::entry).collect();
    display_rows(&rows);
    Ok(())
}
