use crate::views::table::{display_rows, ViewRow};
use anyhow::Result;
use kanri_core::persist::FileStore;

/// Prints the view history, oldest first. Each entity appears at most once.
pub fn show_history(store: &FileStore) -> Result<()> {
    let rows: Vec<ViewRow> = store.history().iter().map(ViewRow::entry).collect();
    display_rows(&rows);
    Ok(())
}
