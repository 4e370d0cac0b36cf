use crate::cli::{ClearCommand, ClearKind};
use anyhow::Result;
use kanri_core::persist::FileStore;

pub fn clear_entries(store: &mut FileStore, command: ClearCommand) -> Result<()> {
    match command.kind {
        ClearKind::Tasks => {
            store.clear_tasks()?;
            println!("Cleared all tasks.");
        }
        ClearKind::Epics => {
            store.clear_epics()?;
            println!("Cleared all epics and their subtasks.");
        }
        ClearKind::Subtasks => {
            store.clear_subtasks()?;
            println!("Cleared all subtasks.");
        }
    }
    Ok(())
}
