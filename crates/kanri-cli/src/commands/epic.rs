use crate::cli::{AddEpicCommand, ClearEpicCommand, EpicCommand, EpicSubcommand};
use crate::views::table::{display_rows, ViewRow};
use anyhow::{bail, Result};
use kanri_core::models::Epic;
use kanri_core::persist::FileStore;
use owo_colors::{OwoColorize, Style};

pub fn epic_command(store: &mut FileStore, command: EpicCommand) -> Result<()> {
    match command.command {
        EpicSubcommand::Add(command) => add_epic(store, command),
        EpicSubcommand::List => list_epics(store),
        EpicSubcommand::Clear(command) => clear_epic(store, command),
    }
}

fn add_epic(store: &mut FileStore, command: AddEpicCommand) -> Result<()> {
    let epic = Epic::new(command.name.clone(), command.description.unwrap_or_default());
    let id = store.add_epic(epic)?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    println!(
        "{} Created epic: {}",
        "✓".style(success_style),
        command.name.bold()
    );
    println!(
        "  {} Epic ID: {}",
        "→".style(info_style),
        id.to_string().yellow()
    );
    Ok(())
}

fn list_epics(store: &FileStore) -> Result<()> {
    let mut epics = store.epics();
    epics.sort_by_key(|e| e.base.id);

    let mut rows = Vec::new();
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

fn clear_epic(store: &mut FileStore, command: ClearEpicCommand) -> Result<()> {
    if !store.clear_epic_subtasks(command.id)? {
        bail!("No epic with id '{}'", command.id);
    }
    println!("Cleared all subtasks of epic {}.", command.id);
    Ok(())
}
