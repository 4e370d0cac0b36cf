use crate::cli::EditCommand;
use crate::parser::parse_start_time;
use anyhow::{bail, Result};
use kanri_core::models::{Task, TaskStatus};
use kanri_core::persist::FileStore;
use owo_colors::{OwoColorize, Style};

pub fn edit_entry(store: &mut FileStore, command: EditCommand) -> Result<()> {
    let success_style = Style::new().green().bold();

    if let Some(task) = store.tasks().into_iter().find(|t| t.id == command.id) {
        let updated = apply_base_edits(task, &command)?;
        store.update_task(updated)?;
        println!("{} Updated task {}.", "✓".style(success_style), command.id);
        return Ok(());
    }

    if let Some(mut epic) = store.epics().into_iter().find(|e| e.id() == command.id) {
        if command.status.is_some()
            || command.start.is_some()
            || command.start_clear
            || command.duration.is_some()
        {
            bail!(
                "Epic status, start and duration are derived from its subtasks; edit the subtasks instead"
            );
        }
        if let Some(name) = command.name {
            epic.base.name = name;
        }
        if let Some(description) = command.description {
            epic.base.description = description;
        }
        store.update_epic(epic)?;
        println!("{} Updated epic {}.", "✓".style(success_style), command.id);
        return Ok(());
    }

    if let Some(mut sub) = store.subtasks().into_iter().find(|s| s.id() == command.id) {
        sub.base = apply_base_edits(sub.base, &command)?;
        store.update_subtask(sub)?;
        println!("{} Updated subtask {}.", "✓".style(success_style), command.id);
        return Ok(());
    }

    bail!("No entity with id '{}'", command.id);
}

fn apply_base_edits(mut base: Task, command: &EditCommand) -> Result<Task> {
    if let Some(name) = &command.name {
        base.name = name.clone();
    }
    if let Some(description) = &command.description {
        base.description = description.clone();
    }
    if let Some(status) = command.status {
        base.status = TaskStatus::from(status);
    }
    if let Some(start) = &command.start {
        base.start_time = Some(parse_start_time(start)?);
    }
    if command.start_clear {
        base.start_time = None;
    }
    if let Some(duration) = command.duration {
        base.duration = duration;
    }
    Ok(base)
}
