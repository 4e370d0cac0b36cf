use crate::cli::AddCommand;
use crate::parser::parse_start_time;
use anyhow::{bail, Result};
use kanri_core::models::{Subtask, Task, UNASSIGNED};
use kanri_core::persist::FileStore;
use owo_colors::{OwoColorize, Style};

pub fn add_entry(store: &mut FileStore, command: AddCommand) -> Result<()> {
    let start = command
        .start
        .as_deref()
        .map(parse_start_time)
        .transpose()?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if let Some(epic_id) = command.epic {
        let mut sub = Subtask::new(command.name.clone(), epic_id);
        sub.base.description = command.description.unwrap_or_default();
        sub.base.start_time = start;
        sub.base.duration = command.duration;

        let id = store.add_subtask(sub)?;
        if id == UNASSIGNED {
            bail!("No epic with id '{epic_id}'");
        }
        println!(
            "{} Created subtask: {}",
            "✓".style(success_style),
            command.name.bold()
        );
        println!(
            "  {} Subtask ID: {} (epic {})",
            "→".style(info_style),
            id.to_string().yellow(),
            epic_id
        );
    } else {
        let mut task = Task::new(command.name.clone());
        task.description = command.description.unwrap_or_default();
        task.start_time = start;
        task.duration = command.duration;

        let id = store.add_task(task)?;
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            command.name.bold()
        );
        println!(
            "  {} Task ID: {}",
            "→".style(info_style),
            id.to_string().yellow()
        );
        if let Some(start) = start {
            println!(
                "  {} Starts: {}",
                "→".style(info_style),
                start.format("%Y-%m-%d %H:%M").to_string().cyan()
            );
        }
    }

    Ok(())
}
