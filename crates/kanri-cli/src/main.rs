use chrono::Utc;
use clap::Parser;
use dialoguer::Confirm;
use kanri_core::error::CoreError;
use kanri_core::persist::FileStore;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::new().unwrap_or_default();
    tracing::debug!(data_file = %config.data_file.display(), "opening board");
    let mut store = match FileStore::open(&config.data_file, Utc::now()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_entry(&mut store, command),
        cli::Commands::Epic(command) => commands::epic::epic_command(&mut store, command),
        cli::Commands::List => commands::list::list_board(&store),
        cli::Commands::Show(command) => commands::show::show_entry(&mut store, command),
        cli::Commands::Edit(command) => commands::edit::edit_entry(&mut store, command),
        cli::Commands::Delete(command) => {
            let Some((kind, name)) = commands::delete::find_entry(&store, command.id) else {
                let error_style = Style::new().red().bold();
                eprintln!(
                    "{} No entity with id '{}'",
                    "Error:".style(error_style),
                    command.id
                );
                std::process::exit(1);
            };

            if !command.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to delete {} '{}'?",
                        kind.to_string().to_lowercase(),
                        name
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }
            commands::delete::delete_entry(&mut store, kind, command.id)
        }
        cli::Commands::Schedule => commands::schedule::show_schedule(&store),
        cli::Commands::History => commands::history::show_history(&store),
        cli::Commands::Clear(command) => commands::clear::clear_entries(&mut store, command),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::SlotConflict { start, duration } => {
                eprintln!(
                    "{} Schedule conflict: the {} minute window starting at {} is already reserved",
                    "Error:".style(error_style),
                    duration,
                    start.format("%Y-%m-%d %H:%M").to_string().yellow()
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
