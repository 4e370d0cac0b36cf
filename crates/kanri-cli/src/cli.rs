use clap::{Parser, Subcommand, ValueEnum};
use kanri_core::models::{TaskId, TaskStatus};

/// A file-backed kanban board with epics, subtasks and conflict-free scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a task, or a subtask when --epic is given
    Add(AddCommand),
    /// Manage epics
    Epic(EpicCommand),
    /// List the whole board
    List,
    /// Show one entity by id (records a view)
    Show(ShowCommand),
    /// Edit an entity by id
    Edit(EditCommand),
    /// Delete an entity by id
    Delete(DeleteCommand),
    /// Print schedulable items in start-time order
    Schedule,
    /// Print the view history, oldest first
    History,
    /// Remove every entity of one kind
    Clear(ClearCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The name of the task
    pub name: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// Start time (RFC 3339 or 'YYYY-MM-DD HH:MM', UTC)
    #[clap(short, long)]
    pub start: Option<String>,
    /// Planned duration in minutes
    #[clap(long, default_value_t = 0)]
    pub duration: i64,
    /// Add as a subtask of this epic
    #[clap(long)]
    pub epic: Option<TaskId>,
}

#[derive(Parser, Debug, Clone)]
pub struct EpicCommand {
    #[command(subcommand)]
    pub command: EpicSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EpicSubcommand {
    /// Add a new epic
    Add(AddEpicCommand),
    /// List epics with their subtasks
    List,
    /// Remove every subtask of an epic
    Clear(ClearEpicCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddEpicCommand {
    /// The name of the epic
    pub name: String,
    /// The description of the epic
    #[clap(short, long)]
    pub description: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ClearEpicCommand {
    /// The id of the epic to clear
    pub id: TaskId,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The id of the entity to show
    pub id: TaskId,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The id of the entity to edit
    pub id: TaskId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// New status (tasks and subtasks only; epic status is derived)
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// New start time (RFC 3339 or 'YYYY-MM-DD HH:MM', UTC)
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long, conflicts_with = "start")]
    pub start_clear: bool,

    /// New duration in minutes
    #[arg(long)]
    pub duration: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The id of the entity to delete
    pub id: TaskId,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ClearCommand {
    /// Which entity kind to clear
    #[clap(value_enum)]
    pub kind: ClearKind,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearKind {
    /// All plain tasks
    Tasks,
    /// All epics (their subtasks go with them)
    Epics,
    /// All subtasks (epics reset to NEW)
    Subtasks,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    New,
    InProgress,
    Done,
}

impl From<StatusArg> for TaskStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::New => TaskStatus::New,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Done => TaskStatus::Done,
        }
    }
}
