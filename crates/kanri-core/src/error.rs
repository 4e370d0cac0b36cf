use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// The requested time window collides with an existing reservation (or
    /// falls outside the tracked year). The only failure raised mid-operation;
    /// missing ids and guarded fields are reported through return values.
    #[error("Schedule conflict: the {duration} minute window starting at {start} is already reserved")]
    SlotConflict {
        start: DateTime<Utc>,
        duration: i64,
    },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Corrupt board file: {0}")]
    Corrupt(String),
}
