//! # Kanri Core Library
//!
//! An in-memory task board with composite "epic" tasks, slot-based time
//! scheduling and a deduplicated view history.
//!
//! ## Features
//!
//! - **Three entity kinds**: plain tasks, epics, and the subtasks an epic
//!   owns. An epic's status, duration and time span are derived from its
//!   children and can never be set directly.
//! - **Overlap detection**: every scheduled task or subtask reserves
//!   15-minute slots in a one-year grid; a colliding window is rejected
//!   before anything is mutated.
//! - **Priority view**: all schedulable items, ordered by start time with
//!   unscheduled items last.
//! - **View history**: most-recently-viewed entities with at most one entry
//!   per id and O(1) touch/remove.
//! - **File persistence**: a CSV file-backed wrapper that rewrites the board
//!   after every operation and replays it on load.
//!
//! ## Core Modules
//!
//! - [`models`]: entity records and status/kind enums
//! - [`store`]: the [`store::TaskStore`] aggregate root
//! - [`aggregate`]: derived epic status/duration/span
//! - [`grid`]: the slot reservation table
//! - [`priority`]: the start-time-ordered index
//! - [`history`]: the most-recently-viewed tracker
//! - [`persist`]: the file-backed store
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use kanri_core::models::{Epic, Subtask, TaskStatus};
//! use kanri_core::store::TaskStore;
//!
//! let mut store = TaskStore::new(Utc::now());
//!
//! let epic_id = store.add_epic(Epic::new("Release", "Ship v1"));
//! let sub_id = store
//!     .add_subtask(Subtask::new("Write changelog", epic_id))
//!     .expect("no schedule conflict for an unscheduled subtask");
//!
//! assert!(sub_id > epic_id);
//! let epic = store.view_epic(epic_id).unwrap();
//! assert_eq!(epic.base.status, TaskStatus::New);
//! ```

pub mod aggregate;
pub mod error;
pub mod grid;
pub mod history;
pub mod models;
pub mod persist;
pub mod priority;
pub mod store;
