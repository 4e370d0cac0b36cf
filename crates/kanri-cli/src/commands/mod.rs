pub mod add;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod epic;
pub mod history;
pub mod list;
pub mod schedule;
pub mod show;
