//! Database models for all tables.
//!
//! Each model comes with its insertable and, where rows are mutable, its
//! changeset counterpart.

mod account;
mod task;

pub use account::{Account, NewAccount};
pub use task::{NewTask, Task, UpdateTask};
