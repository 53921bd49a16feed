//! Enumerations mapped onto PostgreSQL enum types.

mod task_status;

pub use task_status::TaskStatus;
