//! Task response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use taskops_postgres::model;
use taskops_postgres::types::TaskStatus;

/// Represents a task in API responses.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// ID of the task.
    pub id: i64,
    /// Title of the task.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// ID of the owning account.
    pub owner_id: i64,
    /// Timestamp when the task was created.
    pub created_at: Timestamp,
    /// Timestamp when the task was last updated.
    pub updated_at: Timestamp,
}

/// List of tasks.
pub type Tasks = Vec<Task>;

impl From<model::Task> for Task {
    fn from(task: model::Task) -> Self {
        Self {
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            owner_id: task.owner_id,
        }
    }
}
