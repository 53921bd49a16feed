//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};

/// Path parameters for task operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPathParams {
    /// Unique identifier of the task.
    pub task_id: i64,
}
