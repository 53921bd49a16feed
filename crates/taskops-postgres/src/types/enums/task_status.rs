//! Task status enumeration for task lifecycle tracking.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the current status of a task in its lifecycle.
///
/// This enumeration corresponds to the `TASK_STATUS` PostgreSQL enum. New tasks
/// start as [`TaskStatus::Pending`] unless the caller chooses otherwise.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::TaskStatus"]
pub enum TaskStatus {
    /// Task is waiting to be picked up.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// Task is currently being worked on.
    #[db_rename = "in_progress"]
    #[serde(rename = "in_progress")]
    #[strum(serialize = "in_progress")]
    InProgress,

    /// Task finished successfully.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Task finished with an error.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,
}

impl TaskStatus {
    /// Returns whether the task reached a final state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Returns whether the task is still open.
    #[inline]
    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn display_matches_wire_names() {
        let names: Vec<String> = TaskStatus::iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["pending", "in_progress", "completed", "failed"]);
    }

    #[test]
    fn parses_from_wire_names() {
        assert_eq!("in_progress".parse::<TaskStatus>().ok(), Some(TaskStatus::InProgress));
        assert!("unknown".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Pending.is_open());
        assert!(TaskStatus::InProgress.is_open());
    }
}
