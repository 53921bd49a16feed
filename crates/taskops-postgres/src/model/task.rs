//! Task model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`Task`] - Unit of work owned by exactly one account
//! - [`NewTask`] - Data structure for creating a task
//! - [`UpdateTask`] - Partial update, unset fields are left untouched

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::tasks;
use crate::types::TaskStatus;

/// Unit of work owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Task {
    /// Unique task identifier.
    pub id: i64,
    /// Short human-readable title (1-255 characters).
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Owning account, stamped at creation.
    pub owner_id: i64,
    /// Timestamp when the task was created.
    pub created_at: Timestamp,
    /// Timestamp when the task was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new task.
///
/// `owner_id` always comes from the authenticated caller.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub owner_id: i64,
}

/// Data for updating a task.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub updated_at: Option<Timestamp>,
}

impl Task {
    /// Returns whether the given account owns this task.
    #[inline]
    pub fn is_owned_by(&self, account_id: i64) -> bool {
        self.owner_id == account_id
    }

    /// Returns the creation time as a [`jiff::Timestamp`].
    #[inline]
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }

    /// Returns the last update time as a [`jiff::Timestamp`].
    #[inline]
    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

impl UpdateTask {
    /// Returns whether the update carries no field changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}
