//! Task request types.

use serde::{Deserialize, Deserializer, Serialize};
use taskops_postgres::model::{NewTask, UpdateTask};
use taskops_postgres::types::TaskStatus;
use validator::Validate;

/// Request payload for creating a task.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Title of the task.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Initial status, `pending` when omitted.
    #[serde(default)]
    pub status: TaskStatus,
}

impl CreateTask {
    /// Converts the request into a model owned by the given account.
    #[inline]
    pub fn into_model(self, owner_id: i64) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            status: self.status,
            owner_id,
        }
    }
}

/// Request payload for a partial task update.
///
/// Absent fields are left unchanged. An explicit `"description": null` clears
/// the description.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct PatchTask {
    /// New title of the task.
    #[validate(length(min = 1, max = 255))]
    #[serde(default)]
    pub title: Option<String>,

    /// New description, `Some(None)` clears it.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,

    /// New status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl PatchTask {
    /// Converts the request into a model changeset.
    #[inline]
    pub fn into_model(self) -> UpdateTask {
        UpdateTask {
            title: self.title,
            description: self.description,
            status: self.status,
            updated_at: None,
        }
    }
}

/// Distinguishes a field set to `null` from a missing field.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_task_defaults_to_pending() -> anyhow::Result<()> {
        let request: CreateTask = serde_json::from_str(r#"{"title":"Write report"}"#)?;
        assert_eq!(request.status, TaskStatus::Pending);
        assert!(request.validate().is_ok());

        let model = request.into_model(7);
        assert_eq!(model.owner_id, 7);
        assert_eq!(model.description, None);
        Ok(())
    }

    #[test]
    fn create_task_title_bounds() -> anyhow::Result<()> {
        let empty: CreateTask = serde_json::from_str(r#"{"title":""}"#)?;
        assert!(empty.validate().is_err());

        let long = CreateTask {
            title: "x".repeat(256),
            description: None,
            status: TaskStatus::Pending,
        };
        assert!(long.validate().is_err());
        Ok(())
    }

    #[test]
    fn create_task_ignores_owner_field() -> anyhow::Result<()> {
        let request: CreateTask =
            serde_json::from_str(r#"{"title":"Mine","owner_id":999}"#)?;
        assert_eq!(request.into_model(1).owner_id, 1);
        Ok(())
    }

    #[test]
    fn patch_task_distinguishes_null_from_missing() -> anyhow::Result<()> {
        let missing: PatchTask = serde_json::from_str(r#"{"status":"completed"}"#)?;
        assert_eq!(missing.description, None);
        assert_eq!(missing.status, Some(TaskStatus::Completed));

        let cleared: PatchTask = serde_json::from_str(r#"{"description":null}"#)?;
        assert_eq!(cleared.description, Some(None));

        let set: PatchTask = serde_json::from_str(r#"{"description":"details"}"#)?;
        assert_eq!(set.description, Some(Some("details".to_owned())));
        Ok(())
    }

    #[test]
    fn patch_task_rejects_unknown_status() {
        let result = serde_json::from_str::<PatchTask>(r#"{"status":"archived"}"#);
        assert!(result.is_err());
    }
}
