//! Task repository. Every read and write is scoped by the owning account.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Pagination;
use crate::model::{NewTask, Task, UpdateTask};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for task database operations.
///
/// There is no unscoped lookup: a task owned by another account is
/// indistinguishable from a task that does not exist.
pub trait TaskRepository {
    /// Inserts a new task. The owner must already be set on `new_task`.
    fn create_task(&mut self, new_task: NewTask) -> impl Future<Output = PgResult<Task>> + Send;

    /// Finds a task by id, filtered by its owner in the same query.
    fn find_owned_task(
        &mut self,
        task_id: i64,
        owner_id: i64,
    ) -> impl Future<Output = PgResult<Option<Task>>> + Send;

    /// Lists the owner's tasks ordered by id.
    fn list_owned_tasks(
        &mut self,
        owner_id: i64,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Task>>> + Send;

    /// Applies a partial update to an owned task.
    ///
    /// Returns `None` when no task matches both id and owner.
    fn update_owned_task(
        &mut self,
        task_id: i64,
        owner_id: i64,
        updates: UpdateTask,
    ) -> impl Future<Output = PgResult<Option<Task>>> + Send;

    /// Deletes an owned task. Returns whether a row was removed.
    fn delete_owned_task(
        &mut self,
        task_id: i64,
        owner_id: i64,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl TaskRepository for PgConnection {
    async fn create_task(&mut self, mut new_task: NewTask) -> PgResult<Task> {
        use schema::tasks;

        new_task.title = new_task.title.trim().to_owned();

        diesel::insert_into(tasks::table)
            .values(&new_task)
            .returning(Task::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_owned_task(&mut self, task_id: i64, owner_id: i64) -> PgResult<Option<Task>> {
        use schema::tasks::{self, dsl};

        tasks::table
            .filter(dsl::id.eq(task_id))
            .filter(dsl::owner_id.eq(owner_id))
            .select(Task::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_owned_tasks(
        &mut self,
        owner_id: i64,
        pagination: Pagination,
    ) -> PgResult<Vec<Task>> {
        use schema::tasks::{self, dsl};

        tasks::table
            .filter(dsl::owner_id.eq(owner_id))
            .order(dsl::id.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Task::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_owned_task(
        &mut self,
        task_id: i64,
        owner_id: i64,
        mut updates: UpdateTask,
    ) -> PgResult<Option<Task>> {
        use schema::tasks::{self, dsl};

        if let Some(title) = updates.title.as_mut() {
            *title = title.trim().to_owned();
        }
        updates.updated_at = Some(jiff::Timestamp::now().into());

        diesel::update(
            tasks::table
                .filter(dsl::id.eq(task_id))
                .filter(dsl::owner_id.eq(owner_id)),
        )
        .set(&updates)
        .returning(Task::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn delete_owned_task(&mut self, task_id: i64, owner_id: i64) -> PgResult<bool> {
        use schema::tasks::{self, dsl};

        let deleted = diesel::delete(
            tasks::table
                .filter(dsl::id.eq(task_id))
                .filter(dsl::owner_id.eq(owner_id)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAccount;
    use crate::query::AccountRepository;
    use crate::types::TaskStatus;
    use crate::{PgClient, PgConfig, run_pending_migrations};

    /// Connects to the database named by `DATABASE_URL` and applies migrations.
    async fn connect() -> anyhow::Result<PgClient> {
        let database_url = std::env::var("DATABASE_URL")?;
        let client = PgConfig::new(database_url).build()?;
        run_pending_migrations(&client).await?;
        Ok(client)
    }

    fn unique_email(prefix: &str) -> String {
        format!("{prefix}-{}@example.com", jiff::Timestamp::now().as_nanosecond())
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn owned_task_lookup_is_scoped() -> anyhow::Result<()> {
        let client = connect().await?;
        let mut conn = client.get_connection().await?;

        let alice = conn
            .create_account(NewAccount::new(unique_email("Alice"), "$argon2id$stub"))
            .await?;
        let bob = conn
            .create_account(NewAccount::new(unique_email("bob"), "$argon2id$stub"))
            .await?;
        assert_eq!(alice.email, alice.email.to_lowercase());

        let task = conn
            .create_task(NewTask {
                title: "  Write report ".into(),
                description: None,
                status: TaskStatus::default(),
                owner_id: alice.id,
            })
            .await?;
        assert_eq!(task.title, "Write report");
        assert!(task.is_owned_by(alice.id));

        assert!(conn.find_owned_task(task.id, alice.id).await?.is_some());
        assert!(conn.find_owned_task(task.id, bob.id).await?.is_none());

        let updates = UpdateTask {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        assert!(conn.update_owned_task(task.id, bob.id, updates.clone()).await?.is_none());
        let updated = conn.update_owned_task(task.id, alice.id, updates).await?;
        assert_eq!(updated.map(|t| t.status), Some(TaskStatus::InProgress));

        assert!(conn.list_owned_tasks(bob.id, Pagination::default()).await?.is_empty());
        assert_eq!(conn.list_owned_tasks(alice.id, Pagination::default()).await?.len(), 1);

        assert!(!conn.delete_owned_task(task.id, bob.id).await?);
        assert!(conn.delete_owned_task(task.id, alice.id).await?);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn duplicate_email_is_unique_violation() -> anyhow::Result<()> {
        let client = connect().await?;
        let mut conn = client.get_connection().await?;

        let email = unique_email("carol");
        conn.create_account(NewAccount::new(&email, "$argon2id$first")).await?;

        let error = conn
            .create_account(NewAccount::new(email.to_uppercase(), "$argon2id$second"))
            .await
            .expect_err("duplicate email must be rejected");
        assert!(error.is_unique_violation());
        assert_eq!(error.constraint(), Some("accounts_email_unique_idx"));

        let stored = conn.find_account_by_email(&email).await?;
        assert_eq!(stored.map(|a| a.password_hash), Some("$argon2id$first".to_owned()));
        Ok(())
    }
}
