//! Authorization checks for authenticated accounts.
//!
//! [`AuthProvider`] carries the two guards every protected route composes:
//! the active-account gate and the task ownership guard.

use taskops_postgres::model::{Account, Task};
use taskops_postgres::query::TaskRepository;

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{ErrorKind, Result};

/// Authorization provider for authenticated accounts.
pub trait AuthProvider {
    /// Returns the authenticated account.
    fn account(&self) -> &Account;

    /// Returns the account ID of the authenticated user.
    #[inline]
    fn account_id(&self) -> i64 {
        self.account().id
    }

    /// Returns whether the account may access protected resources.
    #[inline]
    fn is_active(&self) -> bool {
        self.account().is_active
    }

    /// Fails with `403 Inactive user` for disabled accounts.
    fn authorize_active(&self) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = self.account_id(),
            "access denied: inactive account"
        );

        Err(ErrorKind::Forbidden
            .with_message("Inactive user")
            .with_resource("account"))
    }

    /// Loads a task the account owns.
    ///
    /// The lookup filters by id and owner at once, so a task owned by
    /// someone else is indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns `404 Task not found` when no owned task matches.
    #[allow(async_fn_in_trait)]
    async fn authorize_task_owner<R>(&self, repo: &mut R, task_id: i64) -> Result<Task>
    where
        R: TaskRepository + Send,
    {
        let task = repo.find_owned_task(task_id, self.account_id()).await?;

        task.ok_or_else(|| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = self.account_id(),
                task_id,
                "task not found for owner"
            );
            task_not_found()
        })
    }
}

/// The error every ownership miss collapses to.
pub(crate) fn task_not_found() -> crate::handler::Error<'static> {
    ErrorKind::NotFound
        .with_message("Task not found")
        .with_resource("task")
}

impl AuthProvider for Account {
    #[inline]
    fn account(&self) -> &Account {
        self
    }
}

#[cfg(test)]
mod tests {
    use taskops_postgres::model::NewTask;

    use super::*;
    use crate::extract::auth::fakes::{FakeTasks, account};

    #[test]
    fn inactive_account_is_forbidden() {
        let active = account(1, "alice@example.com", true);
        let inactive = account(2, "idle@example.com", false);

        assert!(active.authorize_active().is_ok());

        let error = inactive.authorize_active().err();
        assert_eq!(error.as_ref().map(|e| e.kind()), Some(ErrorKind::Forbidden));
        assert_eq!(error.as_ref().map(|e| e.message()), Some("Inactive user"));
    }

    #[tokio::test]
    async fn owner_fetch_succeeds_and_others_get_not_found() -> anyhow::Result<()> {
        let alice = account(1, "alice@example.com", true);
        let bob = account(2, "bob@example.com", true);

        let mut repo = FakeTasks::default();
        let task = repo
            .create_task(NewTask {
                title: "Alice's task".to_owned(),
                owner_id: alice.id,
                ..NewTask::default()
            })
            .await?;

        let fetched = alice.authorize_task_owner(&mut repo, task.id).await?;
        assert_eq!(fetched.id, task.id);

        let foreign = bob.authorize_task_owner(&mut repo, task.id).await.err();
        let missing = alice.authorize_task_owner(&mut repo, 9999).await.err();

        assert_eq!(foreign.as_ref().map(|e| e.kind()), Some(ErrorKind::NotFound));
        assert_eq!(
            foreign.map(|e| e.to_string()),
            missing.map(|e| e.to_string())
        );
        Ok(())
    }
}
