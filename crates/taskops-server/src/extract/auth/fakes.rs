//! In-memory repositories for exercising the auth guards without Postgres.

use taskops_postgres::PgResult;
use taskops_postgres::model::{Account, NewAccount, NewTask, Task, UpdateTask};
use taskops_postgres::query::{AccountRepository, Pagination, TaskRepository};

use crate::service::{AuthKeys, AuthKeysConfig};

pub(crate) fn test_keys() -> anyhow::Result<AuthKeys> {
    Ok(AuthKeys::from_config(&AuthKeysConfig::new("resolver-secret"))?)
}

pub(crate) fn account(id: i64, email: &str, is_active: bool) -> Account {
    Account {
        id,
        email: email.to_owned(),
        password_hash: "$argon2id$stub".to_owned(),
        is_active,
        created_at: jiff::Timestamp::now().into(),
    }
}

#[derive(Default)]
pub(crate) struct FakeAccounts {
    accounts: Vec<Account>,
}

impl FakeAccounts {
    pub fn with(accounts: &[(&str, bool)]) -> Self {
        let accounts = accounts
            .iter()
            .zip(1..)
            .map(|((email, is_active), id)| account(id, email, *is_active))
            .collect();
        Self { accounts }
    }
}

impl AccountRepository for FakeAccounts {
    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        let id = self.accounts.len() as i64 + 1;
        let mut created = account(id, &new_account.email.to_lowercase(), true);
        created.password_hash = new_account.password_hash;
        self.accounts.push(created.clone());
        Ok(created)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        Ok(self.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        let email = email.trim().to_lowercase();
        Ok(self.accounts.iter().any(|a| a.email == email))
    }

    async fn set_account_active(
        &mut self,
        account_id: i64,
        is_active: bool,
    ) -> PgResult<Option<Account>> {
        let account = self.accounts.iter_mut().find(|a| a.id == account_id);
        Ok(account.map(|a| {
            a.is_active = is_active;
            a.clone()
        }))
    }
}

#[derive(Default)]
pub(crate) struct FakeTasks {
    tasks: Vec<Task>,
}

impl TaskRepository for FakeTasks {
    async fn create_task(&mut self, new_task: NewTask) -> PgResult<Task> {
        let now = jiff::Timestamp::now();
        let task = Task {
            id: self.tasks.len() as i64 + 1,
            title: new_task.title.trim().to_owned(),
            description: new_task.description,
            status: new_task.status,
            owner_id: new_task.owner_id,
            created_at: now.into(),
            updated_at: now.into(),
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_owned_task(&mut self, task_id: i64, owner_id: i64) -> PgResult<Option<Task>> {
        let task = self.tasks.iter().find(|t| t.id == task_id);
        Ok(task.filter(|t| t.is_owned_by(owner_id)).cloned())
    }

    async fn list_owned_tasks(
        &mut self,
        owner_id: i64,
        pagination: Pagination,
    ) -> PgResult<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.is_owned_by(owner_id))
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_owned_task(
        &mut self,
        task_id: i64,
        owner_id: i64,
        updates: UpdateTask,
    ) -> PgResult<Option<Task>> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.is_owned_by(owner_id));

        Ok(task.map(|t| {
            if let Some(title) = updates.title {
                t.title = title;
            }
            if let Some(description) = updates.description {
                t.description = description;
            }
            if let Some(status) = updates.status {
                t.status = status;
            }
            t.updated_at = jiff::Timestamp::now().into();
            t.clone()
        }))
    }

    async fn delete_owned_task(&mut self, task_id: i64, owner_id: i64) -> PgResult<bool> {
        let before = self.tasks.len();
        self.tasks
            .retain(|t| !(t.id == task_id && t.is_owned_by(owner_id)));
        Ok(self.tasks.len() < before)
    }
}
