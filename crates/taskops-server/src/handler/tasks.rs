//! Task management handlers.
//!
//! Every route requires an active account. Single-task routes go through the
//! ownership guard, so a task owned by someone else answers `404`.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use taskops_postgres::query::TaskRepository;
use taskops_postgres::{PgClient, PgConnection};

use crate::extract::auth::task_not_found;
use crate::extract::{ActiveAccount, AuthProvider, Json, Path, Query, ValidateJson};
use crate::handler::request::{CreateTask, Pagination, PatchTask, TaskPathParams};
use crate::handler::response::{Task, Tasks};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for task operations.
const TRACING_TARGET: &str = "taskops_server::handler::tasks";

/// Creates a task owned by the caller.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id()))]
async fn create_task(
    State(pg_client): State<PgClient>,
    auth_state: ActiveAccount,
    ValidateJson(request): ValidateJson<CreateTask>,
) -> Result<(StatusCode, Json<Task>)> {
    let mut conn = pg_client.get_connection().await?;
    let task = conn
        .create_task(request.into_model(auth_state.account_id()))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        task_id = task.id,
        status = %task.status,
        "task created"
    );

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Lists the caller's tasks ordered by id.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id()))]
async fn list_tasks(
    State(pg_client): State<PgClient>,
    auth_state: ActiveAccount,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Tasks>> {
    let mut conn = pg_client.get_connection().await?;
    let tasks = conn
        .list_owned_tasks(auth_state.account_id(), pagination.into())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        task_count = tasks.len(),
        "tasks listed"
    );

    Ok(Json(tasks.into_iter().map(Task::from).collect()))
}

/// Returns a single owned task.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id(), task_id = path_params.task_id))]
async fn read_task(
    State(pg_client): State<PgClient>,
    auth_state: ActiveAccount,
    Path(path_params): Path<TaskPathParams>,
) -> Result<Json<Task>> {
    let mut conn = pg_client.get_connection().await?;
    let pg: &mut PgConnection = &mut conn;
    let task = auth_state
        .authorize_task_owner(pg, path_params.task_id)
        .await?;

    Ok(Json(task.into()))
}

/// Applies a partial update to an owned task.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id(), task_id = path_params.task_id))]
async fn update_task(
    State(pg_client): State<PgClient>,
    auth_state: ActiveAccount,
    Path(path_params): Path<TaskPathParams>,
    ValidateJson(request): ValidateJson<PatchTask>,
) -> Result<Json<Task>> {
    let mut conn = pg_client.get_connection().await?;
    let pg: &mut PgConnection = &mut conn;
    let task = auth_state
        .authorize_task_owner(pg, path_params.task_id)
        .await?;

    let updates = request.into_model();
    if updates.is_empty() {
        return Ok(Json(task.into()));
    }

    let task = pg
        .update_owned_task(task.id, auth_state.account_id(), updates)
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(
        target: TRACING_TARGET,
        status = %task.status,
        "task updated"
    );

    Ok(Json(task.into()))
}

/// Deletes an owned task.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id(), task_id = path_params.task_id))]
async fn delete_task(
    State(pg_client): State<PgClient>,
    auth_state: ActiveAccount,
    Path(path_params): Path<TaskPathParams>,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let pg: &mut PgConnection = &mut conn;
    let task = auth_state
        .authorize_task_owner(pg, path_params.task_id)
        .await?;

    if !pg.delete_owned_task(task.id, auth_state.account_id()).await? {
        return Err(task_not_found());
    }

    tracing::info!(target: TRACING_TARGET, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/tasks/", post(create_task).get(list_tasks))
        .route(
            "/tasks/{task_id}",
            get(read_task).patch(update_task).delete(delete_task),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::WWW_AUTHENTICATE;

    use crate::handler::test::{create_test_server, test_auth_keys};

    #[tokio::test]
    async fn tasks_require_a_token() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        for response in [
            server.get("/tasks/").await,
            server.get("/tasks/1").await,
            server.delete("/tasks/1").await,
        ] {
            response.assert_status(StatusCode::UNAUTHORIZED);
            assert!(response.headers().contains_key(WWW_AUTHENTICATE));
            let body = response.json::<serde_json::Value>();
            assert_eq!(body["message"], "Not authenticated");
        }
        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .get("/tasks/")
            .authorization_bearer("not-a-token")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["message"], "Could not validate credentials");
        Ok(())
    }

    #[tokio::test]
    async fn truncated_token_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = test_auth_keys()?.issue_token("alice@example.com")?;

        let response = server
            .post("/tasks/")
            .authorization_bearer(&token[..token.len() - 3])
            .json(&serde_json::json!({ "title": "Write report" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() -> anyhow::Result<()> {
        use crate::service::{AuthKeys, AuthKeysConfig};

        let server = create_test_server().await?;
        let other = AuthKeys::from_config(&AuthKeysConfig::new("some-other-secret"))?;
        let token = other.issue_token("alice@example.com")?;

        let response = server.get("/tasks/").authorization_bearer(token).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
