//! Registration and login handlers.
//!
//! Login never reveals whether an email is registered: unknown emails and
//! wrong passwords fail with the same response, and both paths run one
//! password verification.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use taskops_postgres::model::{self, NewAccount};
use taskops_postgres::{PgClient, PgConnection};
use taskops_postgres::query::AccountRepository;

use crate::extract::{Form, Json, ValidateJson};
use crate::handler::request::{LoginForm, Register};
use crate::handler::response::{Account, AuthToken};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{AuthHasher, AuthKeys, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "taskops_server::handler::authentication";

fn duplicate_email() -> Error<'static> {
    ErrorKind::Conflict
        .with_message("A user with this email already exists.")
        .with_resource("account")
}

fn incorrect_credentials() -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message("Incorrect email or password")
        .with_resource("authentication")
}

/// Stores a new account unless the email is already taken.
///
/// A taken email leaves the existing account untouched.
async fn register_account<R>(
    repo: &mut R,
    auth_hasher: &AuthHasher,
    request: Register,
) -> Result<model::Account>
where
    R: AccountRepository + Send,
{
    if repo.email_exists(&request.email).await? {
        tracing::debug!(target: TRACING_TARGET, "registration rejected: email taken");
        return Err(duplicate_email());
    }

    let password_hash = auth_hasher.hash_password(&request.password)?;
    let new_account = NewAccount::new(request.email, password_hash);

    // A concurrent registration is caught by the unique index.
    let account = repo.create_account(new_account).await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        "account registered"
    );
    Ok(account)
}

/// Checks the credentials and issues a token for the account.
async fn authenticate<R>(
    repo: &mut R,
    auth_hasher: &AuthHasher,
    auth_keys: &AuthKeys,
    form: &LoginForm,
) -> Result<String>
where
    R: AccountRepository + Send,
{
    let account = repo.find_account_by_email(&form.username).await?;

    let password_valid = match &account {
        Some(account) => auth_hasher.verify_password(&form.password, &account.password_hash),
        None => auth_hasher.verify_dummy_password(&form.password),
    };

    let account = match account {
        Some(account) if password_valid => account,
        account => {
            tracing::warn!(
                target: TRACING_TARGET,
                account_exists = account.is_some(),
                "login failed"
            );
            return Err(incorrect_credentials());
        }
    };

    let access_token = auth_keys.issue_token(&account.email)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        "login successful"
    );
    Ok(access_token)
}

/// Creates a new account.
#[tracing::instrument(skip_all)]
async fn register(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<Account>)> {
    let mut conn = pg_client.get_connection().await?;
    let pg: &mut PgConnection = &mut conn;

    let account = register_account(pg, &auth_hasher, request).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Exchanges credentials for a bearer token.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_keys): State<AuthKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Json<AuthToken>> {
    let mut conn = pg_client.get_connection().await?;
    let pg: &mut PgConnection = &mut conn;

    let access_token = authenticate(pg, &auth_hasher, &auth_keys, &form).await?;
    Ok(Json(AuthToken::bearer(access_token)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::WWW_AUTHENTICATE;

    use super::*;
    use crate::extract::auth::fakes::{FakeAccounts, test_keys};
    use crate::handler::test::create_test_server_with_router;

    fn register_request(email: &str, password: &str) -> Register {
        Register {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_the_stored_hash() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;
        let mut repo = FakeAccounts::default();

        let request = register_request("alice@example.com", "first");
        let first = register_account(&mut repo, &hasher, request).await?;
        assert!(hasher.verify_password("first", &first.password_hash));

        let request = register_request("Alice@Example.com", "second");
        let error = register_account(&mut repo, &hasher, request)
            .await
            .err()
            .map(|e| e.kind());
        assert_eq!(error, Some(ErrorKind::Conflict));

        let stored = repo.find_account_by_email("alice@example.com").await?;
        assert_eq!(stored.map(|a| a.password_hash), Some(first.password_hash));
        Ok(())
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_registered_email() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;
        let keys = test_keys()?;
        let mut repo = FakeAccounts::default();
        let request = register_request("alice@example.com", "first");
        register_account(&mut repo, &hasher, request).await?;

        let form = login_form("alice@example.com", "first");
        let token = authenticate(&mut repo, &hasher, &keys, &form).await?;
        assert_eq!(keys.validate_token(&token).as_deref(), Some("alice@example.com"));
        assert_eq!(keys.validate_token(&token[..token.len() - 3]), None);

        let wrong_password =
            authenticate(&mut repo, &hasher, &keys, &login_form("alice@example.com", "second"))
                .await
                .err()
                .map(|e| e.to_string());
        let unknown_email =
            authenticate(&mut repo, &hasher, &keys, &login_form("nobody@example.com", "first"))
                .await
                .err()
                .map(|e| e.to_string());
        assert!(wrong_password.is_some());
        assert_eq!(wrong_password, unknown_email);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/auth/register")
            .json(&serde_json::json!({ "email": "not-an-email", "password": "secret" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "bad_request");
        assert!(!body.to_string().contains("not-an-email"));
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_empty_password() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/auth/register")
            .json(&serde_json::json!({ "email": "alice@example.com", "password": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_requires_form_fields() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/auth/login")
            .form(&[("username", "alice@example.com")])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[test]
    fn failure_responses() {
        use axum::response::IntoResponse;

        let response = incorrect_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(WWW_AUTHENTICATE));

        let error = duplicate_email();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), "A user with this email already exists.");
    }
}
