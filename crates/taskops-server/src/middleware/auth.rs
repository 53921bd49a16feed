//! Route guard for the private routes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::{ActiveAccount, AuthProvider};

/// Tracing target for the route guard.
const TRACING_TARGET: &str = "taskops_server::middleware::auth";

/// Requires a bearer token that resolves to an active account.
///
/// The resolved identity is cached in the request extensions, so handlers
/// extracting [`ActiveAccount`] again do not repeat the lookup.
///
/// #### Notes
///
/// - A missing, invalid or unresolvable token is rejected with `401`.
/// - An inactive account is rejected with `403`.
pub async fn require_active_account(
    auth_state: ActiveAccount,
    request: Request,
    next: Next,
) -> Response {
    tracing::trace!(
        target: TRACING_TARGET,
        account_id = auth_state.account_id(),
        "request authorized"
    );

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handler::test::{create_test_server, test_auth_keys};

    #[tokio::test]
    async fn guard_rejects_requests_without_token() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/tasks/")
            .json(&serde_json::json!({ "title": "Write report" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "missing_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn guard_rejects_expired_tokens() -> anyhow::Result<()> {
        use crate::service::auth::AuthClaims;

        let server = create_test_server().await?;
        let token = test_auth_keys()?.encode(&AuthClaims {
            sub: "alice@example.com".to_owned(),
            exp: jiff::Timestamp::now().as_second() - 60,
        })?;

        let response = server.get("/tasks/").authorization_bearer(token).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn guard_leaves_public_routes_open() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        server.get("/").await.assert_status_ok();
        Ok(())
    }
}
