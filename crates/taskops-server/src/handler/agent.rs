//! Simulated agent run streamed as Server-Sent Events.
//!
//! The stream starts with a `task_start` event, then emits one data-only
//! event per word of the simulated output, and ends with `task_end`. The
//! generator stops as soon as the client disconnects.

use std::convert::Infallible;
use std::time::Duration;

use axum::Router;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::post;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::extract::{ActiveAccount, AuthProvider, ValidateJson};
use crate::handler::Result;
use crate::handler::request::AgentRun;
use crate::service::ServiceState;

/// Tracing target for agent operations.
const TRACING_TARGET: &str = "taskops_server::handler::agent";

/// Pause after the start event and before the end event.
const PHASE_DELAY: Duration = Duration::from_secs(1);
/// Pause after each token event.
const TOKEN_DELAY: Duration = Duration::from_millis(100);

/// A single event of the simulated run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AgentEvent {
    Start,
    Token(String),
    End,
}

impl AgentEvent {
    /// Returns the JSON payload of the event.
    fn data(&self) -> String {
        let data = match self {
            Self::Start => serde_json::json!({ "message": "Agent task execution started..." }),
            Self::Token(token) => serde_json::json!({ "token": token }),
            Self::End => serde_json::json!({ "message": "Task completed successfully!" }),
        };
        data.to_string()
    }

    fn into_event(self) -> Event {
        let event = Event::default().data(self.data());
        match self {
            Self::Start => event.event("task_start"),
            Self::Token(_) => event,
            Self::End => event.event("task_end"),
        }
    }
}

/// Produces the simulated run until it finishes or the receiver is dropped.
async fn simulate_run(tx: mpsc::Sender<AgentEvent>, prompt: String, email: String) {
    if tx.send(AgentEvent::Start).await.is_err() {
        return;
    }
    tokio::time::sleep(PHASE_DELAY).await;

    let output =
        format!("Simulating execution for prompt: '{prompt}' on behalf of user '{email}'. ");
    for word in output.split_whitespace() {
        if tx.send(AgentEvent::Token(word.to_owned())).await.is_err() {
            tracing::info!(target: TRACING_TARGET, "client disconnected, stopping agent run");
            return;
        }
        tokio::time::sleep(TOKEN_DELAY).await;
    }

    tokio::time::sleep(PHASE_DELAY).await;
    let _ = tx.send(AgentEvent::End).await;
}

/// Starts a simulated agent run for the caller.
#[tracing::instrument(skip_all, fields(account_id = auth_state.account_id()))]
async fn run_agent(
    auth_state: ActiveAccount,
    ValidateJson(request): ValidateJson<AgentRun>,
) -> Result<impl IntoResponse> {
    let (tx, rx) = mpsc::channel::<AgentEvent>(32);

    // The identity is captured now and not re-checked while streaming.
    let email = auth_state.account().email.clone();
    tokio::spawn(simulate_run(tx, request.prompt, email));

    tracing::info!(target: TRACING_TARGET, "agent run started");

    let stream = ReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(event.into_event()));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/agent/run", post(run_agent))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test(start_paused = true)]
    async fn run_emits_start_tokens_and_end() {
        let (tx, mut rx) = mpsc::channel(32);
        tokio::spawn(simulate_run(tx, "deploy".to_owned(), "alice@example.com".to_owned()));

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.first(), Some(&AgentEvent::Start));
        assert_eq!(events.last(), Some(&AgentEvent::End));

        let tokens: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::Token(token) => Some(token.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tokens.first(), Some(&"Simulating"));
        assert_eq!(tokens.last(), Some(&"'alice@example.com'."));
        assert!(tokens.iter().all(|t| !t.contains(' ')));
        assert_eq!(
            tokens.join(" "),
            "Simulating execution for prompt: 'deploy' on behalf of user 'alice@example.com'."
        );
        assert_eq!(events.len(), 2 + 10);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_when_receiver_is_dropped() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(simulate_run(tx, "p".to_owned(), "a@b.c".to_owned()));

        assert_eq!(rx.recv().await, Some(AgentEvent::Start));
        drop(rx);

        assert!(handle.await.is_ok());
    }

    #[test]
    fn event_payloads() {
        assert_eq!(
            AgentEvent::Start.data(),
            r#"{"message":"Agent task execution started..."}"#
        );
        assert_eq!(
            AgentEvent::Token("word".to_owned()).data(),
            r#"{"token":"word"}"#
        );
        assert_eq!(
            AgentEvent::End.data(),
            r#"{"message":"Task completed successfully!"}"#
        );
    }

    #[tokio::test]
    async fn run_requires_a_token() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/agent/run")
            .json(&serde_json::json!({ "prompt": "deploy" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
