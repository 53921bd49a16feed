//! Agent request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for starting a simulated agent run.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AgentRun {
    /// Prompt the agent should work on.
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
}
