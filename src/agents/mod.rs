// Agent capabilities consumed by the workflow engine.
// The engine only sees this trait; how an answer is produced is up to the implementation.

pub mod llm;

use async_trait::async_trait;
use thiserror::Error;

pub use llm::LlmAgents;

/// Failure of a single agent capability call.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Request to model endpoint failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed agent response: {0}")]
    MalformedResponse(String),
    #[error("Agent returned an empty response")]
    EmptyResponse,
}

/// The four capabilities the pipeline depends on.
///
/// Each call is a plain request/response; retries, if any, belong to the
/// implementation rather than the engine.
#[async_trait]
pub trait Agents: Send + Sync {
    /// Decide whether the requirements can be implemented at all.
    async fn evaluate_feasibility(&self, requirements: &str) -> Result<bool, AgentError>;

    /// Produce a candidate script for the requirements.
    async fn generate_script(&self, requirements: &str) -> Result<String, AgentError>;

    /// Check that `script` satisfies `requirements`.
    async fn verify_script(&self, requirements: &str, script: &str) -> Result<bool, AgentError>;

    /// Rewrite the requirements given a script that failed verification.
    async fn rewrite_requirements(
        &self,
        requirements: &str,
        script: &str,
    ) -> Result<String, AgentError>;
}
