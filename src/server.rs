//! HTTP entry point for the workflow.
//!
//! `POST /api/process-instruction` takes `{"instruction": "..."}` and answers
//! with the generated script or the rejection text as plain text.

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::workflow::{WorkflowError, WorkflowOrchestrator};

#[derive(Debug, Deserialize)]
pub struct InstructionRequest {
    #[serde(default)]
    pub instruction: Option<String>,
}

/// Errors returned to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No instruction provided.")]
    MissingInstruction,
    #[error("An error occurred while processing your request: {0}")]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingInstruction => StatusCode::BAD_REQUEST,
            ApiError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn router(orchestrator: Arc<WorkflowOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/process-instruction", post(process_instruction))
        .with_state(orchestrator)
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn process_instruction(
    State(orchestrator): State<Arc<WorkflowOrchestrator>>,
    Json(request): Json<InstructionRequest>,
) -> Result<String, ApiError> {
    let instruction = request
        .instruction
        .filter(|text| !text.trim().is_empty())
        .ok_or(ApiError::MissingInstruction)?;

    Ok(orchestrator.generate(&instruction).await?)
}

/// Bind `address` and serve until Ctrl-C.
pub async fn serve(address: &str, orchestrator: Arc<WorkflowOrchestrator>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "Listening for instructions");

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
