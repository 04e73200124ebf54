use anyhow::Result;
use std::sync::Arc;

use crate::agents::LlmAgents;
use crate::config::ScriptflowConfig;
use crate::workflow::WorkflowOrchestrator;

pub mod generate;
pub mod init;
pub mod interactive;
pub mod serve;
pub mod table;

pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use interactive::InteractiveCommand;
pub use serve::ServeCommand;
pub use table::TableCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Wire the model-backed agents into an orchestrator.
pub fn build_orchestrator(config: &ScriptflowConfig) -> Result<Arc<WorkflowOrchestrator>> {
    let agents = LlmAgents::new(&config.llm)?;
    let orchestrator = WorkflowOrchestrator::new(Arc::new(agents), config.workflow.clone())?;
    Ok(Arc::new(orchestrator))
}
