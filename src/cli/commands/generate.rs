use anyhow::Result;

use super::{build_orchestrator, Command};
use crate::config::ScriptflowConfig;

pub struct GenerateCommand {
    pub requirements: String,
    pub config: ScriptflowConfig,
}

impl GenerateCommand {
    pub fn new(requirements: String, config: ScriptflowConfig) -> Self {
        Self {
            requirements,
            config,
        }
    }
}

impl Command for GenerateCommand {
    async fn execute(&self) -> Result<()> {
        let requirements = self.requirements.trim();
        if requirements.is_empty() {
            anyhow::bail!("No input provided.");
        }

        let orchestrator = build_orchestrator(&self.config)?;
        let response = orchestrator.generate(requirements).await?;
        println!("{response}");
        Ok(())
    }
}
