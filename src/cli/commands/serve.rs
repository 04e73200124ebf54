use anyhow::Result;

use super::{build_orchestrator, Command};
use crate::config::ScriptflowConfig;
use crate::server;

pub struct ServeCommand {
    pub bind: Option<String>,
    pub config: ScriptflowConfig,
}

impl ServeCommand {
    pub fn new(config: ScriptflowConfig) -> Self {
        Self { bind: None, config }
    }

    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        self.bind = bind;
        self
    }
}

impl Command for ServeCommand {
    async fn execute(&self) -> Result<()> {
        let orchestrator = build_orchestrator(&self.config)?;
        let address = self
            .bind
            .as_deref()
            .unwrap_or(&self.config.server.bind_address);
        server::serve(address, orchestrator).await
    }
}
