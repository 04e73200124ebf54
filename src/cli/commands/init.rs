use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use super::Command;
use crate::config::ScriptflowConfig;

/// Writes a starter `scriptflow.toml` with every setting at its default.
pub struct InitCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitCommand {
    pub fn new(path: PathBuf, force: bool) -> Self {
        Self { path, force }
    }
}

impl Command for InitCommand {
    async fn execute(&self) -> Result<()> {
        write_default_config(&self.path, self.force)?;
        println!("Wrote {}", self.path.display());
        Ok(())
    }
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    ScriptflowConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow!("Failed to save configuration: {}", e))
}
