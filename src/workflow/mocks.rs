// Scripted agent for engine tests - no network, records every call

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::agents::{AgentError, Agents};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallLog {
    pub evaluate: usize,
    pub generate: usize,
    pub verify: usize,
    pub rewrite: usize,
    pub rewrite_inputs: Vec<String>,
    pub verified_scripts: Vec<String>,
}

impl CallLog {
    pub fn total(&self) -> usize {
        self.evaluate + self.generate + self.verify + self.rewrite
    }
}

/// Agent whose answers are queued up front.
///
/// Exhausted queues fall back to: scripts `script-<n>`, verdict `true`,
/// rewrites `revised-<n>`.
#[derive(Debug, Default)]
pub struct ScriptedAgents {
    infeasible: bool,
    fail_generation: bool,
    generation_delay: Option<Duration>,
    scripts: Mutex<VecDeque<String>>,
    verdicts: Mutex<VecDeque<bool>>,
    rewrites: Mutex<VecDeque<String>>,
    log: Mutex<CallLog>,
}

impl ScriptedAgents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feasible(mut self, feasible: bool) -> Self {
        self.infeasible = !feasible;
        self
    }

    pub fn scripts<I, S>(self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts
            .lock()
            .unwrap()
            .extend(scripts.into_iter().map(Into::into));
        self
    }

    pub fn verdicts(self, verdicts: impl IntoIterator<Item = bool>) -> Self {
        self.verdicts.lock().unwrap().extend(verdicts);
        self
    }

    pub fn rewrites<I, S>(self, rewrites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rewrites
            .lock()
            .unwrap()
            .extend(rewrites.into_iter().map(Into::into));
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    pub fn generation_delay(mut self, delay: Duration) -> Self {
        self.generation_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> CallLog {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agents for ScriptedAgents {
    async fn evaluate_feasibility(&self, _requirements: &str) -> Result<bool, AgentError> {
        self.log.lock().unwrap().evaluate += 1;
        Ok(!self.infeasible)
    }

    async fn generate_script(&self, _requirements: &str) -> Result<String, AgentError> {
        let n = {
            let mut log = self.log.lock().unwrap();
            log.generate += 1;
            log.generate
        };
        if let Some(delay) = self.generation_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_generation {
            return Err(AgentError::Status {
                status: 503,
                body: "scripted failure".to_string(),
            });
        }
        let next = self.scripts.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| format!("script-{n}")))
    }

    async fn verify_script(&self, _requirements: &str, script: &str) -> Result<bool, AgentError> {
        {
            let mut log = self.log.lock().unwrap();
            log.verify += 1;
            log.verified_scripts.push(script.to_string());
        }
        Ok(self.verdicts.lock().unwrap().pop_front().unwrap_or(true))
    }

    async fn rewrite_requirements(
        &self,
        requirements: &str,
        _script: &str,
    ) -> Result<String, AgentError> {
        let n = {
            let mut log = self.log.lock().unwrap();
            log.rewrite += 1;
            log.rewrite_inputs.push(requirements.to_string());
            log.rewrite
        };
        let next = self.rewrites.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| format!("revised-{n}")))
    }
}
