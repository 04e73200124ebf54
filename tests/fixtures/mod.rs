/// Agent doubles for driving the workflow through its public API
use async_trait::async_trait;
use scriptflow::{AgentError, Agents};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Agent whose answers are derived from the requirements text, so
/// concurrent runs can be checked against their own input.
///
/// `[reject]` makes the input infeasible; `[revise]` fails verification
/// until the requirements have been rewritten once.
#[derive(Debug, Default)]
pub struct EchoAgents;

pub fn echo_script(requirements: &str) -> String {
    format!("# script for: {requirements}")
}

#[async_trait]
impl Agents for EchoAgents {
    async fn evaluate_feasibility(&self, requirements: &str) -> Result<bool, AgentError> {
        tokio::time::sleep(Duration::from_millis((requirements.len() % 5) as u64)).await;
        Ok(!requirements.contains("[reject]"))
    }

    async fn generate_script(&self, requirements: &str) -> Result<String, AgentError> {
        tokio::time::sleep(Duration::from_millis((requirements.len() % 7) as u64)).await;
        Ok(echo_script(requirements))
    }

    async fn verify_script(&self, requirements: &str, script: &str) -> Result<bool, AgentError> {
        tokio::task::yield_now().await;
        Ok(script == echo_script(requirements) && !requirements.contains("[revise]"))
    }

    async fn rewrite_requirements(
        &self,
        requirements: &str,
        _script: &str,
    ) -> Result<String, AgentError> {
        tokio::task::yield_now().await;
        Ok(requirements.replace("[revise]", "[revised]"))
    }
}

/// Agent with queued verdicts that counts every capability call.
#[derive(Debug, Default)]
pub struct CountingAgents {
    pub feasible: bool,
    pub generation_delay: Option<Duration>,
    verdicts: Mutex<VecDeque<bool>>,
    pub evaluations: AtomicUsize,
    pub generations: AtomicUsize,
    pub verifications: AtomicUsize,
    pub rewrites: AtomicUsize,
}

impl CountingAgents {
    pub fn new(feasible: bool, verdicts: impl IntoIterator<Item = bool>) -> Self {
        Self {
            feasible,
            verdicts: Mutex::new(verdicts.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn with_generation_delay(mut self, delay: Duration) -> Self {
        self.generation_delay = Some(delay);
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agents for CountingAgents {
    async fn evaluate_feasibility(&self, _requirements: &str) -> Result<bool, AgentError> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        Ok(self.feasible)
    }

    async fn generate_script(&self, _requirements: &str) -> Result<String, AgentError> {
        let n = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.generation_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(format!("generated #{n}"))
    }

    async fn verify_script(&self, _requirements: &str, _script: &str) -> Result<bool, AgentError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        Ok(self.verdicts.lock().unwrap().pop_front().unwrap_or(true))
    }

    async fn rewrite_requirements(
        &self,
        requirements: &str,
        _script: &str,
    ) -> Result<String, AgentError> {
        self.rewrites.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{requirements} (clarified)"))
    }
}
