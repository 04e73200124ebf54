use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{error, info, warn, Instrument};

use super::context::WorkflowContext;
use super::machine::{Machine, MachineObserver};
use super::table::{transition_table, TransitionTable};
use super::types::{ConfigurationError, Event, State, StateChange, WorkflowError};
use crate::agents::Agents;
use crate::config::WorkflowSettings;
use crate::telemetry::{create_run_span, generate_correlation_id};

/// Final result of one workflow run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The verified script.
    Completed(String),
    /// The requirements were judged infeasible.
    Rejected(String),
    Failed(WorkflowError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// Collapse into the caller-facing shape: text on success or rejection.
    pub fn into_result(self) -> Result<String, WorkflowError> {
        match self {
            RunOutcome::Completed(text) | RunOutcome::Rejected(text) => Ok(text),
            RunOutcome::Failed(e) => Err(e),
        }
    }
}

/// Single-use result cell. The first `resolve` wins; later calls are no-ops.
#[derive(Debug)]
pub struct ResultSlot {
    sender: Mutex<Option<oneshot::Sender<RunOutcome>>>,
}

impl ResultSlot {
    pub fn channel() -> (Self, oneshot::Receiver<RunOutcome>) {
        let (sender, receiver) = oneshot::channel();
        let slot = Self {
            sender: Mutex::new(Some(sender)),
        };
        (slot, receiver)
    }

    /// Returns true if this call delivered the outcome.
    pub fn resolve(&self, outcome: RunOutcome) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }
}

/// Resolves the run's slot when the machine enters a terminal state.
struct TerminalObserver {
    slot: Arc<ResultSlot>,
    rejection_message: String,
}

impl MachineObserver for TerminalObserver {
    fn state_changed(&self, change: &StateChange, context: &WorkflowContext) {
        match change.to {
            State::SuccessfulCompletion => {
                let outcome = match context.script() {
                    Some(script) => RunOutcome::Completed(script.to_string()),
                    None => {
                        error!("Script not found at successful completion");
                        RunOutcome::Failed(WorkflowError::MissingVariable("script"))
                    }
                };
                self.slot.resolve(outcome);
            }
            State::InvalidRequirements => {
                warn!("Workflow ended due to invalid requirements");
                self.slot
                    .resolve(RunOutcome::Rejected(self.rejection_message.clone()));
            }
            _ => {}
        }
    }
}

/// Runs requests through private machine instances with a bounded wait.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    table: &'static TransitionTable,
    agents: Arc<dyn Agents>,
    settings: WorkflowSettings,
}

impl WorkflowOrchestrator {
    pub fn new(
        agents: Arc<dyn Agents>,
        settings: WorkflowSettings,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::with_table(transition_table()?, agents, settings))
    }

    pub fn with_table(
        table: &'static TransitionTable,
        agents: Arc<dyn Agents>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            table,
            agents,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Run the pipeline for `raw_input` and wait for its outcome.
    ///
    /// Exactly one outcome is produced per call. On deadline the machine is
    /// dropped mid-step and its result, if any, is discarded.
    pub async fn run(&self, raw_input: &str) -> RunOutcome {
        if raw_input.trim().is_empty() {
            return RunOutcome::Failed(WorkflowError::EmptyInput);
        }

        let correlation_id = generate_correlation_id();
        let span = create_run_span(&correlation_id);
        let (slot, mut receiver) = ResultSlot::channel();
        let slot = Arc::new(slot);

        let mut machine = Machine::create(
            self.table,
            self.agents.clone(),
            WorkflowContext::new(raw_input),
        );
        machine.add_observer(TerminalObserver {
            slot: slot.clone(),
            rejection_message: self.settings.rejection_message.clone(),
        });

        // Driven inline: dropping this future, on deadline or by the caller,
        // drops the machine and any in-flight agent call with it.
        let drive = async move {
            info!("Workflow run started");
            if let Err(e) = machine.fire(Event::InputReceived).await {
                slot.resolve(RunOutcome::Failed(e));
            }
            machine.clear_observers();
        }
        .instrument(span.clone());

        let seconds = self.settings.timeout_seconds;
        let outcome = match tokio::time::timeout(Duration::from_secs(seconds), drive).await {
            Ok(()) => receiver
                .try_recv()
                .unwrap_or_else(|_| RunOutcome::Failed(WorkflowError::Aborted)),
            Err(_) => RunOutcome::Failed(WorkflowError::Timeout { seconds }),
        };

        span.in_scope(|| match &outcome {
            RunOutcome::Completed(script) => {
                info!(script_chars = script.len(), "Workflow run completed")
            }
            RunOutcome::Rejected(_) => info!("Workflow run rejected requirements"),
            RunOutcome::Failed(e) => error!(error = %e, "State machine execution failed"),
        });

        outcome
    }

    /// Caller-facing entry point: the script or rejection text, or the failure.
    pub async fn generate(&self, requirements: &str) -> Result<String, WorkflowError> {
        self.run(requirements).await.into_result()
    }
}
