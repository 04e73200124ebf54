use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::context::WorkflowContext;
use super::handlers;
use super::table::TransitionTable;
use super::types::{Event, State, StateChange, WorkflowError};
use crate::agents::Agents;

/// Callback interface for watching a machine.
pub trait MachineObserver: Send + Sync {
    /// Called after every applied transition, before the new state's handler runs.
    fn state_changed(&self, change: &StateChange, context: &WorkflowContext);

    /// Called when the machine rejects an event or a handler fails.
    fn machine_error(&self, _error: &WorkflowError) {}
}

/// One workflow instance: current state, extended state and observers.
///
/// A machine is owned by exactly one run and never shared.
pub struct Machine {
    table: &'static TransitionTable,
    agents: Arc<dyn Agents>,
    state: State,
    entered_at: Instant,
    context: WorkflowContext,
    observers: Vec<Box<dyn MachineObserver>>,
    history: Vec<StateChange>,
}

impl Machine {
    pub fn create(
        table: &'static TransitionTable,
        agents: Arc<dyn Agents>,
        context: WorkflowContext,
    ) -> Self {
        Self {
            table,
            agents,
            state: table.initial(),
            entered_at: Instant::now(),
            context,
            observers: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: impl MachineObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    /// Applied transitions, oldest first.
    pub fn history(&self) -> &[StateChange] {
        &self.history
    }

    /// Apply `event` and run handlers until a state emits nothing.
    ///
    /// Each handler's chosen event is fed straight back in, so a single call
    /// drives the run to a terminal state or to the first failure. On failure
    /// the machine stays in the state it had reached.
    pub async fn fire(&mut self, event: Event) -> Result<State, WorkflowError> {
        let mut next = Some(event);

        while let Some(event) = next {
            self.apply(event)?;

            next = match handlers::run_step(self.state, &mut self.context, self.agents.as_ref())
                .await
            {
                Ok(event) => event,
                Err(e) => {
                    error!(state = %self.state, error = %e, "Workflow step failed");
                    self.report(&e);
                    return Err(e);
                }
            };
        }

        Ok(self.state)
    }

    fn apply(&mut self, event: Event) -> Result<(), WorkflowError> {
        let Some(target) = self.table.target(self.state, event) else {
            let e = WorkflowError::NoMatchingTransition {
                state: self.state,
                event,
            };
            error!(state = %self.state, event = %event, "Invalid workflow transition");
            self.report(&e);
            return Err(e);
        };

        let change = StateChange {
            from: self.state,
            to: target,
            event,
            at: Utc::now(),
            duration_ms: self.entered_at.elapsed().as_millis() as u64,
        };

        info!(
            from_state = %change.from,
            to_state = %change.to,
            event = %change.event,
            duration_ms = %change.duration_ms,
            "Workflow state transition"
        );

        self.state = target;
        self.entered_at = Instant::now();
        for observer in &self.observers {
            observer.state_changed(&change, &self.context);
        }
        self.history.push(change);

        Ok(())
    }

    fn report(&self, e: &WorkflowError) {
        for observer in &self.observers {
            observer.machine_error(e);
        }
    }
}
