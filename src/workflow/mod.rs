// Script generation workflow: transition table, typed extended state,
// step handlers, the machine engine and the per-request orchestrator.

pub mod context;
pub mod handlers;
pub mod machine;
pub mod orchestrator;
pub mod table;
pub mod types;

#[cfg(test)]
pub mod mocks;

pub use context::WorkflowContext;
pub use machine::{Machine, MachineObserver};
pub use orchestrator::{ResultSlot, RunOutcome, WorkflowOrchestrator};
pub use table::{transition_table, TransitionTable, TRANSITIONS};
pub use types::{ConfigurationError, Event, State, StateChange, Transition, WorkflowError};
