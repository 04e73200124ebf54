// Scriptflow Library - requirements to verified script workflow
// This exposes the core components for testing and integration

pub mod agents;
pub mod cli;
pub mod config;
pub mod server;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use agents::{AgentError, Agents, LlmAgents};
pub use config::{config, init_config, ScriptflowConfig, WorkflowSettings};
pub use telemetry::{create_run_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    transition_table, Event, Machine, MachineObserver, RunOutcome, State, StateChange,
    TransitionTable, WorkflowContext, WorkflowError, WorkflowOrchestrator,
};
