use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::agents::AgentError;

/// States of the script generation workflow.
///
/// Every run starts in `AwaitingInput` and ends in either
/// `SuccessfulCompletion` or `InvalidRequirements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    AwaitingInput,
    RequirementsEvaluation,
    ScriptGeneration,
    SolutionVerification,
    RequirementsRevision,
    SuccessfulCompletion,
    InvalidRequirements,
}

impl State {
    pub const ALL: [State; 7] = [
        State::AwaitingInput,
        State::RequirementsEvaluation,
        State::ScriptGeneration,
        State::SolutionVerification,
        State::RequirementsRevision,
        State::SuccessfulCompletion,
        State::InvalidRequirements,
    ];

    pub const INITIAL: State = State::AwaitingInput;

    pub fn is_terminal(self) -> bool {
        matches!(self, State::SuccessfulCompletion | State::InvalidRequirements)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::AwaitingInput => "AwaitingInput",
            State::RequirementsEvaluation => "RequirementsEvaluation",
            State::ScriptGeneration => "ScriptGeneration",
            State::SolutionVerification => "SolutionVerification",
            State::RequirementsRevision => "RequirementsRevision",
            State::SuccessfulCompletion => "SuccessfulCompletion",
            State::InvalidRequirements => "InvalidRequirements",
        };
        f.write_str(name)
    }
}

/// Events that drive the workflow. Only step handlers and the
/// orchestrator's kick-off produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    InputReceived,
    RequirementsEvaluated,
    RequirementsRejected,
    ScriptGenerated,
    SolutionVerified,
    SolutionRejected,
    RequirementsRewritten,
}

impl Event {
    pub const ALL: [Event; 7] = [
        Event::InputReceived,
        Event::RequirementsEvaluated,
        Event::RequirementsRejected,
        Event::ScriptGenerated,
        Event::SolutionVerified,
        Event::SolutionRejected,
        Event::RequirementsRewritten,
    ];
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::InputReceived => "InputReceived",
            Event::RequirementsEvaluated => "RequirementsEvaluated",
            Event::RequirementsRejected => "RequirementsRejected",
            Event::ScriptGenerated => "ScriptGenerated",
            Event::SolutionVerified => "SolutionVerified",
            Event::SolutionRejected => "SolutionRejected",
            Event::RequirementsRewritten => "RequirementsRewritten",
        };
        f.write_str(name)
    }
}

/// A directed, event-labeled edge between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub source: State,
    pub event: Event,
    pub target: State,
}

impl Transition {
    pub const fn new(source: State, event: Event, target: State) -> Self {
        Self { source, event, target }
    }
}

/// Record of an applied transition, kept for the run's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub from: State,
    pub to: State,
    pub event: Event,
    pub at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Failures that abort a single workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No requirements provided")]
    EmptyInput,
    #[error("No transition from {state} on event {event}")]
    NoMatchingTransition { state: State, event: Event },
    #[error("Agent call failed: {0}")]
    Agent(#[from] AgentError),
    #[error("Required variable '{0}' is not set")]
    MissingVariable(&'static str),
    #[error("Workflow did not finish within {seconds} seconds")]
    Timeout { seconds: u64 },
    #[error("Workflow run ended without producing a result")]
    Aborted,
}

/// Raised when the transition table violates its structural contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Non-terminal state {0} has no outgoing transition")]
    DeadEnd(State),
    #[error("Terminal state {0} has an outgoing transition")]
    TerminalHasExit(State),
    #[error("Duplicate transition from {state} on event {event}")]
    Ambiguous { state: State, event: Event },
    #[error("Initial state {0} must not be terminal")]
    TerminalInitial(State),
}
