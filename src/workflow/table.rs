use std::collections::HashMap;
use std::sync::LazyLock;

use super::types::{ConfigurationError, Event, State, Transition};

/// Edges of the generate/evaluate/verify/revise pipeline.
pub const TRANSITIONS: [Transition; 7] = [
    Transition::new(State::AwaitingInput, Event::InputReceived, State::RequirementsEvaluation),
    Transition::new(State::RequirementsEvaluation, Event::RequirementsEvaluated, State::ScriptGeneration),
    Transition::new(State::RequirementsEvaluation, Event::RequirementsRejected, State::InvalidRequirements),
    Transition::new(State::ScriptGeneration, Event::ScriptGenerated, State::SolutionVerification),
    Transition::new(State::SolutionVerification, Event::SolutionVerified, State::SuccessfulCompletion),
    Transition::new(State::SolutionVerification, Event::SolutionRejected, State::RequirementsRevision),
    Transition::new(State::RequirementsRevision, Event::RequirementsRewritten, State::ScriptGeneration),
];

/// Immutable lookup of `(state, event) -> target`.
///
/// Built once and shared by reference across all concurrent runs.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    initial: State,
    edges: Vec<Transition>,
    lookup: HashMap<(State, Event), State>,
}

impl TransitionTable {
    /// Build a table from an edge list, rejecting ambiguous edges, dead ends,
    /// and terminal states with exits.
    pub fn new(initial: State, edges: &[Transition]) -> Result<Self, ConfigurationError> {
        if initial.is_terminal() {
            return Err(ConfigurationError::TerminalInitial(initial));
        }

        let mut lookup = HashMap::with_capacity(edges.len());
        for edge in edges {
            if lookup.insert((edge.source, edge.event), edge.target).is_some() {
                return Err(ConfigurationError::Ambiguous {
                    state: edge.source,
                    event: edge.event,
                });
            }
        }

        for state in State::ALL {
            let has_exit = edges.iter().any(|edge| edge.source == state);
            if state.is_terminal() && has_exit {
                return Err(ConfigurationError::TerminalHasExit(state));
            }
            if !state.is_terminal() && !has_exit {
                return Err(ConfigurationError::DeadEnd(state));
            }
        }

        Ok(Self {
            initial,
            edges: edges.to_vec(),
            lookup,
        })
    }

    /// The table for the script generation pipeline.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Self::new(State::INITIAL, &TRANSITIONS)
    }

    pub fn initial(&self) -> State {
        self.initial
    }

    pub fn target(&self, state: State, event: Event) -> Option<State> {
        self.lookup.get(&(state, event)).copied()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.edges
    }

    pub fn outgoing(&self, state: State) -> impl Iterator<Item = &Transition> {
        self.edges.iter().filter(move |edge| edge.source == state)
    }
}

static TRANSITION_TABLE: LazyLock<Result<TransitionTable, ConfigurationError>> =
    LazyLock::new(TransitionTable::standard);

/// Get the process-wide transition table.
pub fn transition_table() -> Result<&'static TransitionTable, ConfigurationError> {
    TRANSITION_TABLE.as_ref().map_err(|e| e.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_table_is_valid() {
        let table = TransitionTable::standard().unwrap();
        assert_eq!(table.initial(), State::AwaitingInput);
        assert_eq!(table.transitions().len(), 7);
        assert_eq!(table.outgoing(State::SuccessfulCompletion).count(), 0);
        assert_eq!(table.outgoing(State::InvalidRequirements).count(), 0);
    }

    #[test]
    fn test_lookup_matches_edge_list() {
        let table = transition_table().unwrap();
        for edge in TRANSITIONS {
            assert_eq!(table.target(edge.source, edge.event), Some(edge.target));
        }
        assert_eq!(table.target(State::AwaitingInput, Event::ScriptGenerated), None);
    }

    #[test]
    fn test_undeclared_pairs_have_no_target() {
        let table = transition_table().unwrap();
        let declared: HashSet<(State, Event)> =
            TRANSITIONS.iter().map(|t| (t.source, t.event)).collect();

        for state in State::ALL {
            for event in Event::ALL {
                if !declared.contains(&(state, event)) {
                    assert_eq!(table.target(state, event), None, "{state} x {event}");
                }
            }
        }
    }

    #[test]
    fn test_rejects_dead_end() {
        let edges: Vec<Transition> = TRANSITIONS
            .iter()
            .copied()
            .filter(|t| t.source != State::RequirementsRevision)
            .collect();
        assert_eq!(
            TransitionTable::new(State::AwaitingInput, &edges).unwrap_err(),
            ConfigurationError::DeadEnd(State::RequirementsRevision)
        );
    }

    #[test]
    fn test_rejects_terminal_exit() {
        let mut edges = TRANSITIONS.to_vec();
        edges.push(Transition::new(
            State::InvalidRequirements,
            Event::InputReceived,
            State::RequirementsEvaluation,
        ));
        assert_eq!(
            TransitionTable::new(State::AwaitingInput, &edges).unwrap_err(),
            ConfigurationError::TerminalHasExit(State::InvalidRequirements)
        );
    }

    #[test]
    fn test_rejects_ambiguous_edge() {
        let mut edges = TRANSITIONS.to_vec();
        edges.push(Transition::new(
            State::AwaitingInput,
            Event::InputReceived,
            State::ScriptGeneration,
        ));
        assert!(matches!(
            TransitionTable::new(State::AwaitingInput, &edges),
            Err(ConfigurationError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_rejects_terminal_initial_state() {
        assert_eq!(
            TransitionTable::new(State::SuccessfulCompletion, &TRANSITIONS).unwrap_err(),
            ConfigurationError::TerminalInitial(State::SuccessfulCompletion)
        );
    }

    #[test]
    fn test_each_terminal_reachable_by_single_simple_path() {
        // Count simple paths (no repeated state) from the initial state
        fn count_paths(
            table: &TransitionTable,
            from: State,
            goal: State,
            seen: &mut Vec<State>,
        ) -> usize {
            if from == goal {
                return 1;
            }
            let mut total = 0;
            for edge in table.outgoing(from) {
                if seen.contains(&edge.target) {
                    continue;
                }
                seen.push(edge.target);
                total += count_paths(table, edge.target, goal, seen);
                seen.pop();
            }
            total
        }

        let table = transition_table().unwrap();
        for goal in [State::SuccessfulCompletion, State::InvalidRequirements] {
            let mut seen = vec![table.initial()];
            assert_eq!(count_paths(table, table.initial(), goal, &mut seen), 1, "{goal}");
        }
    }

    #[test]
    fn test_every_state_reachable() {
        let table = transition_table().unwrap();
        let mut reached = HashSet::from([table.initial()]);
        let mut frontier = vec![table.initial()];
        while let Some(state) = frontier.pop() {
            for edge in table.outgoing(state) {
                if reached.insert(edge.target) {
                    frontier.push(edge.target);
                }
            }
        }
        assert_eq!(reached.len(), State::ALL.len());
    }
}
