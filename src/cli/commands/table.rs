use anyhow::Result;

use super::Command;
use crate::workflow::{transition_table, State, TransitionTable};

pub struct TableCommand;

impl Command for TableCommand {
    async fn execute(&self) -> Result<()> {
        let table = transition_table()?;
        print!("{}", render_table(table));
        Ok(())
    }
}

/// One line per edge, grouped by source state, terminal states last.
pub fn render_table(table: &TransitionTable) -> String {
    let mut out = format!("initial: {}\n", table.initial());
    for state in State::ALL {
        if state.is_terminal() {
            out.push_str(&format!("{state} (terminal)\n"));
            continue;
        }
        for edge in table.outgoing(state) {
            out.push_str(&format!("{} --{}--> {}\n", edge.source, edge.event, edge.target));
        }
    }
    out
}
