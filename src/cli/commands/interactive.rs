use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{build_orchestrator, Command};
use crate::config::ScriptflowConfig;
use crate::workflow::WorkflowOrchestrator;

const WELCOME: &str = "Welcome to the Python CLI Application Generator!

Please describe the requirements for the application you need.
Clearly specify the desired functionality in a concise manner,
ensuring it can be implemented in a single Python file.
";

const PROMPT: &str = "Enter your requirements below (type 'exit' to close the program):
Example: \"Create a Python CLI that converts temperatures between Celsius and Fahrenheit.\"
";

const NO_INPUT: &str =
    "No input provided. Please enter your requirements or type 'exit' to close the program.";

pub struct InteractiveCommand {
    pub config: ScriptflowConfig,
}

impl InteractiveCommand {
    pub fn new(config: ScriptflowConfig) -> Self {
        Self { config }
    }
}

impl Command for InteractiveCommand {
    async fn execute(&self) -> Result<()> {
        let orchestrator = build_orchestrator(&self.config)?;
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        run_session(&orchestrator, stdin, &mut stdout).await
    }
}

/// Read requirements line by line until `exit` or end of input.
/// Run failures are reported inline and the session continues.
pub async fn run_session<R, W>(
    orchestrator: &WorkflowOrchestrator,
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(WELCOME.as_bytes()).await?;

    loop {
        output.write_all(format!("\n{PROMPT}> ").as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let requirements = line.trim();

        if requirements.eq_ignore_ascii_case("exit") {
            output.write_all(b"Exiting...\n").await?;
            break;
        }
        if requirements.is_empty() {
            output.write_all(format!("{NO_INPUT}\n").as_bytes()).await?;
            continue;
        }

        let text = match orchestrator.generate(requirements).await {
            Ok(response) => format!("\n--- Result ---\n\n{response}\n\n----------------\n"),
            Err(e) => format!("An error occurred while processing your request: {e}\n"),
        };
        output.write_all(text.as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}
