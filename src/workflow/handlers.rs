use tracing::{info, warn};

use super::context::WorkflowContext;
use super::types::{Event, State, WorkflowError};
use crate::agents::Agents;

/// Run the step handler bound to `state`.
///
/// Returns the event the handler chose, or `None` for states without a
/// handler (the initial and terminal states). An agent failure aborts the
/// step without emitting anything.
pub async fn run_step(
    state: State,
    ctx: &mut WorkflowContext,
    agents: &dyn Agents,
) -> Result<Option<Event>, WorkflowError> {
    let event = match state {
        State::RequirementsEvaluation => evaluate_requirements(ctx, agents).await?,
        State::ScriptGeneration => generate_script(ctx, agents).await?,
        State::SolutionVerification => verify_solution(ctx, agents).await?,
        State::RequirementsRevision => rewrite_requirements(ctx, agents).await?,
        State::AwaitingInput | State::SuccessfulCompletion | State::InvalidRequirements => {
            return Ok(None)
        }
    };
    Ok(Some(event))
}

async fn evaluate_requirements(
    ctx: &WorkflowContext,
    agents: &dyn Agents,
) -> Result<Event, WorkflowError> {
    info!("Evaluating requirements");
    if agents.evaluate_feasibility(ctx.requirements()).await? {
        Ok(Event::RequirementsEvaluated)
    } else {
        warn!("Requirements judged infeasible");
        Ok(Event::RequirementsRejected)
    }
}

async fn generate_script(
    ctx: &mut WorkflowContext,
    agents: &dyn Agents,
) -> Result<Event, WorkflowError> {
    info!("Generating script");
    let script = agents.generate_script(ctx.requirements()).await?;
    ctx.set_script(script);
    Ok(Event::ScriptGenerated)
}

async fn verify_solution(
    ctx: &WorkflowContext,
    agents: &dyn Agents,
) -> Result<Event, WorkflowError> {
    info!("Verifying solution");
    let script = ctx.require_script()?;
    if agents.verify_script(ctx.requirements(), script).await? {
        Ok(Event::SolutionVerified)
    } else {
        info!("Solution rejected, revising requirements");
        Ok(Event::SolutionRejected)
    }
}

async fn rewrite_requirements(
    ctx: &mut WorkflowContext,
    agents: &dyn Agents,
) -> Result<Event, WorkflowError> {
    info!("Rewriting requirements");
    let script = ctx.require_script()?;
    let revised = agents
        .rewrite_requirements(ctx.requirements(), script)
        .await?;
    ctx.set_requirements(revised);
    Ok(Event::RequirementsRewritten)
}
