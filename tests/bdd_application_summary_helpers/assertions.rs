//! Then step definitions for application summary BDD tests.

use ccactor::actor::ApplicationSummary;
use ccactor::cloud_controller::InstanceState;
use ccactor::error::{ActionError, ResourceKind};
use rstest_bdd_macros::then;

use super::state::{ApplicationSummaryState, StepResult, SummaryOutcome};

fn outcome(application_summary_state: &ApplicationSummaryState) -> StepResult<SummaryOutcome> {
    application_summary_state
        .outcome
        .get()
        .ok_or_else(|| String::from("outcome should be set"))
}

fn summary(application_summary_state: &ApplicationSummaryState) -> StepResult<ApplicationSummary> {
    outcome(application_summary_state)?
        .result
        .map_err(|error| format!("expected a summary, got: {error}"))
}

#[then("the summary shows {count} running instances")]
fn running_instances(
    application_summary_state: &ApplicationSummaryState,
    count: usize,
) -> StepResult<()> {
    let running = summary(application_summary_state)?
        .running_instances
        .iter()
        .filter(|instance| instance.state == InstanceState::Running)
        .count();
    if running == count {
        Ok(())
    } else {
        Err(format!("expected {count} running instances, got {running}"))
    }
}

#[then("the summary shows routes {expected}")]
fn shows_routes(
    application_summary_state: &ApplicationSummaryState,
    expected: String,
) -> StepResult<()> {
    let routes = summary(application_summary_state)?.routes.summary();
    if routes == expected {
        Ok(())
    } else {
        Err(format!("expected routes '{expected}', got '{routes}'"))
    }
}

#[then("the summary shows stack {expected}")]
fn shows_stack(
    application_summary_state: &ApplicationSummaryState,
    expected: String,
) -> StepResult<()> {
    let stack = summary(application_summary_state)?.stack.map(|stack| stack.name);
    if stack.as_deref() == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(format!("expected stack '{expected}', got {stack:?}"))
    }
}

#[then("the summary fails because application {name} is not found")]
fn fails_not_found(
    application_summary_state: &ApplicationSummaryState,
    name: String,
) -> StepResult<()> {
    let expected = ActionError::not_found(ResourceKind::Application, &name);
    match outcome(application_summary_state)?.result {
        Err(error) if error == expected => Ok(()),
        other => Err(format!("expected '{expected}', got: {other:?}")),
    }
}

#[then("the warnings are {expected}")]
fn warnings_are(
    application_summary_state: &ApplicationSummaryState,
    expected: String,
) -> StepResult<()> {
    let warnings = outcome(application_summary_state)?.warnings;
    let wanted: Vec<&str> = expected.split(", ").collect();
    if warnings == wanted {
        Ok(())
    } else {
        Err(format!("expected warnings {wanted:?}, got {warnings:?}"))
    }
}
