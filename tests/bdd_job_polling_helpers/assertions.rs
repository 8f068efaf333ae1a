//! Then step definitions for job polling BDD tests.

use ccactor::error::{ActionError, ApiError};
use rstest_bdd_macros::then;

use super::state::{JobPollingState, PollOutcome, StepResult};

fn outcome(job_polling_state: &JobPollingState) -> StepResult<PollOutcome> {
    job_polling_state
        .outcome
        .get()
        .ok_or_else(|| String::from("outcome should be set"))
}

#[then("the job completes")]
fn job_completes(job_polling_state: &JobPollingState) -> StepResult<()> {
    match outcome(job_polling_state)?.result {
        Ok(()) => Ok(()),
        Err(error) => Err(format!("expected the job to complete, got: {error}")),
    }
}

#[then("the job fails mentioning {expected}")]
fn job_fails_mentioning(job_polling_state: &JobPollingState, expected: String) -> StepResult<()> {
    match outcome(job_polling_state)?.result {
        Err(ActionError::JobFailed { message, .. }) if message.contains(&expected) => Ok(()),
        other => Err(format!("expected a job failure mentioning '{expected}', got: {other:?}")),
    }
}

#[then("the job times out")]
fn job_times_out(job_polling_state: &JobPollingState) -> StepResult<()> {
    match outcome(job_polling_state)?.result {
        Err(ActionError::JobTimeout { .. }) => Ok(()),
        other => Err(format!("expected a job timeout, got: {other:?}")),
    }
}

#[then("the job fails with an unexpected response")]
fn job_fails_with_unexpected_response(job_polling_state: &JobPollingState) -> StepResult<()> {
    match outcome(job_polling_state)?.result {
        Err(ActionError::Generic(ApiError::UnexpectedResponse { status: 502, .. })) => Ok(()),
        other => Err(format!("expected the lookup error to pass through, got: {other:?}")),
    }
}

#[then("{count} warnings are reported")]
fn warnings_are_reported(job_polling_state: &JobPollingState, count: usize) -> StepResult<()> {
    let warnings = outcome(job_polling_state)?.warnings;
    if warnings.len() == count {
        Ok(())
    } else {
        Err(format!("expected {count} warnings, got {warnings:?}"))
    }
}
