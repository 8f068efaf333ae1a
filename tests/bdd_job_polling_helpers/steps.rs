//! Given and When step definitions for job polling BDD tests.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ccactor::actor::JobPoller;
use ccactor::cloud_controller::{ClientFuture, Job, JobClient, JobStatus};
use ccactor::config::PollingSettings;
use ccactor::error::ApiError;
use ccactor::warnings::Warned;
use rstest_bdd_macros::{given, when};

use super::state::{JobPollingState, JobScript, PollOutcome, StepResult};

/// Millisecond-scale polling so timeouts resolve quickly.
struct FastPolling;

impl PollingSettings for FastPolling {
    fn polling_interval(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn job_polling_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn staging_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn startup_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }
}

/// Job client answering from a [`JobScript`], one warning per poll.
struct ScriptedJobs {
    script: JobScript,
    polls: Mutex<usize>,
}

impl ScriptedJobs {
    fn answer(&self, job_guid: &str) -> Result<Job, ApiError> {
        let poll = {
            let mut polls = self.polls.lock().unwrap_or_else(PoisonError::into_inner);
            *polls += 1;
            *polls
        };
        let job = |status, error_message| Job {
            guid: job_guid.to_owned(),
            status,
            error_message,
        };
        match &self.script {
            JobScript::FinishesAfter(finished) if poll >= *finished => {
                Ok(job(JobStatus::Finished, None))
            }
            JobScript::FailsWith(message) => {
                Ok(job(JobStatus::Failed, Some(message.clone())))
            }
            JobScript::LookupFailsOn(failing) if poll >= *failing => {
                Err(ApiError::UnexpectedResponse {
                    status: 502,
                    error_code: String::from("CF-BadGateway"),
                    description: String::from("bad gateway"),
                    request_ids: Vec::new(),
                })
            }
            JobScript::FinishesAfter(_)
            | JobScript::NeverFinishes
            | JobScript::LookupFailsOn(_) => Ok(job(JobStatus::Running, None)),
        }
    }
}

impl JobClient for ScriptedJobs {
    fn get_job(&self, job_guid: &str) -> ClientFuture<'_, Job> {
        let answer = self.answer(job_guid);
        Box::pin(async move { Warned::new(answer, ["job polled"].into_iter().collect()) })
    }
}

#[given("a job that finishes after {polls} polls")]
fn job_finishes_after(job_polling_state: &JobPollingState, polls: usize) {
    job_polling_state.script.set(JobScript::FinishesAfter(polls));
}

#[given("a job that fails with message {message}")]
fn job_fails_with(job_polling_state: &JobPollingState, message: String) {
    job_polling_state.script.set(JobScript::FailsWith(message));
}

#[given("a job that never finishes")]
fn job_never_finishes(job_polling_state: &JobPollingState) {
    job_polling_state.script.set(JobScript::NeverFinishes);
}

#[given("a job whose lookup fails on poll {poll}")]
fn job_lookup_fails(job_polling_state: &JobPollingState, poll: usize) {
    job_polling_state.script.set(JobScript::LookupFailsOn(poll));
}

#[when("the job is polled")]
fn poll_job(job_polling_state: &JobPollingState) -> StepResult<()> {
    let script = job_polling_state
        .script
        .get()
        .ok_or_else(|| String::from("a job script should be set"))?;
    let client = Arc::new(ScriptedJobs {
        script,
        polls: Mutex::new(0),
    });
    let poller = JobPoller::new(client, Arc::new(FastPolling));
    // Handle::block_on only drives timers on a multi-threaded runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .map_err(|e| format!("should build runtime: {e}"))?;

    let job = Job::queued("job-guid");
    let (result, warnings) = poller.poll_job_blocking(runtime.handle(), &job).into_parts();
    job_polling_state.outcome.set(PollOutcome {
        result,
        warnings: warnings.into_vec(),
    });
    Ok(())
}
