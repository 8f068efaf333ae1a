//! Scenario state for job polling BDD tests.

use ccactor::error::ActionError;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Convenience alias for step outcomes.
pub type StepResult<T> = Result<T, String>;

/// How the scripted server answers job lookups.
#[derive(Clone, Debug)]
pub enum JobScript {
    /// Running until the given poll, which reports the job finished.
    FinishesAfter(usize),
    /// Failed on the first poll with the given message.
    FailsWith(String),
    /// Running on every poll.
    NeverFinishes,
    /// Running until the given poll, which fails with a server error.
    LookupFailsOn(usize),
}

/// Outcome of polling one job.
#[derive(Clone, Debug)]
pub struct PollOutcome {
    /// Terminal result.
    pub result: Result<(), ActionError>,
    /// Warnings in the order the server sent them.
    pub warnings: Vec<String>,
}

/// State shared across job polling scenarios.
#[derive(ScenarioState)]
pub struct JobPollingState {
    /// Script the fake server follows.
    pub(crate) script: Slot<JobScript>,
    /// Outcome of the most recent poll.
    pub(crate) outcome: Slot<PollOutcome>,
}

#[expect(
    clippy::derivable_impls,
    reason = "ScenarioState guidance discourages deriving Default in this module"
)]
impl Default for JobPollingState {
    fn default() -> Self {
        Self {
            script: Slot::default(),
            outcome: Slot::default(),
        }
    }
}

/// Fixture providing fresh state for each job polling scenario.
#[rstest::fixture]
pub fn job_polling_state() -> JobPollingState {
    JobPollingState::default()
}
