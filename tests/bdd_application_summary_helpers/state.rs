//! Scenario state for application summary BDD tests.

use ccactor::actor::ApplicationSummary;
use ccactor::cloud_controller::Application;
use ccactor::error::ActionError;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Convenience alias for step outcomes.
pub type StepResult<T> = Result<T, String>;

/// A route the application is mapped to.
#[derive(Clone, Debug)]
pub struct MappedRoute {
    /// Host name.
    pub host: String,
    /// Shared domain name.
    pub domain: String,
}

/// Outcome of one summary request.
#[derive(Clone, Debug)]
pub struct SummaryOutcome {
    /// The summary or the classified failure.
    pub result: Result<ApplicationSummary, ActionError>,
    /// Warnings in the order the server sent them.
    pub warnings: Vec<String>,
}

/// State shared across application summary scenarios.
#[derive(ScenarioState)]
pub struct ApplicationSummaryState {
    /// The application the server knows about, if any.
    pub(crate) application: Slot<Application>,
    /// Name of the application's stack.
    pub(crate) stack_name: Slot<String>,
    /// The route mapped to the application.
    pub(crate) route: Slot<MappedRoute>,
    /// Outcome of the most recent request.
    pub(crate) outcome: Slot<SummaryOutcome>,
}

#[expect(
    clippy::derivable_impls,
    reason = "ScenarioState guidance discourages deriving Default in this module"
)]
impl Default for ApplicationSummaryState {
    fn default() -> Self {
        Self {
            application: Slot::default(),
            stack_name: Slot::default(),
            route: Slot::default(),
            outcome: Slot::default(),
        }
    }
}

/// Fixture providing fresh state for each application summary scenario.
#[rstest::fixture]
pub fn application_summary_state() -> ApplicationSummaryState {
    ApplicationSummaryState::default()
}
