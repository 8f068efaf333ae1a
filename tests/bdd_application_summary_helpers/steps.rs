//! Given and When step definitions for application summary BDD tests.

use std::sync::Arc;
use std::time::Duration;

use ccactor::actor::ApplicationActor;
use ccactor::cloud_controller::{
    Application, ApplicationInstance, ApplicationState, Domain, InstanceState, Route, Stack,
};
use ccactor::config::PollingSettings;
use rstest_bdd_macros::{given, when};

use super::client::{MockCloudController, ok};
use super::state::{ApplicationSummaryState, MappedRoute, StepResult, SummaryOutcome};

/// The summary never polls, so the budgets only need to be positive.
struct NoPolling;

impl PollingSettings for NoPolling {
    fn polling_interval(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn job_polling_timeout(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn staging_timeout(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn startup_timeout(&self) -> Duration {
        Duration::from_millis(1)
    }
}

fn application(name: String, state: ApplicationState) -> Application {
    Application {
        guid: format!("{name}-guid"),
        name,
        space_guid: String::from("space-guid"),
        state,
        instances: Some(1),
        ..Application::default()
    }
}

#[given("a started application named {name}")]
fn started_application(application_summary_state: &ApplicationSummaryState, name: String) {
    application_summary_state
        .application
        .set(application(name, ApplicationState::Started));
}

#[given("a stopped application named {name}")]
fn stopped_application(application_summary_state: &ApplicationSummaryState, name: String) {
    application_summary_state
        .application
        .set(application(name, ApplicationState::Stopped));
}

#[given("no application named {name}")]
fn no_application(
    application_summary_state: &ApplicationSummaryState,
    name: String,
) -> StepResult<()> {
    match application_summary_state.application.get() {
        None => Ok(()),
        Some(existing) => Err(format!(
            "expected no application named {name}, found {}",
            existing.name
        )),
    }
}

#[given("the application runs on stack {stack}")]
fn runs_on_stack(application_summary_state: &ApplicationSummaryState, stack: String) {
    application_summary_state.stack_name.set(stack);
}

#[given("the application is mapped to host {host} on domain {domain}")]
fn mapped_to_route(application_summary_state: &ApplicationSummaryState, host: String, domain: String) {
    application_summary_state
        .route
        .set(MappedRoute { host, domain });
}

/// Builds a mock answering from the scenario state, one warning per call.
fn scripted_client(application_summary_state: &ApplicationSummaryState) -> MockCloudController {
    let mut client = MockCloudController::new();
    let stack_name = application_summary_state.stack_name.get();
    let known = application_summary_state.application.get().map(|mut app| {
        if stack_name.is_some() {
            app.stack_guid = String::from("stack-guid");
        }
        app
    });
    let started = known.as_ref().is_some_and(Application::is_started);

    client
        .expect_get_applications()
        .times(1)
        .return_once(move |_| ok(known.into_iter().collect(), "app"));
    client
        .expect_get_application_instances()
        .times(usize::from(started))
        .returning(|_| {
            ok(
                vec![ApplicationInstance {
                    index: 0,
                    state: InstanceState::Running,
                    details: None,
                }],
                "instances",
            )
        });

    let mapped = application_summary_state.route.get();
    let routes: Vec<Route> = mapped
        .iter()
        .map(|route| Route {
            guid: String::from("route-guid"),
            host: route.host.clone(),
            domain_guid: String::from("domain-guid"),
            ..Route::default()
        })
        .collect();
    client
        .expect_get_application_routes()
        .return_once(move |_| ok(routes, "routes"));
    if let Some(route) = mapped {
        client.expect_get_shared_domain().return_once(move |guid| {
            ok(
                Domain {
                    guid: guid.to_owned(),
                    name: route.domain,
                    shared: true,
                    ..Domain::default()
                },
                "domain",
            )
        });
    }

    if let Some(name) = stack_name {
        client.expect_get_stack().return_once(move |guid| {
            ok(
                Stack {
                    guid: guid.to_owned(),
                    name,
                    description: String::new(),
                },
                "stack",
            )
        });
    }
    client
}

#[when("the summary of {name} is requested")]
fn request_summary(application_summary_state: &ApplicationSummaryState, name: String) -> StepResult<()> {
    let client = scripted_client(application_summary_state);
    let actor = ApplicationActor::new(Arc::new(client), Arc::new(NoPolling));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("should build runtime: {e}"))?;

    let (result, warnings) = runtime
        .block_on(actor.get_application_summary_by_name_and_space(&name, "space-guid"))
        .into_parts();
    application_summary_state.outcome.set(SummaryOutcome {
        result,
        warnings: warnings.into_vec(),
    });
    Ok(())
}
