//! The application summary: an application with its instances, routes, and
//! stack.

use super::application::ApplicationActor;
use super::lookup::not_found_as;
use super::route::Routes;
use super::ActionResult;
use super::ActionReply;
use crate::cloud_controller::{
    Application, ApplicationClient, ApplicationInstance, DomainClient, JobClient, RouteClient,
    SpaceClient, Stack, StackClient,
};
use crate::error::ResourceKind;
use crate::warnings::{Warned, Warnings};

/// Everything `app` shows about one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationSummary {
    /// The application itself.
    pub application: Application,
    /// The stack it runs on, when it has one.
    pub stack: Option<Stack>,
    /// Mapped routes, domains resolved.
    pub routes: Routes,
    /// Instance states. Empty unless the application is started and the
    /// platform could report them.
    pub running_instances: Vec<ApplicationInstance>,
}

impl<C> ApplicationActor<C>
where
    C: ApplicationClient
        + RouteClient
        + DomainClient
        + SpaceClient
        + JobClient
        + StackClient
        + ?Sized,
{
    /// Builds the summary of the named application.
    ///
    /// Calls are made in this order: application, instances (only when the
    /// application is started), routes, stack (only when one is set).
    pub async fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> ActionReply<ApplicationSummary> {
        let mut warnings = Warnings::new();
        let result: ActionResult<ApplicationSummary> = async {
            let application =
                warnings.absorb(self.get_application_by_name_and_space(name, space_guid).await)?;

            let running_instances = if application.is_started() {
                warnings.absorb(self.get_application_instances(&application).await)?
            } else {
                Vec::new()
            };

            let routes = warnings.absorb(
                self.routes
                    .get_application_routes(&application.guid)
                    .await,
            )?;

            let stack = if application.stack_guid.is_empty() {
                None
            } else {
                let found = warnings
                    .absorb(self.client.get_stack(&application.stack_guid).await)
                    .map_err(not_found_as(ResourceKind::Stack, &application.stack_guid))?;
                Some(found)
            };

            Ok(ApplicationSummary {
                application,
                stack,
                routes,
                running_instances,
            })
        }
        .await;
        Warned::new(result, warnings)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::actor::test_support::{
        FastPolling, MockCloudController, RuntimeFixture, fail, ok, polling, runtime,
        server_error, warnings_of,
    };
    use crate::cloud_controller::{ApplicationState, Domain, InstanceState, Route};
    use crate::error::ActionError;
    use rstest::rstest;

    fn application(state: ApplicationState, stack_guid: &str) -> Application {
        Application {
            guid: String::from("g"),
            name: String::from("some-app"),
            state,
            stack_guid: String::from(stack_guid),
            ..Application::default()
        }
    }

    fn stack() -> Stack {
        Stack {
            guid: String::from("stack-guid"),
            name: String::from("s"),
            description: String::new(),
        }
    }

    #[rstest]
    fn started_application_summary_collects_warnings_in_call_order(
        runtime: RuntimeFixture,
        polling: Arc<FastPolling>,
    ) {
        let rt = runtime.expect("runtime should build");
        let mut client = MockCloudController::new();
        client.expect_get_applications().times(1).returning(|_| {
            ok(
                vec![application(ApplicationState::Started, "stack-guid")],
                &["w1"],
            )
        });
        client
            .expect_get_application_instances()
            .times(1)
            .returning(|guid| {
                assert_eq!(guid, "g");
                ok(
                    vec![ApplicationInstance {
                        index: 0,
                        state: InstanceState::Running,
                        details: None,
                    }],
                    &["w2"],
                )
            });
        client
            .expect_get_application_routes()
            .times(1)
            .returning(|_| ok(Vec::new(), &["w3"]));
        client.expect_get_stack().times(1).returning(|guid| {
            assert_eq!(guid, "stack-guid");
            ok(stack(), &["w4"])
        });
        let actor = ApplicationActor::new(Arc::new(client), polling);

        let reply =
            rt.block_on(actor.get_application_summary_by_name_and_space("some-app", "space-guid"));

        assert_eq!(warnings_of(&reply), ["w1", "w2", "w3", "w4"]);
        let summary = reply.value.expect("summary should build");
        assert_eq!(summary.running_instances.len(), 1);
        assert!(summary.routes.is_empty());
        assert_eq!(summary.stack.map(|found| found.name), Some(String::from("s")));
    }

    #[rstest]
    fn stopped_application_summary_skips_instances(
        runtime: RuntimeFixture,
        polling: Arc<FastPolling>,
    ) {
        let rt = runtime.expect("runtime should build");
        let mut client = MockCloudController::new();
        client.expect_get_applications().returning(|_| {
            ok(
                vec![application(ApplicationState::Stopped, "stack-guid")],
                &["w1"],
            )
        });
        client.expect_get_application_instances().never();
        client.expect_get_application_routes().returning(|_| {
            ok(
                vec![Route {
                    guid: String::from("route-guid"),
                    host: String::from("www"),
                    domain_guid: String::from("domain-guid"),
                    ..Route::default()
                }],
                &["w2"],
            )
        });
        client.expect_get_shared_domain().returning(|_| {
            ok(
                Domain {
                    guid: String::from("domain-guid"),
                    name: String::from("example.com"),
                    shared: true,
                    ..Domain::default()
                },
                &["w3"],
            )
        });
        client
            .expect_get_stack()
            .returning(|_| ok(stack(), &["w4"]));
        let actor = ApplicationActor::new(Arc::new(client), polling);

        let reply =
            rt.block_on(actor.get_application_summary_by_name_and_space("some-app", "space-guid"));

        assert_eq!(warnings_of(&reply), ["w1", "w2", "w3", "w4"]);
        let summary = reply.value.expect("summary should build");
        assert!(summary.running_instances.is_empty());
        assert_eq!(summary.routes.summary(), "www.example.com");
    }

    #[rstest]
    fn summary_without_stack_skips_stack_lookup(
        runtime: RuntimeFixture,
        polling: Arc<FastPolling>,
    ) {
        let rt = runtime.expect("runtime should build");
        let mut client = MockCloudController::new();
        client
            .expect_get_applications()
            .returning(|_| ok(vec![application(ApplicationState::Stopped, "")], &[]));
        client
            .expect_get_application_routes()
            .returning(|_| ok(Vec::new(), &[]));
        client.expect_get_stack().never();
        let actor = ApplicationActor::new(Arc::new(client), polling);

        let reply =
            rt.block_on(actor.get_application_summary_by_name_and_space("some-app", "space-guid"));

        assert_eq!(reply.value.map(|summary| summary.stack), Ok(None));
    }

    #[rstest]
    fn summary_stops_at_first_failure_keeping_prior_warnings(
        runtime: RuntimeFixture,
        polling: Arc<FastPolling>,
    ) {
        let rt = runtime.expect("runtime should build");
        let mut client = MockCloudController::new();
        client.expect_get_applications().returning(|_| {
            ok(
                vec![application(ApplicationState::Started, "stack-guid")],
                &["w1"],
            )
        });
        client
            .expect_get_application_instances()
            .returning(|_| ok(Vec::new(), &["w2"]));
        client
            .expect_get_application_routes()
            .returning(|_| fail(server_error(), &["w3"]));
        client.expect_get_stack().never();
        let actor = ApplicationActor::new(Arc::new(client), polling);

        let reply =
            rt.block_on(actor.get_application_summary_by_name_and_space("some-app", "space-guid"));

        assert_eq!(warnings_of(&reply), ["w1", "w2", "w3"]);
        assert_eq!(reply.value, Err(ActionError::Generic(server_error())));
    }

    #[rstest]
    fn summary_of_missing_application_is_not_found(
        runtime: RuntimeFixture,
        polling: Arc<FastPolling>,
    ) {
        let rt = runtime.expect("runtime should build");
        let mut client = MockCloudController::new();
        client
            .expect_get_applications()
            .returning(|_| ok(Vec::new(), &["w1"]));
        client.expect_get_application_routes().never();
        let actor = ApplicationActor::new(Arc::new(client), polling);

        let reply =
            rt.block_on(actor.get_application_summary_by_name_and_space("some-app", "space-guid"));

        assert_eq!(warnings_of(&reply), ["w1"]);
        assert_eq!(
            reply.value,
            Err(ActionError::not_found(ResourceKind::Application, "some-app"))
        );
    }
}
