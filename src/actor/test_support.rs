//! Shared mock client and fixtures for actor unit tests.

use std::sync::Arc;
use std::time::Duration;

use mockall::mock;
use rstest::fixture;

use crate::cloud_controller::{
    Application, ApplicationClient, ApplicationInstance, ApplicationUpdate, Buildpack,
    BuildpackClient, ClientFuture, Domain, DomainClient, Filter, Job, JobClient, Lifecycle,
    Organization, OrganizationClient, OrganizationQuota, Route, RouteClient, SecurityGroup,
    SecurityGroupClient, Service, ServiceBroker, ServiceClient, ServiceInstance, ServicePlan,
    ServicePlanVisibility, Space, SpaceClient, SpaceQuota, Stack, StackClient,
};
use crate::config::PollingSettings;
use crate::error::ApiError;
use crate::warnings::Warned;

mock! {
    #[derive(Debug)]
    pub CloudController {}

    impl JobClient for CloudController {
        fn get_job(&self, job_guid: &str) -> ClientFuture<'_, Job>;
    }

    impl ApplicationClient for CloudController {
        fn get_application(&self, guid: &str) -> ClientFuture<'_, Application>;
        fn get_applications(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Application>>;
        fn create_application(&self, application: &Application) -> ClientFuture<'_, Application>;
        fn update_application(&self, update: &ApplicationUpdate) -> ClientFuture<'_, Application>;
        fn get_application_instances(&self, guid: &str) -> ClientFuture<'_, Vec<ApplicationInstance>>;
        fn delete_application(&self, guid: &str) -> ClientFuture<'_, Job>;
    }

    impl RouteClient for CloudController {
        fn get_routes(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Route>>;
        fn get_application_routes(&self, app_guid: &str) -> ClientFuture<'_, Vec<Route>>;
        fn get_space_routes(&self, space_guid: &str) -> ClientFuture<'_, Vec<Route>>;
        fn get_route_applications(&self, route_guid: &str) -> ClientFuture<'_, Vec<Application>>;
        fn create_route(&self, route: &Route, generate_port: bool) -> ClientFuture<'_, Route>;
        fn check_route(&self, route: &Route) -> ClientFuture<'_, bool>;
        fn map_route_to_application(&self, route_guid: &str, app_guid: &str) -> ClientFuture<'_, Route>;
        fn unmap_route_from_application(&self, route_guid: &str, app_guid: &str) -> ClientFuture<'_, ()>;
        fn delete_route(&self, guid: &str) -> ClientFuture<'_, Job>;
    }

    impl DomainClient for CloudController {
        fn get_shared_domain(&self, guid: &str) -> ClientFuture<'_, Domain>;
        fn get_private_domain(&self, guid: &str) -> ClientFuture<'_, Domain>;
        fn get_shared_domains(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Domain>>;
        fn get_organization_private_domains(&self, org_guid: &str, filters: &[Filter]) -> ClientFuture<'_, Vec<Domain>>;
    }

    impl StackClient for CloudController {
        fn get_stack(&self, guid: &str) -> ClientFuture<'_, Stack>;
    }

    impl OrganizationClient for CloudController {
        fn get_organization(&self, guid: &str) -> ClientFuture<'_, Organization>;
        fn get_organizations(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Organization>>;
        fn create_organization(&self, name: &str, quota_guid: &str) -> ClientFuture<'_, Organization>;
        fn delete_organization(&self, guid: &str) -> ClientFuture<'_, Job>;
        fn get_organization_quota(&self, guid: &str) -> ClientFuture<'_, OrganizationQuota>;
        fn get_organization_quotas(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<OrganizationQuota>>;
    }

    impl SpaceClient for CloudController {
        fn get_spaces(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Space>>;
        fn create_space(&self, name: &str, org_guid: &str) -> ClientFuture<'_, Space>;
        fn delete_space(&self, guid: &str) -> ClientFuture<'_, Job>;
        fn get_space_quota(&self, guid: &str) -> ClientFuture<'_, SpaceQuota>;
        fn get_space_quotas(&self, org_guid: &str) -> ClientFuture<'_, Vec<SpaceQuota>>;
        fn set_space_quota(&self, space_guid: &str, quota_guid: &str) -> ClientFuture<'_, ()>;
        fn get_space_service_instances(&self, space_guid: &str, filters: &[Filter]) -> ClientFuture<'_, Vec<ServiceInstance>>;
        fn get_space_security_groups(&self, space_guid: &str, lifecycle: Lifecycle, filters: &[Filter]) -> ClientFuture<'_, Vec<SecurityGroup>>;
    }

    impl SecurityGroupClient for CloudController {
        fn get_security_groups(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<SecurityGroup>>;
        fn bind_security_group_to_space(&self, security_group_guid: &str, space_guid: &str, lifecycle: Lifecycle) -> ClientFuture<'_, ()>;
        fn unbind_security_group_from_space(&self, security_group_guid: &str, space_guid: &str, lifecycle: Lifecycle) -> ClientFuture<'_, ()>;
        fn delete_security_group(&self, guid: &str) -> ClientFuture<'_, Job>;
        fn set_security_group_globally_enabled(&self, security_group_guid: &str, lifecycle: Lifecycle, enabled: bool) -> ClientFuture<'_, ()>;
    }

    impl ServiceClient for CloudController {
        fn get_service_brokers(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServiceBroker>>;
        fn get_services(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Service>>;
        fn get_service_plans(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServicePlan>>;
        fn get_service_plan_visibilities(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServicePlanVisibility>>;
    }

    impl BuildpackClient for CloudController {
        fn get_buildpacks(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Buildpack>>;
        fn create_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack>;
        fn update_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack>;
    }
}

pub(super) type RuntimeFixture = std::io::Result<tokio::runtime::Runtime>;

#[fixture]
pub(super) fn runtime() -> RuntimeFixture {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Builds a client reply that resolves immediately.
pub(super) fn reply<T: Send + 'static>(
    value: Result<T, ApiError>,
    warnings: &[&str],
) -> ClientFuture<'static, T> {
    let warned = Warned::new(value, warnings.iter().copied().collect());
    Box::pin(async move { warned })
}

/// Builds a successful client reply.
pub(super) fn ok<T: Send + 'static>(value: T, warnings: &[&str]) -> ClientFuture<'static, T> {
    reply(Ok(value), warnings)
}

/// Builds a failed client reply.
pub(super) fn fail<T: Send + 'static>(error: ApiError, warnings: &[&str]) -> ClientFuture<'static, T> {
    reply(Err(error), warnings)
}

pub(super) fn not_found() -> ApiError {
    ApiError::ResourceNotFound {
        message: String::from("not found"),
    }
}

pub(super) fn server_error() -> ApiError {
    ApiError::UnexpectedResponse {
        status: 500,
        error_code: String::from("CF-ServerError"),
        description: String::from("boom"),
        request_ids: Vec::new(),
    }
}

/// Polling settings scaled down to milliseconds.
#[derive(Debug, Clone, Copy)]
pub(super) struct FastPolling {
    pub(super) interval: Duration,
    pub(super) timeout: Duration,
}

impl Default for FastPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }
}

impl PollingSettings for FastPolling {
    fn polling_interval(&self) -> Duration {
        self.interval
    }

    fn job_polling_timeout(&self) -> Duration {
        self.timeout
    }

    fn staging_timeout(&self) -> Duration {
        self.timeout
    }

    fn startup_timeout(&self) -> Duration {
        self.timeout
    }
}

#[fixture]
pub(super) fn polling() -> Arc<FastPolling> {
    Arc::new(FastPolling::default())
}

pub(super) fn job(guid: &str, status: crate::cloud_controller::JobStatus) -> Job {
    Job {
        guid: String::from(guid),
        status,
        error_message: None,
    }
}

pub(super) fn finished_job(guid: &str) -> Job {
    job(guid, crate::cloud_controller::JobStatus::Finished)
}

pub(super) fn warnings_of<T>(reply: &Warned<T>) -> Vec<&str> {
    reply.warnings.iter().map(String::as_str).collect()
}
