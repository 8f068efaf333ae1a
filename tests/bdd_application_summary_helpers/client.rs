//! Mock Cloud Controller covering the calls an application summary makes.

use ccactor::cloud_controller::{
    Application, ApplicationClient, ApplicationInstance, ApplicationUpdate, ClientFuture, Domain,
    DomainClient, Filter, Job, JobClient, Lifecycle, Route, RouteClient, SecurityGroup,
    ServiceInstance, Space, SpaceClient, SpaceQuota, Stack, StackClient,
};
use ccactor::error::ApiError;
use ccactor::warnings::Warned;
use mockall::mock;

mock! {
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
}

/// Builds a successful reply carrying one warning.
pub fn ok<T: Send + 'static>(value: T, warning: &str) -> ClientFuture<'static, T> {
    let warned: Warned<Result<T, ApiError>> =
        Warned::new(Ok(value), [warning].into_iter().collect());
    Box::pin(async move { warned })
}
