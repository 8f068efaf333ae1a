//! Cloud Controller client contract.
//!
//! The actors never talk HTTP themselves. They depend on the narrow traits in
//! this module, one per resource family, so each actor states exactly which
//! calls it makes and tests can mock only those.
//!
//! Every call resolves to an [`ApiReply`]: the call's result together with
//! the warnings the server attached to the response. Errors are tagged with
//! an [`ApiError`](crate::error::ApiError) kind at this boundary.
//!
//! [`HttpCloudController`] implements every trait against the v2 JSON API.

mod filter;
mod http;
mod resources;

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::warnings::Warned;

pub use filter::{Filter, FilterField, FilterOperator};
pub use http::HttpCloudController;
pub use resources::{
    Application, ApplicationInstance, ApplicationState, ApplicationUpdate, Buildpack, Domain,
    HealthCheckType, InstanceState, Job, JobStatus, Lifecycle, Organization, OrganizationQuota,
    PackageState, Resource, Route, RouterGroupType, SecurityGroup, SecurityGroupRule, Service,
    ServiceBroker, ServiceInstance, ServicePlan, ServicePlanVisibility, Space, SpaceQuota, Stack,
};

/// Result and warnings of one Cloud Controller call.
pub type ApiReply<T> = Warned<Result<T, ApiError>>;

/// Boxed future returned by every client trait method.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = ApiReply<T>> + Send + 'a>>;

/// Asynchronous job lookups.
pub trait JobClient {
    /// Fetches the job with `job_guid`.
    fn get_job(&self, job_guid: &str) -> ClientFuture<'_, Job>;
}

/// Application calls.
pub trait ApplicationClient {
    /// Fetches the application with `guid`.
    fn get_application(&self, guid: &str) -> ClientFuture<'_, Application>;

    /// Lists applications matching every filter.
    fn get_applications(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Application>>;

    /// Creates an application.
    fn create_application(&self, application: &Application) -> ClientFuture<'_, Application>;

    /// Applies a partial update and returns the updated application.
    fn update_application(&self, update: &ApplicationUpdate) -> ClientFuture<'_, Application>;

    /// Fetches the instances of the application with `guid`, ordered by index.
    fn get_application_instances(&self, guid: &str)
    -> ClientFuture<'_, Vec<ApplicationInstance>>;

    /// Starts an asynchronous delete of the application with `guid`.
    fn delete_application(&self, guid: &str) -> ClientFuture<'_, Job>;
}

/// Route calls.
pub trait RouteClient {
    /// Lists routes matching every filter.
    fn get_routes(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Route>>;

    /// Lists the routes mapped to the application with `app_guid`.
    fn get_application_routes(&self, app_guid: &str) -> ClientFuture<'_, Vec<Route>>;

    /// Lists the routes in the space with `space_guid`.
    fn get_space_routes(&self, space_guid: &str) -> ClientFuture<'_, Vec<Route>>;

    /// Lists the applications mapped to the route with `route_guid`.
    fn get_route_applications(&self, route_guid: &str) -> ClientFuture<'_, Vec<Application>>;

    /// Creates a route, letting the server pick a port when `generate_port`
    /// is set.
    fn create_route(&self, route: &Route, generate_port: bool) -> ClientFuture<'_, Route>;

    /// Returns `true` when a route with these settings exists anywhere.
    fn check_route(&self, route: &Route) -> ClientFuture<'_, bool>;

    /// Maps a route to an application.
    fn map_route_to_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ClientFuture<'_, Route>;

    /// Removes a route from an application.
    fn unmap_route_from_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ClientFuture<'_, ()>;

    /// Starts an asynchronous delete of the route with `guid`.
    fn delete_route(&self, guid: &str) -> ClientFuture<'_, Job>;
}

/// Domain calls.
pub trait DomainClient {
    /// Fetches the shared domain with `guid`.
    fn get_shared_domain(&self, guid: &str) -> ClientFuture<'_, Domain>;

    /// Fetches the private domain with `guid`.
    fn get_private_domain(&self, guid: &str) -> ClientFuture<'_, Domain>;

    /// Lists shared domains matching every filter.
    fn get_shared_domains(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Domain>>;

    /// Lists the private domains of the organization with `org_guid`.
    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<Domain>>;
}

/// Stack calls.
pub trait StackClient {
    /// Fetches the stack with `guid`.
    fn get_stack(&self, guid: &str) -> ClientFuture<'_, Stack>;
}

/// Organization calls.
pub trait OrganizationClient {
    /// Fetches the organization with `guid`.
    fn get_organization(&self, guid: &str) -> ClientFuture<'_, Organization>;

    /// Lists organizations matching every filter.
    fn get_organizations(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Organization>>;

    /// Creates an organization under the quota with `quota_guid`.
    fn create_organization(&self, name: &str, quota_guid: &str)
    -> ClientFuture<'_, Organization>;

    /// Starts a recursive asynchronous delete of the organization.
    fn delete_organization(&self, guid: &str) -> ClientFuture<'_, Job>;

    /// Fetches the organization quota with `guid`.
    fn get_organization_quota(&self, guid: &str) -> ClientFuture<'_, OrganizationQuota>;

    /// Lists organization quotas matching every filter.
    fn get_organization_quotas(
        &self,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<OrganizationQuota>>;
}

/// Space calls.
pub trait SpaceClient {
    /// Lists spaces matching every filter.
    fn get_spaces(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Space>>;

    /// Creates a space in the organization with `org_guid`.
    fn create_space(&self, name: &str, org_guid: &str) -> ClientFuture<'_, Space>;

    /// Starts a recursive asynchronous delete of the space.
    fn delete_space(&self, guid: &str) -> ClientFuture<'_, Job>;

    /// Fetches the space quota with `guid`.
    fn get_space_quota(&self, guid: &str) -> ClientFuture<'_, SpaceQuota>;

    /// Lists the space quotas defined by the organization with `org_guid`.
    fn get_space_quotas(&self, org_guid: &str) -> ClientFuture<'_, Vec<SpaceQuota>>;

    /// Assigns a space quota to a space.
    fn set_space_quota(&self, space_guid: &str, quota_guid: &str) -> ClientFuture<'_, ()>;

    /// Lists the service instances of a space, user-provided ones included.
    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<ServiceInstance>>;

    /// Lists the security groups bound to a space in `lifecycle`.
    fn get_space_security_groups(
        &self,
        space_guid: &str,
        lifecycle: Lifecycle,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<SecurityGroup>>;
}

/// Security group calls.
pub trait SecurityGroupClient {
    /// Lists security groups matching every filter.
    fn get_security_groups(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<SecurityGroup>>;

    /// Binds a security group to a space in `lifecycle`.
    fn bind_security_group_to_space(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
    ) -> ClientFuture<'_, ()>;

    /// Unbinds a security group from a space in `lifecycle`.
    fn unbind_security_group_from_space(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
    ) -> ClientFuture<'_, ()>;

    /// Starts an asynchronous delete of the security group with `guid`.
    fn delete_security_group(&self, guid: &str) -> ClientFuture<'_, Job>;

    /// Adds or removes a security group from the platform-wide defaults.
    fn set_security_group_globally_enabled(
        &self,
        security_group_guid: &str,
        lifecycle: Lifecycle,
        enabled: bool,
    ) -> ClientFuture<'_, ()>;
}

/// Service marketplace calls.
pub trait ServiceClient {
    /// Lists service brokers matching every filter.
    fn get_service_brokers(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServiceBroker>>;

    /// Lists services matching every filter.
    fn get_services(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Service>>;

    /// Lists service plans matching every filter.
    fn get_service_plans(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServicePlan>>;

    /// Lists service plan visibilities matching every filter.
    fn get_service_plan_visibilities(
        &self,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<ServicePlanVisibility>>;
}

/// Buildpack calls.
pub trait BuildpackClient {
    /// Lists buildpacks matching every filter.
    fn get_buildpacks(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Buildpack>>;

    /// Creates a buildpack.
    fn create_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack>;

    /// Updates a buildpack and returns the stored result.
    fn update_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack>;
}

/// Every Cloud Controller call, for code that needs the whole surface.
pub trait CloudControllerClient:
    JobClient
    + ApplicationClient
    + RouteClient
    + DomainClient
    + StackClient
    + OrganizationClient
    + SpaceClient
    + SecurityGroupClient
    + ServiceClient
    + BuildpackClient
    + Send
    + Sync
{
}

impl<T> CloudControllerClient for T where
    T: JobClient
        + ApplicationClient
        + RouteClient
        + DomainClient
        + StackClient
        + OrganizationClient
        + SpaceClient
        + SecurityGroupClient
        + ServiceClient
        + BuildpackClient
        + Send
        + Sync
{
}
