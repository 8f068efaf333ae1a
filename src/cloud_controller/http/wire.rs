//! v2 JSON envelopes and their conversion into resource records.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cloud_controller::resources::{
    Application, ApplicationInstance, ApplicationState, Buildpack, Domain, HealthCheckType,
    InstanceState, Job, JobStatus, Organization, OrganizationQuota, PackageState, Route,
    RouterGroupType, SecurityGroup, SecurityGroupRule, Service, ServiceBroker, ServiceInstance,
    ServicePlan, ServicePlanVisibility, Space, SpaceQuota, Stack,
};
use crate::error::ApiError;

/// Decodes a successful response body.
pub(super) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}

/// An entity that becomes a resource once its GUID is known.
pub(super) trait IntoResource {
    /// The resource record produced.
    type Resource;

    /// Builds the resource record.
    fn into_resource(self, guid: String) -> Self::Resource;
}

#[derive(Debug, Deserialize)]
struct Metadata {
    guid: String,
}

/// `{metadata, entity}` wrapper around every v2 resource.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<E> {
    metadata: Metadata,
    entity: E,
}

impl<E: IntoResource> Envelope<E> {
    pub(super) fn into_resource(self) -> E::Resource {
        self.entity.into_resource(self.metadata.guid)
    }
}

/// One page of a list response.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de>"))]
pub(super) struct Page<E> {
    #[serde(default)]
    pub(super) next_url: Option<String>,
    #[serde(default)]
    pub(super) resources: Vec<Envelope<E>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct JobEntity {
    status: JobStatus,
    error: Option<String>,
    error_details: Option<JobErrorDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JobErrorDetails {
    description: String,
}

impl IntoResource for JobEntity {
    type Resource = Job;

    fn into_resource(self, guid: String) -> Job {
        let error_message = self
            .error_details
            .map(|details| details.description)
            .filter(|description| !description.is_empty())
            .or(self.error);
        Job {
            guid,
            status: self.status,
            error_message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ApplicationEntity {
    name: String,
    space_guid: String,
    stack_guid: Option<String>,
    state: ApplicationState,
    package_state: PackageState,
    staging_failed_reason: Option<String>,
    staging_failed_description: Option<String>,
    buildpack: Option<String>,
    detected_buildpack: Option<String>,
    command: Option<String>,
    detected_start_command: Option<String>,
    health_check_type: Option<HealthCheckType>,
    health_check_http_endpoint: Option<String>,
    instances: Option<u32>,
    memory: Option<u64>,
    disk_quota: Option<u64>,
}

impl IntoResource for ApplicationEntity {
    type Resource = Application;

    fn into_resource(self, guid: String) -> Application {
        Application {
            guid,
            name: self.name,
            space_guid: self.space_guid,
            stack_guid: self.stack_guid.unwrap_or_default(),
            state: self.state,
            package_state: self.package_state,
            staging_failed_reason: self.staging_failed_reason,
            staging_failed_description: self.staging_failed_description,
            buildpack: self.buildpack,
            detected_buildpack: self.detected_buildpack,
            command: self.command,
            detected_start_command: self.detected_start_command,
            health_check_type: self.health_check_type.unwrap_or_default(),
            health_check_http_endpoint: self.health_check_http_endpoint,
            instances: self.instances,
            memory_mb: self.memory,
            disk_quota_mb: self.disk_quota,
        }
    }
}

/// Body of `POST /v2/apps`.
#[derive(Debug, Serialize)]
pub(super) struct CreateApplicationBody<'a> {
    name: &'a str,
    space_guid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_guid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buildpack: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    health_check_type: HealthCheckType,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_check_http_endpoint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_quota: Option<u64>,
}

impl<'a> From<&'a Application> for CreateApplicationBody<'a> {
    fn from(app: &'a Application) -> Self {
        Self {
            name: &app.name,
            space_guid: &app.space_guid,
            stack_guid: Some(app.stack_guid.as_str()).filter(|guid| !guid.is_empty()),
            buildpack: app.buildpack.as_deref(),
            command: app.command.as_deref(),
            health_check_type: app.health_check_type,
            health_check_http_endpoint: app.health_check_http_endpoint.as_deref(),
            instances: app.instances,
            memory: app.memory_mb,
            disk_quota: app.disk_quota_mb,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstanceEntity {
    state: InstanceState,
    details: Option<String>,
}

/// Body of `GET /v2/apps/:guid/instances`, keyed by instance index.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(super) struct InstancesBody(HashMap<String, InstanceEntity>);

impl InstancesBody {
    /// Converts to instances ordered by index, skipping non-numeric keys.
    pub(super) fn into_instances(self) -> Vec<ApplicationInstance> {
        let mut instances: Vec<ApplicationInstance> = self
            .0
            .into_iter()
            .filter_map(|(key, entity)| {
                key.parse::<u32>().ok().map(|index| ApplicationInstance {
                    index,
                    state: entity.state,
                    details: entity.details,
                })
            })
            .collect();
        instances.sort_by_key(|instance| instance.index);
        instances
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RouteEntity {
    host: String,
    domain_guid: String,
    path: String,
    port: Option<u16>,
    space_guid: String,
}

impl IntoResource for RouteEntity {
    type Resource = Route;

    fn into_resource(self, guid: String) -> Route {
        Route {
            guid,
            host: self.host,
            domain_guid: self.domain_guid,
            path: self.path,
            port: self.port,
            space_guid: self.space_guid,
        }
    }
}

/// Body of `POST /v2/routes`.
#[derive(Debug, Serialize)]
pub(super) struct CreateRouteBody<'a> {
    domain_guid: &'a str,
    space_guid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl<'a> From<&'a Route> for CreateRouteBody<'a> {
    fn from(route: &'a Route) -> Self {
        Self {
            domain_guid: &route.domain_guid,
            space_guid: &route.space_guid,
            host: Some(route.host.as_str()).filter(|host| !host.is_empty()),
            path: Some(route.path.as_str()).filter(|path| !path.is_empty()),
            port: route.port,
        }
    }
}

/// Shared and private domains decode from the same shape; which endpoint a
/// domain came from decides whether it is shared.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DomainEntity {
    name: String,
    router_group_guid: Option<String>,
    router_group_type: Option<String>,
    internal: bool,
}

impl DomainEntity {
    fn into_domain(self, guid: String, shared: bool) -> Domain {
        let router_group_type = match self.router_group_type.as_deref() {
            Some("tcp") => RouterGroupType::Tcp,
            _ => RouterGroupType::Http,
        };
        Domain {
            guid,
            name: self.name,
            router_group_guid: self.router_group_guid,
            router_group_type,
            shared,
            internal: self.internal,
        }
    }
}

/// A domain read from a shared-domain endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(super) struct SharedDomainEntity(DomainEntity);

impl IntoResource for SharedDomainEntity {
    type Resource = Domain;

    fn into_resource(self, guid: String) -> Domain {
        self.0.into_domain(guid, true)
    }
}

/// A domain read from a private-domain endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(super) struct PrivateDomainEntity(DomainEntity);

impl IntoResource for PrivateDomainEntity {
    type Resource = Domain;

    fn into_resource(self, guid: String) -> Domain {
        self.0.into_domain(guid, false)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StackEntity {
    name: String,
    description: Option<String>,
}

impl IntoResource for StackEntity {
    type Resource = Stack;

    fn into_resource(self, guid: String) -> Stack {
        Stack {
            guid,
            name: self.name,
            description: self.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct OrganizationEntity {
    name: String,
    quota_definition_guid: Option<String>,
}

impl IntoResource for OrganizationEntity {
    type Resource = Organization;

    fn into_resource(self, guid: String) -> Organization {
        Organization {
            guid,
            name: self.name,
            quota_definition_guid: self.quota_definition_guid.unwrap_or_default(),
        }
    }
}

/// Limits shared by organization and space quota definitions.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuotaLimits {
    memory_limit: i64,
    instance_memory_limit: i64,
    total_routes: i64,
    total_services: i64,
    app_instance_limit: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct OrganizationQuotaEntity {
    name: String,
    non_basic_services_allowed: bool,
    #[serde(flatten)]
    limits: QuotaLimits,
}

impl IntoResource for OrganizationQuotaEntity {
    type Resource = OrganizationQuota;

    fn into_resource(self, guid: String) -> OrganizationQuota {
        OrganizationQuota {
            guid,
            name: self.name,
            memory_limit_mb: self.limits.memory_limit,
            instance_memory_limit_mb: self.limits.instance_memory_limit,
            total_routes: self.limits.total_routes,
            total_services: self.limits.total_services,
            app_instance_limit: self.limits.app_instance_limit,
            non_basic_services_allowed: self.non_basic_services_allowed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SpaceEntity {
    name: String,
    organization_guid: String,
    space_quota_definition_guid: Option<String>,
    allow_ssh: bool,
}

impl IntoResource for SpaceEntity {
    type Resource = Space;

    fn into_resource(self, guid: String) -> Space {
        Space {
            guid,
            name: self.name,
            organization_guid: self.organization_guid,
            space_quota_definition_guid: self.space_quota_definition_guid.unwrap_or_default(),
            allow_ssh: self.allow_ssh,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SpaceQuotaEntity {
    name: String,
    organization_guid: String,
    #[serde(flatten)]
    limits: QuotaLimits,
}

impl IntoResource for SpaceQuotaEntity {
    type Resource = SpaceQuota;

    fn into_resource(self, guid: String) -> SpaceQuota {
        SpaceQuota {
            guid,
            name: self.name,
            organization_guid: self.organization_guid,
            memory_limit_mb: self.limits.memory_limit,
            instance_memory_limit_mb: self.limits.instance_memory_limit,
            total_routes: self.limits.total_routes,
            total_services: self.limits.total_services,
            app_instance_limit: self.limits.app_instance_limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ServiceInstanceEntity {
    name: String,
    space_guid: String,
    service_plan_guid: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

impl IntoResource for ServiceInstanceEntity {
    type Resource = ServiceInstance;

    fn into_resource(self, guid: String) -> ServiceInstance {
        ServiceInstance {
            guid,
            name: self.name,
            space_guid: self.space_guid,
            service_plan_guid: self.service_plan_guid.unwrap_or_default(),
            user_provided: self.kind == "user_provided_service_instance",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RuleEntity {
    protocol: String,
    destination: String,
    ports: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SecurityGroupEntity {
    name: String,
    rules: Vec<RuleEntity>,
    running_default: bool,
    staging_default: bool,
}

impl IntoResource for SecurityGroupEntity {
    type Resource = SecurityGroup;

    fn into_resource(self, guid: String) -> SecurityGroup {
        SecurityGroup {
            guid,
            name: self.name,
            rules: self
                .rules
                .into_iter()
                .map(|rule| SecurityGroupRule {
                    protocol: rule.protocol,
                    destination: rule.destination,
                    ports: rule.ports.unwrap_or_default(),
                    description: rule.description.unwrap_or_default(),
                })
                .collect(),
            running_default: self.running_default,
            staging_default: self.staging_default,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ServiceBrokerEntity {
    name: String,
    broker_url: String,
    space_guid: Option<String>,
}

impl IntoResource for ServiceBrokerEntity {
    type Resource = ServiceBroker;

    fn into_resource(self, guid: String) -> ServiceBroker {
        ServiceBroker {
            guid,
            name: self.name,
            broker_url: self.broker_url,
            space_guid: self.space_guid.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ServiceEntity {
    label: String,
    description: String,
    service_broker_guid: String,
}

impl IntoResource for ServiceEntity {
    type Resource = Service;

    fn into_resource(self, guid: String) -> Service {
        Service {
            guid,
            label: self.label,
            description: self.description,
            service_broker_guid: self.service_broker_guid,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ServicePlanEntity {
    name: String,
    public: bool,
    service_guid: String,
}

impl IntoResource for ServicePlanEntity {
    type Resource = ServicePlan;

    fn into_resource(self, guid: String) -> ServicePlan {
        ServicePlan {
            guid,
            name: self.name,
            public: self.public,
            service_guid: self.service_guid,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ServicePlanVisibilityEntity {
    service_plan_guid: String,
    organization_guid: String,
}

impl IntoResource for ServicePlanVisibilityEntity {
    type Resource = ServicePlanVisibility;

    fn into_resource(self, guid: String) -> ServicePlanVisibility {
        ServicePlanVisibility {
            guid,
            service_plan_guid: self.service_plan_guid,
            organization_guid: self.organization_guid,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct BuildpackEntity {
    name: String,
    stack: Option<String>,
    position: Option<u32>,
    enabled: Option<bool>,
    locked: Option<bool>,
    filename: Option<String>,
}

impl IntoResource for BuildpackEntity {
    type Resource = Buildpack;

    fn into_resource(self, guid: String) -> Buildpack {
        Buildpack {
            guid,
            name: self.name,
            stack: self.stack.filter(|stack| !stack.is_empty()),
            position: self.position,
            enabled: self.enabled,
            locked: self.locked,
            filename: self.filename,
        }
    }
}
