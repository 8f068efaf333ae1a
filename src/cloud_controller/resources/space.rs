//! Spaces, space quotas and the service instances that live in a space.

/// A space inside an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    /// Server-assigned GUID.
    pub guid: String,
    /// Space name, unique within its organization.
    pub name: String,
    /// GUID of the owning organization.
    pub organization_guid: String,
    /// GUID of the space quota, empty when none is assigned.
    pub space_quota_definition_guid: String,
    /// Whether SSH access to application instances is allowed.
    pub allow_ssh: bool,
}

/// Resource limits applied to a space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceQuota {
    /// Server-assigned GUID.
    pub guid: String,
    /// Quota name, unique within its organization.
    pub name: String,
    /// GUID of the owning organization.
    pub organization_guid: String,
    /// Total memory limit, in megabytes.
    pub memory_limit_mb: i64,
    /// Per-instance memory limit, in megabytes.
    pub instance_memory_limit_mb: i64,
    /// Maximum number of routes.
    pub total_routes: i64,
    /// Maximum number of service instances.
    pub total_services: i64,
    /// Maximum number of application instances.
    pub app_instance_limit: i64,
}

/// A managed or user-provided service instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInstance {
    /// Server-assigned GUID.
    pub guid: String,
    /// Instance name.
    pub name: String,
    /// GUID of the owning space.
    pub space_guid: String,
    /// GUID of the service plan, empty for user-provided instances.
    pub service_plan_guid: String,
    /// `true` for user-provided instances.
    pub user_provided: bool,
}
