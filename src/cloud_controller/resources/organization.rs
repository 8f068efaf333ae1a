//! Organizations and organization quotas.

/// An organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    /// Server-assigned GUID.
    pub guid: String,
    /// Organization name, globally unique.
    pub name: String,
    /// GUID of the organization's quota definition.
    pub quota_definition_guid: String,
}

/// Resource limits applied to an organization.
///
/// A limit of `-1` means unlimited, as the server reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationQuota {
    /// Server-assigned GUID.
    pub guid: String,
    /// Quota name.
    pub name: String,
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
    /// Whether paid service plans may be used.
    pub non_basic_services_allowed: bool,
}
