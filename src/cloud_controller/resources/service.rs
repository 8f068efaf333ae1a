//! Service brokers, the services they offer, and plan visibility.

/// A registered service broker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBroker {
    /// Server-assigned GUID.
    pub guid: String,
    /// Broker name.
    pub name: String,
    /// URL the platform calls the broker on.
    pub broker_url: String,
    /// GUID of the space for space-scoped brokers, empty otherwise.
    pub space_guid: String,
}

/// A service offered by a broker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    /// Server-assigned GUID.
    pub guid: String,
    /// Service label as shown in the marketplace.
    pub label: String,
    /// Free-form description.
    pub description: String,
    /// GUID of the offering broker.
    pub service_broker_guid: String,
}

/// A plan of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePlan {
    /// Server-assigned GUID.
    pub guid: String,
    /// Plan name.
    pub name: String,
    /// Visible to every organization.
    pub public: bool,
    /// GUID of the owning service.
    pub service_guid: String,
}

/// Grants one organization access to a non-public plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePlanVisibility {
    /// Server-assigned GUID.
    pub guid: String,
    /// GUID of the plan.
    pub service_plan_guid: String,
    /// GUID of the organization granted access.
    pub organization_guid: String,
}
