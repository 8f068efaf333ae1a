//! Query filters for list endpoints.
//!
//! Filters are rendered as `q` parameters, for example `name:my-app` or
//! `organization_guid IN guid-1,guid-2`.

use std::fmt;

/// A filterable field of a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// `app_guid`
    ApplicationGuid,
    /// `domain_guid`
    DomainGuid,
    /// `host`
    Host,
    /// `label`
    Label,
    /// `name`
    Name,
    /// `organization_guid`
    OrganizationGuid,
    /// `path`
    Path,
    /// `port`
    Port,
    /// `service_broker_guid`
    ServiceBrokerGuid,
    /// `service_guid`
    ServiceGuid,
    /// `service_plan_guid`
    ServicePlanGuid,
    /// `space_guid`
    SpaceGuid,
    /// `stack`
    Stack,
}

impl FilterField {
    /// Returns the field name as the server expects it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationGuid => "app_guid",
            Self::DomainGuid => "domain_guid",
            Self::Host => "host",
            Self::Label => "label",
            Self::Name => "name",
            Self::OrganizationGuid => "organization_guid",
            Self::Path => "path",
            Self::Port => "port",
            Self::ServiceBrokerGuid => "service_broker_guid",
            Self::ServiceGuid => "service_guid",
            Self::ServicePlanGuid => "service_plan_guid",
            Self::SpaceGuid => "space_guid",
            Self::Stack => "stack",
        }
    }
}

/// How a filter compares the field against its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact match against a single value.
    Equal,
    /// Match against any of several values.
    In,
}

/// One `q` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field being filtered.
    pub field: FilterField,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Values to compare against.
    pub values: Vec<String>,
}

impl Filter {
    /// Builds an equality filter.
    #[must_use]
    pub fn equal(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            operator: FilterOperator::Equal,
            values: vec![value.into()],
        }
    }

    /// Builds an `IN` filter over `values`.
    #[must_use]
    pub fn within<I, S>(field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            operator: FilterOperator::In,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = match self.operator {
            FilterOperator::Equal => ":",
            FilterOperator::In => " IN ",
        };
        write!(f, "{}{separator}{}", self.field.as_str(), self.values.join(","))
    }
}
