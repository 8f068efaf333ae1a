//! Actors: CLI-level intents expressed as sequences of Cloud Controller calls.
//!
//! Each actor is a narrow service object over a shared client. Its operations
//! return [`ActionReply`]: the domain result plus every warning collected from
//! the calls made along the way, whether the operation succeeded or not.
//!
//! Actors classify the handful of API error kinds that mean something in the
//! context of the current operation (a missing resource, a name collision)
//! and pass every other error through unchanged inside
//! [`ActionError::Generic`].

mod application;
mod application_summary;
mod buildpack;
mod domain;
mod job;
mod lookup;
mod organization;
mod route;
mod security_group;
mod service_broker;
mod space;

#[cfg(test)]
mod test_support;

use crate::error::ActionError;
use crate::warnings::Warned;

pub use application::ApplicationActor;
pub use application_summary::ApplicationSummary;
pub use buildpack::BuildpackActor;
pub use domain::DomainActor;
pub use job::JobPoller;
pub use organization::{OrganizationActor, OrganizationSummary};
pub use route::{Route, RouteActor, Routes};
pub use security_group::SecurityGroupActor;
pub use service_broker::{
    ServiceBrokerActor, ServiceBrokerQuery, ServiceBrokerSummary, ServicePlanSummary,
    ServiceSummary,
};
pub use space::{SpaceActor, SpaceSecurityGroupRule, SpaceSummary};

/// Result of an actor operation.
pub type ActionResult<T> = Result<T, ActionError>;

/// Result and warnings of an actor operation.
pub type ActionReply<T> = Warned<ActionResult<T>>;
