//! Resource records returned by the Cloud Controller.
//!
//! These are value objects rebuilt from every response. They carry no
//! lifecycle of their own; the few derived accessors they expose only read
//! the fields the server sent.

mod application;
mod buildpack;
mod domain;
mod job;
mod organization;
mod route;
mod security_group;
mod service;
mod space;

pub use application::{
    Application, ApplicationInstance, ApplicationState, ApplicationUpdate, HealthCheckType,
    InstanceState, PackageState,
};
pub use buildpack::Buildpack;
pub use domain::{Domain, RouterGroupType};
pub use job::{Job, JobStatus};
pub use organization::{Organization, OrganizationQuota};
pub use route::Route;
pub use security_group::{Lifecycle, SecurityGroup, SecurityGroupRule};
pub use service::{Service, ServiceBroker, ServicePlan, ServicePlanVisibility};
pub use space::{ServiceInstance, Space, SpaceQuota};

/// A resource identified by a server-assigned GUID.
pub trait Resource {
    /// Returns the resource's GUID.
    fn guid(&self) -> &str;
}

macro_rules! impl_resource {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Resource for $ty {
                fn guid(&self) -> &str {
                    &self.guid
                }
            }
        )+
    };
}

impl_resource!(
    Application,
    Buildpack,
    Domain,
    Job,
    Organization,
    OrganizationQuota,
    Route,
    SecurityGroup,
    Service,
    ServiceBroker,
    ServiceInstance,
    ServicePlan,
    ServicePlanVisibility,
    Space,
    SpaceQuota,
    Stack,
);

/// A root filesystem applications run on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    /// Server-assigned GUID.
    pub guid: String,
    /// Stack name, for example `cflinuxfs4`.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
