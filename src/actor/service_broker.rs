//! Service broker summaries.
//!
//! A summary walks brokers, their services, and each service's plans. Plans
//! that are not public carry the names of the organizations allowed to see
//! them. Those names are resolved once per organization and remembered only
//! for the duration of the call that resolved them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::lookup::not_found_as;
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    Filter, FilterField, OrganizationClient, Service, ServiceBroker, ServiceClient, ServicePlan,
};
use crate::error::{ActionError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// A broker with the services it offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBrokerSummary {
    /// The broker itself.
    pub broker: ServiceBroker,
    /// Offered services.
    pub services: Vec<ServiceSummary>,
}

/// A service with its plans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSummary {
    /// The service itself.
    pub service: Service,
    /// Plans of the service.
    pub plans: Vec<ServicePlanSummary>,
}

/// A plan with the organizations it is visible to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePlanSummary {
    /// The plan itself.
    pub plan: ServicePlan,
    /// Names of organizations granted access. Empty for public plans.
    pub visible_to: Vec<String>,
}

/// Query narrowing a broker summary. Every field is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceBrokerQuery<'a> {
    /// Only this broker.
    pub broker: Option<&'a str>,
    /// Only services with this label.
    pub service: Option<&'a str>,
    /// Only plans visible to this organization.
    pub organization: Option<&'a str>,
}

/// Service broker operations.
pub struct ServiceBrokerActor<C: ?Sized> {
    client: Arc<C>,
}

impl<C> ServiceBrokerActor<C>
where
    C: ServiceClient + OrganizationClient + ?Sized,
{
    /// Creates a service broker actor.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Summarises brokers, their services, and their plans.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] when a broker name was given and no broker
    /// has it.
    pub async fn get_service_broker_summaries(
        &self,
        query: ServiceBrokerQuery<'_>,
    ) -> ActionReply<Vec<ServiceBrokerSummary>> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Vec<ServiceBrokerSummary>> = async {
            let filters: Vec<Filter> = query
                .broker
                .map(|name| Filter::equal(FilterField::Name, name))
                .into_iter()
                .collect();
            let brokers = warnings.absorb(self.client.get_service_brokers(&filters).await)?;
            if let Some(name) = query.broker
                && brokers.is_empty()
            {
                return Err(ActionError::not_found(ResourceKind::ServiceBroker, name));
            }

            let mut organization_names = HashMap::new();
            let mut summaries = Vec::with_capacity(brokers.len());
            for broker in brokers {
                let services = self
                    .summarise_services(&broker, query, &mut organization_names, &mut warnings)
                    .await?;
                summaries.push(ServiceBrokerSummary { broker, services });
            }
            Ok(summaries)
        }
        .await;
        Warned::new(result, warnings)
    }

    async fn summarise_services(
        &self,
        broker: &ServiceBroker,
        query: ServiceBrokerQuery<'_>,
        organization_names: &mut HashMap<String, String>,
        warnings: &mut Warnings,
    ) -> ActionResult<Vec<ServiceSummary>> {
        let mut filters = vec![Filter::equal(FilterField::ServiceBrokerGuid, &broker.guid)];
        if let Some(label) = query.service {
            filters.push(Filter::equal(FilterField::Label, label));
        }
        let services = warnings.absorb(self.client.get_services(&filters).await)?;

        let mut summaries = Vec::with_capacity(services.len());
        for service in services {
            let plans = self
                .summarise_plans(&service, query.organization, organization_names, warnings)
                .await?;
            summaries.push(ServiceSummary { service, plans });
        }
        Ok(summaries)
    }

    async fn summarise_plans(
        &self,
        service: &Service,
        organization: Option<&str>,
        organization_names: &mut HashMap<String, String>,
        warnings: &mut Warnings,
    ) -> ActionResult<Vec<ServicePlanSummary>> {
        let filters = [Filter::equal(FilterField::ServiceGuid, &service.guid)];
        let plans = warnings.absorb(self.client.get_service_plans(&filters).await)?;

        let mut summaries = Vec::with_capacity(plans.len());
        for plan in plans {
            let visible_to = if plan.public {
                Vec::new()
            } else {
                self.visible_organization_names(&plan, organization_names, warnings)
                    .await?
            };
            let visible = plan.public
                || organization.is_none_or(|wanted| visible_to.iter().any(|name| name == wanted));
            if visible {
                summaries.push(ServicePlanSummary { plan, visible_to });
            } else {
                debug!(plan = %plan.name, "plan hidden from requested organization");
            }
        }
        Ok(summaries)
    }

    async fn visible_organization_names(
        &self,
        plan: &ServicePlan,
        organization_names: &mut HashMap<String, String>,
        warnings: &mut Warnings,
    ) -> ActionResult<Vec<String>> {
        let filters = [Filter::equal(FilterField::ServicePlanGuid, &plan.guid)];
        let visibilities =
            warnings.absorb(self.client.get_service_plan_visibilities(&filters).await)?;

        let mut names = Vec::with_capacity(visibilities.len());
        for visibility in visibilities {
            let guid = visibility.organization_guid;
            if let Some(known) = organization_names.get(&guid) {
                names.push(known.clone());
                continue;
            }
            let organization = warnings
                .absorb(self.client.get_organization(&guid).await)
                .map_err(not_found_as(ResourceKind::Organization, &guid))?;
            names.push(organization.name.clone());
            organization_names.insert(guid, organization.name);
        }
        Ok(names)
    }
}
