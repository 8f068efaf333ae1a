//! Organization lookups, lifecycle, and the organization summary.

use std::sync::Arc;

use tracing::info;

use super::domain::DomainActor;
use super::job::JobPoller;
use super::lookup::{exactly_one, name_taken_as, not_found_as};
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    DomainClient, Filter, FilterField, JobClient, Organization, OrganizationClient,
    OrganizationQuota, SpaceClient,
};
use crate::config::PollingSettings;
use crate::error::ResourceKind;
use crate::warnings::{Warned, Warnings};

/// An organization with its domains, quota, and spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationSummary {
    /// The organization itself.
    pub organization: Organization,
    /// Private domain names, then shared domain names.
    pub domain_names: Vec<String>,
    /// Name of the assigned quota definition.
    pub quota_name: String,
    /// Space names, sorted.
    pub space_names: Vec<String>,
}

/// Looks an organization up by its unique name.
pub(super) async fn find_organization_by_name<C>(client: &C, name: &str) -> ActionReply<Organization>
where
    C: OrganizationClient + ?Sized,
{
    let filters = [Filter::equal(FilterField::Name, name)];
    client
        .get_organizations(&filters)
        .await
        .map(|result| -> ActionResult<Organization> {
            exactly_one(result?, ResourceKind::Organization, name)
        })
}

/// Organization operations.
pub struct OrganizationActor<C: ?Sized> {
    client: Arc<C>,
    domains: DomainActor<C>,
    jobs: JobPoller<C>,
}

impl<C> OrganizationActor<C>
where
    C: OrganizationClient + DomainClient + SpaceClient + JobClient + ?Sized,
{
    /// Creates an organization actor.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self {
            domains: DomainActor::new(Arc::clone(&client)),
            jobs: JobPoller::new(Arc::clone(&client), settings),
            client,
        }
    }

    /// Fetches an organization by GUID.
    pub async fn get_organization(&self, guid: &str) -> ActionReply<Organization> {
        self.client
            .get_organization(guid)
            .await
            .map_err(not_found_as(ResourceKind::Organization, guid))
    }

    /// Looks an organization up by name.
    ///
    /// # Errors
    ///
    /// [`crate::error::ActionError::NotFound`] when no organization has this
    /// name, [`crate::error::ActionError::MultipleFound`] when several do.
    pub async fn get_organization_by_name(&self, name: &str) -> ActionReply<Organization> {
        find_organization_by_name(self.client.as_ref(), name).await
    }

    /// Lists every organization visible to the user.
    pub async fn get_organizations(&self) -> ActionReply<Vec<Organization>> {
        self.client.get_organizations(&[]).await.err_into()
    }

    /// Creates an organization, assigning the named quota when one is given.
    ///
    /// An empty `quota_name` leaves the server's default quota in place.
    pub async fn create_organization(
        &self,
        name: &str,
        quota_name: &str,
    ) -> ActionReply<Organization> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Organization> = async {
            let quota_guid = if quota_name.is_empty() {
                String::new()
            } else {
                warnings
                    .absorb(self.get_organization_quota_by_name(quota_name).await)?
                    .guid
            };
            let created = warnings
                .absorb(self.client.create_organization(name, &quota_guid).await)
                .map_err(name_taken_as(ResourceKind::Organization, name))?;
            Ok(created)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Looks a quota definition up by name.
    pub async fn get_organization_quota_by_name(
        &self,
        name: &str,
    ) -> ActionReply<OrganizationQuota> {
        let filters = [Filter::equal(FilterField::Name, name)];
        self.client
            .get_organization_quotas(&filters)
            .await
            .map(|result| -> ActionResult<OrganizationQuota> {
                exactly_one(result?, ResourceKind::OrganizationQuota, name)
            })
    }

    /// Deletes an organization with everything in it and waits for the
    /// delete job.
    pub async fn delete_organization(&self, name: &str) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let organization = warnings.absorb(self.get_organization_by_name(name).await)?;
            let job = warnings
                .absorb(self.client.delete_organization(&organization.guid).await)
                .map_err(not_found_as(ResourceKind::Organization, name))?;
            warnings.absorb(self.jobs.poll_job(&job).await)?;
            info!(organization = name, "deleted organization");
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Builds the summary shown by `org`.
    ///
    /// Calls are made in this order: organization, private domains, shared
    /// domains, quota, spaces.
    pub async fn get_organization_summary_by_name(
        &self,
        name: &str,
    ) -> ActionReply<OrganizationSummary> {
        let mut warnings = Warnings::new();
        let result: ActionResult<OrganizationSummary> = async {
            let organization = warnings.absorb(self.get_organization_by_name(name).await)?;

            let domains =
                warnings.absorb(self.domains.get_organization_domains(&organization.guid).await)?;
            let domain_names = domains.into_iter().map(|domain| domain.name).collect();

            let quota = warnings
                .absorb(
                    self.client
                        .get_organization_quota(&organization.quota_definition_guid)
                        .await,
                )
                .map_err(not_found_as(
                    ResourceKind::OrganizationQuota,
                    &organization.quota_definition_guid,
                ))?;

            let filters = [Filter::equal(
                FilterField::OrganizationGuid,
                organization.guid.as_str(),
            )];
            let spaces = warnings.absorb(self.client.get_spaces(&filters).await)?;
            let mut space_names: Vec<String> = spaces.into_iter().map(|space| space.name).collect();
            space_names.sort();

            Ok(OrganizationSummary {
                organization,
                domain_names,
                quota_name: quota.name,
                space_names,
            })
        }
        .await;
        Warned::new(result, warnings)
    }
}
