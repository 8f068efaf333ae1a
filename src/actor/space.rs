//! Space lookups, lifecycle, and the space summary.

use std::sync::Arc;

use tracing::info;

use super::job::JobPoller;
use super::lookup::{exactly_one, name_taken_as, not_found_as};
use super::organization::find_organization_by_name;
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    ApplicationClient, Filter, FilterField, JobClient, Lifecycle, OrganizationClient,
    SecurityGroup, Space, SpaceClient, SpaceQuota,
};
use crate::config::PollingSettings;
use crate::error::{ActionError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// One egress rule of a security group bound to a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceSecurityGroupRule {
    /// Name of the group the rule belongs to.
    pub name: String,
    /// Rule description.
    pub description: String,
    /// Destination address, range or CIDR.
    pub destination: String,
    /// Lifecycle the group is bound in.
    pub lifecycle: Lifecycle,
    /// Ports or port ranges.
    pub ports: String,
    /// Protocol.
    pub protocol: String,
}

/// A space with its applications, services, quota, and security groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceSummary {
    /// The space itself.
    pub space: Space,
    /// Name of the owning organization.
    pub organization_name: String,
    /// Application names, sorted.
    pub app_names: Vec<String>,
    /// Service instance names, sorted.
    pub service_instance_names: Vec<String>,
    /// Name of the space quota, empty when none is assigned.
    pub space_quota_name: String,
    /// Names of the groups bound for running, sorted.
    pub running_security_group_names: Vec<String>,
    /// Names of the groups bound for staging, sorted. Empty unless staging
    /// groups were requested.
    pub staging_security_group_names: Vec<String>,
    /// Every rule of every listed group, sorted by group name, destination,
    /// and lifecycle.
    pub security_group_rules: Vec<SpaceSecurityGroupRule>,
}

/// Looks a space up by organization and unique name.
pub(super) async fn find_space_by_organization_and_name<C>(
    client: &C,
    org_guid: &str,
    name: &str,
) -> ActionReply<Space>
where
    C: SpaceClient + ?Sized,
{
    let filters = [
        Filter::equal(FilterField::Name, name),
        Filter::equal(FilterField::OrganizationGuid, org_guid),
    ];
    client
        .get_spaces(&filters)
        .await
        .map(|result| -> ActionResult<Space> { exactly_one(result?, ResourceKind::Space, name) })
}

/// Space operations.
pub struct SpaceActor<C: ?Sized> {
    client: Arc<C>,
    jobs: JobPoller<C>,
}

impl<C> SpaceActor<C>
where
    C: SpaceClient + OrganizationClient + ApplicationClient + JobClient + ?Sized,
{
    /// Creates a space actor.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self {
            jobs: JobPoller::new(Arc::clone(&client), settings),
            client,
        }
    }

    /// Looks a space up by organization and name.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] or [`ActionError::MultipleFound`] unless
    /// exactly one space matches.
    pub async fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        name: &str,
    ) -> ActionReply<Space> {
        find_space_by_organization_and_name(self.client.as_ref(), org_guid, name).await
    }

    /// Lists the spaces of an organization.
    pub async fn get_organization_spaces(&self, org_guid: &str) -> ActionReply<Vec<Space>> {
        let filters = [Filter::equal(FilterField::OrganizationGuid, org_guid)];
        self.client.get_spaces(&filters).await.err_into()
    }

    /// Creates a space in the named organization, assigning the named space
    /// quota when one is given.
    ///
    /// The quota is resolved before the space is created, so an unknown
    /// quota creates nothing.
    pub async fn create_space(
        &self,
        name: &str,
        org_name: &str,
        quota_name: &str,
    ) -> ActionReply<Space> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Space> = async {
            let organization =
                warnings.absorb(find_organization_by_name(self.client.as_ref(), org_name).await)?;

            let quota = if quota_name.is_empty() {
                None
            } else {
                Some(warnings.absorb(
                    self.get_space_quota_by_name(quota_name, &organization.guid)
                        .await,
                )?)
            };

            let mut space = warnings
                .absorb(self.client.create_space(name, &organization.guid).await)
                .map_err(name_taken_as(ResourceKind::Space, name))?;

            if let Some(assigned) = quota {
                warnings.absorb(
                    self.client
                        .set_space_quota(&space.guid, &assigned.guid)
                        .await,
                )?;
                space.space_quota_definition_guid = assigned.guid;
            }
            Ok(space)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Finds an organization's space quota by name.
    pub async fn get_space_quota_by_name(
        &self,
        name: &str,
        org_guid: &str,
    ) -> ActionReply<SpaceQuota> {
        self.client
            .get_space_quotas(org_guid)
            .await
            .map(|result| -> ActionResult<SpaceQuota> {
                result?
                    .into_iter()
                    .find(|quota| quota.name == name)
                    .ok_or_else(|| ActionError::not_found(ResourceKind::SpaceQuota, name))
            })
    }

    /// Deletes a space with everything in it and waits for the delete job.
    pub async fn delete_space_by_name_and_organization_name(
        &self,
        space_name: &str,
        org_name: &str,
    ) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let organization =
                warnings.absorb(find_organization_by_name(self.client.as_ref(), org_name).await)?;
            let space = warnings.absorb(
                self.get_space_by_organization_and_name(&organization.guid, space_name)
                    .await,
            )?;
            let job = warnings
                .absorb(self.client.delete_space(&space.guid).await)
                .map_err(not_found_as(ResourceKind::Space, space_name))?;
            warnings.absorb(self.jobs.poll_job(&job).await)?;
            info!(space = space_name, organization = org_name, "deleted space");
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Builds the summary shown by `space`.
    ///
    /// Staging security groups are only fetched when
    /// `include_staging_security_groups` is set.
    pub async fn get_space_summary_by_organization_and_name(
        &self,
        org_guid: &str,
        name: &str,
        include_staging_security_groups: bool,
    ) -> ActionReply<SpaceSummary> {
        let mut warnings = Warnings::new();
        let result: ActionResult<SpaceSummary> = async {
            let organization = warnings
                .absorb(self.client.get_organization(org_guid).await)
                .map_err(not_found_as(ResourceKind::Organization, org_guid))?;
            let space =
                warnings.absorb(self.get_space_by_organization_and_name(org_guid, name).await)?;

            let app_filters = [Filter::equal(FilterField::SpaceGuid, space.guid.as_str())];
            let apps = warnings.absorb(self.client.get_applications(&app_filters).await)?;
            let app_names = sorted_names(apps.into_iter().map(|app| app.name));

            let instances = warnings.absorb(
                self.client
                    .get_space_service_instances(&space.guid, &[])
                    .await,
            )?;
            let service_instance_names =
                sorted_names(instances.into_iter().map(|instance| instance.name));

            let space_quota_name = if space.space_quota_definition_guid.is_empty() {
                String::new()
            } else {
                warnings
                    .absorb(
                        self.client
                            .get_space_quota(&space.space_quota_definition_guid)
                            .await,
                    )
                    .map_err(not_found_as(
                        ResourceKind::SpaceQuota,
                        &space.space_quota_definition_guid,
                    ))?
                    .name
            };

            let mut security_group_rules = Vec::new();
            let running = warnings.absorb(
                self.client
                    .get_space_security_groups(&space.guid, Lifecycle::Running, &[])
                    .await,
            )?;
            let running_security_group_names =
                collect_groups(running, Lifecycle::Running, &mut security_group_rules);

            let staging_security_group_names = if include_staging_security_groups {
                let staging = warnings.absorb(
                    self.client
                        .get_space_security_groups(&space.guid, Lifecycle::Staging, &[])
                        .await,
                )?;
                collect_groups(staging, Lifecycle::Staging, &mut security_group_rules)
            } else {
                Vec::new()
            };

            security_group_rules.sort_by(|left, right| {
                (&left.name, &left.destination, left.lifecycle).cmp(&(
                    &right.name,
                    &right.destination,
                    right.lifecycle,
                ))
            });

            Ok(SpaceSummary {
                space,
                organization_name: organization.name,
                app_names,
                service_instance_names,
                space_quota_name,
                running_security_group_names,
                staging_security_group_names,
                security_group_rules,
            })
        }
        .await;
        Warned::new(result, warnings)
    }
}

fn sorted_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut collected: Vec<String> = names.collect();
    collected.sort();
    collected
}

/// Flattens the groups' rules into `rules` and returns the sorted group names.
fn collect_groups(
    groups: Vec<SecurityGroup>,
    lifecycle: Lifecycle,
    rules: &mut Vec<SpaceSecurityGroupRule>,
) -> Vec<String> {
    let mut names = Vec::with_capacity(groups.len());
    for group in groups {
        rules.extend(group.rules.into_iter().map(|rule| SpaceSecurityGroupRule {
            name: group.name.clone(),
            description: rule.description,
            destination: rule.destination,
            lifecycle,
            ports: rule.ports,
            protocol: rule.protocol,
        }));
        names.push(group.name);
    }
    names.sort();
    names
}
