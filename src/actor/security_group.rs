//! Security group lookups and space bindings.
//!
//! Every operation that takes a lifecycle parses it before touching the
//! server, so a bad lifecycle fails with no calls made and no warnings.

use std::sync::Arc;

use tracing::{debug, info};

use super::job::JobPoller;
use super::lookup::{exactly_one, not_found_as};
use super::organization::find_organization_by_name;
use super::space::find_space_by_organization_and_name;
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    Filter, FilterField, JobClient, Lifecycle, OrganizationClient, SecurityGroup,
    SecurityGroupClient, SpaceClient,
};
use crate::config::PollingSettings;
use crate::error::{ActionError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// Security group operations.
pub struct SecurityGroupActor<C: ?Sized> {
    client: Arc<C>,
    jobs: JobPoller<C>,
}

impl<C> SecurityGroupActor<C>
where
    C: SecurityGroupClient + SpaceClient + OrganizationClient + JobClient + ?Sized,
{
    /// Creates a security group actor.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self {
            jobs: JobPoller::new(Arc::clone(&client), settings),
            client,
        }
    }

    /// Looks a security group up by name.
    pub async fn get_security_group_by_name(&self, name: &str) -> ActionReply<SecurityGroup> {
        let filters = [Filter::equal(FilterField::Name, name)];
        self.client
            .get_security_groups(&filters)
            .await
            .map(|result| -> ActionResult<SecurityGroup> {
                exactly_one(result?, ResourceKind::SecurityGroup, name)
            })
    }

    /// Binds a security group to a space for one lifecycle.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidArgument`] when `lifecycle` is neither
    /// `running` nor `staging`.
    pub async fn bind_security_group_to_space(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: &str,
    ) -> ActionReply<()> {
        let parsed = match lifecycle.parse::<Lifecycle>() {
            Ok(parsed) => parsed,
            Err(error) => return Warned::bare(Err(error)),
        };
        self.client
            .bind_security_group_to_space(security_group_guid, space_guid, parsed)
            .await
            .err_into()
    }

    /// Unbinds a named security group from a space.
    ///
    /// When the group is not bound in the requested lifecycle but is bound
    /// in the other one, nothing is unbound and
    /// [`ActionError::SecurityGroupNotBound`] is returned. When it is bound
    /// in neither, the call succeeds without unbinding anything.
    pub async fn unbind_security_group_by_name_and_space(
        &self,
        security_group_name: &str,
        space_guid: &str,
        lifecycle: &str,
    ) -> ActionReply<()> {
        let parsed = match lifecycle.parse::<Lifecycle>() {
            Ok(parsed) => parsed,
            Err(error) => return Warned::bare(Err(error)),
        };
        let mut warnings = Warnings::new();
        let result = self
            .unbind_by_name(security_group_name, space_guid, parsed, &mut warnings)
            .await;
        Warned::new(result, warnings)
    }

    /// Unbinds a named security group from a space named within a named
    /// organization.
    pub async fn unbind_security_group_by_name_organization_name_and_space_name(
        &self,
        security_group_name: &str,
        org_name: &str,
        space_name: &str,
        lifecycle: &str,
    ) -> ActionReply<()> {
        let parsed = match lifecycle.parse::<Lifecycle>() {
            Ok(parsed) => parsed,
            Err(error) => return Warned::bare(Err(error)),
        };
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let organization =
                warnings.absorb(find_organization_by_name(self.client.as_ref(), org_name).await)?;
            let space = warnings.absorb(
                find_space_by_organization_and_name(
                    self.client.as_ref(),
                    &organization.guid,
                    space_name,
                )
                .await,
            )?;
            self.unbind_by_name(security_group_name, &space.guid, parsed, &mut warnings)
                .await
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Turns a named security group's platform-wide default on or off for
    /// one lifecycle.
    pub async fn update_security_group_globally_enabled(
        &self,
        security_group_name: &str,
        lifecycle: &str,
        enabled: bool,
    ) -> ActionReply<()> {
        let parsed = match lifecycle.parse::<Lifecycle>() {
            Ok(parsed) => parsed,
            Err(error) => return Warned::bare(Err(error)),
        };
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let group =
                warnings.absorb(self.get_security_group_by_name(security_group_name).await)?;
            warnings.absorb(
                self.client
                    .set_security_group_globally_enabled(&group.guid, parsed, enabled)
                    .await,
            )?;
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Deletes a named security group and waits for the delete job.
    pub async fn delete_security_group(&self, name: &str) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let group = warnings.absorb(self.get_security_group_by_name(name).await)?;
            let job = warnings
                .absorb(self.client.delete_security_group(&group.guid).await)
                .map_err(not_found_as(ResourceKind::SecurityGroup, name))?;
            warnings.absorb(self.jobs.poll_job(&job).await)?;
            info!(security_group = name, "deleted security group");
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    async fn unbind_by_name(
        &self,
        security_group_name: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
        warnings: &mut Warnings,
    ) -> ActionResult<()> {
        let group = warnings.absorb(self.get_security_group_by_name(security_group_name).await)?;

        if self
            .is_bound(&group.guid, space_guid, lifecycle, warnings)
            .await?
        {
            warnings.absorb(
                self.client
                    .unbind_security_group_from_space(&group.guid, space_guid, lifecycle)
                    .await,
            )?;
            return Ok(());
        }

        if self
            .is_bound(&group.guid, space_guid, lifecycle.other(), warnings)
            .await?
        {
            return Err(ActionError::SecurityGroupNotBound {
                name: security_group_name.to_owned(),
                lifecycle: lifecycle.to_string(),
            });
        }

        debug!(
            security_group = security_group_name,
            space_guid, "security group is not bound to the space"
        );
        Ok(())
    }

    async fn is_bound(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
        warnings: &mut Warnings,
    ) -> ActionResult<bool> {
        let bound = warnings.absorb(
            self.client
                .get_space_security_groups(space_guid, lifecycle, &[])
                .await,
        )?;
        Ok(bound.iter().any(|group| group.guid == security_group_guid))
    }
}
