//! Application lookups and lifecycle.
//!
//! Starting an application is two polling loops back to back: one waits for
//! the package to stage, the other for an instance to come up. Both are
//! paced by [`PollingSettings`] and give up once their budget is spent,
//! checking the budget before each sleep the way the job poller does.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::job::JobPoller;
use super::lookup::{exactly_one, name_taken_as, not_found_as};
use super::route::{RouteActor, Routes};
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    Application, ApplicationClient, ApplicationInstance, ApplicationState, ApplicationUpdate,
    DomainClient, Filter, FilterField, HealthCheckType, InstanceState, JobClient, RouteClient,
    SpaceClient,
};
use crate::config::PollingSettings;
use crate::error::{ActionError, ApiError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// Application operations.
pub struct ApplicationActor<C: ?Sized> {
    pub(super) client: Arc<C>,
    pub(super) routes: RouteActor<C>,
    jobs: JobPoller<C>,
    settings: Arc<dyn PollingSettings + Send + Sync>,
}

impl<C> ApplicationActor<C>
where
    C: ApplicationClient + RouteClient + DomainClient + SpaceClient + JobClient + ?Sized,
{
    /// Creates an application actor.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self {
            routes: RouteActor::new(Arc::clone(&client), Arc::clone(&settings)),
            jobs: JobPoller::new(Arc::clone(&client), Arc::clone(&settings)),
            client,
            settings,
        }
    }

    /// Fetches an application by GUID.
    pub async fn get_application(&self, guid: &str) -> ActionReply<Application> {
        self.client
            .get_application(guid)
            .await
            .map_err(not_found_as(ResourceKind::Application, guid))
    }

    /// Looks an application up by name within a space.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] or [`ActionError::MultipleFound`] unless
    /// exactly one application matches.
    pub async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> ActionReply<Application> {
        let filters = [
            Filter::equal(FilterField::Name, name),
            Filter::equal(FilterField::SpaceGuid, space_guid),
        ];
        self.client
            .get_applications(&filters)
            .await
            .map(|result| -> ActionResult<Application> {
                exactly_one(result?, ResourceKind::Application, name)
            })
    }

    /// Looks several applications up by name within a space.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] naming every missing application when fewer
    /// applications come back than were asked for.
    pub async fn get_applications_by_names_and_space(
        &self,
        names: &[String],
        space_guid: &str,
    ) -> ActionReply<Vec<Application>> {
        let filters = [
            Filter::within(FilterField::Name, names.iter().cloned()),
            Filter::equal(FilterField::SpaceGuid, space_guid),
        ];
        self.client
            .get_applications(&filters)
            .await
            .map(|result| -> ActionResult<Vec<Application>> {
                let found = result?;
                if found.len() < names.len() {
                    let missing: Vec<&str> = names
                        .iter()
                        .filter(|name| !found.iter().any(|app| &app.name == *name))
                        .map(String::as_str)
                        .collect();
                    return Err(ActionError::not_found(
                        ResourceKind::Application,
                        missing.join(", "),
                    ));
                }
                Ok(found)
            })
    }

    /// Lists the applications of a space.
    pub async fn get_applications_by_space(&self, space_guid: &str) -> ActionReply<Vec<Application>> {
        let filters = [Filter::equal(FilterField::SpaceGuid, space_guid)];
        self.client.get_applications(&filters).await.err_into()
    }

    /// Creates an application.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyExists`] when the space already has an
    /// application with this name.
    pub async fn create_application(&self, application: &Application) -> ActionReply<Application> {
        self.client
            .create_application(application)
            .await
            .map_err(name_taken_as(ResourceKind::Application, &application.name))
    }

    /// Changes an application's health check, leaving it alone when it
    /// already matches.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidArgument`], before any call, when an endpoint
    /// other than `/` is given for a non-HTTP health check.
    pub async fn set_application_health_check_type_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
        health_check_type: HealthCheckType,
        endpoint: &str,
    ) -> ActionReply<Application> {
        if endpoint != "/" && health_check_type != HealthCheckType::Http {
            return Warned::bare(Err(ActionError::invalid_argument(
                "endpoint",
                "a health check endpoint can only be set for http health checks",
            )));
        }

        let mut warnings = Warnings::new();
        let result: ActionResult<Application> = async {
            let app =
                warnings.absorb(self.get_application_by_name_and_space(name, space_guid).await)?;

            let unchanged = app.health_check_type == health_check_type
                && (health_check_type != HealthCheckType::Http
                    || app.calculated_health_check_endpoint() == Some(endpoint));
            if unchanged {
                return Ok(app);
            }

            let probed = if health_check_type == HealthCheckType::Http {
                endpoint
            } else {
                ""
            };
            let update = ApplicationUpdate::new(app.guid.as_str())
                .with_health_check(health_check_type, probed);
            let updated = warnings.absorb(self.client.update_application(&update).await)?;
            Ok(updated)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Renames an application within a space.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyExists`] when `new_name` is taken.
    pub async fn rename_application_by_name_and_space(
        &self,
        old_name: &str,
        new_name: &str,
        space_guid: &str,
    ) -> ActionReply<Application> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Application> = async {
            let app = warnings.absorb(
                self.get_application_by_name_and_space(old_name, space_guid)
                    .await,
            )?;
            let update = ApplicationUpdate::new(app.guid.as_str()).with_name(new_name);
            let renamed = warnings
                .absorb(self.client.update_application(&update).await)
                .map_err(name_taken_as(ResourceKind::Application, new_name))?;
            Ok(renamed)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Starts an application and waits for it to stage and run.
    ///
    /// Startup is not awaited for applications scaled to zero instances.
    ///
    /// # Errors
    ///
    /// - [`ActionError::StagingFailed`] or
    ///   [`ActionError::StagingFailedNoAppDetected`] when staging fails.
    /// - [`ActionError::StagingTimeout`] when staging outlasts its budget.
    /// - [`ActionError::InstanceCrashed`] when every instance crashed.
    /// - [`ActionError::InstanceFlapping`] when an instance is flapping.
    /// - [`ActionError::StartupTimeout`] when no instance runs in time.
    pub async fn start_application(&self, app: &Application) -> ActionReply<Application> {
        let mut warnings = Warnings::new();
        let result = self.start(app, &mut warnings).await;
        Warned::new(result, warnings)
    }

    /// Stops an application.
    pub async fn stop_application(&self, app: &Application) -> ActionReply<Application> {
        let update = ApplicationUpdate::new(app.guid.as_str()).with_state(ApplicationState::Stopped);
        self.client
            .update_application(&update)
            .await
            .map_err(not_found_as(ResourceKind::Application, &app.name))
    }

    /// Stops an application if it is started, then starts it.
    pub async fn restart_application(&self, app: &Application) -> ActionReply<Application> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Application> = async {
            let current = if app.is_started() {
                warnings.absorb(self.stop_application(app).await)?
            } else {
                app.clone()
            };
            self.start(&current, &mut warnings).await
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Deletes an application, and its routes when `delete_routes` is set.
    ///
    /// Routes are checked before anything is deleted: a route that is also
    /// mapped to another application stops the whole operation. A route that
    /// has already gone by the time it is deleted is not an error.
    ///
    /// # Errors
    ///
    /// [`ActionError::RouteBoundToMultipleApps`] when a route is shared.
    pub async fn delete_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
        delete_routes: bool,
    ) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let app =
                warnings.absorb(self.get_application_by_name_and_space(name, space_guid).await)?;

            let routes = if delete_routes {
                let routes =
                    warnings.absorb(self.routes.get_application_routes(&app.guid).await)?;
                self.ensure_routes_are_exclusive(&app, &routes, &mut warnings)
                    .await?;
                routes
            } else {
                Routes::default()
            };

            let job = warnings
                .absorb(self.client.delete_application(&app.guid).await)
                .map_err(not_found_as(ResourceKind::Application, name))?;
            warnings.absorb(self.jobs.poll_job(&job).await)?;
            info!(application = name, "deleted application");

            for route in routes {
                match warnings.absorb(self.routes.delete_route(&route.guid).await) {
                    Ok(())
                    | Err(ActionError::NotFound {
                        resource: ResourceKind::Route,
                        ..
                    }) => {}
                    Err(other) => return Err(other),
                }
            }
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Fetches instance states where the platform can report them.
    ///
    /// Stopped, unstaged, and temporarily unreportable applications yield an
    /// empty list rather than an error. Warnings from the attempt are kept
    /// either way.
    pub async fn get_application_instances(
        &self,
        app: &Application,
    ) -> ActionReply<Vec<ApplicationInstance>> {
        self.client
            .get_application_instances(&app.guid)
            .await
            .map(|result| match result {
                Ok(instances) => Ok(instances),
                Err(
                    ApiError::ApplicationStopped { .. }
                    | ApiError::NotStaged { .. }
                    | ApiError::InstancesUnavailable { .. },
                ) => {
                    debug!(application = %app.name, "no instance information available");
                    Ok(Vec::new())
                }
                Err(other) => Err(ActionError::Generic(other)),
            })
    }

    async fn ensure_routes_are_exclusive(
        &self,
        app: &Application,
        routes: &Routes,
        warnings: &mut Warnings,
    ) -> ActionResult<()> {
        for route in routes {
            let mapped = warnings.absorb(self.client.get_route_applications(&route.guid).await)?;
            if mapped.iter().any(|other| other.guid != app.guid) {
                return Err(ActionError::RouteBoundToMultipleApps {
                    app: app.name.clone(),
                    route: route.to_string(),
                });
            }
        }
        Ok(())
    }

    async fn start(&self, app: &Application, warnings: &mut Warnings) -> ActionResult<Application> {
        let update = ApplicationUpdate::new(app.guid.as_str()).with_state(ApplicationState::Started);
        let started = warnings
            .absorb(self.client.update_application(&update).await)
            .map_err(not_found_as(ResourceKind::Application, &app.name))?;

        self.poll_staging(&started, warnings).await?;

        if started.instances == Some(0) {
            return Ok(started);
        }
        self.poll_startup(&started, warnings).await?;
        info!(application = %started.name, "application started");
        Ok(started)
    }

    async fn poll_staging(&self, app: &Application, warnings: &mut Warnings) -> ActionResult<()> {
        let interval = self.settings.polling_interval();
        let timeout = self.settings.staging_timeout();
        let started = Instant::now();

        loop {
            let current = warnings.absorb(self.get_application(&app.guid).await)?;
            debug!(application = %app.name, package_state = ?current.package_state, "polled staging");

            if current.staging_completed() {
                return Ok(());
            }
            if current.staging_failed() {
                let reason = current.staging_failed_message().to_owned();
                warn!(application = %app.name, %reason, "staging failed");
                return Err(if current.staging_failed_no_app_detected() {
                    ActionError::StagingFailedNoAppDetected { reason }
                } else {
                    ActionError::StagingFailed { reason }
                });
            }

            if started.elapsed() >= timeout {
                warn!(application = %app.name, timeout_secs = timeout.as_secs(), "staging timed out");
                return Err(ActionError::StagingTimeout {
                    app: app.name.clone(),
                    timeout,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn poll_startup(&self, app: &Application, warnings: &mut Warnings) -> ActionResult<()> {
        let interval = self.settings.polling_interval();
        let timeout = self.settings.startup_timeout();
        let started = Instant::now();

        loop {
            let instances = match warnings
                .absorb(self.client.get_application_instances(&app.guid).await)
            {
                Ok(instances) => instances,
                Err(ApiError::NotStaged { .. } | ApiError::InstancesUnavailable { .. }) => {
                    Vec::new()
                }
                Err(other) => return Err(ActionError::Generic(other)),
            };
            debug!(application = %app.name, instances = instances.len(), "polled instances");

            if has_state(&instances, InstanceState::Running) {
                return Ok(());
            }
            if has_state(&instances, InstanceState::Flapping) {
                return Err(ActionError::InstanceFlapping {
                    app: app.name.clone(),
                });
            }
            if !instances.is_empty()
                && instances
                    .iter()
                    .all(|instance| instance.state == InstanceState::Crashed)
            {
                return Err(ActionError::InstanceCrashed {
                    app: app.name.clone(),
                });
            }

            if started.elapsed() >= timeout {
                warn!(application = %app.name, timeout_secs = timeout.as_secs(), "startup timed out");
                return Err(ActionError::StartupTimeout {
                    app: app.name.clone(),
                    timeout,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}

fn has_state(instances: &[ApplicationInstance], state: InstanceState) -> bool {
    instances.iter().any(|instance| instance.state == state)
}
