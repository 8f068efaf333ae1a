//! Routes with their domains resolved, and the route operations.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::DomainActor;
use super::job::JobPoller;
use super::lookup::not_found_as;
use super::space::find_space_by_organization_and_name;
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{
    self as cc, Domain, DomainClient, Filter, FilterField, JobClient, RouteClient, SpaceClient,
};
use crate::config::PollingSettings;
use crate::error::{ActionError, ApiError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// A route whose domain has been looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Server-assigned GUID, empty for routes not yet created.
    pub guid: String,
    /// Host name, empty for domain-level and TCP routes.
    pub host: String,
    /// The route's domain.
    pub domain: Domain,
    /// Path suffix, empty for none.
    pub path: String,
    /// Port, set only for TCP routes.
    pub port: Option<u16>,
    /// GUID of the owning space.
    pub space_guid: String,
}

impl Route {
    /// Attaches `domain` to a stored route.
    #[must_use]
    pub fn from_resource(route: cc::Route, domain: Domain) -> Self {
        Self {
            guid: route.guid,
            host: route.host,
            domain,
            path: route.path,
            port: route.port,
            space_guid: route.space_guid,
        }
    }

    /// Returns the stored form, referring to the domain by GUID.
    #[must_use]
    pub fn to_resource(&self) -> cc::Route {
        cc::Route {
            guid: self.guid.clone(),
            host: self.host.clone(),
            domain_guid: self.domain.guid.clone(),
            path: self.path.clone(),
            port: self.port,
            space_guid: self.space_guid.clone(),
        }
    }

    /// Returns `true` for a TCP route that asks the server to pick a port.
    #[must_use]
    pub fn random_tcp_port(&self) -> bool {
        self.domain.is_tcp() && self.port.is_none()
    }

    /// Checks the route's settings against its domain type.
    ///
    /// # Errors
    ///
    /// - [`ActionError::InvalidRoute`] for an HTTP route with a port or a TCP
    ///   route with a host or path.
    /// - [`ActionError::InvalidArgument`] for an HTTP route on a shared domain
    ///   without a host.
    pub fn validate(&self) -> ActionResult<()> {
        if self.domain.is_tcp() {
            if !self.host.is_empty() || !self.path.is_empty() {
                return Err(self.invalid("TCP routes cannot have a hostname or path"));
            }
            return Ok(());
        }

        if self.port.is_some() {
            return Err(self.invalid("HTTP routes cannot have a port"));
        }
        if self.domain.shared && self.host.is_empty() {
            return Err(ActionError::invalid_argument(
                "hostname",
                "a hostname is required for routes on shared HTTP domains",
            ));
        }
        Ok(())
    }

    /// Like [`Route::validate`], also checking the port options.
    ///
    /// # Errors
    ///
    /// Everything [`Route::validate`] rejects, plus an HTTP route asking for
    /// a random port and a TCP route with neither a port nor a random port.
    pub fn validate_with_random_port(&self, random_port: bool) -> ActionResult<()> {
        if !self.domain.is_tcp() && random_port {
            return Err(self.invalid("HTTP routes cannot have a random port"));
        }
        if self.domain.is_tcp() && self.port.is_none() && !random_port {
            return Err(ActionError::invalid_argument(
                "port",
                "TCP routes require a port or a random port",
            ));
        }
        self.validate()
    }

    fn invalid(&self, reason: &str) -> ActionError {
        ActionError::InvalidRoute {
            route: self.to_string(),
            reason: reason.to_owned(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.host.is_empty() {
            write!(f, "{}.", self.host)?;
        }
        f.write_str(&self.domain.name)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        } else if self.random_tcp_port() {
            f.write_str(":????")?;
        }
        // Rendered in cleaned form: empty and `.` segments are dropped.
        for segment in self
            .path
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
        {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// An ordered list of routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routes(Vec<Route>);

impl Routes {
    /// Renders every route, comma separated.
    #[must_use]
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns `true` when there are no routes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of routes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the routes.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.0.iter()
    }

    /// Borrows the routes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Route] {
        &self.0
    }
}

impl From<Vec<Route>> for Routes {
    fn from(routes: Vec<Route>) -> Self {
        Self(routes)
    }
}

impl IntoIterator for Routes {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Route operations.
pub struct RouteActor<C: ?Sized> {
    client: Arc<C>,
    domains: DomainActor<C>,
    jobs: JobPoller<C>,
}

impl<C> RouteActor<C>
where
    C: RouteClient + DomainClient + SpaceClient + JobClient + ?Sized,
{
    /// Creates a route actor with its own domain cache.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self {
            domains: DomainActor::new(Arc::clone(&client)),
            jobs: JobPoller::new(Arc::clone(&client), settings),
            client,
        }
    }

    /// Returns the domain actor whose cache this route actor uses.
    pub const fn domains(&self) -> &DomainActor<C> {
        &self.domains
    }

    /// Lists the routes mapped to an application, domains resolved.
    pub async fn get_application_routes(&self, app_guid: &str) -> ActionReply<Routes> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Routes> = async {
            let stored = warnings.absorb(self.client.get_application_routes(app_guid).await)?;
            self.resolve_domains(stored, &mut warnings).await
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Lists the routes of a space, domains resolved.
    pub async fn get_space_routes(&self, space_guid: &str) -> ActionReply<Routes> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Routes> = async {
            let stored = warnings.absorb(self.client.get_space_routes(space_guid).await)?;
            self.resolve_domains(stored, &mut warnings).await
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Lists the routes of a space that no application is mapped to.
    ///
    /// # Errors
    ///
    /// [`ActionError::OrphanedRoutesNotFound`] when every route is in use.
    pub async fn get_orphaned_routes_by_space(&self, space_guid: &str) -> ActionReply<Routes> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Routes> = async {
            let routes = warnings.absorb(self.get_space_routes(space_guid).await)?;
            let mut orphaned = Vec::new();
            for route in routes {
                let apps = warnings.absorb(self.client.get_route_applications(&route.guid).await)?;
                if apps.is_empty() {
                    orphaned.push(route);
                }
            }
            if orphaned.is_empty() {
                return Err(ActionError::OrphanedRoutesNotFound);
            }
            Ok(Routes::from(orphaned))
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Creates a route. A path without a leading `/` gets one.
    ///
    /// # Errors
    ///
    /// [`ActionError::RouteAlreadyExists`] when the server reports the route
    /// as taken.
    pub async fn create_route(&self, route: &Route, generate_port: bool) -> ActionReply<Route> {
        let mut request = route.clone();
        if !request.path.is_empty() && !request.path.starts_with('/') {
            request.path.insert(0, '/');
        }

        let reply = self
            .client
            .create_route(&request.to_resource(), generate_port)
            .await;
        reply.map(|result| match result {
            Ok(created) => Ok(Route::from_resource(created, request.domain.clone())),
            Err(ApiError::NameTaken { .. }) => Err(ActionError::RouteAlreadyExists {
                route: request.to_string(),
            }),
            Err(other) => Err(ActionError::Generic(other)),
        })
    }

    /// Creates a route in a named space after checking it does not exist.
    ///
    /// The domain is looked up by name when the route carries no domain
    /// GUID. The existence check is skipped when the server generates the
    /// port.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NotFound`] for an unknown space or domain.
    /// - Validation errors from [`Route::validate_with_random_port`].
    /// - [`ActionError::RouteAlreadyExists`] when the route is already in
    ///   the space.
    /// - [`ActionError::RouteInDifferentSpace`] when it exists elsewhere.
    pub async fn create_route_with_existence_check(
        &self,
        org_guid: &str,
        space_name: &str,
        route: &Route,
        generate_port: bool,
    ) -> ActionReply<Route> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Route> = async {
            let space = warnings.absorb(
                find_space_by_organization_and_name(self.client.as_ref(), org_guid, space_name)
                    .await,
            )?;

            let mut candidate = route.clone();
            candidate.space_guid = space.guid;

            if candidate.domain.guid.is_empty() {
                let names = [candidate.domain.name.clone()];
                let found = warnings.absorb(
                    self.domains
                        .get_domains_by_name_and_organization(&names, org_guid)
                        .await,
                )?;
                let domain = found.into_iter().next().ok_or_else(|| {
                    ActionError::not_found(ResourceKind::Domain, candidate.domain.name.as_str())
                })?;
                candidate.domain.guid = domain.guid;
                candidate.domain.router_group_type = domain.router_group_type;
            }

            candidate.validate_with_random_port(generate_port)?;

            if !generate_port {
                match warnings.absorb(self.find_route_bound_to_space_with_settings(&candidate).await)
                {
                    Ok(existing) => {
                        return Err(ActionError::RouteAlreadyExists {
                            route: existing.to_string(),
                        });
                    }
                    Err(ActionError::NotFound {
                        resource: ResourceKind::Route,
                        ..
                    }) => {}
                    Err(other) => return Err(other),
                }
            }

            warnings.absorb(self.create_route(&candidate, generate_port).await)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Returns `true` when a route with these settings exists anywhere,
    /// including spaces the user cannot see.
    pub async fn check_route(&self, route: &Route) -> ActionReply<bool> {
        self.client
            .check_route(&route.to_resource())
            .await
            .err_into()
    }

    /// Finds the route with these settings in the route's own space.
    ///
    /// # Errors
    ///
    /// - [`ActionError::RouteInDifferentSpace`] when the route exists in
    ///   another space, visible or not.
    /// - [`ActionError::NotFound`] when it does not exist at all.
    pub async fn find_route_bound_to_space_with_settings(&self, route: &Route) -> ActionReply<Route> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Route> = async {
            match warnings.absorb(self.get_route_by_components(route).await) {
                Ok(existing) if existing.space_guid == route.space_guid => Ok(existing),
                Ok(existing) => {
                    debug!(
                        targeted_space_guid = %route.space_guid,
                        existing_space_guid = %existing.space_guid,
                        "route exists in another space"
                    );
                    Err(ActionError::RouteInDifferentSpace {
                        route: route.to_string(),
                    })
                }
                Err(
                    not_found @ ActionError::NotFound {
                        resource: ResourceKind::Route,
                        ..
                    },
                ) => {
                    let exists = warnings.absorb(self.check_route(route).await)?;
                    if exists {
                        Err(ActionError::RouteInDifferentSpace {
                            route: route.to_string(),
                        })
                    } else {
                        Err(not_found)
                    }
                }
                Err(other) => Err(other),
            }
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Looks a route up by domain, host, path and port.
    ///
    /// # Errors
    ///
    /// - [`ActionError::InvalidArgument`], before any call, for a TCP route
    ///   without a port or a shared HTTP route without a host.
    /// - [`ActionError::NotFound`] when no route matches.
    pub async fn get_route_by_components(&self, route: &Route) -> ActionReply<Route> {
        if route.domain.is_tcp() && route.port.is_none() {
            return Warned::bare(Err(ActionError::invalid_argument(
                "port",
                "a port is required to look up a TCP route",
            )));
        }
        if route.domain.shared && !route.domain.is_tcp() && route.host.is_empty() {
            return Warned::bare(Err(ActionError::invalid_argument(
                "hostname",
                "a hostname is required for routes on shared HTTP domains",
            )));
        }

        let mut filters = vec![
            Filter::equal(FilterField::DomainGuid, route.domain.guid.as_str()),
            Filter::equal(FilterField::Host, route.host.as_str()),
            Filter::equal(FilterField::Path, route.path.as_str()),
        ];
        if let Some(port) = route.port {
            filters.push(Filter::equal(FilterField::Port, port.to_string()));
        }

        self.client.get_routes(&filters).await.map(|result| -> ActionResult<Route> {
            let found = result?
                .into_iter()
                .next()
                .ok_or_else(|| ActionError::not_found(ResourceKind::Route, route.to_string()))?;
            Ok(Route::from_resource(found, route.domain.clone()))
        })
    }

    /// Maps a route to an application.
    ///
    /// # Errors
    ///
    /// [`ActionError::RouteInDifferentSpace`] when the route and application
    /// live in different spaces.
    pub async fn map_route_to_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ActionReply<()> {
        self.client
            .map_route_to_application(route_guid, app_guid)
            .await
            .map(|result| match result {
                Ok(_) => Ok(()),
                Err(ApiError::InvalidRelation { .. }) => Err(ActionError::RouteInDifferentSpace {
                    route: route_guid.to_owned(),
                }),
                Err(other) => Err(ActionError::Generic(other)),
            })
    }

    /// Removes a route from an application.
    pub async fn unmap_route_from_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ActionReply<()> {
        self.client
            .unmap_route_from_application(route_guid, app_guid)
            .await
            .err_into()
    }

    /// Deletes a route and waits for the delete job.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] when the route does not exist, plus the job
    /// poller's errors.
    pub async fn delete_route(&self, route_guid: &str) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result: ActionResult<()> = async {
            let job = warnings
                .absorb(self.client.delete_route(route_guid).await)
                .map_err(not_found_as(ResourceKind::Route, route_guid))?;
            warnings.absorb(self.jobs.poll_job(&job).await)?;
            info!(route_guid, "deleted route");
            Ok(())
        }
        .await;
        Warned::new(result, warnings)
    }

    pub(super) async fn resolve_domains(
        &self,
        stored: Vec<cc::Route>,
        warnings: &mut Warnings,
    ) -> ActionResult<Routes> {
        let mut routes = Vec::with_capacity(stored.len());
        for route in stored {
            let domain = warnings.absorb(self.domains.get_domain(&route.domain_guid).await)?;
            routes.push(Route::from_resource(route, domain));
        }
        Ok(Routes::from(routes))
    }
}
