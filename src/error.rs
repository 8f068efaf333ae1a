//! Semantic error types for the Cloud Controller actor layer.
//!
//! This module defines the error hierarchy for ccactor, following the
//! principle of using semantic error enums (via `thiserror`) for conditions the
//! caller might inspect, retry, or render, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.
//!
//! There are three layers:
//!
//! - [`ApiError`] is the kind tag the REST client attaches to every failed
//!   call. Classification always matches on these variants, never on message
//!   text.
//! - [`ActionError`] is the domain taxonomy returned by actor operations.
//!   Unclassified API errors pass through unchanged inside
//!   [`ActionError::Generic`].
//! - [`CcActorError`] aggregates configuration and action failures for the
//!   binary.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including
    /// file parsing errors and missing required fields after layer merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Wire-level error kinds attached by the Cloud Controller client.
///
/// Each variant corresponds to a stable `error_code` (or HTTP status) returned
/// by the API. The message carried by a variant is the server's description
/// and is only ever used for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The requested resource does not exist (HTTP 404).
    #[error("{message}")]
    ResourceNotFound {
        /// Server-supplied description.
        message: String,
    },

    /// A create or rename collided with an existing name.
    #[error("{message}")]
    NameTaken {
        /// Server-supplied description.
        message: String,
    },

    /// A relationship between two resources was rejected, typically because
    /// they live in different spaces.
    #[error("{message}")]
    InvalidRelation {
        /// Server-supplied description.
        message: String,
    },

    /// Instance statistics were requested for a stopped application.
    #[error("{message}")]
    ApplicationStopped {
        /// Server-supplied description.
        message: String,
    },

    /// The application has no staged droplet yet.
    #[error("{message}")]
    NotStaged {
        /// Server-supplied description.
        message: String,
    },

    /// Instance information is temporarily unavailable.
    #[error("{message}")]
    InstancesUnavailable {
        /// Server-supplied description.
        message: String,
    },

    /// The security group is not bound to the space in that lifecycle.
    #[error("{message}")]
    SecurityGroupNotBound {
        /// Server-supplied description.
        message: String,
    },

    /// A buildpack with this name already exists.
    #[error("{message}")]
    BuildpackNameTaken {
        /// Server-supplied description.
        message: String,
    },

    /// A buildpack with this name and no stack already exists.
    #[error("{message}")]
    BuildpackAlreadyExistsWithoutStack {
        /// Server-supplied description.
        message: String,
    },

    /// A buildpack with this name already exists for the requested stack.
    #[error("{message}")]
    BuildpackAlreadyExistsForStack {
        /// Server-supplied description.
        message: String,
    },

    /// A generic 400 response.
    #[error("{message}")]
    BadRequest {
        /// Server-supplied description.
        message: String,
    },

    /// The access token was rejected as invalid.
    #[error("{message}")]
    InvalidAuthToken {
        /// Server-supplied description.
        message: String,
    },

    /// The request was not authenticated (HTTP 401).
    #[error("{message}")]
    Unauthorized {
        /// Server-supplied description.
        message: String,
    },

    /// The request was authenticated but not permitted (HTTP 403).
    #[error("{message}")]
    Forbidden {
        /// Server-supplied description.
        message: String,
    },

    /// A generic 422 response.
    #[error("{message}")]
    UnprocessableEntity {
        /// Server-supplied description.
        message: String,
    },

    /// The server answered with a status and code this client does not know.
    #[error("unexpected response from the Cloud Controller ({status}): {description}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// The `error_code` field of the response body.
        error_code: String,
        /// The `description` field of the response body.
        description: String,
        /// Request identifiers reported by the router.
        request_ids: Vec<String>,
    },

    /// The server answered with an error body that could not be decoded.
    #[error("unexpected response from the Cloud Controller ({status}): {raw}")]
    UnknownHttpSource {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        raw: String,
    },

    /// The request never produced an HTTP response.
    #[error("request to the Cloud Controller failed: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },

    /// A successful response body could not be decoded.
    #[error("failed to decode Cloud Controller response: {message}")]
    Decode {
        /// A description of the decode failure.
        message: String,
    },
}

/// The kind of resource a lookup was about.
///
/// Used to produce precise not-found and ambiguity messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// An application.
    Application,
    /// A buildpack.
    Buildpack,
    /// A shared or private domain.
    Domain,
    /// An organization.
    Organization,
    /// An organization quota definition.
    OrganizationQuota,
    /// A route.
    Route,
    /// A security group.
    SecurityGroup,
    /// A service broker.
    ServiceBroker,
    /// A space.
    Space,
    /// A space quota definition.
    SpaceQuota,
    /// A stack.
    Stack,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Application => "application",
            Self::Buildpack => "buildpack",
            Self::Domain => "domain",
            Self::Organization => "organization",
            Self::OrganizationQuota => "organization quota",
            Self::Route => "route",
            Self::SecurityGroup => "security group",
            Self::ServiceBroker => "service broker",
            Self::Space => "space",
            Self::SpaceQuota => "space quota",
            Self::Stack => "stack",
        };
        f.write_str(label)
    }
}

/// Domain errors returned by actor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A should-be-unique lookup found nothing, or the API reported the
    /// resource as missing.
    #[error("{resource} '{identifier}' not found")]
    NotFound {
        /// What was being looked up.
        resource: ResourceKind,
        /// The name or GUID that was searched for.
        identifier: String,
    },

    /// A create collided with an existing resource of the same name.
    #[error("{resource} '{identifier}' already exists")]
    AlreadyExists {
        /// What was being created.
        resource: ResourceKind,
        /// The name that collided.
        identifier: String,
    },

    /// A lookup assumed unique returned more than one candidate.
    #[error("found multiple {resource} resources named '{identifier}': {}", guids.join(", "))]
    MultipleFound {
        /// What was being looked up.
        resource: ResourceKind,
        /// The name that was searched for.
        identifier: String,
        /// Every candidate GUID, in the order the server returned them.
        guids: Vec<String>,
    },

    /// An asynchronous job reached the failed state.
    #[error("job {job_guid} failed: {message}")]
    JobFailed {
        /// The job's GUID.
        job_guid: String,
        /// The server-supplied failure description, verbatim.
        message: String,
    },

    /// Job polling exceeded its configured budget.
    #[error("job {job_guid} did not complete within {}s", timeout.as_secs())]
    JobTimeout {
        /// The job's GUID.
        job_guid: String,
        /// The configured overall polling timeout.
        timeout: Duration,
    },

    /// A caller-supplied argument was rejected before any request was made.
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        /// The argument that was rejected.
        argument: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Route settings are inconsistent with the route's domain.
    #[error("invalid route {route}: {reason}")]
    InvalidRoute {
        /// The route, rendered as a URL-like string.
        route: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The route exists but belongs to another space.
    #[error("route {route} is in a different space")]
    RouteInDifferentSpace {
        /// The route, rendered as a URL-like string.
        route: String,
    },

    /// The route is already taken.
    #[error("route {route} already exists")]
    RouteAlreadyExists {
        /// The route, rendered as a URL-like string.
        route: String,
    },

    /// Deleting the application's routes would affect another application.
    #[error("route {route} is mapped to more than one application, so {app} cannot delete it")]
    RouteBoundToMultipleApps {
        /// The application being deleted.
        app: String,
        /// The shared route.
        route: String,
    },

    /// The space has no routes without applications.
    #[error("no orphaned routes found")]
    OrphanedRoutesNotFound,

    /// The security group is bound to the space in the other lifecycle only.
    #[error("security group {name} is not bound to the space in the {lifecycle} lifecycle")]
    SecurityGroupNotBound {
        /// The security group's name.
        name: String,
        /// The lifecycle that was requested.
        lifecycle: String,
    },

    /// A buildpack with this name and no stack already exists.
    #[error("buildpack '{name}' already exists without a stack")]
    BuildpackAlreadyExistsWithoutStack {
        /// The buildpack's name.
        name: String,
    },

    /// Staging failed with a buildpack or platform error.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// The server-supplied failure description.
        reason: String,
    },

    /// Staging failed because no buildpack recognised the application.
    #[error("no buildpack detected the application: {reason}")]
    StagingFailedNoAppDetected {
        /// The server-supplied failure description.
        reason: String,
    },

    /// Staging did not complete within the staging timeout.
    #[error("staging {app} did not complete within {}s", timeout.as_secs())]
    StagingTimeout {
        /// The application's name.
        app: String,
        /// The configured staging timeout.
        timeout: Duration,
    },

    /// Every instance of the application crashed during startup.
    #[error("all instances of {app} crashed")]
    InstanceCrashed {
        /// The application's name.
        app: String,
    },

    /// An instance of the application is flapping.
    #[error("an instance of {app} is flapping")]
    InstanceFlapping {
        /// The application's name.
        app: String,
    },

    /// No instance of the application became healthy in time.
    #[error("{app} did not start within {}s", timeout.as_secs())]
    StartupTimeout {
        /// The application's name.
        app: String,
        /// The configured startup timeout.
        timeout: Duration,
    },

    /// An unclassified API error, passed through unchanged.
    #[error(transparent)]
    Generic(#[from] ApiError),
}

impl ActionError {
    /// Builds a [`ActionError::NotFound`] for `resource` named `identifier`.
    #[must_use]
    pub fn not_found(resource: ResourceKind, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            identifier: identifier.into(),
        }
    }

    /// Builds a [`ActionError::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for the ccactor application.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum CcActorError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An actor operation failed.
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl From<ApiError> for CcActorError {
    fn from(error: ApiError) -> Self {
        Self::Action(ActionError::Generic(error))
    }
}

/// A specialised `Result` type for ccactor operations.
pub type Result<T> = std::result::Result<T, CcActorError>;
