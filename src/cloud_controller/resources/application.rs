//! Applications and their running instances.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Desired state of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationState {
    /// The application should not run.
    #[default]
    Stopped,
    /// The application should run.
    Started,
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "STOPPED",
            Self::Started => "STARTED",
        })
    }
}

/// Staging state of an application's current package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageState {
    /// Uploaded but not staged.
    #[default]
    Pending,
    /// Staged successfully.
    Staged,
    /// Staging failed.
    Failed,
}

/// How the platform decides an instance is healthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCheckType {
    /// A TCP connection to the instance port succeeds.
    #[default]
    Port,
    /// The process is alive.
    #[serde(alias = "none")]
    Process,
    /// An HTTP GET on the configured endpoint returns 200.
    Http,
}

impl HealthCheckType {
    /// Returns the wire name of the health check type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Port => "port",
            Self::Process => "process",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for HealthCheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staging failure reason reported when no buildpack recognised the bits.
const NO_APP_DETECTED_REASON: &str = "NoAppDetectedError";

/// Endpoint used by HTTP health checks when none is configured.
const DEFAULT_HEALTH_CHECK_ENDPOINT: &str = "/";

/// An application as reported by the Cloud Controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    /// Server-assigned GUID.
    pub guid: String,
    /// Application name, unique within its space.
    pub name: String,
    /// GUID of the owning space.
    pub space_guid: String,
    /// GUID of the stack, empty when unassigned.
    pub stack_guid: String,
    /// Desired state.
    pub state: ApplicationState,
    /// Staging state of the current package.
    pub package_state: PackageState,
    /// Machine-readable staging failure reason.
    pub staging_failed_reason: Option<String>,
    /// Human-readable staging failure description.
    pub staging_failed_description: Option<String>,
    /// Buildpack requested by the user.
    pub buildpack: Option<String>,
    /// Buildpack detected during staging.
    pub detected_buildpack: Option<String>,
    /// Start command requested by the user.
    pub command: Option<String>,
    /// Start command detected during staging.
    pub detected_start_command: Option<String>,
    /// Health check type.
    pub health_check_type: HealthCheckType,
    /// Endpoint probed by HTTP health checks.
    pub health_check_http_endpoint: Option<String>,
    /// Desired instance count.
    pub instances: Option<u32>,
    /// Memory per instance, in megabytes.
    pub memory_mb: Option<u64>,
    /// Disk quota per instance, in megabytes.
    pub disk_quota_mb: Option<u64>,
}

impl Application {
    /// The buildpack the user asked for, falling back to the detected one.
    #[must_use]
    pub fn calculated_buildpack(&self) -> Option<&str> {
        non_empty(self.buildpack.as_deref()).or_else(|| non_empty(self.detected_buildpack.as_deref()))
    }

    /// The start command the user asked for, falling back to the detected one.
    #[must_use]
    pub fn calculated_command(&self) -> Option<&str> {
        non_empty(self.command.as_deref())
            .or_else(|| non_empty(self.detected_start_command.as_deref()))
    }

    /// The endpoint probed by the health check, if it is an HTTP check.
    ///
    /// HTTP checks without an explicit endpoint probe `/`.
    #[must_use]
    pub fn calculated_health_check_endpoint(&self) -> Option<&str> {
        if self.health_check_type != HealthCheckType::Http {
            return None;
        }
        Some(
            non_empty(self.health_check_http_endpoint.as_deref())
                .unwrap_or(DEFAULT_HEALTH_CHECK_ENDPOINT),
        )
    }

    /// Returns `true` when the desired state is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state == ApplicationState::Started
    }

    /// Returns `true` when the desired state is stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == ApplicationState::Stopped
    }

    /// Returns `true` once staging finished successfully.
    #[must_use]
    pub fn staging_completed(&self) -> bool {
        self.package_state == PackageState::Staged
    }

    /// Returns `true` when staging failed.
    #[must_use]
    pub fn staging_failed(&self) -> bool {
        self.package_state == PackageState::Failed
    }

    /// The staging failure description, or the reason when no description
    /// was sent.
    #[must_use]
    pub fn staging_failed_message(&self) -> &str {
        non_empty(self.staging_failed_description.as_deref())
            .or_else(|| non_empty(self.staging_failed_reason.as_deref()))
            .unwrap_or_default()
    }

    /// Returns `true` when staging failed because no buildpack matched.
    #[must_use]
    pub fn staging_failed_no_app_detected(&self) -> bool {
        self.staging_failed_reason.as_deref() == Some(NO_APP_DETECTED_REASON)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// A partial update to an application. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationUpdate {
    /// GUID of the application to update.
    #[serde(skip)]
    pub guid: String,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New desired state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ApplicationState>,
    /// New health check type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_type: Option<HealthCheckType>,
    /// New health check endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_http_endpoint: Option<String>,
}

impl ApplicationUpdate {
    /// Starts an empty update for `guid`.
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            ..Self::default()
        }
    }

    /// Sets the new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the new desired state.
    #[must_use]
    pub const fn with_state(mut self, state: ApplicationState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the health check type and endpoint.
    #[must_use]
    pub fn with_health_check(
        mut self,
        health_check_type: HealthCheckType,
        endpoint: impl Into<String>,
    ) -> Self {
        self.health_check_type = Some(health_check_type);
        self.health_check_http_endpoint = Some(endpoint.into());
        self
    }
}

/// Runtime state of one application instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceState {
    /// Being placed or booted.
    Starting,
    /// Healthy and serving.
    Running,
    /// Exited unexpectedly.
    Crashed,
    /// Crashing repeatedly.
    Flapping,
    /// Not running.
    Down,
    /// A state this client does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One running (or attempting to run) copy of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationInstance {
    /// Zero-based instance index.
    pub index: u32,
    /// Runtime state.
    pub state: InstanceState,
    /// Extra detail from the platform, typically for crashed instances.
    pub details: Option<String>,
}
