//! Configuration data types for ccactor.

use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::ConfigError;

/// Connection settings for the Cloud Controller API.
#[derive(Debug, Clone, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Accept TLS certificates that fail validation.
    pub skip_ssl_validation: bool,

    /// Per-request timeout, in seconds.
    #[default(30)]
    pub request_timeout_secs: u64,
}

impl ConnectionConfig {
    /// Returns the per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Polling cadence and budgets for asynchronous server-side work.
#[derive(Debug, Clone, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between successive polls, in seconds.
    #[default(3)]
    pub interval_secs: u64,

    /// Overall job polling budget, in minutes. Zero means no limit.
    pub async_timeout_mins: u64,

    /// How long to wait for staging to finish, in minutes.
    #[default(15)]
    pub staging_timeout_mins: u64,

    /// How long to wait for a started application to run, in minutes.
    #[default(5)]
    pub startup_timeout_mins: u64,
}

/// Job polling budget used when no async timeout is configured.
pub const UNBOUNDED_JOB_TIMEOUT: Duration = Duration::MAX;

/// Source of polling cadence and budgets.
///
/// The job poller and the application lifecycle pollers only see this trait,
/// so tests can supply millisecond-scale values.
pub trait PollingSettings {
    /// Delay between successive polls.
    fn polling_interval(&self) -> Duration;

    /// Overall budget for polling one job to completion.
    fn job_polling_timeout(&self) -> Duration;

    /// Budget for an application to finish staging.
    fn staging_timeout(&self) -> Duration;

    /// Budget for a staged application to report a running instance.
    fn startup_timeout(&self) -> Duration;
}

impl PollingSettings for PollingConfig {
    fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    fn job_polling_timeout(&self) -> Duration {
        if self.async_timeout_mins == 0 {
            UNBOUNDED_JOB_TIMEOUT
        } else {
            minutes(self.async_timeout_mins)
        }
    }

    fn staging_timeout(&self) -> Duration {
        minutes(self.staging_timeout_mins)
    }

    fn startup_timeout(&self) -> Duration {
        minutes(self.startup_timeout_mins)
    }
}

const fn minutes(value: u64) -> Duration {
    Duration::from_secs(value.saturating_mul(60))
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `CCACTOR_CONFIG_PATH` environment variable
/// 2. `.ccactor.toml` in the current working directory
/// 3. `.ccactor.toml` in the home directory
/// 4. `~/.config/ccactor/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "CCACTOR",
    post_merge_hook,
    discovery(
        app_name = "ccactor",
        env_var = "CCACTOR_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".ccactor.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Base URL of the Cloud Controller API.
    pub api_endpoint: Option<String>,

    /// Bearer token sent with every request.
    pub access_token: Option<String>,

    /// Connection settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub connection: ConnectionConfig,

    /// Polling settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Returns the API endpoint, failing when none was configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `api_endpoint` is unset or
    /// blank.
    pub fn require_api_endpoint(&self) -> Result<&str, ConfigError> {
        self.api_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: String::from("api_endpoint"),
            })
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Trailing slashes would double up when request paths are appended.
        if let Some(endpoint) = self.api_endpoint.as_mut() {
            let trimmed_len = endpoint.trim_end_matches('/').len();
            endpoint.truncate(trimmed_len);
        }
        Ok(())
    }
}
