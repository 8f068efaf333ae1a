//! Configuration system for ccactor.
//!
//! This module provides the configuration structures and CLI definitions for the
//! ccactor application. Configuration loading and precedence merging is handled
//! by the `ortho_config` crate. Precedence: CLI flags override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/ccactor/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! api_endpoint = "https://api.sys.example.com"
//! access_token = "eyJhbGciOi..."
//!
//! [connection]
//! skip_ssl_validation = false
//! request_timeout_secs = 30
//!
//! [polling]
//! interval_secs = 3
//! async_timeout_mins = 0
//! staging_timeout_mins = 15
//! startup_timeout_mins = 5
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{
    AppArgs, Cli, Commands, DeleteOrgArgs, DeleteSpaceArgs, OrgArgs, ServiceBrokersArgs,
    SpaceArgs, UnbindSecurityGroupArgs,
};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{
    AppConfig, ConnectionConfig, PollingConfig, PollingSettings, UNBOUNDED_JOB_TIMEOUT,
};
