//! Command-line argument definitions for ccactor.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for ccactor.
#[derive(Debug, Parser)]
#[command(name = "ccactor")]
#[command(
    author,
    version,
    about = "Summaries and lifecycle operations against a Cloud Controller API"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Base URL of the Cloud Controller API.
    #[arg(long, global = true)]
    pub api_endpoint: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show an application summary.
    App(AppArgs),

    /// Show an organization summary.
    Org(OrgArgs),

    /// Show a space summary.
    Space(SpaceArgs),

    /// Delete an organization and everything in it.
    DeleteOrg(DeleteOrgArgs),

    /// Delete a space and everything in it.
    DeleteSpace(DeleteSpaceArgs),

    /// Unbind a security group from a space.
    UnbindSecurityGroup(UnbindSecurityGroupArgs),

    /// List service brokers with their services and plans.
    ServiceBrokers(ServiceBrokersArgs),
}

/// Arguments for the `app` subcommand.
#[derive(Debug, Parser)]
pub struct AppArgs {
    /// Application name.
    #[arg(required = true)]
    pub name: String,

    /// GUID of the space containing the application.
    #[arg(long, required = true)]
    pub space_guid: String,
}

/// Arguments for the `org` subcommand.
#[derive(Debug, Parser)]
pub struct OrgArgs {
    /// Organization name.
    #[arg(required = true)]
    pub name: String,
}

/// Arguments for the `space` subcommand.
#[derive(Debug, Parser)]
pub struct SpaceArgs {
    /// Space name.
    #[arg(required = true)]
    pub name: String,

    /// GUID of the organization containing the space.
    #[arg(long, required = true)]
    pub org_guid: String,

    /// Include staging security groups and their rules.
    #[arg(long)]
    pub security_group_rules: bool,
}

/// Arguments for the `delete-org` subcommand.
#[derive(Debug, Parser)]
pub struct DeleteOrgArgs {
    /// Organization name.
    #[arg(required = true)]
    pub name: String,
}

/// Arguments for the `delete-space` subcommand.
#[derive(Debug, Parser)]
pub struct DeleteSpaceArgs {
    /// Space name.
    #[arg(required = true)]
    pub name: String,

    /// Name of the organization containing the space.
    #[arg(long, short = 'o', required = true)]
    pub org: String,
}

/// Arguments for the `unbind-security-group` subcommand.
#[derive(Debug, Parser)]
pub struct UnbindSecurityGroupArgs {
    /// Security group name.
    #[arg(required = true)]
    pub security_group: String,

    /// Organization name.
    #[arg(required = true)]
    pub org: String,

    /// Space name.
    #[arg(required = true)]
    pub space: String,

    /// Lifecycle phase to unbind from (`running` or `staging`).
    #[arg(long, default_value = "running")]
    pub lifecycle: String,
}

/// Arguments for the `service-brokers` subcommand.
#[derive(Debug, Parser)]
pub struct ServiceBrokersArgs {
    /// Only show this broker.
    #[arg(long, short = 'b')]
    pub broker: Option<String>,

    /// Only show this service.
    #[arg(long, short = 'e')]
    pub service: Option<String>,

    /// Only show plans visible to this organization.
    #[arg(long, short = 'o')]
    pub org: Option<String>,
}
