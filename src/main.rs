//! `ccactor` application entry point.
//!
//! It uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/ccactor/config.toml` or path from `CCACTOR_CONFIG_PATH`)
//! 3. Environment variables (`CCACTOR_*`)
//! 4. Command-line arguments
//!
//! Warnings collected by an operation are printed to stderr before its result
//! or its error.

use std::sync::Arc;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ccactor::actor::{
    ActionReply, ApplicationActor, ApplicationSummary, OrganizationActor, OrganizationSummary,
    SecurityGroupActor, ServiceBrokerActor, ServiceBrokerQuery, ServiceBrokerSummary, SpaceActor,
    SpaceSummary,
};
use ccactor::cloud_controller::{HttpCloudController, InstanceState};
use ccactor::config::{
    AppArgs, AppConfig, Cli, Commands, DeleteOrgArgs, DeleteSpaceArgs, OrgArgs, PollingSettings,
    ServiceBrokersArgs, SpaceArgs, UnbindSecurityGroupArgs, load_config,
};
use ccactor::error::{CcActorError, Result as CcActorResult};
use ccactor::warnings::Warned;

type Client = Arc<HttpCloudController>;
type Settings = Arc<dyn PollingSettings + Send + Sync>;

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, then
/// dispatches to the appropriate subcommand handler on a Tokio runtime.
fn main() -> EyreResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(&cli, &config)).map_err(Report::from)
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
async fn run(cli: &Cli, config: &AppConfig) -> CcActorResult<()> {
    let client: Client = Arc::new(HttpCloudController::new(config)?);
    let settings: Settings = Arc::new(config.polling.clone());

    match &cli.command {
        Commands::App(args) => show_application(client, settings, args).await,
        Commands::Org(args) => show_organization(client, settings, args).await,
        Commands::Space(args) => show_space(client, settings, args).await,
        Commands::DeleteOrg(args) => delete_organization(client, settings, args).await,
        Commands::DeleteSpace(args) => delete_space(client, settings, args).await,
        Commands::UnbindSecurityGroup(args) => {
            unbind_security_group(client, settings, args).await
        }
        Commands::ServiceBrokers(args) => show_service_brokers(client, args).await,
    }
}

/// Prints the reply's warnings, then hands back its result.
#[expect(clippy::print_stderr, reason = "warnings are part of the CLI output")]
fn settle<T>(reply: ActionReply<T>) -> CcActorResult<T> {
    let Warned { value, warnings } = reply;
    for warning in &warnings {
        eprintln!("{warning}");
    }
    value.map_err(CcActorError::from)
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_ok() {
    println!("OK");
}

async fn show_application(client: Client, settings: Settings, args: &AppArgs) -> CcActorResult<()> {
    let actor = ApplicationActor::new(client, settings);
    let reply = actor
        .get_application_summary_by_name_and_space(&args.name, &args.space_guid)
        .await;
    print_application_summary(&settle(reply)?);
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_application_summary(summary: &ApplicationSummary) {
    let application = &summary.application;
    let running = summary
        .running_instances
        .iter()
        .filter(|instance| instance.state == InstanceState::Running)
        .count();
    println!("name:              {}", application.name);
    println!("requested state:   {}", application.state);
    println!(
        "instances:         {running}/{}",
        application.instances.unwrap_or_default()
    );
    println!("routes:            {}", summary.routes.summary());
    println!(
        "stack:             {}",
        summary
            .stack
            .as_ref()
            .map_or("", |stack| stack.name.as_str())
    );
    for instance in &summary.running_instances {
        println!("#{:<4} {:?}", instance.index, instance.state);
    }
}

async fn show_organization(
    client: Client,
    settings: Settings,
    args: &OrgArgs,
) -> CcActorResult<()> {
    let actor = OrganizationActor::new(client, settings);
    let reply = actor.get_organization_summary_by_name(&args.name).await;
    print_organization_summary(&settle(reply)?);
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_organization_summary(summary: &OrganizationSummary) {
    println!("name:     {}", summary.organization.name);
    println!("domains:  {}", summary.domain_names.join(", "));
    println!("quota:    {}", summary.quota_name);
    println!("spaces:   {}", summary.space_names.join(", "));
}

async fn show_space(client: Client, settings: Settings, args: &SpaceArgs) -> CcActorResult<()> {
    let actor = SpaceActor::new(client, settings);
    let reply = actor
        .get_space_summary_by_organization_and_name(
            &args.org_guid,
            &args.name,
            args.security_group_rules,
        )
        .await;
    print_space_summary(&settle(reply)?, args.security_group_rules);
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_space_summary(summary: &SpaceSummary, with_rules: bool) {
    println!("name:                     {}", summary.space.name);
    println!("org:                      {}", summary.organization_name);
    println!("apps:                     {}", summary.app_names.join(", "));
    println!(
        "services:                 {}",
        summary.service_instance_names.join(", ")
    );
    println!("space quota:              {}", summary.space_quota_name);
    println!(
        "running security groups:  {}",
        summary.running_security_group_names.join(", ")
    );
    if !with_rules {
        return;
    }
    println!(
        "staging security groups:  {}",
        summary.staging_security_group_names.join(", ")
    );
    println!();
    println!("security group\tdestination\tports\tprotocol\tlifecycle\tdescription");
    for rule in &summary.security_group_rules {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            rule.name, rule.destination, rule.ports, rule.protocol, rule.lifecycle, rule.description
        );
    }
}

async fn delete_organization(
    client: Client,
    settings: Settings,
    args: &DeleteOrgArgs,
) -> CcActorResult<()> {
    let actor = OrganizationActor::new(client, settings);
    settle(actor.delete_organization(&args.name).await)?;
    print_ok();
    Ok(())
}

async fn delete_space(
    client: Client,
    settings: Settings,
    args: &DeleteSpaceArgs,
) -> CcActorResult<()> {
    let actor = SpaceActor::new(client, settings);
    settle(
        actor
            .delete_space_by_name_and_organization_name(&args.name, &args.org)
            .await,
    )?;
    print_ok();
    Ok(())
}

async fn unbind_security_group(
    client: Client,
    settings: Settings,
    args: &UnbindSecurityGroupArgs,
) -> CcActorResult<()> {
    let actor = SecurityGroupActor::new(client, settings);
    settle(
        actor
            .unbind_security_group_by_name_organization_name_and_space_name(
                &args.security_group,
                &args.org,
                &args.space,
                &args.lifecycle,
            )
            .await,
    )?;
    print_ok();
    Ok(())
}

async fn show_service_brokers(client: Client, args: &ServiceBrokersArgs) -> CcActorResult<()> {
    let actor = ServiceBrokerActor::new(client);
    let query = ServiceBrokerQuery {
        broker: args.broker.as_deref(),
        service: args.service.as_deref(),
        organization: args.org.as_deref(),
    };
    let summaries = settle(actor.get_service_broker_summaries(query).await)?;
    print_service_brokers(&summaries);
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_service_brokers(summaries: &[ServiceBrokerSummary]) {
    for summary in summaries {
        println!("broker: {}", summary.broker.name);
        for service in &summary.services {
            println!("   {}", service.service.label);
            for plan in &service.plans {
                let access = if plan.plan.public {
                    "all"
                } else if plan.visible_to.is_empty() {
                    "none"
                } else {
                    "limited"
                };
                println!(
                    "      {}\t{access}\t{}",
                    plan.plan.name,
                    plan.visible_to.join(",")
                );
            }
        }
    }
}
