use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use ipshift_core::{MoveOutcome, PollConfig, ResourceKind, Selector};
use ipshift_ovh::OvhClient;
use std::time::Duration;

/// Move an OVH failover IP from its current instance to another one.
#[derive(Parser)]
#[command(name = "ipshift", version)]
#[command(about = "Move an OVH failover IP between instances")]
struct Cli {
    /// Name of the project/service holding the IP
    #[arg(long, env = "IPSHIFT_PROJECT")]
    project: Option<String>,

    /// Id of the project/service holding the IP
    #[arg(long, env = "IPSHIFT_PROJECT_ID")]
    project_id: Option<String>,

    /// Address of the failover IP to move
    #[arg(long)]
    ip: Option<String>,

    /// Id of the failover IP to move
    #[arg(long)]
    ip_id: Option<String>,

    /// Name of the instance to attach the failover IP to
    #[arg(long)]
    instance: Option<String>,

    /// Id of the instance to attach the failover IP to
    #[arg(long)]
    instance_id: Option<String>,

    /// Log level [info|debug]
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds to wait between status polls
    #[arg(long, default_value_t = 1)]
    poll_interval: u64,

    /// Give up after this many status polls (polls forever by default)
    #[arg(long)]
    max_polls: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    // Identifier validation comes first: a misconfigured invocation must
    // fail before any credential lookup or network access.
    let project_selector =
        Selector::from_flags(ResourceKind::Project, cli.project, cli.project_id)?;
    let ip_selector = Selector::from_flags(ResourceKind::FloatingIp, cli.ip, cli.ip_id)?;
    let instance_selector =
        Selector::from_flags(ResourceKind::Instance, cli.instance, cli.instance_id)?;

    let client = OvhClient::from_env().context("unable to configure the OVH API client")?;

    let project = ipshift_core::resolve_project(&client, &project_selector).await?;
    println!("Project: {} ({})", project.description.cyan(), project.id);

    let ip = ipshift_core::resolve_floating_ip(&client, &project.id, &ip_selector).await?;
    println!("Failover IP: {} ({})", ip.address.cyan(), ip.id);

    let target = ipshift_core::resolve_instance(&client, &project.id, &instance_selector).await?;
    println!("Target instance: {} ({})", target.name.cyan(), target.id);

    let poll = PollConfig {
        interval: Duration::from_secs(cli.poll_interval),
        max_polls: cli.max_polls,
    };
    tracing::debug!(
        "polling every {}s, bound: {}",
        cli.poll_interval,
        cli.max_polls
            .map_or_else(|| "none".to_string(), |max| max.to_string()),
    );

    match ipshift_core::move_floating_ip(&client, &project, ip, &target, &poll).await? {
        MoveOutcome::AlreadyRouted { ip, target } => {
            println!(
                "{}",
                format!(
                    "The failover IP '{}' is already routed to '{}'",
                    ip.address, target.name
                )
                .green()
            );
        }
        MoveOutcome::Attached {
            ip,
            target,
            previous,
            ..
        } => {
            println!(
                "{}",
                format!(
                    "The failover IP '{}' is now attached to '{}' (previous instance was '{}')",
                    ip.address, target.name, previous.name
                )
                .green()
                .bold()
            );
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    // An explicit RUST_LOG still wins over --log-level.
    let default_directive = match level {
        "debug" => "debug",
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
