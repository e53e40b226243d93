use crate::agent::Agent;
use crate::cli::Cli;
use crate::cluster::EcsClusterClient;
use crate::host::Ec2AddressResolver;
use crate::publish::RegistryPublisher;
use crate::reconcile::{ReconcileSettings, Reconciler};
use crate::Result;
use aws_sdk_ecs::config::Region;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the agent from parsed flags and run it until Ctrl+C.
pub async fn run(cli: Cli) -> Result<()> {
    let publisher = RegistryPublisher::new(&cli.marco, Duration::from_secs(cli.publish_timeout))?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(cli.region.clone()))
        .load()
        .await;

    info!(
        region = %cli.region,
        cluster = %cli.cluster,
        registry = %publisher.url(),
        "Configured discovery"
    );

    if cli.ports.is_empty() {
        warn!("Port allow-list is empty; no endpoints will be published");
    }

    let settings = ReconcileSettings::new(cli.cluster, cli.ports).with_domain_key(cli.domain_env);
    let reconciler = Reconciler::new(
        Arc::new(EcsClusterClient::from_conf(&sdk_config)),
        Arc::new(Ec2AddressResolver::from_conf(&sdk_config)),
        settings,
    );

    let agent = Agent::new(
        reconciler,
        Arc::new(publisher),
        Duration::from_secs(cli.interval),
    );

    agent
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("ecs-discovery stopped");
    Ok(())
}
