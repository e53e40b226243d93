pub mod run;

use crate::agent::DEFAULT_INTERVAL;
use crate::reconcile::ports::DEFAULT_PORTS;
use crate::reconcile::{PortAllowList, DEFAULT_DOMAIN_KEY};
use crate::publish::registry::DEFAULT_REGISTRY_URL;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ecs-discovery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discovers ECS service endpoints and pushes them to a Marco registry", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, env = "MARCO_URL", default_value = DEFAULT_REGISTRY_URL, help = "The remote Marco backend")]
    pub marco: String,

    #[arg(long, env = "ECS_REGION", default_value = "ap-southeast-2", help = "AWS region of the cluster")]
    pub region: String,

    #[arg(long, env = "ECS_CLUSTER", default_value = "default", help = "ECS cluster to discover")]
    pub cluster: String,

    #[arg(
        long,
        env = "ECS_PORTS",
        default_value = DEFAULT_PORTS,
        value_parser = parse_ports,
        help = "Comma-separated container ports to expose"
    )]
    pub ports: PortAllowList,

    #[arg(
        long,
        env = "ECS_DOMAIN_ENV",
        default_value = DEFAULT_DOMAIN_KEY,
        help = "Container environment variable holding the domain"
    )]
    pub domain_env: String,

    #[arg(
        long,
        env = "ECS_INTERVAL",
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Seconds between discovery passes"
    )]
    pub interval: u64,

    #[arg(
        long,
        env = "ECS_PUBLISH_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout in seconds for pushing to Marco"
    )]
    pub publish_timeout: u64,
}

fn parse_ports(value: &str) -> Result<PortAllowList, String> {
    value.parse().map_err(|e: crate::DiscoveryError| e.to_string())
}
