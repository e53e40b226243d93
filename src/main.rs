use clap::Parser;
use ecs_discovery::cli::{run, Cli};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Starting ecs-discovery v{}", ecs_discovery::VERSION);

    if let Err(e) = run::run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
