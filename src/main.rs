use crate::planner::launch;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod i18n;
mod llm;
mod memory;
mod planner;
mod services;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let config = args.into_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let trip = args.trip_request()?;

    launch(&config, trip).await?;
    Ok(())
}
