//! Binary crate for the `pollen-notify` tool.
//!
//! Runs once: fetches today's pollen forecast and posts it to a Discord
//! webhook. Exits non-zero on any failure.

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr; stdout carries only the --dry-run payload.
    // Deployments set the variables directly; a missing .env is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();

    if let Err(err) = cmd.run().await {
        tracing::error!("{err:#}");
        process::exit(1);
    }
}
