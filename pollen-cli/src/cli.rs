use anyhow::Context;
use clap::Parser;
use pollen_core::{
    Config, Credentials, DiscordNotifier, ForecastClient, ForecastQuery, build_payload,
    format_date,
};
use std::path::PathBuf;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pollen-notify", version, about = "Post today's pollen forecast to Discord")]
pub struct Cli {
    /// Settings file; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the webhook payload instead of posting it.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = Config::load(self.config.as_deref()).context("Failed to load settings")?;
        let query = ForecastQuery::from_config(&settings)?;

        let creds = Credentials::from_env()?;
        let webhook_url = if self.dry_run { None } else { Some(creds.webhook_url()?.to_string()) };

        let forecast = ForecastClient::with_base_url(creds.api_key, settings.endpoint.as_str())
            .fetch(&query)
            .await
            .context("Failed to fetch pollen forecast")?;

        let payload = build_payload(&forecast, &settings.location.name, format_date)
            .context("Failed to build notification")?;

        let Some(webhook_url) = webhook_url else {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        };

        DiscordNotifier::new(webhook_url)
            .send(&payload)
            .await
            .context("Failed to send Discord notification")?;

        tracing::info!(location = %settings.location.name, "Pollen forecast delivered");
        Ok(())
    }
}
