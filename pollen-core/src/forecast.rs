use chrono::{SecondsFormat, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};

use crate::{
    config::Config,
    error::{Error, Result, truncate_body},
    model::ForecastResponse,
};

pub const DEFAULT_ENDPOINT: &str = "https://pollen.googleapis.com/v1/forecast:lookup";

/// Parameters of one forecast lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub days: u32,
    /// Zone in which "today" is judged.
    pub timezone: Tz,
}

impl ForecastQuery {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            days: config.days,
            timezone: config.location.tz()?,
        })
    }
}

/// Client for the Google Pollen `forecast:lookup` endpoint.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl ForecastClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_base_url(api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            api_key,
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single lookup; errors are returned as-is, never retried.
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse> {
        let now = Utc::now().with_timezone(&query.timezone);
        tracing::info!(
            timezone = %query.timezone,
            local_time = %now.format("%Y-%m-%d %H:%M:%S %Z"),
            "Requesting pollen forecast"
        );

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.clone()),
                ("location.latitude", format!("{:.6}", query.latitude)),
                ("location.longitude", format!("{:.6}", query.longitude)),
                ("days", query.days.to_string()),
            ])
            .header("X-Client-Timezone", query.timezone.name())
            .header("X-Client-Time", now.to_rfc3339_opts(SecondsFormat::Secs, false))
            .send()
            .await
            .map_err(|e| Error::Request(e.without_url()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| Error::Request(e.without_url()))?;

        if status != StatusCode::OK {
            return Err(Error::Api { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        tracing::debug!(days = parsed.daily_info.len(), "Parsed pollen forecast");

        Ok(parsed)
    }
}
