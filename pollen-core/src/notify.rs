//! Discord webhook notifications for a pollen forecast.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result, SendError, truncate_body},
    model::{DailyInfo, ForecastResponse},
};

pub const NO_ACTIVE_POLLEN_NAME: &str = "🌸 花粉情報";
pub const NO_ACTIVE_POLLEN_MESSAGE: &str = "現在、シーズン中の花粉はありません";

pub const COLOR_GREEN: u32 = 0x00FF00;
pub const COLOR_YELLOW: u32 = 0xFFFF00;
pub const COLOR_ORANGE: u32 = 0xFFA500;
pub const COLOR_RED: u32 = 0xFF0000;

/// Webhook request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Emoji for a single pollen severity.
pub fn level_emoji(level: i32) -> &'static str {
    match level {
        0 => "✅",
        ..=2 => "🟢",
        3 => "🟡",
        4 => "🟠",
        _ => "🔴",
    }
}

/// Embed accent color for the highest in-season severity.
pub fn level_color(level: i32) -> u32 {
    match level {
        ..=2 => COLOR_GREEN,
        3 => COLOR_YELLOW,
        4 => COLOR_ORANGE,
        _ => COLOR_RED,
    }
}

fn fields_for(day: &DailyInfo) -> Vec<Field> {
    let mut fields: Vec<Field> = day
        .in_season()
        .map(|p| Field {
            name: format!("{} {}", level_emoji(p.index_info.value), p.display_name),
            value: format!("レベル: **{}** ({})", p.index_info.category, p.index_info.value),
            inline: true,
        })
        .collect();

    if fields.is_empty() {
        fields.push(Field {
            name: NO_ACTIVE_POLLEN_NAME.to_string(),
            value: NO_ACTIVE_POLLEN_MESSAGE.to_string(),
            inline: false,
        });
    }

    fields
}

/// Build the message for today's entry without sending it.
pub fn build_payload(
    data: &ForecastResponse,
    location: &str,
    format_date: impl Fn(&str) -> String,
) -> Result<Webhook> {
    let today = data.today().ok_or(Error::EmptyData)?;

    Ok(Webhook {
        embeds: vec![Embed {
            title: format!("🌸 {location}の花粉情報"),
            description: format!("📅 {} の花粉情報", format_date(&today.date.to_string())),
            color: level_color(today.max_in_season_level()),
            fields: fields_for(today),
        }],
    })
}

#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    webhook_url: String,
    http: Client,
}

impl DiscordNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self { webhook_url, http: Client::new() }
    }

    /// Post today's pollen summary for `location`.
    ///
    /// Nothing is sent when the forecast has no daily entries.
    pub async fn send_pollen_info(
        &self,
        data: &ForecastResponse,
        location: &str,
        format_date: impl Fn(&str) -> String,
    ) -> Result<()> {
        let payload = build_payload(data, location, format_date)?;
        self.send(&payload).await
    }

    pub async fn send(&self, payload: &Webhook) -> Result<()> {
        let res = self
            .http
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.without_url()))?;

        let status = res.status();
        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            let body = res.text().await.unwrap_or_default();
            return Err(SendError::Status { status: status.as_u16(), body: truncate_body(&body) }.into());
        }

        tracing::debug!(status = status.as_u16(), "Webhook accepted notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Date, IndexInfo, PollenTypeInfo};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pollen(name: &str, value: i32, category: &str, in_season: bool) -> PollenTypeInfo {
        PollenTypeInfo {
            code: name.to_uppercase(),
            display_name: name.to_string(),
            in_season,
            index_info: IndexInfo { value, category: category.to_string(), index_description: None },
        }
    }

    fn forecast(types: Vec<PollenTypeInfo>) -> ForecastResponse {
        ForecastResponse {
            daily_info: vec![DailyInfo {
                date: Date { year: 2024, month: 3, day: 15 },
                pollen_types: types,
            }],
        }
    }

    fn received_payload(server_requests: &[wiremock::Request]) -> Webhook {
        assert_eq!(server_requests.len(), 1);
        serde_json::from_slice(&server_requests[0].body).expect("payload is valid JSON")
    }

    #[test]
    fn emoji_breakpoints() {
        let cases = [(-1, "🟢"), (0, "✅"), (1, "🟢"), (2, "🟢"), (3, "🟡"), (4, "🟠"), (5, "🔴"), (9, "🔴")];
        for (level, expected) in cases {
            assert_eq!(level_emoji(level), expected, "level {level}");
        }
    }

    #[test]
    fn color_breakpoints() {
        let cases = [(-1, COLOR_GREEN), (0, COLOR_GREEN), (2, COLOR_GREEN), (3, COLOR_YELLOW), (4, COLOR_ORANGE), (5, COLOR_RED)];
        for (level, expected) in cases {
            assert_eq!(level_color(level), expected, "level {level}");
        }
    }

    #[test]
    fn color_follows_max_in_season_level() {
        let data = forecast(vec![
            pollen("Grass", 2, "Low", true),
            pollen("Tree", 5, "Very High", true),
            pollen("Weed", 3, "Moderate", true),
        ]);

        let payload = build_payload(&data, "東京", |d| d.to_string()).unwrap();
        assert_eq!(payload.embeds[0].color, COLOR_RED);
        assert_eq!(payload.embeds[0].fields.len(), 3);
    }

    #[test]
    fn out_of_season_only_is_green_fallback() {
        let data = forecast(vec![pollen("Tree", 5, "Very High", false)]);

        let payload = build_payload(&data, "東京", |d| d.to_string()).unwrap();
        let embed = &payload.embeds[0];

        assert_eq!(embed.color, COLOR_GREEN);
        assert_eq!(
            embed.fields,
            vec![Field {
                name: NO_ACTIVE_POLLEN_NAME.to_string(),
                value: NO_ACTIVE_POLLEN_MESSAGE.to_string(),
                inline: false,
            }]
        );
    }

    #[test]
    fn field_layout_and_header() {
        let data = forecast(vec![pollen("Tree", 3, "Moderate", true)]);

        let payload = build_payload(&data, "Test Location", |d| format!("{d}_formatted")).unwrap();
        let embed = &payload.embeds[0];

        assert_eq!(embed.title, "🌸 Test Locationの花粉情報");
        assert_eq!(embed.description, "📅 2024-03-15_formatted の花粉情報");
        assert_eq!(embed.fields[0].name, "🟡 Tree");
        assert_eq!(embed.fields[0].value, "レベル: **Moderate** (3)");
        assert!(embed.fields[0].inline);
    }

    #[tokio::test]
    async fn send_posts_embed_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let data = forecast(vec![pollen("Tree", 3, "Moderate", true), pollen("Grass", 2, "Low", true)]);
        let notifier = DiscordNotifier::new(format!("{}/webhook", mock_server.uri()));

        notifier.send_pollen_info(&data, "Test Location", crate::format_date).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let payload = received_payload(&requests);
        assert_eq!(payload.embeds.len(), 1);
        assert_eq!(payload.embeds[0].title, "🌸 Test Locationの花粉情報");
        assert_eq!(payload.embeds[0].description, "📅 2024年3月15日 の花粉情報");
        assert_eq!(payload.embeds[0].fields.len(), 2);
        assert_eq!(payload.embeds[0].color, COLOR_YELLOW);
    }

    #[tokio::test]
    async fn status_200_is_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let notifier = DiscordNotifier::new(mock_server.uri());
        let data = forecast(vec![]);

        assert!(notifier.send_pollen_info(&data, "東京", crate::format_date).await.is_ok());
    }

    #[tokio::test]
    async fn empty_forecast_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&mock_server)
            .await;

        let notifier = DiscordNotifier::new(mock_server.uri());
        let err = notifier
            .send_pollen_info(&ForecastResponse::default(), "東京", crate::format_date)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyData));
    }

    #[tokio::test]
    async fn webhook_error_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&mock_server)
            .await;

        let notifier = DiscordNotifier::new(mock_server.uri());
        let err = notifier
            .send_pollen_info(&forecast(vec![]), "東京", crate::format_date)
            .await
            .unwrap_err();

        match err {
            Error::Send(SendError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "Bad Request");
            }
            other => panic!("expected Send status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_webhook_is_transport_error() {
        let notifier = DiscordNotifier::new("http://127.0.0.1:1/webhook".to_string());
        let err = notifier
            .send_pollen_info(&forecast(vec![]), "東京", crate::format_date)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Send(SendError::Transport(_))));
    }
}
