use thiserror::Error;

/// Errors produced while fetching a forecast or delivering a notification.
///
/// Every variant is terminal for an invocation; nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing or invalid setting: {0}")]
    Config(String),

    #[error("Pollen API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Pollen API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse pollen API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Forecast contains no daily entries")]
    EmptyData,

    #[error(transparent)]
    Send(#[from] SendError),
}

/// Webhook delivery failures.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Webhook returned status {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
