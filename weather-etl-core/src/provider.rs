use crate::model::{DailySeries, DateRange};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Errors raised while fetching the daily forecast.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid date range {0}: start is after end")]
    InvalidRange(DateRange),

    #[error("request to forecast provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("forecast provider returned status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse forecast response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A source of daily weather series for a date window.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_daily(&self, range: &DateRange) -> Result<DailySeries, ProviderError>;
}

/// Cut a response body down for error messages and logs.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
