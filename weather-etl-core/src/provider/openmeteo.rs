use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::ForecastConfig,
    model::{DailySeries, DailyVariable, DateRange},
};

use super::{ForecastProvider, ProviderError, truncate_body};

/// Client for the Open-Meteo daily forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    config: ForecastConfig,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(config: ForecastConfig) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Query parameters for one window, in the order they are sent.
    pub fn query_params(&self, range: &DateRange) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.config.latitude.to_string()),
            ("longitude", self.config.longitude.to_string()),
            ("start_date", range.start.format("%Y-%m-%d").to_string()),
            ("end_date", range.end.format("%Y-%m-%d").to_string()),
            ("daily", DailyVariable::query_value()),
            ("timezone", "auto".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    daily: DailySeries,
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch_daily(&self, range: &DateRange) -> Result<DailySeries, ProviderError> {
        if !range.is_valid() {
            return Err(ProviderError::InvalidRange(*range));
        }

        let res = self
            .http
            .get(&self.config.base_url)
            .query(&self.query_params(range))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status { status, body: truncate_body(&body) });
        }

        tracing::debug!(preview = %truncate_body(&body), "forecast response body");

        let parsed: OmResponse = serde_json::from_str(&body)?;
        Ok(parsed.daily)
    }
}
