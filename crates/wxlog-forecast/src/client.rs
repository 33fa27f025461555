//! HTTP client for the Open-Meteo forecast endpoint

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;
use wxlog_core::{ForecastSource, Reading, UpstreamError};

use crate::wire::ForecastResponse;

/// Where and how to query the forecast API
#[derive(Debug, Clone)]
pub struct ForecastSettings {
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub timeout: Duration,
}

pub struct OpenMeteoClient {
    client: Client,
    settings: ForecastSettings,
}

impl OpenMeteoClient {
    pub fn new(settings: ForecastSettings) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Build the hourly temperature URL for an inclusive date range
    pub fn forecast_url(&self, start: NaiveDate, end: NaiveDate) -> Result<Url, UpstreamError> {
        let base = format!("{}/v1/forecast", self.settings.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&base).map_err(|e| UpstreamError::Transport(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("latitude", &self.settings.latitude.to_string())
            .append_pair("longitude", &self.settings.longitude.to_string())
            .append_pair("hourly", "temperature_2m")
            .append_pair("start_date", &start.format("%Y-%m-%d").to_string())
            .append_pair("end_date", &end.format("%Y-%m-%d").to_string())
            .append_pair("timezone", &self.settings.timezone);

        Ok(url)
    }
}

#[async_trait::async_trait]
impl ForecastSource for OpenMeteoClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Reading>, UpstreamError> {
        let url = self.forecast_url(start, end)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        let readings = parsed.hourly.into_readings()?;

        debug!(count = readings.len(), "fetched hourly readings");
        Ok(readings)
    }
}
