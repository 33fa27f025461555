//! Periodic refresh of the latest reading

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use wxlog_core::{ForecastSource, Reading, UpstreamError};

use crate::LatestWeatherCache;

/// Calendar date "now" in the given zone
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    FetchingToday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated,
    Failed,
}

impl PollOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Updated => "updated",
            PollOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("upstream returned no readings for {0}")]
    NoReadings(NaiveDate),
}

type OutcomeHook = Box<dyn Fn(PollOutcome) + Send + Sync>;

/// Fetches today's hourly series on a fixed interval and keeps the last
/// reading in the cache. Failures leave the cache untouched.
pub struct Poller {
    source: Arc<dyn ForecastSource>,
    cache: LatestWeatherCache,
    period: Duration,
    timezone: Tz,
    state: watch::Sender<PollerState>,
    on_outcome: Option<OutcomeHook>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn ForecastSource>,
        cache: LatestWeatherCache,
        period: Duration,
        timezone: Tz,
    ) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            source,
            cache,
            period,
            timezone,
            state,
            on_outcome: None,
        }
    }

    /// Called after every cycle, e.g. to count outcomes
    pub fn with_outcome_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(PollOutcome) + Send + Sync + 'static,
    {
        self.on_outcome = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Poll forever. The first cycle runs immediately.
    pub async fn run(&self) {
        info!(
            period_secs = self.period.as_secs(),
            timezone = self.timezone.name(),
            "Poller started"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            // errors are logged inside and otherwise dropped
            let _ = self.poll_once().await;
        }
    }

    /// One cycle for the current local date
    pub async fn poll_once(&self) -> Result<Reading, PollError> {
        self.poll_date(today_in(self.timezone)).await
    }

    /// One cycle for an explicit date
    #[instrument(skip(self))]
    pub async fn poll_date(&self, date: NaiveDate) -> Result<Reading, PollError> {
        self.state.send_replace(PollerState::FetchingToday);
        let result = self.fetch_last(date).await;
        self.state.send_replace(PollerState::Idle);

        let outcome = match &result {
            Ok(reading) => {
                self.cache.set(*reading).await;
                debug!(
                    temperature = reading.temperature,
                    timestamp = %reading.timestamp_string(),
                    "latest weather updated"
                );
                PollOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, "poll failed; keeping previous reading");
                PollOutcome::Failed
            }
        };

        if let Some(hook) = &self.on_outcome {
            hook(outcome);
        }

        result
    }

    async fn fetch_last(&self, date: NaiveDate) -> Result<Reading, PollError> {
        let readings = self.source.fetch_range(date, date).await?;
        readings.last().copied().ok_or(PollError::NoReadings(date))
    }
}
