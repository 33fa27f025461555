//! Open-Meteo forecast response layout

use serde::Deserialize;
use wxlog_core::{parse_timestamp, Reading, UpstreamError};

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlySeries,
}

/// Index-aligned hourly arrays
#[derive(Debug, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    /// Gaps are reported as `null`
    pub temperature_2m: Vec<Option<f64>>,
}

impl HourlySeries {
    /// Zip the parallel arrays into readings, dropping null temperature slots
    pub fn into_readings(self) -> Result<Vec<Reading>, UpstreamError> {
        if self.time.len() != self.temperature_2m.len() {
            return Err(UpstreamError::MismatchedSeries {
                times: self.time.len(),
                temperatures: self.temperature_2m.len(),
            });
        }

        let mut readings = Vec::with_capacity(self.time.len());
        for (time, temperature) in self.time.iter().zip(self.temperature_2m) {
            let timestamp =
                parse_timestamp(time).map_err(|_| UpstreamError::InvalidTimestamp(time.clone()))?;
            if let Some(temperature) = temperature {
                readings.push(Reading::new(temperature, timestamp));
            }
        }
        Ok(readings)
    }
}
