//! Core data types for temperature readings

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the forecast API (local time, minute resolution)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse an upstream `YYYY-MM-DDTHH:MM` timestamp
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

/// A single hourly temperature observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    /// Air temperature at 2m (°C)
    pub temperature: f64,

    /// Local wall-clock time of the observation
    #[serde(with = "local_minute")]
    pub timestamp: NaiveDateTime,
}

impl Reading {
    pub fn new(temperature: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            temperature,
            timestamp,
        }
    }

    /// Calendar date the reading falls on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Timestamp rendered in the upstream layout
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Mean temperature for one calendar date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,

    /// Rounded to 2 decimal places
    pub average_temperature: f64,
}

/// Daily averages as parallel arrays, the shape served by `/history`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistorySeries {
    pub timestamp: Vec<NaiveDate>,
    pub temperature: Vec<f64>,
}

impl From<Vec<DailyAverage>> for HistorySeries {
    fn from(days: Vec<DailyAverage>) -> Self {
        let (timestamp, temperature) = days
            .into_iter()
            .map(|d| (d.date, d.average_temperature))
            .unzip();
        Self {
            timestamp,
            temperature,
        }
    }
}

mod local_minute {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
