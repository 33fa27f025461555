//! Forecast API client
//!
//! Fetches hourly 2m temperatures from Open-Meteo for a fixed location and
//! turns the parallel `time`/`temperature_2m` arrays into readings.

pub mod client;
pub mod wire;

pub use client::*;
pub use wxlog_core::UpstreamError;
