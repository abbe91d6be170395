#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather forecast adapter.
//!
//! Fetches hourly and daily forecast arrays from Open-Meteo and normalizes
//! them into one [`WeatherDay`] per date. Missing temperature or humidity
//! values fall back to [`DEFAULT_TEMPERATURE`] and [`DEFAULT_HUMIDITY`]. A
//! malformed or empty upstream body normalizes to an empty list rather than
//! an error.

pub mod client;
pub mod codes;
pub mod parse;

use dengue_watch_prediction_models::WeatherReading;
use thiserror::Error;

pub use client::OpenMeteoClient;
pub use codes::condition_for_code;
pub use dengue_watch_weather_models::WeatherDay;
pub use parse::{parse_forecast, parse_forecast_body};

/// Temperature in °C assumed when the provider omits one.
pub const DEFAULT_TEMPERATURE: f64 = 28.0;

/// Relative humidity in % assumed when the provider omits one.
pub const DEFAULT_HUMIDITY: f64 = 70.0;

/// Errors that can occur while fetching weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Weather provider returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// Source of forecast days. Implemented by [`OpenMeteoClient`]; tests use
/// canned implementations.
#[async_trait::async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetches the normalized forecast.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] on transport failure or a non-success
    /// status. Unparseable bodies yield `Ok(vec![])`.
    async fn forecast(&self) -> Result<Vec<WeatherDay>, WeatherError>;
}

/// The reading used for "current" predictions: the first forecast day, or
/// the defaults when there is no forecast.
#[must_use]
pub fn current_reading(days: &[WeatherDay]) -> WeatherReading {
    days.first().map_or(
        WeatherReading {
            temperature: DEFAULT_TEMPERATURE,
            humidity: DEFAULT_HUMIDITY,
        },
        |day| WeatherReading {
            temperature: day.temperature,
            humidity: day.humidity,
        },
    )
}

/// Short text summary of a reading, e.g. `"30.0°C, 75.0% humidity"`.
#[must_use]
pub fn describe_reading(reading: WeatherReading) -> String {
    format!(
        "{:.1}°C, {:.1}% humidity",
        reading.temperature, reading.humidity
    )
}
