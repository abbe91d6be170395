#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized weather forecast types shared by the weather adapter,
//! analytics, and the chatbot context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One normalized forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    /// Forecast date (local to the configured timezone).
    pub date: NaiveDate,
    /// Mean temperature in °C.
    pub temperature: f64,
    /// Daily maximum in °C.
    pub temperature_max: f64,
    /// Daily minimum in °C.
    pub temperature_min: f64,
    /// Mean relative humidity in %.
    pub humidity: f64,
    /// Total precipitation in mm.
    pub rainfall_mm: f64,
    /// WMO weather interpretation code, if provided.
    pub weather_code: Option<i64>,
    /// Human-readable condition for `weather_code`.
    pub condition: String,
}
