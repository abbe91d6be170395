#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the dengue watch server.
//!
//! Every JSON endpoint except the chat endpoint wraps its payload in
//! [`ApiResponse`]. These types are separate from the database row types
//! so the API contract can evolve independently.

use chrono::NaiveDate;
use dengue_watch_prediction_models::{
    FleetPrediction, PredictionInput, PredictionResult, WeatherReading,
};
use serde::{Deserialize, Serialize};

/// Default dashboard window, in days.
pub const DEFAULT_DAYS: u32 = 30;

/// Largest accepted dashboard window, in days.
pub const MAX_DAYS: u32 = 365;

/// Default page size for history endpoints.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest accepted page size for history endpoints.
pub const MAX_LIMIT: u32 = 100;

/// The `{success, data}` / `{success, error}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// User-facing error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters carrying a day window.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DaysQuery {
    /// Window length in days.
    pub days: Option<u32>,
}

impl DaysQuery {
    /// The requested window, defaulting to [`DEFAULT_DAYS`] and clamped to
    /// `1..=MAX_DAYS`.
    #[must_use]
    pub fn days(self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS)
    }
}

/// Query parameters carrying a page size.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of rows.
    pub limit: Option<u32>,
}

impl LimitQuery {
    /// The requested page size, defaulting to [`DEFAULT_LIMIT`] and clamped
    /// to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit(self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Body of `POST /api/predictions/predict`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictRequest {
    /// Barangay population.
    pub population: f64,
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
}

/// Checks the request-boundary rules for model inputs: every value finite,
/// population not negative, humidity within `0..=100`.
///
/// # Errors
///
/// Returns a user-facing message naming the first offending field.
pub fn validate_input(
    population: f64,
    temperature: f64,
    humidity: f64,
) -> Result<PredictionInput, String> {
    for (name, value) in [
        ("population", population),
        ("temperature", temperature),
        ("humidity", humidity),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }
    if population < 0.0 {
        return Err("population must not be negative".to_string());
    }
    if !(0.0..=100.0).contains(&humidity) {
        return Err("humidity must be between 0 and 100".to_string());
    }

    Ok(PredictionInput::new(population, temperature, humidity))
}

impl PredictRequest {
    /// Validates the request into a model input.
    ///
    /// # Errors
    ///
    /// See [`validate_input`].
    pub fn validate(self) -> Result<PredictionInput, String> {
        validate_input(self.population, self.temperature, self.humidity)
    }
}

/// A single prediction with its suggested response.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    /// Model output.
    #[serde(flatten)]
    pub prediction: PredictionResult,
    /// Suggested public-health action for the risk tier.
    pub recommendation: String,
}

/// Body of `POST /api/predictions`.
///
/// Missing weather values are taken from the current forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePredictionRequest {
    /// Date the prediction applies to; today when absent.
    pub prediction_date: Option<NaiveDate>,
    /// Population to predict for.
    pub population: f64,
    /// Temperature override in °C.
    pub temperature: Option<f64>,
    /// Humidity override in %.
    pub humidity: Option<f64>,
}

/// Fleet prediction with the weather reading it used.
#[derive(Debug, Clone, Serialize)]
pub struct FleetResponse {
    /// Reading applied to every barangay.
    pub weather: WeatherReading,
    /// Whether `weather` came from the forecast rather than the defaults.
    pub live_weather: bool,
    /// Barangays, highest predicted cases first.
    pub predictions: Vec<FleetPrediction>,
}

/// Form body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
    /// The user's question.
    #[serde(default)]
    pub message: String,
}

/// Chat endpoint response. Not wrapped in [`ApiResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text shown to the user.
    pub response: String,
    /// RFC 3339 time the reply was produced.
    pub timestamp: String,
}

/// Result of an alert notification run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NotifyResponse {
    /// Alerts included in the email.
    pub alerts: usize,
    /// Officials the email was sent to.
    pub recipients: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_fields() {
        let ok = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 3}));

        let err = serde_json::to_value(ApiResponse::<()>::error("Database error")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "error": "Database error"})
        );
    }

    #[test]
    fn days_and_limit_are_clamped() {
        assert_eq!(DaysQuery::default().days(), 30);
        assert_eq!(DaysQuery { days: Some(0) }.days(), 1);
        assert_eq!(DaysQuery { days: Some(10_000) }.days(), MAX_DAYS);
        assert_eq!(LimitQuery::default().limit(), DEFAULT_LIMIT);
        assert_eq!(LimitQuery { limit: Some(500) }.limit(), MAX_LIMIT);
    }

    #[test]
    fn input_validation_rules() {
        assert!(validate_input(5_000.0, 30.0, 75.0).is_ok());
        assert!(validate_input(0.0, -5.0, 0.0).is_ok());
        assert!(validate_input(0.0, 30.0, 100.0).is_ok());

        assert_eq!(
            validate_input(-1.0, 30.0, 75.0).unwrap_err(),
            "population must not be negative"
        );
        assert_eq!(
            validate_input(1.0, 30.0, 100.5).unwrap_err(),
            "humidity must be between 0 and 100"
        );
        assert_eq!(
            validate_input(1.0, f64::NAN, 50.0).unwrap_err(),
            "temperature must be a finite number"
        );
        assert!(validate_input(f64::INFINITY, 30.0, 50.0).is_err());
    }
}
