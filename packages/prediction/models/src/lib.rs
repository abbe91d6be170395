#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Risk tier taxonomy and prediction types for dengue surveillance.
//!
//! These types are shared by the regression model, the validation
//! routine, the database layer (historical observations), and the API
//! surface. They carry no behaviour beyond tier classification.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Discrete outbreak risk classification derived from a predicted case
/// count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    /// Fewer than 5 predicted cases.
    Minimal,
    /// 5 up to (not including) 15 predicted cases.
    Low,
    /// 15 up to (not including) 30 predicted cases.
    Moderate,
    /// 30 up to (not including) 50 predicted cases.
    High,
    /// 50 or more predicted cases.
    #[serde(rename = "VERY HIGH")]
    #[strum(serialize = "VERY HIGH")]
    VeryHigh,
}

impl RiskTier {
    /// All tiers, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minimal,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
    }

    /// Classifies a predicted case count.
    ///
    /// Lower bounds are inclusive: exactly 5 is `Low`, exactly 50 is
    /// `VeryHigh`.
    #[must_use]
    pub fn from_cases(predicted_cases: f64) -> Self {
        if predicted_cases >= 50.0 {
            Self::VeryHigh
        } else if predicted_cases >= 30.0 {
            Self::High
        } else if predicted_cases >= 15.0 {
            Self::Moderate
        } else if predicted_cases >= 5.0 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Suggested public-health response for this tier.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Minimal => "Maintain routine surveillance and community clean-up drives",
            Self::Low => "Strengthen search-and-destroy of breeding sites",
            Self::Moderate => "Intensify larval surveys and health education in affected puroks",
            Self::High => "Conduct targeted fogging and prepare health centers for case surge",
            Self::VeryHigh => "Declare outbreak response, mobilize barangay health emergency teams",
        }
    }
}

/// The three independent variables consumed by the regression model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Barangay population.
    pub population: f64,
    /// Mean temperature in °C.
    pub temperature: f64,
    /// Mean relative humidity in %.
    pub humidity: f64,
}

impl PredictionInput {
    /// Creates a new input triple.
    #[must_use]
    pub const fn new(population: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            population,
            temperature,
            humidity,
        }
    }
}

/// Per-term breakdown of a prediction, for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermContributions {
    /// Population coefficient times population, rounded to 2 decimals.
    pub population_effect: f64,
    /// Temperature coefficient times temperature, rounded to 2 decimals.
    pub temperature_effect: f64,
    /// Humidity coefficient times humidity, rounded to 2 decimals.
    pub humidity_effect: f64,
    /// The intercept.
    pub base_constant: f64,
}

/// Output of the regression model for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted case count, never negative, rounded to 2 decimals.
    pub predicted_cases: f64,
    /// Per-term contributions.
    pub contributions: TermContributions,
    /// Tier derived from `predicted_cases`.
    pub risk_tier: RiskTier,
}

/// One year of observed data for a barangay, as imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalObservation {
    /// Barangay name.
    pub barangay: String,
    /// Observation year.
    pub year: i32,
    /// Population in that year.
    pub population: i64,
    /// Mean temperature in °C.
    pub temperature: f64,
    /// Mean relative humidity in %.
    pub humidity: f64,
    /// Observed dengue cases.
    pub dengue_cases: i64,
    /// Cases per 1000 residents.
    pub cases_per_1000: f64,
}

impl HistoricalObservation {
    /// The model input for this observation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn input(&self) -> PredictionInput {
        PredictionInput::new(self.population as f64, self.temperature, self.humidity)
    }
}

/// Comparison of one historical observation against its replayed
/// prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Barangay name.
    pub barangay: String,
    /// Observation year.
    pub year: i32,
    /// Observed cases.
    pub actual_cases: f64,
    /// Model output for the observation's inputs.
    pub predicted_cases: f64,
    /// `predicted - actual`; positive means over-prediction.
    pub error: f64,
    /// `|predicted - actual|`.
    pub absolute_error: f64,
    /// `error / actual * 100`, or `0` when `actual` is zero.
    pub percent_error: f64,
}

/// Aggregate model performance over a validation run.
///
/// `r_squared` is `None` when every actual value is identical (zero total
/// variance). `accuracy_percentage` is `None` when the mean actual value
/// is zero. Both serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformanceSummary {
    /// Number of observations replayed.
    pub sample_count: usize,
    /// Mean signed error.
    pub mean_error: f64,
    /// Mean absolute error.
    pub mean_absolute_error: f64,
    /// Coefficient of determination.
    pub r_squared: Option<f64>,
    /// `(1 - MAE / mean_actual) * 100`.
    pub accuracy_percentage: Option<f64>,
}

/// Summary plus per-observation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Aggregate statistics.
    pub summary: ModelPerformanceSummary,
    /// One record per observation, in input order.
    pub records: Vec<ValidationRecord>,
}

/// A barangay to include in a fleet prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRegion {
    /// Barangay name.
    pub barangay: String,
    /// Most recent historical population, if any history exists.
    pub latest_population: Option<i64>,
}

/// Shared weather reading applied to every region in a fleet prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
}

/// One ranked entry of a fleet prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPrediction {
    /// Barangay name.
    pub barangay: String,
    /// Population used for the prediction.
    pub population: i64,
    /// Whether `population` is the default estimate rather than history.
    pub population_estimated: bool,
    /// Model output.
    pub prediction: PredictionResult,
}

/// Rounds to `places` decimal places, halves away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
