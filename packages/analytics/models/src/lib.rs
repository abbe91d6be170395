#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for dashboard statistics, outbreak alerts, weekly trends,
//! and the full surveillance snapshot fed to the chatbot context.

use chrono::NaiveDate;
use dengue_watch_database_models::{
    AgeGroupCount, BarangayCaseCount, CaseRow, OfficialRow, PredictionRecord,
};
use dengue_watch_prediction_models::{FleetPrediction, ModelPerformanceSummary};
use dengue_watch_weather_models::WeatherDay;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Window length in days.
    pub days: u32,
    /// Cases across all time.
    pub total_cases: i64,
    /// Cases currently active.
    pub active_cases: i64,
    /// Cases recovered.
    pub recovered_cases: i64,
    /// Deaths.
    pub deceased_cases: i64,
    /// Severe cases.
    pub severe_cases: i64,
    /// Hospitalized cases.
    pub hospitalized_cases: i64,
    /// Registered patients.
    pub total_patients: i64,
    /// Cases reported within the window.
    pub cases_in_period: i64,
    /// Barangays with at least one case in the window.
    pub barangays_affected: i64,
}

/// How urgent an alert is.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertLevel {
    /// Case count warrants closer monitoring.
    Watch,
    /// Case count warrants intervention.
    Warning,
    /// Case count indicates an outbreak.
    Outbreak,
}

/// An alert for one barangay within the dashboard window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAlert {
    /// Barangay name.
    pub barangay: String,
    /// Urgency.
    pub level: AlertLevel,
    /// Cases reported in the window.
    pub cases: i64,
    /// Of those, still active.
    pub active_cases: i64,
    /// Display message.
    pub message: String,
}

/// Payload of the dashboard statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Headline counts.
    pub stats: DashboardStats,
    /// Barangays above an alert threshold, most urgent first.
    pub alerts: Vec<CaseAlert>,
    /// Most recent cases in the window.
    pub cases: Vec<CaseRow>,
    /// Per-barangay counts in the window.
    pub barangay_data: Vec<BarangayCaseCount>,
}

/// Cases reported in one seven-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCount {
    /// First day of the bucket.
    pub week_start: NaiveDate,
    /// Last day of the bucket (inclusive).
    pub week_end: NaiveDate,
    /// Cases reported in the bucket.
    pub count: i64,
}

/// Direction of the week-over-week change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    /// More than 10% above the previous week.
    Increasing,
    /// More than 10% below the previous week.
    Decreasing,
    /// Within 10% of the previous week.
    Stable,
}

/// Weekly case counts with week-over-week change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// Buckets, oldest first; the last one ends on the reference date.
    pub weeks: Vec<WeeklyCount>,
    /// Count in the latest bucket.
    pub current_week: i64,
    /// Count in the bucket before it.
    pub previous_week: i64,
    /// Percent change from previous to current.
    pub percent_change: f64,
    /// Classification of `percent_change`.
    pub direction: TrendDirection,
}

/// Everything known about the current situation, assembled once per
/// request for the summary endpoint and the chatbot context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveillanceSnapshot {
    /// Reference date.
    pub as_of: NaiveDate,
    /// Headline counts.
    pub stats: DashboardStats,
    /// Current alerts.
    pub alerts: Vec<CaseAlert>,
    /// Per-barangay counts in the window.
    pub barangay_data: Vec<BarangayCaseCount>,
    /// Patients by age bracket.
    pub age_groups: Vec<AgeGroupCount>,
    /// Weekly trend.
    pub weekly_trend: WeeklyTrend,
    /// Forecast days (empty when the weather provider failed).
    pub weather: Vec<WeatherDay>,
    /// Ranked predictions for every barangay.
    pub fleet: Vec<FleetPrediction>,
    /// Model backtest summary.
    pub model_performance: ModelPerformanceSummary,
    /// Most recently saved predictions.
    pub recent_predictions: Vec<PredictionRecord>,
    /// Officials directory.
    pub officials: Vec<OfficialRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_order_by_urgency() {
        assert!(AlertLevel::Watch < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Outbreak);
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&TrendDirection::Increasing).unwrap(),
            "\"increasing\""
        );
        assert_eq!(AlertLevel::Outbreak.to_string(), "outbreak");
    }

    #[test]
    fn dashboard_data_uses_expected_keys() {
        let data = DashboardData {
            stats: DashboardStats::default(),
            alerts: vec![],
            cases: vec![],
            barangay_data: vec![],
        };
        let json = serde_json::to_value(&data).unwrap();
        for key in ["stats", "alerts", "cases", "barangay_data"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
