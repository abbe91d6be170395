#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types for dengue surveillance records.
//!
//! These types represent the shapes of data as stored in and retrieved from
//! the `SQLite` database. Rows are converted into these structs at the query
//! boundary so nothing downstream handles raw column maps. They are distinct
//! from the API response types in `dengue_watch_server_models`.

use chrono::NaiveDate;
use dengue_watch_prediction_models::RiskTier;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle state of a reported dengue case.
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
pub enum CaseStatus {
    /// Under treatment or monitoring.
    Active,
    /// Patient recovered.
    Recovered,
    /// Patient died.
    Deceased,
}

/// Clinical severity recorded with a case.
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
pub enum CaseSeverity {
    /// Dengue without warning signs.
    Mild,
    /// Dengue with warning signs.
    Moderate,
    /// Severe dengue.
    Severe,
}

/// A barangay with its latest known population and active case load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarangayDirectoryRow {
    /// Primary key.
    pub id: i64,
    /// Barangay name.
    pub name: String,
    /// District or municipality grouping.
    pub district: Option<String>,
    /// Population from the most recent historical record.
    pub latest_population: Option<i64>,
    /// Cases currently `active`.
    pub active_cases: i64,
}

/// Fields for inserting a new barangay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBarangay {
    /// Barangay name.
    pub name: String,
    /// District or municipality grouping.
    pub district: Option<String>,
    /// Centroid latitude.
    pub latitude: Option<f64>,
    /// Centroid longitude.
    pub longitude: Option<f64>,
}

/// Fields for inserting a new patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Age in years.
    pub age: Option<i64>,
    /// `"M"` or `"F"`.
    pub sex: Option<String>,
    /// Home barangay.
    pub barangay_id: i64,
    /// Contact phone number.
    pub contact_number: Option<String>,
}

/// Fields for reporting a new case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCase {
    /// Patient the case belongs to.
    pub patient_id: i64,
    /// Date the case was reported.
    pub date_reported: NaiveDate,
    /// Current status.
    pub status: CaseStatus,
    /// Clinical severity.
    pub severity: CaseSeverity,
    /// Whether the patient was admitted.
    pub hospitalized: bool,
}

/// A case joined with its patient and barangay, for case listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRow {
    /// Case primary key.
    pub id: i64,
    /// `"First Last"`.
    pub patient_name: String,
    /// Patient age in years.
    pub age: Option<i64>,
    /// Patient sex.
    pub sex: Option<String>,
    /// Barangay name.
    pub barangay: String,
    /// Date the case was reported.
    pub date_reported: NaiveDate,
    /// Current status.
    pub status: CaseStatus,
    /// Clinical severity.
    pub severity: CaseSeverity,
    /// Whether the patient was admitted.
    pub hospitalized: bool,
}

/// Case totals by status across all time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStatusCounts {
    /// All cases.
    pub total: i64,
    /// Cases with status `active`.
    pub active: i64,
    /// Cases with status `recovered`.
    pub recovered: i64,
    /// Cases with status `deceased`.
    pub deceased: i64,
    /// Cases with severity `severe`.
    pub severe: i64,
    /// Cases with the patient admitted.
    pub hospitalized: i64,
}

/// Case counts for one barangay within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarangayCaseCount {
    /// Barangay name.
    pub barangay: String,
    /// Cases reported in the window.
    pub total: i64,
    /// Of those, still active.
    pub active: i64,
}

/// Cases reported on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCaseCount {
    /// Report date.
    pub date: NaiveDate,
    /// Cases reported on `date`.
    pub count: i64,
}

/// Patient counts by age bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupCount {
    /// Bracket label, e.g. `"5-14"`.
    pub age_group: String,
    /// Patients in the bracket.
    pub count: i64,
}

/// A barangay official from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialRow {
    /// Full name.
    pub name: String,
    /// Position, e.g. `"Barangay Captain"`.
    pub position: String,
    /// Barangay served, `None` for city-level officials.
    pub barangay: Option<String>,
    /// Contact phone number.
    pub contact_number: Option<String>,
    /// Email address used for alert notifications.
    pub email: Option<String>,
}

/// Fields for inserting an official.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOfficial {
    /// Full name.
    pub name: String,
    /// Position.
    pub position: String,
    /// Barangay served.
    pub barangay_id: Option<i64>,
    /// Contact phone number.
    pub contact_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// A persisted prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Primary key.
    pub id: i64,
    /// Date the prediction applies to.
    pub prediction_date: NaiveDate,
    /// Predicted cases.
    pub predicted_cases: f64,
    /// Confidence in percent (0-100).
    pub confidence_level: f64,
    /// Risk tier at save time.
    pub risk_level: RiskTier,
    /// Human-readable weather summary used as input.
    pub weather_factor: String,
    /// RFC 3339 insertion timestamp.
    pub created_at: String,
}

/// Fields for persisting a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPredictionRecord {
    /// Date the prediction applies to.
    pub prediction_date: NaiveDate,
    /// Predicted cases.
    pub predicted_cases: f64,
    /// Confidence in percent (0-100).
    pub confidence_level: f64,
    /// Risk tier.
    pub risk_level: RiskTier,
    /// Human-readable weather summary.
    pub weather_factor: String,
}

/// One stored chatbot exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchangeRow {
    /// UUID.
    pub id: String,
    /// User message.
    pub message: String,
    /// Reply shown to the user (answer or failure message).
    pub response: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}
