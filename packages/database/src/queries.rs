//! Database query functions for surveillance data.
//!
//! All statements are parameterized. Dates are stored as `YYYY-MM-DD` text
//! and timestamps as RFC 3339 text, so window filters compare strings.

use std::str::FromStr as _;

use chrono::NaiveDate;
use dengue_watch_database_models::{
    AgeGroupCount, BarangayCaseCount, BarangayDirectoryRow, CaseRow, CaseSeverity, CaseStatus,
    CaseStatusCounts, ChatExchangeRow, DailyCaseCount, NewBarangay, NewCase, NewOfficial,
    NewPatient, NewPredictionRecord, OfficialRow, PredictionRecord,
};
use dengue_watch_prediction_models::{HistoricalObservation, RiskTier};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue, Row};

use crate::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion<E: std::fmt::Display>(column: &'static str) -> impl FnOnce(E) -> DbError {
    move |e| DbError::Conversion {
        message: format!("Failed to parse {column}: {e}"),
    }
}

fn date_value(date: NaiveDate) -> DatabaseValue {
    DatabaseValue::String(date.format(DATE_FORMAT).to_string())
}

fn opt_string(value: Option<&String>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |v| DatabaseValue::String(v.clone()))
}

fn parse_date(row: &Row, column: &'static str) -> Result<NaiveDate, DbError> {
    let text: String = row.to_value(column).map_err(conversion(column))?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(conversion(column))
}

fn returned_id(rows: &[Row], what: &str) -> Result<i64, DbError> {
    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: format!("Failed to get {what} id from insert"),
    })?;

    row.to_value("id").map_err(conversion("id"))
}

fn limit_value(limit: u32) -> DatabaseValue {
    DatabaseValue::Int64(i64::from(limit))
}

// ---------------------------------------------------------------------------
// Barangays
// ---------------------------------------------------------------------------

/// Inserts a barangay, or updates its metadata if the name already exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_barangay(db: &dyn Database, barangay: &NewBarangay) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO barangays (name, district, latitude, longitude)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (name) DO UPDATE SET
                 district = excluded.district,
                 latitude = excluded.latitude,
                 longitude = excluded.longitude
             RETURNING id",
            &[
                DatabaseValue::String(barangay.name.clone()),
                opt_string(barangay.district.as_ref()),
                barangay
                    .latitude
                    .map_or(DatabaseValue::Null, DatabaseValue::Real64),
                barangay
                    .longitude
                    .map_or(DatabaseValue::Null, DatabaseValue::Real64),
            ],
        )
        .await?;

    returned_id(&rows, "barangay")
}

/// Names of every barangay known to the system: registered barangays plus
/// any that only appear in historical records. Sorted, deduplicated.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_barangay_names(db: &dyn Database) -> Result<Vec<String>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT name FROM barangays
             UNION
             SELECT barangay AS name FROM historical_records
             ORDER BY name",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| row.to_value("name").map_err(conversion("name")))
        .collect()
}

/// Lists barangays with their latest historical population and number of
/// active cases.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn list_barangay_directory(
    db: &dyn Database,
) -> Result<Vec<BarangayDirectoryRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT b.id, b.name, b.district,
                    (SELECT h.population FROM historical_records h
                     WHERE h.barangay = b.name
                     ORDER BY h.year DESC LIMIT 1) AS latest_population,
                    (SELECT COUNT(*) FROM dengue_cases c
                     JOIN patients p ON p.id = c.patient_id
                     WHERE p.barangay_id = b.id AND c.status = $1) AS active_cases
             FROM barangays b
             ORDER BY b.name",
            &[DatabaseValue::String(CaseStatus::Active.as_ref().to_string())],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(BarangayDirectoryRow {
                id: row.to_value("id").map_err(conversion("id"))?,
                name: row.to_value("name").map_err(conversion("name"))?,
                district: row.to_value("district").unwrap_or(None),
                latest_population: row.to_value("latest_population").unwrap_or(None),
                active_cases: row.to_value("active_cases").unwrap_or(0),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Patients and cases
// ---------------------------------------------------------------------------

/// Inserts a patient and returns its id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_patient(db: &dyn Database, patient: &NewPatient) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO patients (first_name, last_name, age, sex, barangay_id, contact_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
            &[
                DatabaseValue::String(patient.first_name.clone()),
                DatabaseValue::String(patient.last_name.clone()),
                patient.age.map_or(DatabaseValue::Null, DatabaseValue::Int64),
                opt_string(patient.sex.as_ref()),
                DatabaseValue::Int64(patient.barangay_id),
                opt_string(patient.contact_number.as_ref()),
            ],
        )
        .await?;

    returned_id(&rows, "patient")
}

/// Records a dengue case and returns its id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_case(db: &dyn Database, case: &NewCase) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO dengue_cases (patient_id, date_reported, status, severity, hospitalized)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::Int64(case.patient_id),
                date_value(case.date_reported),
                DatabaseValue::String(case.status.as_ref().to_string()),
                DatabaseValue::String(case.severity.as_ref().to_string()),
                DatabaseValue::Int64(i64::from(case.hospitalized)),
            ],
        )
        .await?;

    returned_id(&rows, "case")
}

/// Total number of registered patients.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn count_patients(db: &dyn Database) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) AS cnt FROM patients", &[])
        .await?;

    Ok(rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0)))
}

/// Case totals by status and severity across all time.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn case_status_counts(db: &dyn Database) -> Result<CaseStatusCounts, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(CASE WHEN status = $1 THEN 1 ELSE 0 END), 0) AS active,
                    COALESCE(SUM(CASE WHEN status = $2 THEN 1 ELSE 0 END), 0) AS recovered,
                    COALESCE(SUM(CASE WHEN status = $3 THEN 1 ELSE 0 END), 0) AS deceased,
                    COALESCE(SUM(CASE WHEN severity = $4 THEN 1 ELSE 0 END), 0) AS severe,
                    COALESCE(SUM(hospitalized), 0) AS hospitalized
             FROM dengue_cases",
            &[
                DatabaseValue::String(CaseStatus::Active.as_ref().to_string()),
                DatabaseValue::String(CaseStatus::Recovered.as_ref().to_string()),
                DatabaseValue::String(CaseStatus::Deceased.as_ref().to_string()),
                DatabaseValue::String(CaseSeverity::Severe.as_ref().to_string()),
            ],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(CaseStatusCounts::default());
    };

    Ok(CaseStatusCounts {
        total: row.to_value("total").unwrap_or(0),
        active: row.to_value("active").unwrap_or(0),
        recovered: row.to_value("recovered").unwrap_or(0),
        deceased: row.to_value("deceased").unwrap_or(0),
        severe: row.to_value("severe").unwrap_or(0),
        hospitalized: row.to_value("hospitalized").unwrap_or(0),
    })
}

/// Number of cases reported on or after `since`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn count_cases_since(db: &dyn Database, since: NaiveDate) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) AS cnt FROM dengue_cases WHERE date_reported >= $1",
            &[date_value(since)],
        )
        .await?;

    Ok(rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0)))
}

/// Per-barangay case counts for cases reported on or after `since`,
/// highest total first. Barangays with no cases in the window are omitted.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn cases_by_barangay_since(
    db: &dyn Database,
    since: NaiveDate,
) -> Result<Vec<BarangayCaseCount>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT b.name AS barangay,
                    COUNT(c.id) AS total,
                    COALESCE(SUM(CASE WHEN c.status = $1 THEN 1 ELSE 0 END), 0) AS active
             FROM dengue_cases c
             JOIN patients p ON p.id = c.patient_id
             JOIN barangays b ON b.id = p.barangay_id
             WHERE c.date_reported >= $2
             GROUP BY b.name
             ORDER BY total DESC, b.name",
            &[
                DatabaseValue::String(CaseStatus::Active.as_ref().to_string()),
                date_value(since),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(BarangayCaseCount {
                barangay: row.to_value("barangay").map_err(conversion("barangay"))?,
                total: row.to_value("total").unwrap_or(0),
                active: row.to_value("active").unwrap_or(0),
            })
        })
        .collect()
}

/// Most recent cases reported on or after `since`, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn recent_cases(
    db: &dyn Database,
    since: NaiveDate,
    limit: u32,
) -> Result<Vec<CaseRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT c.id, p.first_name, p.last_name, p.age, p.sex, b.name AS barangay,
                    c.date_reported, c.status, c.severity, c.hospitalized
             FROM dengue_cases c
             JOIN patients p ON p.id = c.patient_id
             JOIN barangays b ON b.id = p.barangay_id
             WHERE c.date_reported >= $1
             ORDER BY c.date_reported DESC, c.id DESC
             LIMIT $2",
            &[date_value(since), limit_value(limit)],
        )
        .await?;

    rows.iter().map(case_row).collect()
}

fn case_row(row: &Row) -> Result<CaseRow, DbError> {
    let first_name: String = row.to_value("first_name").map_err(conversion("first_name"))?;
    let last_name: String = row.to_value("last_name").map_err(conversion("last_name"))?;
    let status: String = row.to_value("status").map_err(conversion("status"))?;
    let severity: String = row.to_value("severity").map_err(conversion("severity"))?;
    let hospitalized: i64 = row.to_value("hospitalized").unwrap_or(0);

    Ok(CaseRow {
        id: row.to_value("id").map_err(conversion("id"))?,
        patient_name: format!("{first_name} {last_name}"),
        age: row.to_value("age").unwrap_or(None),
        sex: row.to_value("sex").unwrap_or(None),
        barangay: row.to_value("barangay").map_err(conversion("barangay"))?,
        date_reported: parse_date(row, "date_reported")?,
        status: CaseStatus::from_str(&status).map_err(conversion("status"))?,
        severity: CaseSeverity::from_str(&severity).map_err(conversion("severity"))?,
        hospitalized: hospitalized != 0,
    })
}

/// Cases per report date on or after `since`, oldest first. Days without
/// cases are absent.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn daily_case_counts(
    db: &dyn Database,
    since: NaiveDate,
) -> Result<Vec<DailyCaseCount>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT date_reported, COUNT(*) AS cnt
             FROM dengue_cases
             WHERE date_reported >= $1
             GROUP BY date_reported
             ORDER BY date_reported",
            &[date_value(since)],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DailyCaseCount {
                date: parse_date(row, "date_reported")?,
                count: row.to_value("cnt").unwrap_or(0),
            })
        })
        .collect()
}

/// Patients with a case, bucketed by age bracket. Patients without a
/// recorded age land in `"unknown"`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn age_group_counts(db: &dyn Database) -> Result<Vec<AgeGroupCount>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT CASE
                        WHEN p.age IS NULL THEN 'unknown'
                        WHEN p.age < 5 THEN '0-4'
                        WHEN p.age < 15 THEN '5-14'
                        WHEN p.age < 25 THEN '15-24'
                        WHEN p.age < 45 THEN '25-44'
                        WHEN p.age < 65 THEN '45-64'
                        ELSE '65+'
                    END AS age_group,
                    COUNT(*) AS cnt
             FROM dengue_cases c
             JOIN patients p ON p.id = c.patient_id
             GROUP BY age_group
             ORDER BY MIN(COALESCE(p.age, 1000))",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(AgeGroupCount {
                age_group: row.to_value("age_group").map_err(conversion("age_group"))?,
                count: row.to_value("cnt").unwrap_or(0),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Historical observations
// ---------------------------------------------------------------------------

/// Inserts a historical observation, replacing any existing row for the
/// same barangay and year. Returns the number of affected rows.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_historical_observation(
    db: &dyn Database,
    observation: &HistoricalObservation,
) -> Result<u64, DbError> {
    let affected = db
        .exec_raw_params(
            "INSERT INTO historical_records (
                barangay, year, population, temperature, humidity,
                dengue_cases, cases_per_1000
             ) VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (barangay, year) DO UPDATE SET
                 population = excluded.population,
                 temperature = excluded.temperature,
                 humidity = excluded.humidity,
                 dengue_cases = excluded.dengue_cases,
                 cases_per_1000 = excluded.cases_per_1000",
            &[
                DatabaseValue::String(observation.barangay.clone()),
                DatabaseValue::Int32(observation.year),
                DatabaseValue::Int64(observation.population),
                DatabaseValue::Real64(observation.temperature),
                DatabaseValue::Real64(observation.humidity),
                DatabaseValue::Int64(observation.dengue_cases),
                DatabaseValue::Real64(observation.cases_per_1000),
            ],
        )
        .await?;

    Ok(affected)
}

/// All historical observations ordered by barangay then year.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn list_historical_observations(
    db: &dyn Database,
) -> Result<Vec<HistoricalObservation>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT barangay, year, population, temperature, humidity,
                    dengue_cases, cases_per_1000
             FROM historical_records
             ORDER BY barangay, year",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(HistoricalObservation {
                barangay: row.to_value("barangay").map_err(conversion("barangay"))?,
                year: row.to_value("year").map_err(conversion("year"))?,
                population: row.to_value("population").map_err(conversion("population"))?,
                temperature: row
                    .to_value("temperature")
                    .map_err(conversion("temperature"))?,
                humidity: row.to_value("humidity").map_err(conversion("humidity"))?,
                dengue_cases: row
                    .to_value("dengue_cases")
                    .map_err(conversion("dengue_cases"))?,
                cases_per_1000: row
                    .to_value("cases_per_1000")
                    .map_err(conversion("cases_per_1000"))?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Officials
// ---------------------------------------------------------------------------

/// Adds an official to the directory and returns its id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_official(db: &dyn Database, official: &NewOfficial) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO barangay_officials (name, position, barangay_id, contact_number, email)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::String(official.name.clone()),
                DatabaseValue::String(official.position.clone()),
                official
                    .barangay_id
                    .map_or(DatabaseValue::Null, DatabaseValue::Int64),
                opt_string(official.contact_number.as_ref()),
                opt_string(official.email.as_ref()),
            ],
        )
        .await?;

    returned_id(&rows, "official")
}

/// The officials directory, ordered by barangay then name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn list_officials(db: &dyn Database) -> Result<Vec<OfficialRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT o.name, o.position, b.name AS barangay, o.contact_number, o.email
             FROM barangay_officials o
             LEFT JOIN barangays b ON b.id = o.barangay_id
             ORDER BY b.name, o.name",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(OfficialRow {
                name: row.to_value("name").map_err(conversion("name"))?,
                position: row.to_value("position").map_err(conversion("position"))?,
                barangay: row.to_value("barangay").unwrap_or(None),
                contact_number: row.to_value("contact_number").unwrap_or(None),
                email: row.to_value("email").unwrap_or(None),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

/// Persists a prediction, stamping `created_at` with the current time.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_prediction(
    db: &dyn Database,
    prediction: &NewPredictionRecord,
) -> Result<PredictionRecord, DbError> {
    let created_at = chrono::Utc::now().to_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO predictions (
                prediction_date, predicted_cases, confidence_level,
                risk_level, weather_factor, created_at
             ) VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
            &[
                date_value(prediction.prediction_date),
                DatabaseValue::Real64(prediction.predicted_cases),
                DatabaseValue::Real64(prediction.confidence_level),
                DatabaseValue::String(prediction.risk_level.to_string()),
                DatabaseValue::String(prediction.weather_factor.clone()),
                DatabaseValue::String(created_at.clone()),
            ],
        )
        .await?;

    let id = returned_id(&rows, "prediction")?;

    Ok(PredictionRecord {
        id,
        prediction_date: prediction.prediction_date,
        predicted_cases: prediction.predicted_cases,
        confidence_level: prediction.confidence_level,
        risk_level: prediction.risk_level,
        weather_factor: prediction.weather_factor.clone(),
        created_at,
    })
}

/// Most recently saved predictions, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be converted.
pub async fn list_predictions(
    db: &dyn Database,
    limit: u32,
) -> Result<Vec<PredictionRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, prediction_date, predicted_cases, confidence_level,
                    risk_level, weather_factor, created_at
             FROM predictions
             ORDER BY created_at DESC, id DESC
             LIMIT $1",
            &[limit_value(limit)],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let risk_level: String = row.to_value("risk_level").map_err(conversion("risk_level"))?;

            Ok(PredictionRecord {
                id: row.to_value("id").map_err(conversion("id"))?,
                prediction_date: parse_date(row, "prediction_date")?,
                predicted_cases: row
                    .to_value("predicted_cases")
                    .map_err(conversion("predicted_cases"))?,
                confidence_level: row
                    .to_value("confidence_level")
                    .map_err(conversion("confidence_level"))?,
                risk_level: RiskTier::from_str(&risk_level).map_err(conversion("risk_level"))?,
                weather_factor: row.to_value("weather_factor").unwrap_or_default(),
                created_at: row.to_value("created_at").unwrap_or_default(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chat exchanges
// ---------------------------------------------------------------------------

/// Stores one chatbot exchange.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_chat_exchange(
    db: &dyn Database,
    message: &str,
    response: &str,
) -> Result<ChatExchangeRow, DbError> {
    let exchange = ChatExchangeRow {
        id: uuid::Uuid::new_v4().to_string(),
        message: message.to_string(),
        response: response.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    db.exec_raw_params(
        "INSERT INTO chat_exchanges (id, message, response, created_at)
         VALUES ($1, $2, $3, $4)",
        &[
            DatabaseValue::String(exchange.id.clone()),
            DatabaseValue::String(exchange.message.clone()),
            DatabaseValue::String(exchange.response.clone()),
            DatabaseValue::String(exchange.created_at.clone()),
        ],
    )
    .await?;

    Ok(exchange)
}

/// Most recent chat exchanges, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_chat_exchanges(
    db: &dyn Database,
    limit: u32,
) -> Result<Vec<ChatExchangeRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, message, response, created_at
             FROM chat_exchanges
             ORDER BY created_at DESC
             LIMIT $1",
            &[limit_value(limit)],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| ChatExchangeRow {
            id: row.to_value("id").unwrap_or_default(),
            message: row.to_value("message").unwrap_or_default(),
            response: row.to_value("response").unwrap_or_default(),
            created_at: row.to_value("created_at").unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_db;
    use super::CaseSeverity::{Mild, Moderate, Severe};
    use super::CaseStatus::{Active, Deceased, Recovered};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_case(
        db: &dyn Database,
        barangay_id: i64,
        name: &str,
        age: Option<i64>,
        reported: NaiveDate,
        status: CaseStatus,
        severity: CaseSeverity,
    ) -> i64 {
        let patient_id = insert_patient(
            db,
            &NewPatient {
                first_name: name.to_string(),
                last_name: "Santos".to_string(),
                age,
                sex: Some("F".to_string()),
                barangay_id,
                contact_number: None,
            },
        )
        .await
        .unwrap();

        insert_case(
            db,
            &NewCase {
                patient_id,
                date_reported: reported,
                status,
                severity,
                hospitalized: severity == CaseSeverity::Severe,
            },
        )
        .await
        .unwrap()
    }

    async fn barangay(db: &dyn Database, name: &str) -> i64 {
        upsert_barangay(
            db,
            &NewBarangay {
                name: name.to_string(),
                district: Some("District 1".to_string()),
                latitude: None,
                longitude: None,
            },
        )
        .await
        .unwrap()
    }

    fn observation(barangay: &str, year: i32, population: i64) -> HistoricalObservation {
        HistoricalObservation {
            barangay: barangay.to_string(),
            year,
            population,
            temperature: 28.0,
            humidity: 75.0,
            dengue_cases: 12,
            cases_per_1000: 2.4,
        }
    }

    #[tokio::test]
    async fn upsert_barangay_keeps_id_for_same_name() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();

        let first = barangay(db, "Poblacion").await;
        let second = barangay(db, "Poblacion").await;
        assert_eq!(first, second);

        let rows = list_barangay_directory(db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first);
        assert_eq!(rows[0].district.as_deref(), Some("District 1"));
    }

    #[tokio::test]
    async fn case_counts_split_by_status_and_window() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let poblacion = barangay(db, "Poblacion").await;
        let san_isidro = barangay(db, "San Isidro").await;

        seed_case(db, poblacion, "Ana", Some(8), date(2024, 6, 1), Active, Mild).await;
        seed_case(db, poblacion, "Ben", Some(30), date(2024, 6, 3), Recovered, Severe).await;
        seed_case(db, san_isidro, "Cora", None, date(2024, 5, 1), Deceased, Severe).await;

        let counts = case_status_counts(db).await.unwrap();
        assert_eq!(
            counts,
            CaseStatusCounts {
                total: 3,
                active: 1,
                recovered: 1,
                deceased: 1,
                severe: 2,
                hospitalized: 2,
            }
        );

        assert_eq!(count_cases_since(db, date(2024, 6, 1)).await.unwrap(), 2);

        let by_barangay = cases_by_barangay_since(db, date(2024, 6, 1)).await.unwrap();
        assert_eq!(
            by_barangay,
            vec![BarangayCaseCount {
                barangay: "Poblacion".to_string(),
                total: 2,
                active: 1,
            }]
        );
    }

    #[tokio::test]
    async fn recent_cases_are_newest_first_and_limited() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;

        seed_case(db, id, "Ana", Some(8), date(2024, 6, 1), Active, Mild).await;
        seed_case(db, id, "Ben", Some(30), date(2024, 6, 5), Active, Moderate).await;
        seed_case(db, id, "Cora", Some(70), date(2024, 6, 3), Recovered, Severe).await;

        let cases = recent_cases(db, date(2024, 6, 1), 2).await.unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].patient_name, "Ben Santos");
        assert_eq!(cases[0].severity, CaseSeverity::Moderate);
        assert_eq!(cases[1].patient_name, "Cora Santos");
        assert!(cases[1].hospitalized);
        assert_eq!(cases[1].barangay, "Poblacion");
    }

    #[tokio::test]
    async fn daily_counts_group_by_date() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;

        for name in ["Ana", "Ben"] {
            seed_case(db, id, name, None, date(2024, 6, 2), Active, Mild).await;
        }
        seed_case(db, id, "Cora", None, date(2024, 6, 4), Active, Mild).await;
        seed_case(db, id, "Dan", None, date(2024, 5, 4), Active, Mild).await;

        let daily = daily_case_counts(db, date(2024, 6, 1)).await.unwrap();
        assert_eq!(
            daily,
            vec![
                DailyCaseCount {
                    date: date(2024, 6, 2),
                    count: 2,
                },
                DailyCaseCount {
                    date: date(2024, 6, 4),
                    count: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn age_groups_bucket_patients() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;

        let patients = [("Ana", Some(3)), ("Ben", Some(9)), ("Cora", Some(12)), ("Dan", None)];
        for (name, age) in patients {
            seed_case(db, id, name, age, date(2024, 6, 2), Active, Mild).await;
        }

        let groups = age_group_counts(db).await.unwrap();
        assert_eq!(
            groups,
            vec![
                AgeGroupCount {
                    age_group: "0-4".to_string(),
                    count: 1,
                },
                AgeGroupCount {
                    age_group: "5-14".to_string(),
                    count: 2,
                },
                AgeGroupCount {
                    age_group: "unknown".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn historical_upsert_replaces_same_year() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();

        upsert_historical_observation(db, &observation("Poblacion", 2022, 5_000))
            .await
            .unwrap();
        upsert_historical_observation(db, &observation("Poblacion", 2022, 5_400))
            .await
            .unwrap();
        upsert_historical_observation(db, &observation("Bagong Silang", 2021, 7_000))
            .await
            .unwrap();

        let all = list_historical_observations(db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].barangay, "Bagong Silang");
        assert_eq!(all[1].population, 5_400);
    }

    #[tokio::test]
    async fn directory_uses_latest_population_and_active_cases() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;
        barangay(db, "Tambo").await;

        upsert_historical_observation(db, &observation("Poblacion", 2021, 4_800))
            .await
            .unwrap();
        upsert_historical_observation(db, &observation("Poblacion", 2023, 5_200))
            .await
            .unwrap();
        seed_case(db, id, "Ana", None, date(2024, 6, 2), Active, Mild).await;
        seed_case(db, id, "Ben", None, date(2024, 6, 2), Recovered, Mild).await;

        let directory = list_barangay_directory(db).await.unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory[0].latest_population, Some(5_200));
        assert_eq!(directory[0].active_cases, 1);
        assert_eq!(directory[1].name, "Tambo");
        assert_eq!(directory[1].latest_population, None);
        assert_eq!(directory[1].active_cases, 0);
    }

    #[tokio::test]
    async fn barangay_names_include_history_only_names() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        barangay(db, "Poblacion").await;
        upsert_historical_observation(db, &observation("Poblacion", 2022, 5_000))
            .await
            .unwrap();
        upsert_historical_observation(db, &observation("Aguho", 2022, 3_000))
            .await
            .unwrap();

        let names = list_barangay_names(db).await.unwrap();
        assert_eq!(names, vec!["Aguho".to_string(), "Poblacion".to_string()]);
    }

    #[tokio::test]
    async fn officials_join_barangay_name() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;

        insert_official(
            db,
            &NewOfficial {
                name: "Maria Cruz".to_string(),
                position: "Barangay Captain".to_string(),
                barangay_id: Some(id),
                contact_number: Some("0917-000-0000".to_string()),
                email: Some("captain@poblacion.gov.ph".to_string()),
            },
        )
        .await
        .unwrap();
        insert_official(
            db,
            &NewOfficial {
                name: "Jose Reyes".to_string(),
                position: "City Health Officer".to_string(),
                barangay_id: None,
                contact_number: None,
                email: None,
            },
        )
        .await
        .unwrap();

        let officials = list_officials(db).await.unwrap();
        assert_eq!(officials.len(), 2);
        let captain = officials.iter().find(|o| o.name == "Maria Cruz").unwrap();
        assert_eq!(captain.barangay.as_deref(), Some("Poblacion"));
        let city = officials.iter().find(|o| o.name == "Jose Reyes").unwrap();
        assert_eq!(city.barangay, None);
        assert_eq!(city.email, None);
    }

    #[tokio::test]
    async fn predictions_round_trip_with_risk_level() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();

        let saved = insert_prediction(
            db,
            &NewPredictionRecord {
                prediction_date: date(2024, 7, 1),
                predicted_cases: 52.5,
                confidence_level: 81.25,
                risk_level: RiskTier::VeryHigh,
                weather_factor: "30.0°C, 75% humidity".to_string(),
            },
        )
        .await
        .unwrap();

        let listed = list_predictions(db, 10).await.unwrap();
        assert_eq!(listed, vec![saved]);
        assert_eq!(listed[0].risk_level, RiskTier::VeryHigh);
    }

    #[tokio::test]
    async fn chat_exchanges_are_listed_with_limit() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();

        insert_chat_exchange(db, "How many cases?", "There are 3 active cases.")
            .await
            .unwrap();
        insert_chat_exchange(db, "Any alerts?", "No alerts.").await.unwrap();

        assert_eq!(list_chat_exchanges(db, 10).await.unwrap().len(), 2);
        assert_eq!(list_chat_exchanges(db, 1).await.unwrap().len(), 1);
    }
}
