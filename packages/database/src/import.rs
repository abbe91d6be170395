//! CSV import of yearly historical observations.
//!
//! Expected header: `barangay,year,population,temperature,humidity,
//! dengue_cases,cases_per_1000`. The last column may be empty, in which
//! case it is derived from cases and population.

use std::io::Read;
use std::path::Path;

use dengue_watch_prediction_models::{HistoricalObservation, round_to};
use serde::Deserialize;
use switchy_database::Database;

use crate::DbError;
use crate::queries::upsert_historical_observation;

/// Errors that can occur while importing historical observations.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but holds impossible values.
    #[error("Invalid record on line {line}: {message}")]
    Invalid {
        /// 1-based line number including the header.
        line: u64,
        /// What was wrong.
        message: String,
    },

    /// Writing to the database failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read from the file.
    pub rows_read: usize,
    /// Rows inserted or updated.
    pub rows_written: u64,
    /// Rows whose `cases_per_1000` was derived.
    pub derived_rates: usize,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    barangay: String,
    year: i32,
    population: i64,
    temperature: f64,
    humidity: f64,
    dengue_cases: i64,
    #[serde(default)]
    cases_per_1000: Option<f64>,
}

/// Cases per 1000 residents, rounded to 2 decimals. Zero population gives 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cases_per_thousand(dengue_cases: i64, population: i64) -> f64 {
    if population <= 0 {
        return 0.0;
    }
    round_to(dengue_cases as f64 / population as f64 * 1000.0, 2)
}

/// Parses historical observations from CSV. Returns the observations and
/// how many had their rate derived.
///
/// # Errors
///
/// Returns [`ImportError`] if the CSV is malformed or a row has an empty
/// barangay name or negative counts.
pub fn read_historical_csv<R: Read>(
    reader: R,
) -> Result<(Vec<HistoricalObservation>, usize), ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    let mut derived = 0;

    for result in csv_reader.deserialize::<CsvRecord>() {
        let record = result?;
        let line = observations.len() as u64 + 2;

        if record.barangay.is_empty() {
            return Err(ImportError::Invalid {
                line,
                message: "barangay is empty".to_string(),
            });
        }
        if record.population < 0 || record.dengue_cases < 0 {
            return Err(ImportError::Invalid {
                line,
                message: "population and dengue_cases must not be negative".to_string(),
            });
        }

        let cases_per_1000 = if let Some(rate) = record.cases_per_1000 {
            rate
        } else {
            derived += 1;
            cases_per_thousand(record.dengue_cases, record.population)
        };

        observations.push(HistoricalObservation {
            barangay: record.barangay,
            year: record.year,
            population: record.population,
            temperature: record.temperature,
            humidity: record.humidity,
            dengue_cases: record.dengue_cases,
            cases_per_1000,
        });
    }

    Ok((observations, derived))
}

/// Imports a historical CSV file into `historical_records`, replacing rows
/// for the same barangay and year.
///
/// # Errors
///
/// Returns [`ImportError`] if the file cannot be read or parsed, or a
/// database write fails.
pub async fn import_historical_csv(
    db: &dyn Database,
    path: &Path,
) -> Result<ImportSummary, ImportError> {
    let file = std::fs::File::open(path)?;
    let (observations, derived_rates) = read_historical_csv(file)?;

    let mut rows_written = 0;
    for observation in &observations {
        rows_written += upsert_historical_observation(db, observation).await?;
    }

    log::info!(
        "Imported {} historical observations from {} ({derived_rates} derived rates)",
        observations.len(),
        path.display()
    );

    Ok(ImportSummary {
        rows_read: observations.len(),
        rows_written,
        derived_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_db;
    use crate::queries::list_historical_observations;

    const SAMPLE: &str = "barangay,year,population,temperature,humidity,dengue_cases,cases_per_1000
Poblacion,2022,5000,28.4,77.0,25,5.0
San Isidro,2022,8000,28.9,79.5,12,
";

    #[test]
    fn derives_missing_rate() {
        let (rows, derived) = read_historical_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(derived, 1);
        assert!((rows[0].cases_per_1000 - 5.0).abs() < f64::EPSILON);
        assert!((rows[1].cases_per_1000 - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_population_rate_is_zero() {
        assert!(cases_per_thousand(4, 0).abs() < f64::EPSILON);
        assert!((cases_per_thousand(1, 3) - 333.33).abs() < 1e-9);
    }

    #[test]
    fn rejects_negative_population() {
        let csv = "barangay,year,population,temperature,humidity,dengue_cases,cases_per_1000
Poblacion,2022,-5,28.4,77.0,25,
";
        let err = read_historical_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Invalid { line: 2, .. }));
    }

    #[test]
    fn rejects_non_numeric_year() {
        let csv = "barangay,year,population,temperature,humidity,dengue_cases,cases_per_1000
Poblacion,twenty,5000,28.4,77.0,25,
";
        assert!(matches!(
            read_historical_csv(csv.as_bytes()),
            Err(ImportError::Csv(_))
        ));
    }

    #[tokio::test]
    async fn import_writes_rows() {
        let tmp = temp_db().await;
        let path = std::env::temp_dir().join(format!(
            "dengue_watch_import_{}.csv",
            uuid::Uuid::new_v4().simple()
        ));
        std::fs::write(&path, SAMPLE).unwrap();

        let summary = import_historical_csv(tmp.db.as_ref(), &path).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.derived_rates, 1);

        let stored = list_historical_observations(tmp.db.as_ref()).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].barangay, "San Isidro");
    }
}
