//! Dashboard statistics for a trailing window of days.

use chrono::{Duration, NaiveDate};
use dengue_watch_analytics_models::{DashboardData, DashboardStats};
use dengue_watch_database::queries;
use switchy_database::Database;

use crate::AnalyticsError;
use crate::alerts::alerts_from_counts;

/// Maximum number of recent cases returned with the dashboard.
pub const RECENT_CASE_LIMIT: u32 = 50;

/// First day of a `days`-long window ending on `today` (inclusive).
#[must_use]
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.max(1)) - 1)
}

/// Builds the dashboard payload for the `days`-long window ending on
/// `today`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if any database query fails.
pub async fn dashboard(
    db: &dyn Database,
    today: NaiveDate,
    days: u32,
) -> Result<DashboardData, AnalyticsError> {
    let since = window_start(today, days);

    let counts = queries::case_status_counts(db).await?;
    let total_patients = queries::count_patients(db).await?;
    let cases_in_period = queries::count_cases_since(db, since).await?;
    let barangay_data = queries::cases_by_barangay_since(db, since).await?;
    let cases = queries::recent_cases(db, since, RECENT_CASE_LIMIT).await?;

    let stats = DashboardStats {
        days,
        total_cases: counts.total,
        active_cases: counts.active,
        recovered_cases: counts.recovered,
        deceased_cases: counts.deceased,
        severe_cases: counts.severe,
        hospitalized_cases: counts.hospitalized,
        total_patients,
        cases_in_period,
        barangays_affected: i64::try_from(barangay_data.len()).unwrap_or(i64::MAX),
    };

    let alerts = alerts_from_counts(&barangay_data, days);

    log::debug!(
        "Dashboard for {days} day(s): {cases_in_period} case(s), {} alert(s)",
        alerts.len()
    );

    Ok(DashboardData {
        stats,
        alerts,
        cases,
        barangay_data,
    })
}

#[cfg(test)]
mod tests {
    use dengue_watch_analytics_models::AlertLevel;
    use dengue_watch_database_models::CaseStatus;

    use super::*;
    use crate::test_support::{barangay, cases, date, temp_db};

    #[test]
    fn window_includes_today() {
        assert_eq!(window_start(date(2024, 6, 30), 1), date(2024, 6, 30));
        assert_eq!(window_start(date(2024, 6, 30), 30), date(2024, 6, 1));
        assert_eq!(window_start(date(2024, 6, 30), 0), date(2024, 6, 30));
    }

    #[tokio::test]
    async fn empty_database_yields_zeroes() {
        let tmp = temp_db().await;
        let data = dashboard(tmp.db.as_ref(), date(2024, 6, 30), 30)
            .await
            .unwrap();
        assert_eq!(
            data.stats,
            DashboardStats {
                days: 30,
                ..DashboardStats::default()
            }
        );
        assert!(data.alerts.is_empty());
        assert!(data.cases.is_empty());
        assert!(data.barangay_data.is_empty());
    }

    #[tokio::test]
    async fn dashboard_counts_window_and_raises_alerts() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let poblacion = barangay(db, "Poblacion").await;
        let tambo = barangay(db, "Tambo").await;

        cases(db, poblacion, date(2024, 6, 25), 8, CaseStatus::Active).await;
        cases(db, poblacion, date(2024, 6, 26), 3, CaseStatus::Recovered).await;
        cases(db, tambo, date(2024, 6, 28), 2, CaseStatus::Active).await;
        cases(db, tambo, date(2024, 4, 1), 6, CaseStatus::Recovered).await;

        let data = dashboard(db, date(2024, 6, 30), 30).await.unwrap();

        assert_eq!(data.stats.total_cases, 19);
        assert_eq!(data.stats.active_cases, 10);
        assert_eq!(data.stats.recovered_cases, 9);
        assert_eq!(data.stats.total_patients, 19);
        assert_eq!(data.stats.cases_in_period, 13);
        assert_eq!(data.stats.barangays_affected, 2);

        assert_eq!(data.alerts.len(), 1);
        assert_eq!(data.alerts[0].barangay, "Poblacion");
        assert_eq!(data.alerts[0].level, AlertLevel::Warning);
        assert_eq!(data.alerts[0].active_cases, 8);

        assert_eq!(data.cases.len(), 13);
        assert_eq!(data.cases[0].barangay, "Tambo");
        assert_eq!(data.barangay_data[0].barangay, "Poblacion");
    }
}
