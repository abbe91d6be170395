//! Weekly case trend.

use chrono::{Duration, NaiveDate};
use dengue_watch_analytics_models::{TrendDirection, WeeklyCount, WeeklyTrend};
use dengue_watch_database::queries;
use dengue_watch_database_models::DailyCaseCount;
use dengue_watch_prediction::round_to;
use switchy_database::Database;

use crate::AnalyticsError;

/// Week-over-week change (in percent) beyond which the trend is no longer
/// [`TrendDirection::Stable`].
pub const STABLE_BAND_PERCENT: f64 = 10.0;

/// Percent change from `previous` to `current`. A rise from zero counts as
/// 100%, zero to zero as 0%.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_change(previous: i64, current: i64) -> f64 {
    if previous > 0 {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

/// Classifies a percent change.
#[must_use]
pub fn direction_for(change: f64) -> TrendDirection {
    if change > STABLE_BAND_PERCENT {
        TrendDirection::Increasing
    } else if change < -STABLE_BAND_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Buckets daily counts into `weeks` seven-day windows, the last ending on
/// `end` (inclusive). Days outside every window are ignored.
#[must_use]
pub fn compute_weekly_trend(daily: &[DailyCaseCount], end: NaiveDate, weeks: u32) -> WeeklyTrend {
    let weeks_vec: Vec<WeeklyCount> = (0..weeks)
        .rev()
        .map(|back| {
            let week_end = end - Duration::days(7 * i64::from(back));
            let week_start = week_end - Duration::days(6);
            let count = daily
                .iter()
                .filter(|d| d.date >= week_start && d.date <= week_end)
                .map(|d| d.count)
                .sum();
            WeeklyCount {
                week_start,
                week_end,
                count,
            }
        })
        .collect();

    let current_week = weeks_vec.last().map_or(0, |w| w.count);
    let previous_week = weeks_vec
        .len()
        .checked_sub(2)
        .and_then(|i| weeks_vec.get(i))
        .map_or(0, |w| w.count);
    let change = percent_change(previous_week, current_week);

    WeeklyTrend {
        weeks: weeks_vec,
        current_week,
        previous_week,
        percent_change: round_to(change, 2),
        direction: direction_for(change),
    }
}

/// Loads daily counts for the last `weeks` weeks ending on `today` and
/// computes the weekly trend.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn weekly_trend(
    db: &dyn Database,
    today: NaiveDate,
    weeks: u32,
) -> Result<WeeklyTrend, AnalyticsError> {
    let since = today - Duration::days(7 * i64::from(weeks) - 1);
    let daily = queries::daily_case_counts(db, since).await?;
    Ok(compute_weekly_trend(&daily, today, weeks))
}

#[cfg(test)]
mod tests {
    use dengue_watch_database_models::CaseStatus;

    use super::*;
    use crate::test_support::{barangay, cases, date, temp_db};

    fn day(d: NaiveDate, count: i64) -> DailyCaseCount {
        DailyCaseCount { date: d, count }
    }

    #[test]
    fn percent_change_handles_zero_baseline() {
        assert!((percent_change(10, 15) - 50.0).abs() < f64::EPSILON);
        assert!((percent_change(10, 5) - -50.0).abs() < f64::EPSILON);
        assert!((percent_change(0, 3) - 100.0).abs() < f64::EPSILON);
        assert!(percent_change(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn direction_band_is_exclusive() {
        assert_eq!(direction_for(10.0), TrendDirection::Stable);
        assert_eq!(direction_for(10.01), TrendDirection::Increasing);
        assert_eq!(direction_for(-10.0), TrendDirection::Stable);
        assert_eq!(direction_for(-25.0), TrendDirection::Decreasing);
    }

    #[test]
    fn buckets_end_on_reference_date() {
        let end = date(2024, 6, 30);
        let daily = vec![
            day(date(2024, 6, 10), 2),
            day(date(2024, 6, 17), 1),
            day(date(2024, 6, 23), 3),
            day(date(2024, 6, 24), 4),
            day(date(2024, 6, 30), 2),
        ];

        let trend = compute_weekly_trend(&daily, end, 3);
        assert_eq!(trend.weeks.len(), 3);
        assert_eq!(trend.weeks[2].week_start, date(2024, 6, 24));
        assert_eq!(trend.weeks[2].week_end, end);
        assert_eq!(trend.weeks[0].week_start, date(2024, 6, 10));

        let counts: Vec<i64> = trend.weeks.iter().map(|w| w.count).collect();
        assert_eq!(counts, vec![2, 4, 6]);
        assert_eq!(trend.current_week, 6);
        assert_eq!(trend.previous_week, 4);
        assert!((trend.percent_change - 50.0).abs() < f64::EPSILON);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }

    #[test]
    fn single_week_has_zero_previous() {
        let trend = compute_weekly_trend(&[], date(2024, 6, 30), 1);
        assert_eq!(trend.weeks.len(), 1);
        assert_eq!(trend.previous_week, 0);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[tokio::test]
    async fn weekly_trend_reads_cases_from_database() {
        let tmp = temp_db().await;
        let db = tmp.db.as_ref();
        let id = barangay(db, "Poblacion").await;

        cases(db, id, date(2024, 6, 20), 5, CaseStatus::Active).await;
        cases(db, id, date(2024, 6, 28), 2, CaseStatus::Active).await;

        let trend = weekly_trend(db, date(2024, 6, 30), 2).await.unwrap();
        assert_eq!(trend.previous_week, 5);
        assert_eq!(trend.current_week, 2);
        assert!((trend.percent_change - -60.0).abs() < f64::EPSILON);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }
}
