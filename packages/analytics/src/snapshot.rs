//! Assembly of the full surveillance snapshot.

use chrono::NaiveDate;
use dengue_watch_analytics_models::SurveillanceSnapshot;
use dengue_watch_database::queries;
use dengue_watch_prediction::{predict_fleet, regions_from_history, validate};
use dengue_watch_weather::{WeatherDay, current_reading};
use switchy_database::Database;

use crate::AnalyticsError;
use crate::dashboard::dashboard;
use crate::trend::weekly_trend;

/// Weeks covered by the snapshot's weekly trend.
pub const TREND_WEEKS: u32 = 8;

/// Saved predictions included in the snapshot.
pub const RECENT_PREDICTION_LIMIT: u32 = 5;

/// Collects dashboard statistics, trend, model backtest, fleet prediction,
/// and the officials directory into one snapshot.
///
/// `weather` is the already-fetched forecast; pass an empty list when the
/// provider is unavailable and the fleet prediction uses the default
/// reading.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if any database query fails.
pub async fn build_snapshot(
    db: &dyn Database,
    today: NaiveDate,
    days: u32,
    weather: Vec<WeatherDay>,
) -> Result<SurveillanceSnapshot, AnalyticsError> {
    let dashboard = dashboard(db, today, days).await?;
    let weekly_trend = weekly_trend(db, today, TREND_WEEKS).await?;
    let age_groups = queries::age_group_counts(db).await?;
    let officials = queries::list_officials(db).await?;
    let recent_predictions = queries::list_predictions(db, RECENT_PREDICTION_LIMIT).await?;

    let history = queries::list_historical_observations(db).await?;
    let names = queries::list_barangay_names(db).await?;
    let model_performance = validate(&history).summary;
    let fleet = predict_fleet(
        &regions_from_history(&names, &history),
        current_reading(&weather),
    );

    Ok(SurveillanceSnapshot {
        as_of: today,
        stats: dashboard.stats,
        alerts: dashboard.alerts,
        barangay_data: dashboard.barangay_data,
        age_groups,
        weekly_trend,
        weather,
        fleet,
        model_performance,
        recent_predictions,
        officials,
    })
}
