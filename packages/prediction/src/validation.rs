//! Backtest of the regression model against historical observations.

use dengue_watch_prediction_models::{
    HistoricalObservation, ModelPerformanceSummary, ValidationRecord, ValidationReport,
};

use crate::{model::predict, round_to};

/// Replays the model over every observation and summarizes the error.
#[must_use]
pub fn validate(observations: &[HistoricalObservation]) -> ValidationReport {
    validate_with(observations, |obs| predict(obs.input()).predicted_cases)
}

/// Like [`validate`], but with a caller-supplied predictor.
///
/// Statistics are computed on the predictor's raw output; only the
/// reported values are rounded (errors to 2 decimals, R² to 4).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn validate_with<F>(observations: &[HistoricalObservation], predictor: F) -> ValidationReport
where
    F: Fn(&HistoricalObservation) -> f64,
{
    let pairs: Vec<(f64, f64)> = observations
        .iter()
        .map(|obs| (obs.dengue_cases as f64, predictor(obs)))
        .collect();

    let records = observations
        .iter()
        .zip(&pairs)
        .map(|(obs, &(actual, predicted))| {
            let error = predicted - actual;
            ValidationRecord {
                barangay: obs.barangay.clone(),
                year: obs.year,
                actual_cases: actual,
                predicted_cases: round_to(predicted, 2),
                error: round_to(error, 2),
                absolute_error: round_to(error.abs(), 2),
                percent_error: round_to(percent_error(error, actual), 2),
            }
        })
        .collect();

    let summary = summarize(&pairs);
    log::debug!(
        "Validated model over {} observations (MAE {:.2})",
        summary.sample_count,
        summary.mean_absolute_error
    );

    ValidationReport { summary, records }
}

/// Confidence to attach to a saved prediction: the validation accuracy
/// clamped to `0..=100`, or `0` when accuracy is undefined.
#[must_use]
pub fn confidence_level(summary: &ModelPerformanceSummary) -> f64 {
    summary
        .accuracy_percentage
        .map_or(0.0, |accuracy| accuracy.clamp(0.0, 100.0))
}

/// `error / actual * 100`, guarded against a zero denominator.
fn percent_error(error: f64, actual: f64) -> f64 {
    if actual > 0.0 {
        error / actual * 100.0
    } else {
        0.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(pairs: &[(f64, f64)]) -> ModelPerformanceSummary {
    if pairs.is_empty() {
        return ModelPerformanceSummary {
            sample_count: 0,
            mean_error: 0.0,
            mean_absolute_error: 0.0,
            r_squared: None,
            accuracy_percentage: None,
        };
    }

    let n = pairs.len() as f64;
    let mean_error = pairs.iter().map(|(a, p)| p - a).sum::<f64>() / n;
    let mae = pairs.iter().map(|(a, p)| (p - a).abs()).sum::<f64>() / n;
    let actual_mean = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;

    let ss_total: f64 = pairs.iter().map(|(a, _)| (a - actual_mean).powi(2)).sum();
    let ss_residual: f64 = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum();

    let r_squared = (ss_total > 0.0).then(|| round_to(1.0 - ss_residual / ss_total, 4));
    let accuracy_percentage =
        (actual_mean != 0.0).then(|| round_to((1.0 - mae / actual_mean) * 100.0, 2));

    ModelPerformanceSummary {
        sample_count: pairs.len(),
        mean_error: round_to(mean_error, 2),
        mean_absolute_error: round_to(mae, 2),
        r_squared,
        accuracy_percentage,
    }
}
