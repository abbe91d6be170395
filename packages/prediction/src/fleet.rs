//! Fleet prediction: every barangay under one shared weather reading.

use std::collections::BTreeMap;

use dengue_watch_prediction_models::{
    FleetPrediction, FleetRegion, HistoricalObservation, PredictionInput, WeatherReading,
};

use crate::model::predict;

/// Population assumed for a barangay with no historical rows.
pub const DEFAULT_POPULATION: i64 = 5000;

/// Builds fleet regions from a barangay list and the historical record.
///
/// Each region takes the population of its most recent observation year.
/// Barangays with no observations get `latest_population: None`. Output
/// order follows `barangays`.
#[must_use]
pub fn regions_from_history(
    barangays: &[String],
    history: &[HistoricalObservation],
) -> Vec<FleetRegion> {
    let mut latest: BTreeMap<&str, (i32, i64)> = BTreeMap::new();
    for obs in history {
        let entry = latest
            .entry(obs.barangay.as_str())
            .or_insert((obs.year, obs.population));
        if obs.year >= entry.0 {
            *entry = (obs.year, obs.population);
        }
    }

    barangays
        .iter()
        .map(|name| FleetRegion {
            barangay: name.clone(),
            latest_population: latest.get(name.as_str()).map(|(_, pop)| *pop),
        })
        .collect()
}

/// Predicts every region and ranks them by predicted cases, highest
/// first.
///
/// The sort is stable: regions with equal predictions keep their input
/// order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn predict_fleet(regions: &[FleetRegion], weather: WeatherReading) -> Vec<FleetPrediction> {
    let mut ranked: Vec<FleetPrediction> = regions
        .iter()
        .map(|region| {
            let (population, population_estimated) = region
                .latest_population
                .map_or((DEFAULT_POPULATION, true), |pop| (pop, false));

            FleetPrediction {
                barangay: region.barangay.clone(),
                population,
                population_estimated,
                prediction: predict(PredictionInput::new(
                    population as f64,
                    weather.temperature,
                    weather.humidity,
                )),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.prediction
            .predicted_cases
            .total_cmp(&a.prediction.predicted_cases)
    });

    log::debug!(
        "Fleet prediction over {} barangays at {:.1}°C / {:.0}%",
        ranked.len(),
        weather.temperature,
        weather.humidity
    );

    ranked
}
