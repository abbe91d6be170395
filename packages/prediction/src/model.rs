//! The fixed-coefficient regression formula.
//!
//! ```text
//! raw = INTERCEPT + POPULATION_COEF * population
//!                 + TEMPERATURE_COEF * temperature
//!                 + HUMIDITY_COEF * humidity
//! predicted_cases = max(0, round(raw, 2))
//! ```
//!
//! Inputs are not validated here. Zero or negative values flow through
//! the formula and a negative result is floored to zero.

use dengue_watch_prediction_models::{
    PredictionInput, PredictionResult, RiskTier, TermContributions,
};

use crate::round_to;

/// Regression intercept.
pub const INTERCEPT: f64 = -72.612_471;
/// Cases per resident.
pub const POPULATION_COEF: f64 = 0.009_054_43;
/// Cases per °C.
pub const TEMPERATURE_COEF: f64 = 2.447_256;
/// Cases per percentage point of relative humidity.
pub const HUMIDITY_COEF: f64 = -0.077_863_3;

/// Evaluates the unrounded, unclamped formula.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn raw_prediction(input: PredictionInput) -> f64 {
    INTERCEPT
        + POPULATION_COEF * input.population
        + TEMPERATURE_COEF * input.temperature
        + HUMIDITY_COEF * input.humidity
}

/// Predicts the dengue case count for one barangay-period.
///
/// Deterministic: identical inputs always give bit-identical output.
#[must_use]
pub fn predict(input: PredictionInput) -> PredictionResult {
    let rounded = round_to(raw_prediction(input), 2);
    // `> 0.0` rather than `f64::max` so `-0.0` and NaN both land on 0.
    let predicted_cases = if rounded > 0.0 { rounded } else { 0.0 };

    PredictionResult {
        predicted_cases,
        contributions: TermContributions {
            population_effect: round_to(POPULATION_COEF * input.population, 2),
            temperature_effect: round_to(TEMPERATURE_COEF * input.temperature, 2),
            humidity_effect: round_to(HUMIDITY_COEF * input.humidity, 2),
            base_constant: INTERCEPT,
        },
        risk_tier: RiskTier::from_cases(predicted_cases),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(population: f64, temperature: f64, humidity: f64) -> PredictionInput {
        PredictionInput::new(population, temperature, humidity)
    }

    #[test]
    fn typical_barangay_is_high_risk() {
        let result = predict(input(5_000.0, 30.0, 75.0));
        assert!((result.predicted_cases - 40.24).abs() < 1e-9);
        assert_eq!(result.risk_tier, RiskTier::High);
    }

    #[test]
    fn breakdown_reports_each_term() {
        let result = predict(input(5_000.0, 30.0, 75.0));
        let c = result.contributions;
        assert!((c.population_effect - 45.27).abs() < 1e-9);
        assert!((c.temperature_effect - 73.42).abs() < 1e-9);
        assert!((c.humidity_effect - -5.84).abs() < 1e-9);
        assert!((c.base_constant - INTERCEPT).abs() < f64::EPSILON);
    }

    #[test]
    fn all_zero_inputs_clamp_to_zero() {
        let result = predict(input(0.0, 0.0, 0.0));
        assert!((raw_prediction(input(0.0, 0.0, 0.0)) - INTERCEPT).abs() < 1e-12);
        assert_eq!(result.predicted_cases.to_bits(), 0f64.to_bits());
        assert_eq!(result.risk_tier, RiskTier::Minimal);
    }

    #[test]
    fn negative_inputs_pass_through_and_clamp() {
        let result = predict(input(-10_000.0, -5.0, 120.0));
        assert_eq!(result.predicted_cases.to_bits(), 0f64.to_bits());
        assert!(result.contributions.population_effect < 0.0);
    }

    #[test]
    fn never_negative_over_a_grid() {
        for population in (0..=50_000).step_by(2_500) {
            for temperature in [-10.0, 0.0, 15.0, 25.0, 30.0, 35.0, 45.0] {
                for humidity in [0.0, 40.0, 70.0, 100.0, 150.0] {
                    let result = predict(input(f64::from(population), temperature, humidity));
                    assert!(
                        result.predicted_cases >= 0.0,
                        "negative prediction for ({population}, {temperature}, {humidity})"
                    );
                    assert!(result.predicted_cases.is_sign_positive());
                }
            }
        }
    }

    #[test]
    fn deterministic_bit_for_bit() {
        let a = predict(input(12_345.0, 29.3, 81.7));
        let b = predict(input(12_345.0, 29.3, 81.7));
        assert_eq!(a.predicted_cases.to_bits(), b.predicted_cases.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn tier_follows_rounded_prediction() {
        for population in [0.0, 4_000.0, 6_000.0, 8_000.0, 10_000.0, 15_000.0] {
            let result = predict(input(population, 29.0, 72.0));
            assert_eq!(result.risk_tier, RiskTier::from_cases(result.predicted_cases));
        }
    }
}
