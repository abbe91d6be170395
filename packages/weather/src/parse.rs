//! Normalization of Open-Meteo forecast bodies.

use chrono::NaiveDate;
use dengue_watch_prediction_models::round_to;
use serde_json::Value;

use crate::codes::condition_for_code;
use crate::{DEFAULT_HUMIDITY, DEFAULT_TEMPERATURE, WeatherDay};

fn daily_f64(daily: &Value, key: &str, index: usize) -> Option<f64> {
    daily.get(key)?.get(index)?.as_f64()
}

/// Mean of the hourly `key` series over entries whose timestamp falls on
/// `date`.
fn hourly_mean(hourly: &Value, key: &str, date: &str) -> Option<f64> {
    let times = hourly.get("time")?.as_array()?;
    let values = hourly.get(key)?.as_array()?;

    let (sum, count) = times
        .iter()
        .zip(values)
        .filter(|(time, _)| time.as_str().is_some_and(|t| t.starts_with(date)))
        .filter_map(|(_, value)| value.as_f64())
        .fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / f64::from(count))
}

/// Converts an Open-Meteo response body into one [`WeatherDay`] per entry
/// of `daily.time`.
///
/// Never fails: a body without a `daily.time` array yields an empty list,
/// entries with unparseable dates are skipped, and missing values fall back
/// to hourly means and then to the defaults.
#[must_use]
pub fn parse_forecast(body: &Value) -> Vec<WeatherDay> {
    let Some(daily) = body.get("daily") else {
        return Vec::new();
    };
    let Some(times) = daily.get("time").and_then(Value::as_array) else {
        return Vec::new();
    };
    let hourly = body.get("hourly").unwrap_or(&Value::Null);

    times
        .iter()
        .enumerate()
        .filter_map(|(i, time)| {
            let date_text = time.as_str()?;
            let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").ok()?;

            let max = daily_f64(daily, "temperature_2m_max", i);
            let min = daily_f64(daily, "temperature_2m_min", i);

            let temperature = match (max, min) {
                (Some(max), Some(min)) => Some((max + min) / 2.0),
                _ => daily_f64(daily, "temperature_2m_mean", i),
            }
            .or_else(|| hourly_mean(hourly, "temperature_2m", date_text))
            .map_or(DEFAULT_TEMPERATURE, |v| round_to(v, 1));

            let humidity = daily_f64(daily, "relative_humidity_2m_mean", i)
                .or_else(|| hourly_mean(hourly, "relative_humidity_2m", date_text))
                .map_or(DEFAULT_HUMIDITY, |v| round_to(v, 1));

            let weather_code = daily
                .get("weather_code")
                .or_else(|| daily.get("weathercode"))
                .and_then(|codes| codes.get(i))
                .and_then(Value::as_i64);

            Some(WeatherDay {
                date,
                temperature,
                temperature_max: max.unwrap_or(temperature),
                temperature_min: min.unwrap_or(temperature),
                humidity,
                rainfall_mm: daily_f64(daily, "precipitation_sum", i).unwrap_or(0.0),
                weather_code,
                condition: weather_code
                    .map_or("Unknown", condition_for_code)
                    .to_string(),
            })
        })
        .collect()
}

/// Parses a raw response body. Text that is not JSON (an HTML error page,
/// a truncated body) yields an empty list.
#[must_use]
pub fn parse_forecast_body(body: &str) -> Vec<WeatherDay> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => parse_forecast(&value),
        Err(e) => {
            log::warn!("Unparseable weather response: {e}");
            Vec::new()
        }
    }
}
