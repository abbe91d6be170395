//! Open-Meteo HTTP client.

use std::time::Duration;

use crate::parse::parse_forecast_body;
use crate::{ForecastSource, WeatherDay, WeatherError};

const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code";

/// Forecast client for a single fixed location.
pub struct OpenMeteoClient {
    base_url: String,
    latitude: f64,
    longitude: f64,
    forecast_days: u8,
    client: reqwest::Client,
}

impl OpenMeteoClient {
    /// Creates a client for the given location with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            latitude,
            longitude,
            forecast_days: 7,
            client,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn forecast(&self) -> Result<Vec<WeatherDay>, WeatherError> {
        let resp = self
            .client
            .get(self.forecast_url())
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }

        let days = parse_forecast_body(&resp.text().await?);

        if days.is_empty() {
            log::warn!("Weather provider returned no forecast days");
        } else {
            log::debug!("Fetched {} forecast days", days.len());
        }

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_url_trims_trailing_slash() {
        let client = OpenMeteoClient::new(
            "https://api.open-meteo.com/",
            14.6,
            121.0,
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.forecast_url(),
            "https://api.open-meteo.com/v1/forecast"
        );
    }
}
